use anyhow::Result;
use axum::Router;
use clap::Parser;
use playdex_core::Tokenizer;
use playdex_server::build_app;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
struct Args {
    /// Corpus path: a .json/.jsonl file (optionally .gz) or a directory of them
    #[arg(long, default_value = "./shakespeare-scenes.json.gz")]
    input: String,
    /// NFKC-normalize and lowercase corpus text and queries
    #[arg(long, default_value_t = false)]
    normalize: bool,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();
    let app: Router = build_app(&args.input, Tokenizer::new(args.normalize))?;

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
