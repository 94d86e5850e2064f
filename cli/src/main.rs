use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::Path;
use playdex_core::source::load_path;
use playdex_core::{CorpusStats, InvertedIndex, Tokenizer};
use tracing_subscriber::{fmt, EnvFilter};

mod report;

#[derive(Parser)]
#[command(name = "playdex")]
#[command(about = "Positional search over a corpus of play scenes", long_about = None)]
struct Cli {
    /// Corpus path: a .json/.jsonl file (optionally .gz), a directory of them, or - for JSON on stdin
    #[arg(long, global = true, default_value = "shakespeare-scenes.json.gz")]
    input: String,
    /// NFKC-normalize and lowercase corpus text and queries
    #[arg(long, global = true, default_value_t = false)]
    normalize: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print average, longest and shortest scene and play lengths
    Stats,
    /// Occurrences of a term in one scene
    Tf {
        #[arg(long)]
        term: String,
        /// 1-based scene number in corpus order
        #[arg(long)]
        doc: u32,
    },
    /// Scenes containing any of the terms, one line per matching term
    Any {
        #[arg(required = true)]
        terms: Vec<String>,
    },
    /// Scenes containing the exact phrase
    Phrase { phrase: String },
    /// Plays mentioning the term
    Group { term: String },
    /// Run the standard query battery and write one result file per query
    Report {
        #[arg(long, default_value = ".")]
        output: String,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    let tokenizer = Tokenizer::new(cli.normalize);
    let records = load_path(&cli.input).with_context(|| format!("loading corpus from {}", cli.input))?;
    let index = InvertedIndex::build(&records, &tokenizer)?;

    match cli.command {
        Commands::Stats => {
            let stats = CorpusStats::compute(index.documents())?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        Commands::Tf { term, doc } => {
            let term = tokenizer.single_term(&term)?;
            println!("{}", index.term_frequency(&term, doc));
        }
        Commands::Any { terms } => {
            let terms: Vec<String> = terms.iter().flat_map(|t| tokenizer.terms(t)).collect();
            print_lines(&index.search_any(&terms));
        }
        Commands::Phrase { phrase } => {
            print_lines(&index.search_phrase(&tokenizer.terms(&phrase))?);
        }
        Commands::Group { term } => {
            let term = tokenizer.single_term(&term)?;
            print_lines(&index.search_group(&term)?);
        }
        Commands::Report { output } => {
            report::write_report(&index, &tokenizer, Path::new(&output))?;
        }
    }
    Ok(())
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}
