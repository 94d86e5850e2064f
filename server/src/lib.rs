use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use playdex_core::source::load_path;
use playdex_core::{CorpusStats, DocId, IndexError, InvertedIndex, Tokenizer};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Deserialize)]
pub struct TfParams {
    pub term: String,
    pub doc: DocId,
}

#[derive(Deserialize)]
pub struct AnyParams {
    /// Comma-separated terms
    pub terms: String,
}

#[derive(Deserialize)]
pub struct PhraseParams {
    pub q: String,
}

#[derive(Deserialize)]
pub struct GroupParams {
    pub term: String,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<String>,
}

#[derive(Serialize)]
pub struct TfResponse {
    pub term: String,
    pub doc: DocId,
    pub frequency: usize,
}

#[derive(Clone)]
pub struct AppState {
    pub index: Arc<InvertedIndex>,
    pub tokenizer: Tokenizer,
}

/// JSON error body with a status derived from the library error.
pub struct ApiError(StatusCode, String);

impl From<IndexError> for ApiError {
    fn from(e: IndexError) -> Self {
        let status = match &e {
            IndexError::InvalidArgument(_) | IndexError::MalformedDisplayName(_) => StatusCode::BAD_REQUEST,
            IndexError::PreconditionViolation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        ApiError(status, e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.0, Json(serde_json::json!({ "error": self.1 }))).into_response()
    }
}

/// Load and index the corpus at `corpus_path`, then serve queries against it.
pub fn build_app(corpus_path: &str, tokenizer: Tokenizer) -> Result<Router> {
    let records = load_path(corpus_path)?;
    let index = InvertedIndex::build(&records, &tokenizer)?;
    Ok(router(AppState { index: Arc::new(index), tokenizer }))
}

pub fn router(app_state: AppState) -> Router {
    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val.split(',').filter_map(|s| s.trim().parse().ok()).collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/stats", get(stats_handler))
        .route("/tf", get(tf_handler))
        .route("/search/any", get(any_handler))
        .route("/search/phrase", get(phrase_handler))
        .route("/search/group", get(group_handler))
        .route("/doc/:doc_id", get(doc_handler))
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

fn respond(query: String, start: std::time::Instant, results: Vec<String>) -> Json<SearchResponse> {
    Json(SearchResponse { query, took_s: start.elapsed().as_secs_f64(), total_hits: results.len(), results })
}

pub async fn stats_handler(State(state): State<AppState>) -> Result<Json<CorpusStats>, ApiError> {
    Ok(Json(CorpusStats::compute(state.index.documents())?))
}

pub async fn tf_handler(
    State(state): State<AppState>,
    Query(params): Query<TfParams>,
) -> Result<Json<TfResponse>, ApiError> {
    let term = state.tokenizer.single_term(&params.term)?;
    let frequency = state.index.term_frequency(&term, params.doc);
    Ok(Json(TfResponse { term, doc: params.doc, frequency }))
}

pub async fn any_handler(State(state): State<AppState>, Query(params): Query<AnyParams>) -> Json<SearchResponse> {
    let start = std::time::Instant::now();
    let terms: Vec<String> = params.terms.split(',').flat_map(|t| state.tokenizer.terms(t)).collect();
    let results = state.index.search_any(&terms);
    respond(params.terms, start, results)
}

pub async fn phrase_handler(
    State(state): State<AppState>,
    Query(params): Query<PhraseParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    let start = std::time::Instant::now();
    let results = state.index.search_phrase(&state.tokenizer.terms(&params.q))?;
    Ok(respond(params.q, start, results))
}

pub async fn group_handler(
    State(state): State<AppState>,
    Query(params): Query<GroupParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    let start = std::time::Instant::now();
    let term = state.tokenizer.single_term(&params.term)?;
    let results = state.index.search_group(&term)?;
    Ok(respond(params.term, start, results))
}

pub async fn doc_handler(State(state): State<AppState>, Path(doc_id): Path<DocId>) -> Result<Json<serde_json::Value>, ApiError> {
    match state.index.document(doc_id) {
        Some(doc) => Ok(Json(serde_json::to_value(doc).map_err(IndexError::from)?)),
        None => Err(ApiError(StatusCode::NOT_FOUND, format!("no document {doc_id}"))),
    }
}
