use thiserror::Error;

/// Errors raised by index construction, corpus loading and queries.
///
/// Unknown terms are never an error: lookups on them return empty results.
#[derive(Error, Debug)]
pub enum IndexError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("display name {0:?} has no group delimiter ':'")]
    MalformedDisplayName(String),

    #[error("precondition violated: {0}")]
    PreconditionViolation(String),

    #[error("malformed document #{ordinal}: {reason}")]
    MalformedDocument { ordinal: usize, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("corpus directory error: {0}")]
    Walk(#[from] walkdir::Error),
}

pub type Result<T> = std::result::Result<T, IndexError>;

impl IndexError {
    /// True for errors caused by the caller's input rather than the environment.
    pub fn is_client_error(&self) -> bool {
        matches!(self, IndexError::InvalidArgument(_) | IndexError::MalformedDisplayName(_))
    }
}
