/// Core error type.
///
/// Adapter crates map their specific errors into this type so the entry point
/// can report startup and runtime failures consistently.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0} timed out")]
    Timeout(String),

    #[error("dispatch error: {0}")]
    Dispatch(String),

    #[error("external error: {0}")]
    External(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Failures reported by repository adapters.
///
/// The core never shows these to a chat user; each component maps them to its
/// own outcome type at the boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("store request timed out: {0}")]
    Timeout(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("store rejected request: {status} {body}")]
    Rejected { status: u16, body: String },

    #[error("malformed store response: {0}")]
    Malformed(String),

    #[error("no matching record: {0}")]
    NotFound(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
