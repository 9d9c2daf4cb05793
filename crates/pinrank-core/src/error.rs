use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Backing lookup failed or ran past its budget.
    #[error("Pin store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Malformed pin record for '{doc_id}': {reason}")]
    MalformedRecord { doc_id: String, reason: String },

    #[error("Invalid pin position {position}: must be between 1 and {max}")]
    InvalidPosition { position: i64, max: u32 },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Store operation failed: {0}")]
    Store(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
