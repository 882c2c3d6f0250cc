use thiserror::Error;

/// Reasons an entry is rejected before it reaches the ledger.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Date is required")]
    MissingDate,

    #[error("Date must be YYYY-MM-DD: {0}")]
    InvalidDate(String),

    #[error("Category is required")]
    MissingCategory,

    #[error("Memo is required")]
    MissingMemo,

    #[error("Amount must be a number: {0}")]
    InvalidAmount(String),
}

#[derive(Error, Debug)]
pub enum KakeiboError {
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid entry: {0}")]
    Validation(#[from] ValidationError),

    #[error("Stored data under '{key}' is unreadable: {source}")]
    CorruptState {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("No expense ids left to assign")]
    IdsExhausted,

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("Logging error: {0}")]
    Logging(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, KakeiboError>;
