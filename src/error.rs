use thiserror::Error;

use crate::integrity::Violation;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Integrity check failed: {first} ({count} violation(s))")]
    Integrity { first: Violation, count: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Database error: {0}")]
    DbError(#[from] sqlx::Error),

    #[error("Store error: {0}")]
    Store(String),
}

pub type IngestResult<T> = Result<T, IngestError>;
