//! Error types for Almanac

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AlmanacError>;

#[derive(Error, Debug)]
pub enum AlmanacError {
    #[error("Event not found: {0}")]
    EventNotFound(String),

    #[error("Memo not found: {0}")]
    MemoNotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Config error: {0}")]
    Config(String),
}
