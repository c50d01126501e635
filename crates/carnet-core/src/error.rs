//! Error types for Carnet

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Database pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Missing credential or unrecognized provider
    #[error("Configuration error: {0}")]
    Config(String),

    /// Rejected user input (empty description, non-numeric amount, ...)
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Provider answered with a non-success status
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Provider answered without any choice/message
    #[error("Empty response: {0}")]
    EmptyResponse(String),

    /// The in-memory change was applied but could not be written out
    #[error("Persistence error: {0}")]
    Persistence(String),
}

pub type Result<T> = std::result::Result<T, Error>;
