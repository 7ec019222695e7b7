// src/utils/error.rs
use thiserror::Error;

// Define specific error types for different parts of the application
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error), // Automatically convert reqwest errors

    #[error("HTTP error: {0}")]
    Http(reqwest::StatusCode), // e.g., 403 Forbidden, 500

    #[error("Release page not found: {0}")]
    NotFound(String),

    #[error("Empty response body from {0}")]
    EmptyBody(String),

    #[error("Failed to parse releases response: {0}")]
    Parse(String),
}

/// Failure of a single wildcard match. Only `InvalidPattern` points at a
/// defect; the other two are ordinary "field absent" outcomes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatchError {
    #[error("Invalid wildcard pattern '{0}': expected exactly one '*' between two literals")]
    InvalidPattern(String),

    #[error("Delimiter not found: {0}")]
    NotFound(String),

    #[error("Delimiters enclose no content")]
    EmptyMatch,
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Release tag cannot be used as a directory name: '{0}'")]
    InvalidTag(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error), // Automatically convert IO errors

    #[error("Fetching releases failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}
