//! Error types for banshelf-core

use thiserror::Error;

/// Result type for banshelf-core operations
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Reading the dataset file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The dataset is not a JSON array of book records
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid caller input (zero page size, unknown sort mode, ...)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Requested page lies outside 1..=total_pages
    #[error("Page {page} is out of range (total pages: {total_pages})")]
    PageOutOfRange { page: usize, total_pages: usize },
}
