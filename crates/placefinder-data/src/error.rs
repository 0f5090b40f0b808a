use std::path::PathBuf;

use thiserror::Error;
pub type Result<T> = std::result::Result<T, DataError>;

#[derive(Error, Debug)]
pub enum DataError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[cfg(feature = "download_data")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Place data file not found: {}", .0.display())]
    MissingDataFile(PathBuf),
    #[error("Duplicate place id in source data: {0}")]
    DuplicateId(String),
    #[error("Loader failed: {0}")]
    Source(String),
}
