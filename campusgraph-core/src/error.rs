use campusgraph_scanner::{RetrievalError, ScanError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CrawlError {
    #[error("Could not retrieve the location listing: {0}")]
    RootRetrieval(#[from] RetrievalError),

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CrawlError>;
