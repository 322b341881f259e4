use crate::storage::base::StorageError;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("Browser launch error: {0}")]
    LaunchError(String),

    #[error("Navigation error: {0}")]
    NavigationError(String),

    #[error("Timed out after {timeout:?} waiting for selector '{selector}'")]
    SelectorTimeout { selector: String, timeout: Duration },

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Unexpected HTTP status {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("URL parsing error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Extraction error: {0}")]
    ExtractionError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Background task failed: {0}")]
    TaskError(#[from] tokio::task::JoinError),

    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),
}

pub type ScraperResult<T> = Result<T, ScraperError>;
