use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Largest batch a key-value store accepts in one write request.
pub const MAX_BATCH_SIZE: usize = 25;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StorageError {
    #[error("connection failed: {0}")]
    ConnectionError(String),

    #[error("operation failed: {0}")]
    OperationError(String),

    #[error("serialization failed: {0}")]
    SerializationError(String),

    #[error("batch of {size} items exceeds the limit of {max}")]
    BatchTooLarge { size: usize, max: usize },

    #[error("invalid key '{0}'")]
    InvalidKey(String),
}

/// One put-request: the full document stored under `key`.
#[derive(Debug, Clone, PartialEq)]
pub struct StorageItem {
    pub key: String,
    pub data: Value,
}

impl StorageItem {
    pub fn new<T: Serialize>(key: impl Into<String>, data: &T) -> Result<Self, StorageError> {
        Ok(Self {
            key: key.into(),
            data: serde_json::to_value(data)?,
        })
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(error: serde_json::Error) -> Self {
        StorageError::SerializationError(error.to_string())
    }
}

impl From<std::io::Error> for StorageError {
    fn from(error: std::io::Error) -> Self {
        StorageError::OperationError(error.to_string())
    }
}

#[async_trait]
pub trait StorageBackend: Send + Sync {
    fn max_batch_size(&self) -> usize {
        MAX_BATCH_SIZE
    }

    /// Writes every item into `collection`, replacing any document already
    /// stored under the same key.
    async fn upsert_batch(
        &self,
        collection: &str,
        items: Vec<StorageItem>,
    ) -> Result<(), StorageError>;
}
