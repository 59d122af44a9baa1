//! Error types for the batch pooling system.

use crate::store::StoreError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BatchPoolError {
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
    #[error("Invalid document reference: {0}")]
    InvalidDocument(String),
    #[error("Allocation error: {0}")]
    AllocationError(String),
    #[error("Staging error: {0}")]
    StagingError(String),
    #[error("Commit error: {0}")]
    CommitError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for BatchPoolError {
    fn from(error: serde_json::Error) -> Self {
        BatchPoolError::SerializationError(error.to_string())
    }
}

impl From<StoreError> for BatchPoolError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::Allocation(msg) => BatchPoolError::AllocationError(msg),
            StoreError::Staging(msg) => BatchPoolError::StagingError(msg),
            StoreError::Commit(msg) => BatchPoolError::CommitError(msg),
        }
    }
}

pub type BatchPoolResult<T> = anyhow::Result<T, BatchPoolError>;
