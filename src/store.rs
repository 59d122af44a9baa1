//! # Document Store Contract
//!
//! Traits and types for the collaborating document store: batch handles, the
//! four staging operations, and commit. This crate consumes the contract; it
//! never implements storage, serialization to the wire, or addressing.
//!
//! Staging is synchronous and performs no I/O. I/O happens only when a batch
//! handle is committed.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use crate::error::{BatchPoolError, BatchPoolResult};

/// Errors surfaced by the collaborating document store.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    /// Obtaining a fresh batch handle failed.
    #[error("Batch allocation failed: {0}")]
    Allocation(String),
    /// A staging call rejected its input.
    #[error("Staging rejected: {0}")]
    Staging(String),
    /// A batch commit failed.
    #[error("Commit failed: {0}")]
    Commit(String),
}

pub type StoreResult<T> = anyhow::Result<T, StoreError>;

/// Reference to a target document, as a slash-separated path.
///
/// Addressing semantics belong to the store. The only constraint enforced
/// here is that the path is non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentRef(String);

impl DocumentRef {
    pub fn new(path: impl Into<String>) -> BatchPoolResult<Self> {
        let path = path.into();
        if path.trim().is_empty() {
            return Err(BatchPoolError::InvalidDocument(
                "document reference must be a non-empty path".to_string(),
            ));
        }
        Ok(Self(path))
    }

    pub fn path(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Merge configuration for `set` staging operations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetOptions {
    /// Merge the provided data into an existing document instead of
    /// replacing it.
    pub merge: bool,
    /// Restrict the merge to these field paths. Implies `merge`.
    pub merge_fields: Option<Vec<String>>,
}

impl SetOptions {
    /// Merge every provided field into the existing document.
    pub fn merge_all() -> Self {
        Self {
            merge: true,
            merge_fields: None,
        }
    }

    /// Merge only the named field paths into the existing document.
    pub fn merge_fields(fields: Vec<String>) -> Self {
        Self {
            merge: true,
            merge_fields: Some(fields),
        }
    }
}

/// Per-write result record produced by an underlying commit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WriteOutcome {
    /// Document the write applied to.
    pub document: DocumentRef,
    /// Store-reported time the write was applied.
    pub write_time: DateTime<Utc>,
}

/// One atomic group of staged writes in the backing store.
///
/// Each staging call records exactly one operation without performing I/O;
/// `commit` submits the whole group and resolves to one [`WriteOutcome`] per
/// staged operation, in staging order. Handles are exclusively owned by the
/// pool entry they were allocated for and must tolerate staging calls from
/// one caller at a time.
#[async_trait]
pub trait StoreBatch: Send + Sync {
    /// Stage a document creation with the full document data.
    fn create(&self, doc: &DocumentRef, data: Value) -> StoreResult<()>;

    /// Stage a document set, optionally merging per `options`.
    fn set(&self, doc: &DocumentRef, data: Value, options: Option<&SetOptions>) -> StoreResult<()>;

    /// Stage a partial document update.
    fn update(&self, doc: &DocumentRef, data: Value) -> StoreResult<()>;

    /// Stage a document deletion.
    fn delete(&self, doc: &DocumentRef) -> StoreResult<()>;

    /// Submit every staged operation to the store.
    async fn commit(&self) -> StoreResult<Vec<WriteOutcome>>;
}

/// Capability to obtain fresh batch handles from the store.
///
/// Injected at pool construction so the pool carries no hidden global client
/// and can be exercised against a substitute store.
pub trait BatchFactory: Send + Sync {
    fn create_batch(&self) -> StoreResult<Arc<dyn StoreBatch>>;
}
