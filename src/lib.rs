#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # docbatch
//!
//! Capacity-bounded write-batch pooling for document stores that cap how
//! many write operations fit in one atomic batch.
//!
//! ## Overview
//!
//! Backing document stores typically reject batches holding more than a
//! fixed number of staged writes (500 here). [`BatchPool`] lets callers
//! issue an effectively unbounded stream of create/set/update/delete
//! operations without tracking batch boundaries: every write is routed
//! first-fit to an underlying batch with spare capacity, a fresh batch is
//! allocated whenever all existing ones are full, and a single `commit`
//! drives every batch to completion concurrently, returning one flattened,
//! ordered sequence of per-write outcomes.
//!
//! The store itself is a collaborator, injected as a [`BatchFactory`]; this
//! crate decides only which batch receives each write and how the batches
//! are driven to completion. Writes that land in different underlying
//! batches are not atomic with respect to each other.
//!
//! ## Module Organization
//!
//! - [`pool`] - Write routing and concurrent commit aggregation
//! - `ledger` - Per-batch capacity accounting (crate-internal)
//! - [`store`] - Collaborator contract: batch handles, staging, commit
//! - [`config`] - Pool configuration and capacity clamping
//! - [`constants`] - Store-imposed operational limits
//! - [`error`] - Structured error handling
//! - [`logging`] - Console tracing setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use docbatch::{BatchPool, DocumentRef, PoolConfig, SetOptions};
//! use serde_json::json;
//!
//! # async fn example(factory: std::sync::Arc<dyn docbatch::BatchFactory>) -> docbatch::BatchPoolResult<()> {
//! let pool = BatchPool::with_config(factory, PoolConfig::new(200))?;
//!
//! let doc = DocumentRef::new("users/alice")?;
//! pool.set(&doc, &json!({ "name": "Alice" }), Some(&SetOptions::merge_all()))?;
//! pool.delete(&DocumentRef::new("users/bob")?)?;
//!
//! let outcomes = pool.commit().await?;
//! println!("applied {} writes", outcomes.len());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod pool;
pub mod store;

mod ledger;

pub use config::PoolConfig;
pub use error::{BatchPoolError, BatchPoolResult};
pub use pool::BatchPool;
pub use store::{
    BatchFactory, DocumentRef, SetOptions, StoreBatch, StoreError, StoreResult, WriteOutcome,
};
