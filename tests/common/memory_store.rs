#![allow(dead_code)]

//! In-memory document store double implementing the batch contract.
//!
//! Records every staged operation in order and lets tests fail individual
//! batches' staging or commit, hold all commits at a barrier, and inspect
//! what each allocated batch received.

use async_trait::async_trait;
use chrono::Utc;
use docbatch::{
    BatchFactory, DocumentRef, SetOptions, StoreBatch, StoreError, StoreResult, WriteOutcome,
};
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Barrier;

/// One staged operation recorded by a memory batch.
#[derive(Debug, Clone, PartialEq)]
pub enum StagedWrite {
    Create {
        doc: DocumentRef,
        data: Value,
    },
    Set {
        doc: DocumentRef,
        data: Value,
        options: Option<SetOptions>,
    },
    Update {
        doc: DocumentRef,
        data: Value,
    },
    Delete {
        doc: DocumentRef,
    },
}

impl StagedWrite {
    pub fn document(&self) -> &DocumentRef {
        match self {
            StagedWrite::Create { doc, .. }
            | StagedWrite::Set { doc, .. }
            | StagedWrite::Update { doc, .. }
            | StagedWrite::Delete { doc } => doc,
        }
    }
}

/// Store-wide switches shared by every handle.
#[derive(Default)]
struct StoreKnobs {
    failing_commits: Mutex<HashSet<usize>>,
    failing_staging: Mutex<HashSet<usize>>,
    commit_barrier: Mutex<Option<Arc<Barrier>>>,
    commits_started: AtomicUsize,
}

/// In-memory store handing out recording batch handles.
#[derive(Default)]
pub struct MemoryStore {
    batches: Mutex<Vec<Arc<MemoryBatch>>>,
    knobs: Arc<StoreKnobs>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the commit of the `index`-th allocated batch fail.
    pub fn fail_commit_of(&self, index: usize) {
        self.knobs.failing_commits.lock().insert(index);
    }

    /// Make staging calls on the `index`-th allocated batch reject.
    pub fn fail_staging_of(&self, index: usize) {
        self.knobs.failing_staging.lock().insert(index);
    }

    /// Park every commit on `barrier` before it resolves.
    pub fn hold_commits_at(&self, barrier: Arc<Barrier>) {
        *self.knobs.commit_barrier.lock() = Some(barrier);
    }

    /// The `index`-th allocated batch, for inspection.
    pub fn batch(&self, index: usize) -> Arc<MemoryBatch> {
        self.batches.lock()[index].clone()
    }

    /// How many batch handles were handed out.
    pub fn batch_count(&self) -> usize {
        self.batches.lock().len()
    }

    /// How many commits were invoked, across all handles and cycles.
    pub fn commits_started(&self) -> usize {
        self.knobs.commits_started.load(Ordering::SeqCst)
    }
}

impl BatchFactory for MemoryStore {
    fn create_batch(&self) -> StoreResult<Arc<dyn StoreBatch>> {
        let mut batches = self.batches.lock();
        let batch = Arc::new(MemoryBatch {
            index: batches.len(),
            staged: Mutex::new(Vec::new()),
            knobs: self.knobs.clone(),
        });
        batches.push(batch.clone());
        Ok(batch)
    }
}

/// Recording batch handle.
pub struct MemoryBatch {
    index: usize,
    staged: Mutex<Vec<StagedWrite>>,
    knobs: Arc<StoreKnobs>,
}

impl MemoryBatch {
    /// Everything staged into this batch, in staging order.
    pub fn staged(&self) -> Vec<StagedWrite> {
        self.staged.lock().clone()
    }

    /// Documents staged into this batch, in staging order.
    pub fn staged_documents(&self) -> Vec<DocumentRef> {
        self.staged
            .lock()
            .iter()
            .map(|write| write.document().clone())
            .collect()
    }

    fn record(&self, write: StagedWrite) -> StoreResult<()> {
        if self.knobs.failing_staging.lock().contains(&self.index) {
            return Err(StoreError::Staging(format!(
                "batch {} rejected staging",
                self.index
            )));
        }
        self.staged.lock().push(write);
        Ok(())
    }
}

#[async_trait]
impl StoreBatch for MemoryBatch {
    fn create(&self, doc: &DocumentRef, data: Value) -> StoreResult<()> {
        self.record(StagedWrite::Create {
            doc: doc.clone(),
            data,
        })
    }

    fn set(&self, doc: &DocumentRef, data: Value, options: Option<&SetOptions>) -> StoreResult<()> {
        self.record(StagedWrite::Set {
            doc: doc.clone(),
            data,
            options: options.cloned(),
        })
    }

    fn update(&self, doc: &DocumentRef, data: Value) -> StoreResult<()> {
        self.record(StagedWrite::Update {
            doc: doc.clone(),
            data,
        })
    }

    fn delete(&self, doc: &DocumentRef) -> StoreResult<()> {
        self.record(StagedWrite::Delete { doc: doc.clone() })
    }

    async fn commit(&self) -> StoreResult<Vec<WriteOutcome>> {
        self.knobs.commits_started.fetch_add(1, Ordering::SeqCst);

        let barrier = self.knobs.commit_barrier.lock().clone();
        if let Some(barrier) = barrier {
            barrier.wait().await;
        }

        if self.knobs.failing_commits.lock().contains(&self.index) {
            return Err(StoreError::Commit(format!("batch {} rejected", self.index)));
        }

        let staged = self.staged.lock();
        Ok(staged
            .iter()
            .map(|write| WriteOutcome {
                document: write.document().clone(),
                write_time: Utc::now(),
            })
            .collect())
    }
}
