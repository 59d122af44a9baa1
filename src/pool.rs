//! # Batch Pool
//!
//! Public write surface and commit aggregation. A [`BatchPool`] spreads an
//! unbounded stream of document writes across as many underlying store
//! batches as needed, each respecting the store's per-batch write limit, and
//! commits every batch concurrently when asked.
//!
//! Writes issued through one pool are not atomic with each other once they
//! span more than one underlying batch; each batch is its own store
//! transaction.

use futures::future::join_all;
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::PoolConfig;
use crate::error::BatchPoolResult;
use crate::ledger::CapacityLedger;
use crate::store::{BatchFactory, DocumentRef, SetOptions, StoreBatch, StoreResult, WriteOutcome};

/// Capacity-bounded multiplexer over store write batches.
///
/// The pool is single-use per commit cycle: it is never reset after a
/// commit, so committing a second time re-submits every staged write.
/// Construct a new pool per logical unit of work.
pub struct BatchPool {
    ledger: Mutex<CapacityLedger>,
    factory: Arc<dyn BatchFactory>,
}

impl BatchPool {
    /// Pool with the store's full per-batch capacity.
    pub fn new(factory: Arc<dyn BatchFactory>) -> Self {
        Self {
            ledger: Mutex::new(CapacityLedger::new(PoolConfig::default().effective_capacity())),
            factory,
        }
    }

    /// Pool with a caller-chosen batch size, clamped to the store hard limit.
    pub fn with_config(factory: Arc<dyn BatchFactory>, config: PoolConfig) -> BatchPoolResult<Self> {
        config.validate()?;
        Ok(Self {
            ledger: Mutex::new(CapacityLedger::new(config.effective_capacity())),
            factory,
        })
    }

    /// Stage a document creation with the full document data.
    pub fn create<T: Serialize>(&self, doc: &DocumentRef, data: &T) -> BatchPoolResult<()> {
        let data = serde_json::to_value(data)?;
        self.route(doc, move |batch| batch.create(doc, data))
    }

    /// Stage a document set, optionally merging per `options`.
    pub fn set<T: Serialize>(
        &self,
        doc: &DocumentRef,
        data: &T,
        options: Option<&SetOptions>,
    ) -> BatchPoolResult<()> {
        let data = serde_json::to_value(data)?;
        self.route(doc, move |batch| batch.set(doc, data, options))
    }

    /// Stage a partial document update.
    pub fn update<T: Serialize>(&self, doc: &DocumentRef, data: &T) -> BatchPoolResult<()> {
        let data = serde_json::to_value(data)?;
        self.route(doc, move |batch| batch.update(doc, data))
    }

    /// Stage a document deletion.
    pub fn delete(&self, doc: &DocumentRef) -> BatchPoolResult<()> {
        self.route(doc, move |batch| batch.delete(doc))
    }

    /// Route one staged operation: acquire a batch with spare capacity, stage
    /// into it, then record the write.
    ///
    /// Runs as a single critical section so concurrent writers cannot race
    /// the scan-and-increment sequence. The write is recorded only after
    /// staging succeeded; a rejected write is never counted. Staging performs
    /// no I/O, so no await happens under the lock.
    fn route<F>(&self, doc: &DocumentRef, stage: F) -> BatchPoolResult<()>
    where
        F: FnOnce(&dyn StoreBatch) -> StoreResult<()>,
    {
        let mut ledger = self.ledger.lock();
        let (index, entry) = ledger.acquire(self.factory.as_ref())?;
        stage(entry.batch.as_ref())?;
        entry.write_count += 1;
        debug!(
            document = %doc,
            batch_index = index,
            write_count = entry.write_count,
            "Write staged"
        );
        Ok(())
    }

    /// Commit every allocated batch concurrently and flatten their results.
    ///
    /// All underlying commits are launched together and the call suspends
    /// until every one has completed. On success the per-batch outcome
    /// sequences are concatenated in batch allocation order; within a batch
    /// they follow staging order. Note the aggregate is not necessarily the
    /// global call order of writes across the pool, since first-fit routing
    /// interleaves writes over batches.
    ///
    /// If any underlying commit fails, the first failure in allocation order
    /// is returned and no outcome sequence is produced. Batches whose commits
    /// succeeded are durably applied by the store; this surface cannot report
    /// which (cross-batch write sets are independent transactions).
    pub async fn commit(&self) -> BatchPoolResult<Vec<WriteOutcome>> {
        let (batches, total_writes) = {
            let ledger = self.ledger.lock();
            (ledger.batches(), ledger.total_writes())
        };

        debug!(
            batch_count = batches.len(),
            total_writes, "Committing all batches"
        );

        let results = join_all(batches.iter().map(|batch| batch.commit())).await;

        let mut outcomes = Vec::with_capacity(total_writes);
        for result in results {
            outcomes.extend(result?);
        }

        info!(
            batch_count = batches.len(),
            outcome_count = outcomes.len(),
            "Commit complete"
        );
        Ok(outcomes)
    }

    /// Number of underlying batches allocated so far.
    pub fn batch_count(&self) -> usize {
        self.ledger.lock().batch_count()
    }

    /// Total writes staged since the pool was created.
    pub fn total_writes(&self) -> usize {
        self.ledger.lock().total_writes()
    }

    /// Per-batch write counts, in allocation order.
    pub fn write_counts(&self) -> Vec<usize> {
        self.ledger.lock().write_counts()
    }

    /// Per-batch write ceiling this pool enforces.
    pub fn effective_capacity(&self) -> usize {
        self.ledger.lock().capacity()
    }
}
