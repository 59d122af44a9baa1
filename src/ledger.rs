//! # Capacity Ledger
//!
//! Tracks how many writes each allocated batch handle has received and
//! decides which handle takes the next write. Selection is first-fit over
//! allocation order, so which physical batch receives which write is
//! reproducible for a given call sequence.

use std::sync::Arc;
use tracing::debug;

use crate::store::{BatchFactory, StoreBatch, StoreResult};

/// One allocated underlying batch and its running write count.
///
/// The handle is exclusively owned by this entry. `write_count` only ever
/// grows, by exactly 1 per routed write, and never exceeds the ledger
/// capacity.
pub(crate) struct BatchEntry {
    pub(crate) batch: Arc<dyn StoreBatch>,
    pub(crate) write_count: usize,
}

impl std::fmt::Debug for BatchEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchEntry")
            .field("write_count", &self.write_count)
            .finish_non_exhaustive()
    }
}

/// Append-only pool of batch entries, insertion order = allocation order.
///
/// Entries are never removed or reordered; a full entry simply becomes
/// ineligible for further allocation.
pub(crate) struct CapacityLedger {
    entries: Vec<BatchEntry>,
    capacity: usize,
}

impl CapacityLedger {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity,
        }
    }

    /// Return the first entry with spare capacity, allocating a fresh handle
    /// if every entry is full.
    ///
    /// Never touches `write_count`; the caller records the write only after
    /// staging succeeded.
    pub(crate) fn acquire(
        &mut self,
        factory: &dyn BatchFactory,
    ) -> StoreResult<(usize, &mut BatchEntry)> {
        let index = match self
            .entries
            .iter()
            .position(|entry| entry.write_count < self.capacity)
        {
            Some(index) => index,
            None => {
                let batch = factory.create_batch()?;
                self.entries.push(BatchEntry {
                    batch,
                    write_count: 0,
                });
                let index = self.entries.len() - 1;
                debug!(batch_index = index, "Allocated new underlying batch");
                index
            }
        };
        Ok((index, &mut self.entries[index]))
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    pub(crate) fn batch_count(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn total_writes(&self) -> usize {
        self.entries.iter().map(|entry| entry.write_count).sum()
    }

    pub(crate) fn write_counts(&self) -> Vec<usize> {
        self.entries.iter().map(|entry| entry.write_count).collect()
    }

    /// Snapshot of every handle in allocation order, for commit fan-out.
    pub(crate) fn batches(&self) -> Vec<Arc<dyn StoreBatch>> {
        self.entries.iter().map(|entry| entry.batch.clone()).collect()
    }
}
