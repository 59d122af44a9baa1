//! Pool configuration and capacity clamping.

use crate::constants::system::MAX_WRITES_PER_BATCH;
use crate::error::{BatchPoolError, BatchPoolResult};
use serde::{Deserialize, Serialize};

/// Configuration for a write-batch pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Desired number of writes per underlying batch.
    ///
    /// Clamped to [`MAX_WRITES_PER_BATCH`] before use, so a misconfigured
    /// value can never violate the store's per-batch contract.
    pub batch_size: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            batch_size: MAX_WRITES_PER_BATCH,
        }
    }
}

impl PoolConfig {
    pub fn new(batch_size: usize) -> Self {
        Self { batch_size }
    }

    pub fn from_env() -> BatchPoolResult<Self> {
        let mut config = Self::default();

        if let Ok(batch_size) = std::env::var("DOCBATCH_BATCH_SIZE") {
            config.batch_size = batch_size.parse().map_err(|e| {
                BatchPoolError::ConfigurationError(format!("Invalid batch_size: {e}"))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> BatchPoolResult<()> {
        if self.batch_size == 0 {
            return Err(BatchPoolError::ConfigurationError(
                "batch_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Per-batch write ceiling actually enforced: the configured size clamped
    /// to the store hard limit.
    pub fn effective_capacity(&self) -> usize {
        self.batch_size.min(MAX_WRITES_PER_BATCH)
    }
}
