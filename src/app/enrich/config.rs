//! Title pool configuration

use serde::{Deserialize, Serialize};

use crate::constants::workers;
use crate::errors::{ConfigError, ConfigResult};

/// Configuration for the title enrichment pool
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Number of concurrent workers, `None` for one per available CPU
    pub worker_count: Option<usize>,
    /// Capacity of the channel feeding URLs to the workers
    pub queue_capacity: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            worker_count: None,
            queue_capacity: workers::QUEUE_CAPACITY,
        }
    }
}

impl PoolConfig {
    /// Pool with a fixed number of workers
    pub fn with_workers(worker_count: usize) -> Self {
        Self {
            worker_count: Some(worker_count),
            ..Default::default()
        }
    }

    /// Number of workers the pool actually starts
    pub fn effective_workers(&self) -> usize {
        self.worker_count.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(workers::FALLBACK_WORKER_COUNT)
        })
    }

    /// Validate configuration values
    pub fn validate(&self) -> ConfigResult<()> {
        if self.worker_count == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "pool.worker_count".to_string(),
                value: "0".to_string(),
                reason: "At least one worker is required".to_string(),
            });
        }
        if self.queue_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                field: "pool.queue_capacity".to_string(),
                value: "0".to_string(),
                reason: "Queue capacity must be positive".to_string(),
            });
        }
        Ok(())
    }
}
