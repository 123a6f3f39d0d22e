/// Scan configuration.
use crate::error::ConfigError;

/// Upper bound on extraction workers.
///
/// Extraction is blocking I/O, so a few times the core count can help on
/// network shares, but thousands of threads only thrash the scheduler.
pub const MAX_WORKERS: usize = 512;

/// Tunables for a single scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    /// Number of threads in the extraction pool.
    pub workers: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            workers: num_cpus::get().clamp(1, MAX_WORKERS),
        }
    }
}

impl ScanConfig {
    /// Replace the worker count.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Check that every field is within its accepted range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == 0 || self.workers > MAX_WORKERS {
            return Err(ConfigError::InvalidWorkers {
                value: self.workers,
                max: MAX_WORKERS,
            });
        }
        Ok(())
    }
}
