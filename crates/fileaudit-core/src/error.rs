/// Error types for the audit pipeline.
///
/// Expected, per-item failures (an unlistable directory, an unreadable file,
/// an unknown owner) never appear here as fatal errors — they are absorbed
/// where they happen and turned into events or degraded records. The types
/// below cover what is left: failures that end a scan, a report, or a
/// configuration check.
use std::path::PathBuf;
use thiserror::Error;

/// A failure that terminates a scan early.
///
/// Caught by the coordinator's top-level guard; records accumulated before
/// the failure are kept.
#[derive(Error, Debug)]
pub enum ScanError {
    /// The root exists but is not a directory.
    #[error("scan root '{}' is not a directory", .0.display())]
    RootNotDirectory(PathBuf),

    /// The scan configuration was rejected.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// The extraction worker pool could not be created.
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// A worker panicked while the scan was running.
    #[error("scan worker panicked: {0}")]
    Panicked(String),
}

/// Writing the CSV report failed.
#[derive(Error, Debug)]
pub enum ReportError {
    /// Creating the output directory or file, or flushing it, failed.
    #[error("I/O error writing report to '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV encoder failed (usually an underlying write error).
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Invalid scan configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Worker count outside the accepted range.
    #[error("worker count must be between 1 and {max}, got {value}")]
    InvalidWorkers { value: usize, max: usize },
}
