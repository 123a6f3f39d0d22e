/// FileAudit Core — scanning, extraction, accumulation, and reporting.
///
/// This crate contains all business logic with zero console dependencies.
/// Frontends subscribe to structured [`scanner::ScanEvent`]s and render them
/// however they like.
///
/// # Modules
///
/// - [`model`] — File records, the concurrent result set, and formatting helpers.
/// - [`scanner`] — Stack-based directory walk and bounded parallel extraction.
/// - [`platform`] — Read-access probing and best-effort owner resolution.
/// - [`report`] — Deterministic CSV report ordered by modification time.
/// - [`config`] — Scan configuration and validation.
/// - [`error`] — Error types shared across the crate.
pub mod config;
pub mod error;
pub mod model;
pub mod platform;
pub mod report;
pub mod scanner;

pub use config::ScanConfig;
pub use error::{ConfigError, ReportError, ScanError};
pub use model::{FileMetadata, FileRecord, ScanResultSet};
pub use scanner::{scan, start_scan, ScanHandle, ScanStatus, ScanSummary};
