/// Scanner module — orchestrates an audit scan.
///
/// A scan runs in two phases:
/// - **Phase 1 (walk):** single-threaded, stack-based directory discovery
///   ([`walker`]). Produces the full list of file paths.
/// - **Phase 2 (extract):** the path list is fanned out over a bounded rayon
///   pool; each path yields one record ([`extract`]) which is inserted into a
///   shared [`ScanResultSet`].
///
/// Phase 2 starts only after phase 1 has drained the stack, and [`scan`]
/// returns only after every extraction has finished, so callers can sort and
/// report immediately.
///
/// Expected failures never reach this level: unlistable directories are
/// skipped by the walker and unreadable files become degraded records. The
/// top-level guard in [`scan`] catches the rest (including worker panics),
/// reports them, and keeps what was collected.
pub mod extract;
pub mod progress;
pub mod walker;

pub use progress::{NullReporter, ScanEvent, ScanReporter};

use crate::config::ScanConfig;
use crate::error::ScanError;
use crate::model::ScanResultSet;
use crossbeam_channel::Receiver;
use rayon::prelude::*;
use std::any::Any;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// How a scan ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanStatus {
    /// Every discovered path was processed.
    Completed,
    /// The root path does not exist; nothing was scanned.
    RootNotFound,
    /// Cancellation was requested; results are partial.
    Cancelled,
    /// An unexpected failure ended the scan; results are partial.
    Failed { message: String },
}

/// Everything a scan produces.
#[derive(Debug)]
pub struct ScanSummary {
    /// The root as scanned (made absolute).
    pub root: PathBuf,
    /// Accumulated records, unordered.
    pub results: ScanResultSet,
    /// Wall-clock time for walk + extraction.
    pub elapsed: Duration,
    pub status: ScanStatus,
}

impl ScanSummary {
    fn empty(root: PathBuf, status: ScanStatus) -> Self {
        Self {
            root,
            results: ScanResultSet::new(),
            elapsed: Duration::ZERO,
            status,
        }
    }
}

/// Scan `root` on the calling thread.
///
/// Never fails: every outcome, including a missing root or a panicking
/// worker, is described by [`ScanSummary::status`].
pub fn scan(
    root: &Path,
    config: &ScanConfig,
    reporter: &dyn ScanReporter,
    cancel: &AtomicBool,
) -> ScanSummary {
    let start = Instant::now();
    let root = std::path::absolute(root).unwrap_or_else(|_| root.to_path_buf());

    if !root.exists() {
        warn!("scan root {} does not exist", root.display());
        reporter.report(ScanEvent::RootNotFound { root: root.clone() });
        reporter.report(ScanEvent::Complete {
            files: 0,
            degraded: 0,
            duration: start.elapsed(),
        });
        let mut summary = ScanSummary::empty(root, ScanStatus::RootNotFound);
        summary.elapsed = start.elapsed();
        return summary;
    }

    info!("Starting scan of {} with {} workers", root.display(), config.workers);
    let results = ScanResultSet::new();

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        run_phases(&root, config, reporter, cancel, &results)
    }));

    let status = match outcome {
        Ok(Ok(())) if cancel.load(Ordering::Relaxed) => ScanStatus::Cancelled,
        Ok(Ok(())) => ScanStatus::Completed,
        Ok(Err(err)) => ScanStatus::Failed {
            message: err.to_string(),
        },
        Err(payload) => ScanStatus::Failed {
            message: ScanError::Panicked(panic_message(payload.as_ref())).to_string(),
        },
    };

    match &status {
        ScanStatus::Failed { message } => {
            warn!("scan of {} failed: {message}", root.display());
            reporter.report(ScanEvent::ScanFailed {
                message: message.clone(),
            });
        }
        ScanStatus::Cancelled => reporter.report(ScanEvent::Cancelled),
        _ => {}
    }

    let elapsed = start.elapsed();
    let files = results.len();
    let degraded = results.degraded_count();
    info!("Scan complete: {files} files ({degraded} degraded) in {elapsed:?}");
    reporter.report(ScanEvent::Complete {
        files,
        degraded,
        duration: elapsed,
    });

    ScanSummary {
        root,
        results,
        elapsed,
        status,
    }
}

/// Walk, then extract. Errors and panics are handled by the caller.
fn run_phases(
    root: &Path,
    config: &ScanConfig,
    reporter: &dyn ScanReporter,
    cancel: &AtomicBool,
    results: &ScanResultSet,
) -> Result<(), ScanError> {
    config.validate()?;
    if !root.is_dir() {
        return Err(ScanError::RootNotDirectory(root.to_path_buf()));
    }

    reporter.report(ScanEvent::Started {
        root: root.to_path_buf(),
        workers: config.workers,
    });

    let walk = walker::enumerate_files(root, reporter, cancel);
    info!(
        "Walk complete: {} files in {} directories ({} skipped)",
        walk.files.len(),
        walk.directories,
        walk.skipped
    );
    reporter.report(ScanEvent::WalkComplete {
        files: walk.files.len(),
        directories: walk.directories,
    });

    if cancel.load(Ordering::Relaxed) {
        return Ok(());
    }

    results.reserve(walk.files.len());
    extract_all(&walk.files, results, config, reporter, cancel)
}

/// Phase 2: extract every path on a pool of exactly `config.workers` threads.
///
/// Each record is inserted as soon as it is produced. Returns after the last
/// worker finishes. Paths not yet started when `cancel` is raised are skipped.
pub fn extract_all(
    paths: &[PathBuf],
    results: &ScanResultSet,
    config: &ScanConfig,
    reporter: &dyn ScanReporter,
    cancel: &AtomicBool,
) -> Result<(), ScanError> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.workers)
        .thread_name(|i| format!("fileaudit-extract-{i}"))
        .build()?;

    pool.install(|| {
        paths.par_iter().for_each(|path| {
            if cancel.load(Ordering::Relaxed) {
                return;
            }
            results.insert(extract::extract(path, reporter));
        });
    });

    Ok(())
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Maximum number of events that may queue up in a background scan's channel.
///
/// The consumer is expected to drain continuously; if it falls behind, the
/// workers block on `send` rather than buffering unbounded event history.
pub const EVENT_CHANNEL_CAPACITY: usize = 4_096;

/// Handle to a scan running on a background thread.
pub struct ScanHandle {
    /// Events from the scan. Disconnects when the scan thread exits.
    pub events_rx: Receiver<ScanEvent>,
    root: PathBuf,
    cancel_flag: Arc<AtomicBool>,
    thread: thread::JoinHandle<ScanSummary>,
}

impl ScanHandle {
    /// Request the scan to stop as soon as possible.
    pub fn cancel(&self) {
        self.cancel_flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel_flag.load(Ordering::Relaxed)
    }

    /// Wait for the scan to finish and take its summary.
    ///
    /// Drain `events_rx` first (or concurrently): a full event channel
    /// blocks the scan, and this call would never return.
    pub fn join(self) -> ScanSummary {
        match self.thread.join() {
            Ok(summary) => summary,
            Err(payload) => ScanSummary::empty(
                self.root,
                ScanStatus::Failed {
                    message: ScanError::Panicked(panic_message(payload.as_ref())).to_string(),
                },
            ),
        }
    }
}

/// Start a scan on a background thread.
///
/// Returns a [`ScanHandle`] for receiving events, requesting cancellation,
/// and collecting the final [`ScanSummary`].
pub fn start_scan(root: PathBuf, config: ScanConfig) -> io::Result<ScanHandle> {
    let (events_tx, events_rx) = crossbeam_channel::bounded::<ScanEvent>(EVENT_CHANNEL_CAPACITY);
    let cancel_flag = Arc::new(AtomicBool::new(false));
    let cancel_clone = cancel_flag.clone();
    let thread_root = root.clone();

    let thread = thread::Builder::new()
        .name("fileaudit-scanner".into())
        .spawn(move || scan(&thread_root, &config, &events_tx, &cancel_clone))?;

    Ok(ScanHandle {
        events_rx,
        root,
        cancel_flag,
        thread,
    })
}
