/// Scan events — structured notifications emitted by the walker, the
/// extraction workers, and the coordinator.
///
/// The core never prints. A frontend supplies a [`ScanReporter`] and renders
/// events however it likes; the common case is a crossbeam channel drained
/// by the UI thread.
use crossbeam_channel::Sender;
use std::path::PathBuf;
use std::time::Duration;

/// A single event in the life of a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
    /// The root exists and the walk is starting.
    Started { root: PathBuf, workers: usize },
    /// The root path does not exist. No other events follow except `Complete`.
    RootNotFound { root: PathBuf },
    /// A directory could not be listed because access was denied.
    /// Its subtree is skipped.
    DirectoryAccessDenied { path: PathBuf },
    /// A directory could not be listed for any other reason.
    DirectoryError { path: PathBuf, message: String },
    /// Directory discovery finished; extraction is about to start.
    WalkComplete { files: usize, directories: usize },
    /// Full metadata was read for a file.
    FileFound { path: PathBuf },
    /// A file produced a degraded, path-only record.
    FileDegraded { path: PathBuf, reason: String },
    /// An unexpected failure ended the scan early. Records collected so far
    /// are kept.
    ScanFailed { message: String },
    /// The scan was cancelled before every path was processed.
    Cancelled,
    /// The scan finished (successfully or not). Always the last event.
    Complete {
        files: usize,
        degraded: usize,
        duration: Duration,
    },
}

/// Sink for [`ScanEvent`]s. Called concurrently from extraction workers.
pub trait ScanReporter: Send + Sync {
    fn report(&self, event: ScanEvent);
}

/// Forward events over a channel. A disconnected receiver is ignored; the
/// scan never fails because nobody is listening.
impl ScanReporter for Sender<ScanEvent> {
    fn report(&self, event: ScanEvent) {
        let _ = self.send(event);
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl ScanReporter for NullReporter {
    fn report(&self, _event: ScanEvent) {}
}
