/// Console state — renders scan events as text and keeps running counters.
///
/// The scan thread communicates via the event channel; each event passes
/// through [`ConsoleState::process_event`] exactly once, which updates the
/// counters and writes a human-readable line. Lines from different workers
/// may interleave; that is cosmetic only.
use fileaudit_core::scanner::ScanEvent;
use std::io::{self, Write};

/// Maximum directory errors retained for the end-of-run listing.
///
/// Counting continues past the cap; only the stored detail is bounded, so a
/// share with millions of denied folders cannot exhaust memory.
pub const MAX_SCAN_ERRORS: usize = 1_000;

pub struct ConsoleState {
    /// Suppress per-file lines.
    pub quiet: bool,
    pub files_degraded: u64,
    pub dirs_denied: u64,
    pub dir_errors: u64,
    /// `(path, message)` for skipped directories, capped at [`MAX_SCAN_ERRORS`].
    pub scan_errors: Vec<(String, String)>,
    pub was_cancelled: bool,
    pub failure: Option<String>,
}

impl ConsoleState {
    pub fn new(quiet: bool) -> Self {
        Self {
            quiet,
            files_degraded: 0,
            dirs_denied: 0,
            dir_errors: 0,
            scan_errors: Vec::new(),
            was_cancelled: false,
            failure: None,
        }
    }

    /// Total directories skipped for any reason.
    pub fn skipped_directories(&self) -> u64 {
        self.dirs_denied + self.dir_errors
    }

    fn push_error(&mut self, path: String, message: String) {
        if self.scan_errors.len() < MAX_SCAN_ERRORS {
            self.scan_errors.push((path, message));
        }
    }

    /// Apply one event and render it to `out`.
    pub fn process_event<W: Write>(&mut self, event: ScanEvent, out: &mut W) -> io::Result<()> {
        match event {
            ScanEvent::Started { .. } | ScanEvent::Complete { .. } => {}
            ScanEvent::RootNotFound { root } => {
                writeln!(
                    out,
                    "Directory does not exist or access is denied: {}",
                    root.display()
                )?;
            }
            ScanEvent::DirectoryAccessDenied { path } => {
                self.dirs_denied += 1;
                writeln!(out, "Access denied to directory: {}", path.display())?;
                self.push_error(path.display().to_string(), "access denied".into());
            }
            ScanEvent::DirectoryError { path, message } => {
                self.dir_errors += 1;
                writeln!(out, "Error accessing directory {} : {message}", path.display())?;
                self.push_error(path.display().to_string(), message);
            }
            ScanEvent::WalkComplete { files, directories } => {
                writeln!(out, "Discovered {files} files in {directories} directories")?;
            }
            ScanEvent::FileFound { path } => {
                if !self.quiet {
                    writeln!(out, "Found: {}", path.display())?;
                }
            }
            ScanEvent::FileDegraded { path, reason } => {
                self.files_degraded += 1;
                if !self.quiet {
                    writeln!(out, "Unreadable: {} ({reason})", path.display())?;
                }
            }
            ScanEvent::ScanFailed { message } => {
                writeln!(out, "Error scanning directory: {message}")?;
                self.failure = Some(message);
            }
            ScanEvent::Cancelled => {
                self.was_cancelled = true;
                writeln!(out, "Scan cancelled; partial results kept.")?;
            }
        }
        Ok(())
    }

    /// End-of-run listing: skipped directories (up to the cap) and whether
    /// the results are partial.
    pub fn write_problems<W: Write>(&self, out: &mut W) -> io::Result<()> {
        if !self.scan_errors.is_empty() {
            writeln!(out, "Skipped directories:")?;
            for (path, message) in &self.scan_errors {
                writeln!(out, "  {path}: {message}")?;
            }
            let unlisted = self
                .skipped_directories()
                .saturating_sub(self.scan_errors.len() as u64);
            if unlisted > 0 {
                writeln!(out, "  ... and {unlisted} more")?;
            }
        }
        if let Some(message) = &self.failure {
            writeln!(out, "Scan ended early ({message}); results are partial.")?;
        } else if self.was_cancelled {
            writeln!(out, "Scan was cancelled; results are partial.")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn feed(state: &mut ConsoleState, events: Vec<ScanEvent>) -> String {
        let mut out = Vec::new();
        for e in events {
            state.process_event(e, &mut out).unwrap();
        }
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn quiet_mode_hides_file_lines_but_counts() {
        let mut state = ConsoleState::new(true);
        let text = feed(
            &mut state,
            vec![
                ScanEvent::FileFound {
                    path: PathBuf::from("/r/a.txt"),
                },
                ScanEvent::FileDegraded {
                    path: PathBuf::from("/r/b.txt"),
                    reason: "file cannot be opened for reading".into(),
                },
            ],
        );
        assert!(text.is_empty());
        assert_eq!(state.files_degraded, 1);
    }

    #[test]
    fn directory_errors_are_distinguished() {
        let mut state = ConsoleState::new(false);
        let text = feed(
            &mut state,
            vec![
                ScanEvent::DirectoryAccessDenied {
                    path: PathBuf::from("/r/private"),
                },
                ScanEvent::DirectoryError {
                    path: PathBuf::from("/r/broken"),
                    message: "I/O error".into(),
                },
            ],
        );
        assert!(text.contains("Access denied to directory: /r/private"));
        assert!(text.contains("Error accessing directory /r/broken : I/O error"));
        assert_eq!(state.dirs_denied, 1);
        assert_eq!(state.dir_errors, 1);
        assert_eq!(state.skipped_directories(), 2);
        assert_eq!(state.scan_errors.len(), 2);
    }

    #[test]
    fn stored_errors_are_capped() {
        let mut state = ConsoleState::new(true);
        let mut sink = io::sink();
        for i in 0..MAX_SCAN_ERRORS + 10 {
            state
                .process_event(
                    ScanEvent::DirectoryAccessDenied {
                        path: PathBuf::from(format!("/r/{i}")),
                    },
                    &mut sink,
                )
                .unwrap();
        }
        assert_eq!(state.scan_errors.len(), MAX_SCAN_ERRORS);
        assert_eq!(state.dirs_denied, (MAX_SCAN_ERRORS + 10) as u64);
    }

    #[test]
    fn failure_and_missing_root_are_recorded() {
        let mut state = ConsoleState::new(false);
        let text = feed(
            &mut state,
            vec![
                ScanEvent::RootNotFound {
                    root: PathBuf::from("/nope"),
                },
                ScanEvent::ScanFailed {
                    message: "boom".into(),
                },
            ],
        );
        assert_eq!(state.failure.as_deref(), Some("boom"));
        assert!(text.contains("does not exist"));
        assert!(text.contains("Error scanning directory: boom"));
    }

    #[test]
    fn problems_list_capped_errors_and_partial_status() {
        let mut state = ConsoleState::new(true);
        let mut sink = io::sink();
        for i in 0..MAX_SCAN_ERRORS + 2 {
            state
                .process_event(
                    ScanEvent::DirectoryError {
                        path: PathBuf::from(format!("/r/{i}")),
                        message: "I/O error".into(),
                    },
                    &mut sink,
                )
                .unwrap();
        }
        state
            .process_event(ScanEvent::Cancelled, &mut sink)
            .unwrap();

        let mut out = Vec::new();
        state.write_problems(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Skipped directories:\n  /r/0: I/O error\n"));
        assert!(text.contains("  ... and 2 more"));
        assert!(text.ends_with("Scan was cancelled; results are partial.\n"));
    }

    #[test]
    fn clean_run_has_no_problems() {
        let mut out = Vec::new();
        ConsoleState::new(false).write_problems(&mut out).unwrap();
        assert!(out.is_empty());
    }
}
