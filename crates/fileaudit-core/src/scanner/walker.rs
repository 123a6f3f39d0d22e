/// Stack-based directory walker — phase 1 of a scan.
///
/// The walk never recurses: pending directories live on an explicit `Vec`
/// stack, so depth is bounded by heap, not by thread stack size.
///
/// # Failure isolation
///
/// Each directory is listed into local buffers first. If opening it or
/// reading any of its entries fails, both buffers are dropped, one event is
/// emitted, and the loop pops the next directory. Siblings and directories
/// already on the stack are unaffected.
use super::progress::{ScanEvent, ScanReporter};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

/// Result of a completed (or cancelled) walk.
#[derive(Debug, Default)]
pub struct WalkOutcome {
    /// Every regular file found, in stack order (unsorted).
    pub files: Vec<PathBuf>,
    /// Directories listed successfully, including the root.
    pub directories: usize,
    /// Directories whose listing failed.
    pub skipped: usize,
}

/// Enumerate every file under `root`.
///
/// Returns early with whatever was collected if `cancel` is raised; the flag
/// is checked once per directory.
pub fn enumerate_files(
    root: &Path,
    reporter: &dyn ScanReporter,
    cancel: &AtomicBool,
) -> WalkOutcome {
    let mut outcome = WalkOutcome::default();
    let mut pending: Vec<PathBuf> = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        if cancel.load(Ordering::Relaxed) {
            debug!("walk cancelled with {} directories pending", pending.len() + 1);
            break;
        }

        match list_directory(&dir) {
            Ok((subdirs, files)) => {
                outcome.directories += 1;
                pending.extend(subdirs);
                outcome.files.extend(files);
            }
            Err(err) => {
                outcome.skipped += 1;
                tracing::warn!("skipping {}: {err}", dir.display());
                let event = if err.kind() == io::ErrorKind::PermissionDenied {
                    ScanEvent::DirectoryAccessDenied { path: dir }
                } else {
                    ScanEvent::DirectoryError {
                        path: dir,
                        message: err.to_string(),
                    }
                };
                reporter.report(event);
            }
        }
    }

    outcome
}

/// List the immediate children of `dir`, split into subdirectories and files.
///
/// Only regular files are returned. Pipes, sockets and device nodes are
/// skipped: opening a FIFO with no writer blocks forever. Symlinks are not
/// followed into directories; a link to a regular file is reported as a file,
/// and so is a dangling link (it degrades at extraction).
fn list_directory(dir: &Path) -> io::Result<(Vec<PathBuf>, Vec<PathBuf>)> {
    let mut subdirs = Vec::new();
    let mut files = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let file_type = entry.file_type()?;

        if file_type.is_dir() {
            subdirs.push(path);
        } else if file_type.is_file() {
            files.push(path);
        } else if file_type.is_symlink() {
            match fs::metadata(&path) {
                Ok(target) if target.is_file() => files.push(path),
                Ok(target) if target.is_dir() => {
                    debug!("not following directory link {}", path.display());
                }
                Ok(_) => debug!("skipping link to special file {}", path.display()),
                Err(_) => files.push(path),
            }
        } else {
            debug!("skipping special file {}", path.display());
        }
    }

    Ok((subdirs, files))
}
