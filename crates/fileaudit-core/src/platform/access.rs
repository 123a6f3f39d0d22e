/// Read-access probe.
use std::fs::{File, OpenOptions};
use std::path::Path;

/// Return `true` if `path` can be opened for reading right now.
///
/// The handle is dropped immediately. Any failure (permission denied, file
/// locked by another process, path vanished) yields `false`. On Unix the
/// open is non-blocking, so a FIFO swapped in after discovery cannot stall
/// the caller.
pub fn can_read(path: &Path) -> bool {
    match open_for_probe(path) {
        Ok(_) => true,
        Err(err) => {
            tracing::debug!("read probe failed for {}: {err}", path.display());
            false
        }
    }
}

#[cfg(unix)]
fn open_for_probe(path: &Path) -> std::io::Result<File> {
    use std::os::unix::fs::OpenOptionsExt;

    OpenOptions::new()
        .read(true)
        .custom_flags(libc::O_NONBLOCK)
        .open(path)
}

#[cfg(not(unix))]
fn open_for_probe(path: &Path) -> std::io::Result<File> {
    OpenOptions::new().read(true).open(path)
}
