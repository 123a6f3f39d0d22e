/// Per-file metadata extraction — the unit of work in phase 2.
///
/// [`read_metadata`] keeps the failure so callers can report why a file
/// degraded; [`extract`] folds it into a degraded [`FileRecord`], reports
/// the outcome, and never fails.
use super::progress::{ScanEvent, ScanReporter};
use crate::model::{FileMetadata, FileRecord};
use crate::platform::{can_read, resolve_last_modifier};
use compact_str::CompactString;
use std::fs::{self, Metadata};
use std::io;
use std::path::Path;
use std::time::SystemTime;
use thiserror::Error;

/// Why a path produced a degraded record.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// The file could not be opened for reading.
    #[error("file cannot be opened for reading")]
    AccessDenied,

    /// The path resolves to a pipe, socket, device or directory.
    #[error("not a regular file")]
    NotRegularFile,

    /// The metadata query failed (usually the file was removed or replaced
    /// between discovery and extraction).
    #[error("metadata query failed: {0}")]
    Metadata(#[from] io::Error),
}

/// Read everything a full record needs for `path`.
///
/// The path is stat'ed before it is opened; anything other than a regular
/// file is rejected without an open.
pub fn read_metadata(path: &Path) -> Result<FileMetadata, ExtractError> {
    let meta = fs::metadata(path)?;
    if !meta.is_file() {
        return Err(ExtractError::NotRegularFile);
    }
    if !can_read(path) {
        return Err(ExtractError::AccessDenied);
    }

    let last_modified = meta.modified()?;
    let first_created = creation_time(&meta, last_modified);

    let directory = path
        .parent()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = path
        .file_name()
        .map(|n| CompactString::new(n.to_string_lossy()))
        .unwrap_or_default();

    Ok(FileMetadata {
        directory,
        name,
        size_bytes: meta.len(),
        last_modified,
        first_created,
        last_modified_by: resolve_last_modifier(path),
    })
}

/// Produce exactly one record for `path`: full on success, degraded
/// otherwise. Emits `FileFound` or `FileDegraded` accordingly.
pub fn extract(path: &Path, reporter: &dyn ScanReporter) -> FileRecord {
    match read_metadata(path) {
        Ok(metadata) => {
            reporter.report(ScanEvent::FileFound {
                path: path.to_path_buf(),
            });
            FileRecord::new_full(path.to_path_buf(), metadata)
        }
        Err(err) => {
            tracing::debug!("degraded record for {}: {err}", path.display());
            reporter.report(ScanEvent::FileDegraded {
                path: path.to_path_buf(),
                reason: err.to_string(),
            });
            FileRecord::new_degraded(path)
        }
    }
}

/// Birth time when the filesystem records one.
///
/// Otherwise the inode change time on Unix, and the modification time
/// everywhere else.
fn creation_time(meta: &Metadata, last_modified: SystemTime) -> SystemTime {
    if let Ok(created) = meta.created() {
        return created;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::MetadataExt;
        let secs = u64::try_from(meta.ctime());
        let nanos = u32::try_from(meta.ctime_nsec());
        if let (Ok(secs), Ok(nanos)) = (secs, nanos) {
            return SystemTime::UNIX_EPOCH + std::time::Duration::new(secs, nanos);
        }
    }

    last_modified
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::progress::NullReporter;
    use tempfile::TempDir;

    #[test]
    fn readable_file_yields_full_record() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("report.txt");
        fs::write(&path, b"0123456789").unwrap();

        let (tx, rx) = crossbeam_channel::unbounded();
        let rec = extract(&path, &tx);
        assert_eq!(rx.try_recv().unwrap(), ScanEvent::FileFound { path: path.clone() });
        let meta = rec.metadata.as_ref().expect("full record");
        assert_eq!(rec.full_path, path);
        assert_eq!(meta.name.as_str(), "report.txt");
        assert_eq!(meta.directory, tmp.path().to_string_lossy());
        assert_eq!(meta.size_bytes, 10);
    }

    /// Size and modification time must match the filesystem exactly.
    #[test]
    fn extraction_is_lossless() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("data.bin");
        fs::write(&path, vec![7u8; 4096]).unwrap();
        let fs_meta = fs::metadata(&path).unwrap();

        let meta = read_metadata(&path).unwrap();
        assert_eq!(meta.size_bytes, fs_meta.len());
        assert_eq!(meta.last_modified, fs_meta.modified().unwrap());
        if let Ok(created) = fs_meta.created() {
            assert_eq!(meta.first_created, created);
        }
    }

    #[test]
    fn vanished_file_yields_degraded_record() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("gone.txt");

        assert!(matches!(read_metadata(&path), Err(ExtractError::Metadata(_))));
        let (tx, rx) = crossbeam_channel::unbounded();
        let rec = extract(&path, &tx);
        assert!(rec.is_degraded());
        assert_eq!(rec.full_path, path);
        assert!(matches!(
            rx.try_recv().unwrap(),
            ScanEvent::FileDegraded { path: p, .. } if p == path
        ));
    }

    #[test]
    fn directory_is_not_a_regular_file() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            read_metadata(tmp.path()),
            Err(ExtractError::NotRegularFile)
        ));
    }

    /// A FIFO is rejected from its stat, before anything tries to open it.
    #[cfg(unix)]
    #[test]
    fn named_pipe_yields_degraded_record() {
        use std::os::unix::ffi::OsStrExt;

        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("pipe");
        let c_path = std::ffi::CString::new(path.as_os_str().as_bytes()).unwrap();
        assert_eq!(unsafe { libc::mkfifo(c_path.as_ptr(), 0o644) }, 0);

        assert!(matches!(
            read_metadata(&path),
            Err(ExtractError::NotRegularFile)
        ));
        assert_eq!(extract(&path, &NullReporter), FileRecord::new_degraded(path));
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_file_yields_degraded_record() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("locked.txt");
        fs::write(&path, b"secret").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o000)).unwrap();
        if can_read(&path) {
            return;
        }

        let rec = extract(&path, &NullReporter);
        assert_eq!(rec, FileRecord::new_degraded(path));
    }
}
