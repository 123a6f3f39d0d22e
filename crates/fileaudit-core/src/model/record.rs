/// A single audited file.
///
/// A record is either *full* (every metadata field read successfully) or
/// *degraded* (only the path is known because the file could not be opened
/// or inspected). The split lives in the type: `metadata` is `Some` for full
/// records and `None` for degraded ones, so there is no half-filled state.
use compact_str::CompactString;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Everything read about a file whose extraction succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMetadata {
    /// Parent directory of the file, as a display string.
    pub directory: String,

    /// File name only (NOT the full path).
    pub name: CompactString,

    /// Logical file size in bytes.
    pub size_bytes: u64,

    /// Last write time as reported by the filesystem.
    pub last_modified: SystemTime,

    /// Creation (birth) time. Falls back to the status-change or
    /// modification time on filesystems that do not record it.
    pub first_created: SystemTime,

    /// Owner identity (`user` on Unix, `DOMAIN\user` on Windows).
    /// Empty when the owner could not be determined.
    pub last_modified_by: String,
}

/// One entry per discovered file path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Path exactly as discovered by the walker. Always present.
    pub full_path: PathBuf,

    /// `None` for degraded records.
    pub metadata: Option<FileMetadata>,
}

impl FileRecord {
    /// Create a full record.
    pub fn new_full(full_path: PathBuf, metadata: FileMetadata) -> Self {
        Self {
            full_path,
            metadata: Some(metadata),
        }
    }

    /// Create a degraded record carrying only the path.
    pub fn new_degraded(full_path: impl Into<PathBuf>) -> Self {
        Self {
            full_path: full_path.into(),
            metadata: None,
        }
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.full_path
    }

    #[inline]
    pub fn is_degraded(&self) -> bool {
        self.metadata.is_none()
    }

    /// Size in bytes; `0` for degraded records.
    #[inline]
    pub fn size_bytes(&self) -> u64 {
        self.metadata.as_ref().map_or(0, |m| m.size_bytes)
    }

    /// Modification time; `None` for degraded records, which therefore
    /// order before every full record.
    #[inline]
    pub fn last_modified(&self) -> Option<SystemTime> {
        self.metadata.as_ref().map(|m| m.last_modified)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn sample_metadata(secs: u64) -> FileMetadata {
        FileMetadata {
            directory: "/data".into(),
            name: CompactString::new("a.txt"),
            size_bytes: 42,
            last_modified: SystemTime::UNIX_EPOCH + Duration::from_secs(secs),
            first_created: SystemTime::UNIX_EPOCH,
            last_modified_by: "alice".into(),
        }
    }

    #[test]
    fn degraded_record_has_only_path() {
        let rec = FileRecord::new_degraded("/data/locked.bin");
        assert!(rec.is_degraded());
        assert_eq!(rec.path(), Path::new("/data/locked.bin"));
        assert_eq!(rec.size_bytes(), 0);
        assert_eq!(rec.last_modified(), None);
    }

    #[test]
    fn full_record_exposes_metadata() {
        let rec = FileRecord::new_full(PathBuf::from("/data/a.txt"), sample_metadata(10));
        assert!(!rec.is_degraded());
        assert_eq!(rec.size_bytes(), 42);
        assert_eq!(
            rec.last_modified(),
            Some(SystemTime::UNIX_EPOCH + Duration::from_secs(10))
        );
    }

    /// Degraded records must sort before any full record by modification time.
    #[test]
    fn degraded_orders_before_full() {
        let degraded = FileRecord::new_degraded("/z");
        let full = FileRecord::new_full(PathBuf::from("/a"), sample_metadata(0));
        assert!(degraded.last_modified() < full.last_modified());
    }
}
