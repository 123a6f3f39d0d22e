/// Concurrent accumulator for scan results.
///
/// Extraction workers insert through `&self`; the set owns the lock so
/// callers never coordinate. `parking_lot::Mutex` does not poison, so records
/// pushed before a worker panic stay readable and reportable.
use super::record::FileRecord;
use parking_lot::Mutex;

/// Unordered multiset of [`FileRecord`]s. No deduplication.
#[derive(Debug, Default)]
pub struct ScanResultSet {
    records: Mutex<Vec<FileRecord>>,
}

impl ScanResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty set with pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Mutex::new(Vec::with_capacity(capacity)),
        }
    }

    /// Make room for `additional` more records.
    ///
    /// The coordinator calls this with the exact path count once the walk
    /// is done, so extraction never re-allocates under the lock.
    pub fn reserve(&self, additional: usize) {
        self.records.lock().reserve(additional);
    }

    pub fn capacity(&self) -> usize {
        self.records.lock().capacity()
    }

    /// Insert one record. The lock is held only for the push.
    pub fn insert(&self, record: FileRecord) {
        self.records.lock().push(record);
    }

    /// Insert a batch under a single lock acquisition.
    pub fn extend<I>(&self, records: I)
    where
        I: IntoIterator<Item = FileRecord>,
    {
        self.records.lock().extend(records);
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// Number of records whose extraction succeeded.
    pub fn full_count(&self) -> usize {
        self.records
            .lock()
            .iter()
            .filter(|r| !r.is_degraded())
            .count()
    }

    /// Number of path-only records.
    pub fn degraded_count(&self) -> usize {
        self.records.lock().iter().filter(|r| r.is_degraded()).count()
    }

    /// Sum of all full-record sizes.
    pub fn total_size(&self) -> u64 {
        self.records.lock().iter().map(FileRecord::size_bytes).sum()
    }

    /// Clone the current contents. Safe to call while workers are inserting.
    pub fn snapshot(&self) -> Vec<FileRecord> {
        self.records.lock().clone()
    }

    /// Consume the set and return its records in insertion order.
    pub fn into_records(self) -> Vec<FileRecord> {
        self.records.into_inner()
    }
}

impl FromIterator<FileRecord> for ScanResultSet {
    fn from_iter<T: IntoIterator<Item = FileRecord>>(iter: T) -> Self {
        Self {
            records: Mutex::new(iter.into_iter().collect()),
        }
    }
}
