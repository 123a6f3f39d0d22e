/// Data model for audit results.
///
/// Re-exports the record types, the concurrent result set, and the
/// display-formatting helpers.
pub mod record;
pub mod result_set;
pub mod size;

pub use record::{FileMetadata, FileRecord};
pub use result_set::ScanResultSet;
