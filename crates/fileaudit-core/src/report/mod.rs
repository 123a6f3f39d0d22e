/// CSV report — the only ordered output of a scan.
///
/// Records arrive unordered from the extraction workers. They are sorted
/// once by modification time (degraded records, which have none, first; ties
/// broken by path) and written through the `csv` crate, which quotes any
/// field containing a comma, a quote, or a line break and doubles embedded
/// quotes.
///
/// Numbers are plain integers. Timestamps are local time in sortable form
/// (`YYYY-MM-DDTHH:MM:SS`) so the file reads the same in every locale.
use crate::error::ReportError;
use crate::model::FileRecord;
use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Column names, in output order.
pub const HEADER: [&str; 7] = [
    "file_directory",
    "file_name",
    "full_file_path",
    "file_size_bytes",
    "last_modified",
    "first_created",
    "last_modified_by",
];

/// Timestamp written for degraded records.
pub const DEFAULT_TIMESTAMP: &str = "0001-01-01T00:00:00";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// One CSV data row. Field order matches [`HEADER`].
#[derive(Debug, Serialize)]
struct ReportRow<'a> {
    file_directory: &'a str,
    file_name: &'a str,
    full_file_path: String,
    file_size_bytes: u64,
    last_modified: String,
    first_created: String,
    last_modified_by: &'a str,
}

impl<'a> From<&'a FileRecord> for ReportRow<'a> {
    fn from(record: &'a FileRecord) -> Self {
        let full_file_path = record.full_path.to_string_lossy().into_owned();
        match &record.metadata {
            Some(meta) => Self {
                file_directory: &meta.directory,
                file_name: meta.name.as_str(),
                full_file_path,
                file_size_bytes: meta.size_bytes,
                last_modified: format_timestamp(meta.last_modified),
                first_created: format_timestamp(meta.first_created),
                last_modified_by: &meta.last_modified_by,
            },
            None => Self {
                file_directory: "",
                file_name: "",
                full_file_path,
                file_size_bytes: 0,
                last_modified: DEFAULT_TIMESTAMP.to_string(),
                first_created: DEFAULT_TIMESTAMP.to_string(),
                last_modified_by: "",
            },
        }
    }
}

/// Format a timestamp in local time, sortable form.
///
/// Times chrono cannot represent are written as [`DEFAULT_TIMESTAMP`].
pub fn format_timestamp(time: SystemTime) -> String {
    match to_local(time) {
        Some(local) => local.format(TIMESTAMP_FORMAT).to_string(),
        None => DEFAULT_TIMESTAMP.to_string(),
    }
}

fn to_local(time: SystemTime) -> Option<DateTime<Local>> {
    let (secs, nanos) = match time.duration_since(UNIX_EPOCH) {
        Ok(after) => (i64::try_from(after.as_secs()).ok()?, after.subsec_nanos()),
        Err(err) => {
            let before = err.duration();
            let secs = i64::try_from(before.as_secs()).ok()?.checked_neg()?;
            match before.subsec_nanos() {
                0 => (secs, 0),
                n => (secs.checked_sub(1)?, 1_000_000_000 - n),
            }
        }
    };
    DateTime::<Utc>::from_timestamp(secs, nanos).map(|utc| utc.with_timezone(&Local))
}

/// Return `records` in report order: ascending modification time, degraded
/// records first, ties broken by path.
pub fn sorted(records: &[FileRecord]) -> Vec<&FileRecord> {
    let mut ordered: Vec<&FileRecord> = records.iter().collect();
    ordered.sort_by(|a, b| {
        a.last_modified()
            .cmp(&b.last_modified())
            .then_with(|| a.full_path.cmp(&b.full_path))
    });
    ordered
}

/// Write the header and every record to `writer`. Returns the number of
/// data rows written.
pub fn write_csv<W: Write>(writer: W, records: &[FileRecord]) -> Result<usize, ReportError> {
    let mut csv = csv::WriterBuilder::new()
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(writer);

    csv.write_record(HEADER)?;
    let ordered = sorted(records);
    for record in &ordered {
        csv.serialize(ReportRow::from(*record))?;
    }
    csv.flush().map_err(csv::Error::from)?;

    Ok(ordered.len())
}

/// Write the report to `target`, creating its parent directory if needed.
///
/// A failure part-way through may leave a truncated file behind.
pub fn write_report(target: &Path, records: &[FileRecord]) -> Result<usize, ReportError> {
    let io_err = |source: io::Error| ReportError::Io {
        path: target.to_path_buf(),
        source,
    };

    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let file = File::create(target).map_err(io_err)?;
    let rows = write_csv(BufWriter::new(file), records)?;
    tracing::info!("Wrote {rows} rows to {}", target.display());
    Ok(rows)
}

/// Report file name for a run finished at `now`, safe on every filesystem
/// (no colons).
pub fn report_file_name(now: DateTime<Local>) -> String {
    format!("File_Audit_output-{}.csv", now.format("%Y-%m-%dT%H_%M_%S"))
}

/// Directory containing the running executable.
pub fn default_output_dir() -> io::Result<PathBuf> {
    let exe = std::env::current_exe()?;
    exe.parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "executable has no parent"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FileMetadata;
    use chrono::TimeZone;
    use compact_str::CompactString;
    use std::time::Duration;

    fn full(path: &str, secs: u64, size: u64) -> FileRecord {
        let p = PathBuf::from(path);
        FileRecord::new_full(
            p.clone(),
            FileMetadata {
                directory: p
                    .parent()
                    .map(|d| d.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                name: CompactString::new(
                    p.file_name().map(|n| n.to_string_lossy()).unwrap_or_default(),
                ),
                size_bytes: size,
                last_modified: SystemTime::UNIX_EPOCH + Duration::from_secs(secs),
                first_created: SystemTime::UNIX_EPOCH + Duration::from_secs(secs / 2),
                last_modified_by: "alice".into(),
            },
        )
    }

    fn render(records: &[FileRecord]) -> String {
        let mut buf = Vec::new();
        write_csv(&mut buf, records).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn empty_report_has_header_only() {
        assert_eq!(
            render(&[]),
            "file_directory,file_name,full_file_path,file_size_bytes,last_modified,first_created,last_modified_by\n"
        );
    }

    #[test]
    fn rows_sorted_by_modification_time() {
        let records = vec![
            full("/d/late.txt", 3_000, 1),
            full("/d/early.txt", 1_000, 2),
            FileRecord::new_degraded("/d/locked.txt"),
            full("/d/mid.txt", 2_000, 3),
        ];
        let order: Vec<&str> = sorted(&records)
            .iter()
            .map(|r| r.full_path.to_str().unwrap())
            .collect();
        assert_eq!(
            order,
            ["/d/locked.txt", "/d/early.txt", "/d/mid.txt", "/d/late.txt"]
        );
    }

    #[test]
    fn equal_timestamps_break_ties_by_path() {
        let records = vec![full("/b", 5, 0), full("/a", 5, 0)];
        let order: Vec<_> = sorted(&records).iter().map(|r| r.full_path.clone()).collect();
        assert_eq!(order, [PathBuf::from("/a"), PathBuf::from("/b")]);
    }

    #[test]
    fn degraded_row_has_defaults() {
        let out = render(&[FileRecord::new_degraded("/d/locked.txt")]);
        let row = out.lines().nth(1).unwrap();
        assert_eq!(
            row,
            ",,/d/locked.txt,0,0001-01-01T00:00:00,0001-01-01T00:00:00,"
        );
    }

    #[test]
    fn full_row_fields() {
        let rec = full("/d/a.txt", 86_400, 123);
        let out = render(std::slice::from_ref(&rec));
        let row = out.lines().nth(1).unwrap();
        let meta = rec.metadata.as_ref().unwrap();
        let expected = format!(
            "/d,a.txt,/d/a.txt,123,{},{},alice",
            format_timestamp(meta.last_modified),
            format_timestamp(meta.first_created)
        );
        assert_eq!(row, expected);
    }

    #[test]
    fn comma_in_path_is_quoted_and_round_trips() {
        let path = r"C:\Users\a,b\file.txt";
        let out = render(&[FileRecord::new_degraded(path)]);
        let row = out.lines().nth(1).unwrap();
        assert!(row.contains(r#""C:\Users\a,b\file.txt""#), "row was {row}");

        let mut reader = csv::Reader::from_reader(out.as_bytes());
        let parsed = reader.records().next().unwrap().unwrap();
        assert_eq!(&parsed[2], path);
    }

    #[test]
    fn quotes_are_doubled() {
        let out = render(&[FileRecord::new_degraded(r#"/d/say "hi".txt"#)]);
        assert!(out.contains(r#""/d/say ""hi"".txt""#), "output was {out}");
    }

    #[test]
    fn timestamp_format_is_sortable() {
        let local = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(format_timestamp(SystemTime::from(local)), "2024-03-09T07:05:01");
    }

    #[test]
    fn pre_epoch_timestamp_matches_chrono() {
        let time = UNIX_EPOCH - Duration::from_millis(86_400_500);
        let expected = DateTime::<Local>::from(time)
            .format(TIMESTAMP_FORMAT)
            .to_string();
        assert_eq!(format_timestamp(time), expected);
    }

    /// Out-of-range times (storable on btrfs/tmpfs) must not panic.
    #[test]
    fn unrepresentable_timestamp_falls_back() {
        let far_future = UNIX_EPOCH + Duration::from_secs(10_000_000_000_000);
        assert_eq!(format_timestamp(far_future), DEFAULT_TIMESTAMP);
        if let Some(far_past) = UNIX_EPOCH.checked_sub(Duration::from_secs(10_000_000_000_000)) {
            assert_eq!(format_timestamp(far_past), DEFAULT_TIMESTAMP);
        }
    }

    #[test]
    fn report_with_unrepresentable_mtime_is_written() {
        let mut record = full("/d/future.txt", 1, 5);
        if let Some(meta) = record.metadata.as_mut() {
            meta.last_modified = UNIX_EPOCH + Duration::from_secs(10_000_000_000_000);
        }
        let out = render(&[record]);
        assert!(out.contains(&format!("5,{DEFAULT_TIMESTAMP},")), "output was {out}");
    }

    #[test]
    fn report_file_name_has_no_colons() {
        let local = Local.with_ymd_and_hms(2024, 3, 9, 17, 45, 30).unwrap();
        assert_eq!(
            report_file_name(local),
            "File_Audit_output-2024-03-09T17_45_30.csv"
        );
    }

    #[test]
    fn write_report_creates_missing_directory() {
        let tmp = tempfile::TempDir::new().unwrap();
        let target = tmp.path().join("nested").join("out.csv");
        let rows = write_report(&target, &[full("/d/a.txt", 1, 1)]).unwrap();
        assert_eq!(rows, 1);
        assert_eq!(fs::read_to_string(&target).unwrap().lines().count(), 2);
    }

    #[test]
    fn write_report_surfaces_io_failure() {
        let tmp = tempfile::TempDir::new().unwrap();
        let blocker = tmp.path().join("file");
        fs::write(&blocker, b"x").unwrap();
        // Parent "directory" is a regular file.
        let err = write_report(&blocker.join("out.csv"), &[]).unwrap_err();
        assert!(matches!(err, ReportError::Io { .. }));
    }
}
