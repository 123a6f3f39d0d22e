/// Display formatting for scan summaries — byte counts, file counts, and
/// elapsed time.
///
/// All internal sizes are `u64` bytes. Floating point is only used at the
/// display-formatting boundary.
use std::time::Duration;

/// Format a byte count with a binary unit (KB = 1024), labelled with the
/// short forms users expect.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [(&str, u64, usize); 4] = [
        ("TB", 1 << 40, 2),
        ("GB", 1 << 30, 2),
        ("MB", 1 << 20, 1),
        ("KB", 1 << 10, 1),
    ];

    for (label, scale, precision) in UNITS {
        if bytes >= scale {
            let value = bytes as f64 / scale as f64;
            return format!("{value:.precision$} {label}");
        }
    }
    format!("{bytes} B")
}

/// Format a file count with thousand separators.
pub fn format_count(count: u64) -> String {
    let digits = count.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Format an elapsed duration as `HH:MM:SS`. Hours are not wrapped at 24.
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
}
