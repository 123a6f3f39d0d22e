/// Run orchestration: prompt, scan, render, report, summarise.
///
/// Generic over input and output streams so the whole run can be driven
/// from tests without a terminal.
use crate::console::ConsoleState;
use crate::prompt;
use anyhow::{Context, Result};
use fileaudit_core::model::size::{format_count, format_elapsed, format_size};
use fileaudit_core::scanner::start_scan;
use fileaudit_core::{report, ScanConfig, ScanStatus};
use std::io::{BufRead, Write};
use std::path::PathBuf;

/// Everything a run needs, already validated.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Directory to audit; prompted for when `None`.
    pub root: Option<PathBuf>,
    /// Report directory; beside the executable when `None`.
    pub output_dir: Option<PathBuf>,
    pub config: ScanConfig,
    pub quiet: bool,
    /// Wait for Enter before exiting (interactive sessions only).
    pub pause: bool,
}

/// What a run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// A report was written.
    Written { path: PathBuf, rows: usize },
    /// No records were collected, so no report was written.
    NothingToWrite { status: ScanStatus },
}

/// Execute one audit.
///
/// Scan failures that leave partial results still produce a report. Only a
/// failure to start the scan, to read the prompt, or to write the report is
/// returned as an error.
pub fn run<R: BufRead, W: Write>(
    options: RunOptions,
    input: &mut R,
    out: &mut W,
) -> Result<RunOutcome> {
    let root = match options.root {
        Some(root) => root,
        None => prompt::read_root(input, out)?,
    };

    writeln!(out)?;
    writeln!(out, "Scanning directory: {}", root.display())?;

    let handle = start_scan(root, options.config).context("failed to start scan thread")?;
    let mut console = ConsoleState::new(options.quiet);
    for event in handle.events_rx.iter() {
        console.process_event(event, out)?;
    }
    let summary = handle.join();

    if summary.results.is_empty() {
        console.write_problems(out)?;
        writeln!(
            out,
            "No files were processed due to access issues or an empty directory."
        )?;
        return Ok(RunOutcome::NothingToWrite {
            status: summary.status,
        });
    }

    let output_dir = match options.output_dir {
        Some(dir) => dir,
        None => report::default_output_dir().context("cannot locate executable directory")?,
    };
    let target = output_dir.join(report::report_file_name(chrono::Local::now()));

    writeln!(out, "Writing results to CSV...")?;
    let total_size = summary.results.total_size();
    let records = summary.results.into_records();
    let rows = report::write_report(&target, &records)
        .with_context(|| format!("failed to write report {}", target.display()))?;
    tracing::info!("Wrote {rows} rows to {}", target.display());

    writeln!(out, "Operation completed.")?;
    writeln!(
        out,
        "Scanned: {} files ({})",
        format_count(rows as u64),
        format_size(total_size)
    )?;
    if console.files_degraded > 0 || console.skipped_directories() > 0 {
        writeln!(
            out,
            "Unreadable: {} files, {} directories skipped",
            format_count(console.files_degraded),
            format_count(console.skipped_directories())
        )?;
    }
    console.write_problems(out)?;
    writeln!(out, "Results saved to: {}", target.display())?;
    writeln!(
        out,
        "With a time of: {} (HH:MM:SS)",
        format_elapsed(summary.elapsed)
    )?;

    Ok(RunOutcome::Written { path: target, rows })
}
