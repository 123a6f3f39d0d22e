/// Command-line arguments.
use crate::app::RunOptions;
use clap::{ArgAction, Parser};
use fileaudit_core::config::MAX_WORKERS;
use fileaudit_core::{ConfigError, ScanConfig};
use std::path::PathBuf;

fn default_workers() -> usize {
    ScanConfig::default().workers
}

/// Audit a directory tree and write per-file metadata to a CSV report
#[derive(Parser, Debug, Clone)]
#[command(
    name = "file-audit",
    version,
    about = "Audit a directory tree and write per-file metadata to a CSV report",
    long_about = "Walks a directory tree, reads size, timestamps and owner for every file, \
                  and writes a CSV report ordered by modification time.\n\n\
                  Unreadable directories are skipped; unreadable files are listed with \
                  their path only.",
    after_help = "EXAMPLES:\n    \
        file-audit /srv/share\n    \
        file-audit 'D:\\Shared' -o reports -w 16\n    \
        file-audit            # prompts for the directory"
)]
pub struct CliArgs {
    /// Directory to audit. Prompted for when omitted.
    #[arg(value_name = "ROOT")]
    pub root: Option<PathBuf>,

    /// Directory for the CSV report (default: beside the executable)
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Number of metadata extraction threads
    #[arg(short, long, default_value_t = default_workers(), value_name = "NUM")]
    pub workers: usize,

    /// Do not print a line per file found
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Exit immediately instead of waiting for Enter
    #[arg(long)]
    pub no_pause: bool,
}

impl CliArgs {
    /// Validate and convert into run options.
    pub fn into_options(self) -> Result<RunOptions, ConfigError> {
        let config = ScanConfig::default().with_workers(self.workers);
        config.validate()?;
        Ok(RunOptions {
            root: self.root,
            output_dir: self.output_dir,
            config,
            quiet: self.quiet,
            pause: !self.no_pause,
        })
    }

    /// Log level selected by `-v` flags.
    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            _ => tracing::Level::DEBUG,
        }
    }
}
