/// FileAudit CLI — console frontend.
///
/// This crate contains all terminal I/O. Business logic lives in
/// `fileaudit-core`.
pub mod app;
pub mod args;
pub mod console;
pub mod prompt;

pub use app::{run, RunOptions, RunOutcome};
pub use args::CliArgs;
