//! FileAudit — resilient parallel directory audit.
//!
//! Thin binary entry point. All logic lives in the `fileaudit-core`
//! and `fileaudit-cli` crates.

use clap::Parser;
use fileaudit_cli::{prompt, CliArgs};
use std::io::{self, IsTerminal};

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    // Initialise structured logging. Console output of the scan itself goes
    // to stdout; logs go to stderr so the two never mix in redirected output.
    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .with_writer(io::stderr)
        .init();

    tracing::info!("FileAudit starting");

    let options = args.into_options()?;
    let pause = options.pause && io::stdin().is_terminal();

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout().lock();

    let result = fileaudit_cli::run(options, &mut input, &mut out);
    if let Err(err) = &result {
        tracing::error!("{err:#}");
    }

    if pause {
        prompt::wait_for_enter(&mut input, &mut out)?;
    }
    result.map(|_| ())
}
