/// Interactive prompts.
///
/// Generic over the input and output streams so tests can script them.
use anyhow::{bail, Result};
use std::io::{BufRead, Write};
use std::path::PathBuf;

/// Ask for the target directory until a non-empty answer is given.
///
/// Surrounding whitespace and quotes (as added by "Copy as path" on Windows)
/// are removed. Fails if input ends before an answer is given.
pub fn read_root<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> Result<PathBuf> {
    loop {
        writeln!(out, "Enter your target directory: ")?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            bail!("no target directory entered (end of input)");
        }

        let answer = line.trim().trim_matches('"').trim();
        if answer.is_empty() {
            writeln!(out)?;
            writeln!(out, "Directory cannot be empty!")?;
            writeln!(out)?;
            continue;
        }
        return Ok(PathBuf::from(answer));
    }
}

/// Block until the user presses Enter (or input ends).
pub fn wait_for_enter<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "Press Enter to exit...")?;
    out.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(())
}
