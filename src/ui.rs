//! UI utilities for consistent terminal output formatting.
//!
//! Provides shared formatting for per-item errors, batch summaries and the
//! wipe confirmation prompt.

use rubbish::Error;
use rubbish::engine::BatchReport;
use std::io::{self, Write};
use std::process::ExitCode;

/// Width of error box separators.
const ERROR_BOX_WIDTH: usize = 60;

/// Print an error box with a title and detail lines.
///
/// Outputs:
/// ```text
/// ============================================================
/// Bin and journal are inconsistent
/// ============================================================
///
/// <line>
/// <line>
/// ```
pub fn print_error_box(title: &str, lines: &[String]) {
    eprintln!("\n{}", "=".repeat(ERROR_BOX_WIDTH));
    eprintln!("{title}");
    eprintln!("{}", "=".repeat(ERROR_BOX_WIDTH));

    if !lines.is_empty() {
        eprintln!();
        for line in lines {
            eprintln!("{line}");
        }
    }
}

/// Print one failed item of a batch.
pub fn print_item_error(name: &str, err: &Error) {
    if err.is_skip() {
        eprintln!("Skipped '{name}': {err}");
        return;
    }

    if let Error::Inconsistent {
        original,
        compensation,
    } = err
    {
        print_error_box(
            &format!("'{name}': journal and bin are out of sync"),
            &[
                format!("Operation failed:    {original}"),
                format!("Compensation failed: {compensation}"),
                String::new(),
                "Run `rubbish check` to inspect the bin.".to_string(),
            ],
        );
        return;
    }

    eprintln!("Error: '{name}': {err}");
}

/// Print the failed items of `report` and pick the exit code.
///
/// Skips are reported but do not fail the run.
pub fn finish<T>(report: &BatchReport<T>) -> ExitCode {
    for (name, err) in report.errors() {
        print_item_error(name, err);
    }

    if report.has_failures() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Ask a yes/no question on stdin; anything but `y`/`yes` is a no.
pub fn confirm(question: &str) -> io::Result<bool> {
    print!("{question} [y/N]: ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(matches!(input.trim().to_lowercase().as_str(), "y" | "yes"))
}

/// `n item` / `n items`.
pub fn plural(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("{n} {noun}")
    } else {
        format!("{n} {noun}s")
    }
}
