//! `rubbish status` - list what is in the bin.

use anyhow::{Context, Result};
use rubbish::engine::{Scope, StatusEntry};
use rubbish::utils::{format_bytes, format_duration};
use std::process::ExitCode;

use super::Session;
use crate::ui;

/// Execute the status command.
pub fn execute(
    session: &Session,
    global: bool,
    size_only: bool,
    wipeable_only: bool,
) -> Result<ExitCode> {
    let scope = if global { Scope::Global } else { Scope::Local };
    let report = session
        .bin()
        .status(scope, wipeable_only)
        .context("Failed to read bin status")?;

    if size_only {
        println!("{}", format_bytes(report.bin_size));
        return Ok(ExitCode::SUCCESS);
    }

    if report.entries.is_empty() {
        match scope {
            Scope::Local => println!("No rubbish tossed from this directory."),
            Scope::Global => println!("The rubbish bin is empty."),
        }
    }

    for entry in &report.entries {
        println!("{}", status_line(entry));
    }

    println!();
    println!(
        "{}, {} wipeable, bin size {}",
        ui::plural(report.entries.len(), "item"),
        report.wipeable(),
        format_bytes(report.bin_size)
    );

    Ok(ExitCode::SUCCESS)
}

fn status_line(entry: &StatusEntry) -> String {
    let tossed = format_duration(entry.elapsed);
    if entry.wipeable {
        format!("{} | Tossed:{tossed} ago | Wipeable", entry.display_name)
    } else {
        format!(
            "{} | Tossed:{tossed} ago | WipeIn:{}",
            entry.display_name,
            format_duration(entry.remaining)
        )
    }
}
