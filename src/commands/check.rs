//! `rubbish check` - compare the journal with the bin contents.

use anyhow::{Context, Result};
use std::process::ExitCode;

use super::Session;
use crate::ui;

/// Execute the check command.
pub fn execute(session: &Session, fix: bool) -> Result<ExitCode> {
    let report = session.bin().check(fix).context("Consistency check failed")?;

    if report.missing.is_empty() && report.untracked.is_empty() && report.malformed.is_empty() {
        println!("Journal and bin agree.");
        return Ok(ExitCode::SUCCESS);
    }

    let mut lines = Vec::new();
    for record in &report.missing {
        let action = if fix { "record removed" } else { "record kept" };
        lines.push(format!(
            "missing:   {} (from {}), {action}",
            record.item,
            record.origin.display()
        ));
    }
    for name in &report.untracked {
        lines.push(format!("untracked: {name}"));
    }
    for item in &report.malformed {
        lines.push(format!("malformed: {item}, record kept"));
    }
    if !fix && !report.missing.is_empty() {
        lines.push(String::new());
        lines.push("Run `rubbish check --fix` to drop records of missing items.".to_string());
    }

    ui::print_error_box("Journal and bin disagree", &lines);

    if report.is_clean() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
