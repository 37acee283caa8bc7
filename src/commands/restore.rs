//! `rubbish restore` - bring items back into the current directory.

use anyhow::{Context, Result};
use rubbish::engine::RestoreOptions;
use std::process::ExitCode;

use super::Session;
use crate::ui;

/// Execute the restore command.
pub fn execute(
    session: &Session,
    items: &[String],
    override_existing: bool,
    silent: bool,
) -> Result<ExitCode> {
    let bin = session.bin();
    let report = bin
        .restore_all(items, &RestoreOptions { override_existing })
        .context("Failed to read the journal")?;

    if !silent {
        for restored in report.successes() {
            println!(
                "Restored {} to {}",
                restored.record.item,
                restored.target.display()
            );
        }
    }

    Ok(ui::finish(&report))
}
