//! `rubbish toss` - move paths into the bin.

use anyhow::Result;
use rubbish::engine::TossOptions;
use rubbish::utils::format_bytes;
use std::path::PathBuf;
use std::process::ExitCode;

use super::Session;
use crate::ui;

/// Execute the toss command.
pub fn execute(
    session: &Session,
    paths: &[PathBuf],
    retention: Option<u32>,
    silent: bool,
) -> Result<ExitCode> {
    if let Some(days) = retention {
        session.settings.check_retention(days)?;
    }

    let bin = session.bin();
    let report = bin.toss_all(paths, &TossOptions { retention });

    if !silent {
        for tossed in report.successes() {
            let record = &tossed.record;
            println!("Tossed {} as {}", record.origin.display(), record.item);
            match (record.wipeout_time, record.wipeable_at()) {
                (0, _) => println!("  Wipeable immediately"),
                (days, Some(at)) => println!(
                    "  Wipeable in {} (after {})",
                    ui::plural(days as usize, "day"),
                    at.format("%Y-%m-%d")
                ),
                (days, None) => println!("  Wipeable in {}", ui::plural(days as usize, "day")),
            }
        }

        if report.successes().next().is_some() {
            match rubbish::utils::bin_size(&session.container) {
                Ok(size) => println!("Bin size: {}", format_bytes(size)),
                Err(e) => tracing::debug!(error = %e, "Could not compute bin size"),
            }
        }
    }

    Ok(ui::finish(&report))
}
