//! `rubbish wipe` - permanently delete items from the bin.

use anyhow::{Context, Result};
use rubbish::engine::{Confirm, Scope, WipeOptions, WipeOutcome};
use rubbish::journal::MetaData;
use rubbish::utils::format_duration;
use std::io;
use std::process::ExitCode;

use super::Session;
use crate::ui;

/// Asks on the terminal before each purge.
struct Prompt;

impl Confirm for Prompt {
    fn confirm(&mut self, record: &MetaData) -> io::Result<bool> {
        ui::confirm(&format!(
            "Wipe {} (from {}, tossed {} ago)?",
            record.item,
            record.origin.display(),
            format_duration(record.elapsed())
        ))
    }
}

/// Execute the wipe command.
pub fn execute(
    session: &Session,
    items: Vec<String>,
    force: bool,
    yes: bool,
    global: bool,
) -> Result<ExitCode> {
    let options = WipeOptions {
        scope: if global { Scope::Global } else { Scope::Local },
        force,
        auto_acknowledge: yes,
        items,
    };

    let bin = session.bin();
    let report = bin
        .wipe(&options, &mut Prompt)
        .context("Failed to read the journal")?;

    if report.is_empty() {
        println!("Nothing to wipe.");
        return Ok(ExitCode::SUCCESS);
    }

    let mut purged = 0;
    for outcome in report.successes() {
        match outcome {
            WipeOutcome::Purged(record) => {
                purged += 1;
                println!("Wiped {}", record.item);
            },
            WipeOutcome::Declined(record) => println!("Kept {}", record.item),
        }
    }
    println!("Wiped {}", ui::plural(purged, "item"));

    Ok(ui::finish(&report))
}
