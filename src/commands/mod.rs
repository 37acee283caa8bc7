//! CLI command implementations for rubbish.
//!
//! Each submodule implements a specific command:
//!
//! - [`toss`] - Move files and directories into the bin
//! - [`restore`] - Bring tossed items back into the current directory
//! - [`wipe`] - Permanently delete items past their retention
//! - [`status`] - List the bin contents
//! - [`info`] - Show one record in detail
//! - [`check`] - Compare the journal with the bin contents
//! - [`completions`] - Shell completion scripts

pub mod check;
pub mod completions;
pub mod info;
pub mod restore;
pub mod status;
pub mod toss;
pub mod wipe;

use rubbish::config::Settings;
use rubbish::engine::{BinConfig, RubbishBin};
use rubbish::journal::Journal;
use std::path::PathBuf;

/// Everything a command needs for one invocation.
pub struct Session<'j> {
    pub settings: Settings,
    pub container: PathBuf,
    pub working_dir: PathBuf,
    pub journal: &'j Journal,
}

impl Session<'_> {
    /// The bin as seen from the working directory.
    pub fn bin(&self) -> RubbishBin<'_> {
        let config = BinConfig {
            container_path: self.container.clone(),
            working_dir: self.working_dir.clone(),
            wipeout_time: self.settings.wipeout_time,
        };
        RubbishBin::new(config, self.journal)
    }
}
