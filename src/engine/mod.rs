//! Lifecycle engines for tossed objects.
//!
//! [`RubbishBin`] ties together the configuration contract, a borrowed
//! [`Journal`] and the acting [`Principal`]. The state transitions live in
//! their own files as `impl RubbishBin` blocks:
//!
//! - [`toss`] - Present -> InTrash
//! - [`restore`] - InTrash -> Present
//! - [`wipe`] - InTrash -> Purged
//! - [`query`] - read-only status and info lookups
//! - [`scan`] - journal/container consistency check
//!
//! Every engine processes items one at a time. Batch entry points never stop
//! at the first failing item; they collect a [`BatchReport`] instead.

pub mod query;
pub mod restore;
pub mod scan;
pub mod toss;
pub mod wipe;

pub use query::{StatusEntry, StatusReport};
pub use restore::{RestoreOptions, Restored};
pub use scan::ScanReport;
pub use toss::{TossOptions, Tossable, Tossed};
pub use wipe::{AutoAcknowledge, Confirm, WipeOptions, WipeOutcome};

use crate::access::Principal;
use crate::error::{Error, Result};
use crate::journal::{Journal, MetaData};
use crate::paths;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Settings the engines consume. Loading them is the caller's business.
#[derive(Debug, Clone)]
pub struct BinConfig {
    /// Absolute path of the container directory.
    pub container_path: PathBuf,
    /// Absolute path of the directory the command was invoked from.
    pub working_dir: PathBuf,
    /// Default retention in days for new tosses.
    pub wipeout_time: u32,
}

/// Which records an operation considers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scope {
    /// Records tossed from inside the working directory subtree.
    #[default]
    Local,
    /// Every record in the journal.
    Global,
}

/// The rubbish bin as seen by one invocation.
pub struct RubbishBin<'j> {
    config: BinConfig,
    journal: &'j Journal,
    principal: Principal,
}

impl<'j> RubbishBin<'j> {
    /// Creates a bin acting as the current process user.
    pub fn new(config: BinConfig, journal: &'j Journal) -> Self {
        Self::with_principal(config, journal, Principal::current())
    }

    /// Creates a bin acting as `principal`.
    ///
    /// Both configured directories are cleaned lexically.
    pub fn with_principal(
        mut config: BinConfig,
        journal: &'j Journal,
        principal: Principal,
    ) -> Self {
        config.container_path = paths::clean(&config.container_path);
        config.working_dir = paths::clean(&config.working_dir);
        Self {
            config,
            journal,
            principal,
        }
    }

    pub fn config(&self) -> &BinConfig {
        &self.config
    }

    pub fn journal(&self) -> &Journal {
        self.journal
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    /// Location of `item` inside the container.
    pub fn entry_path(&self, item: &str) -> PathBuf {
        self.config.container_path.join(item)
    }

    /// Records visible in `scope`.
    ///
    /// # Errors
    ///
    /// Returns a journal error if the records cannot be read.
    pub fn records(&self, scope: Scope) -> Result<Vec<MetaData>> {
        match scope {
            Scope::Local => self.journal.filter_path(&self.config.working_dir),
            Scope::Global => self.journal.list(),
        }
    }

    fn working_dir(&self) -> &Path {
        &self.config.working_dir
    }
}

/// `items` in first-seen order with repeats dropped.
fn distinct(items: &[String]) -> Vec<&str> {
    let mut seen = HashSet::new();
    items
        .iter()
        .map(String::as_str)
        .filter(|item| seen.insert(*item))
        .collect()
}

/// Result of one item in a batch operation.
#[derive(Debug)]
pub struct ItemOutcome<T> {
    /// The path or item name the caller asked for.
    pub name: String,
    pub result: Result<T>,
}

/// Per-item results of a batch operation, in processing order.
#[derive(Debug)]
pub struct BatchReport<T> {
    pub items: Vec<ItemOutcome<T>>,
}

impl<T> Default for BatchReport<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> BatchReport<T> {
    pub fn push(&mut self, name: impl Into<String>, result: Result<T>) {
        self.items.push(ItemOutcome {
            name: name.into(),
            result,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn successes(&self) -> impl Iterator<Item = &T> {
        self.items.iter().filter_map(|i| i.result.as_ref().ok())
    }

    pub fn errors(&self) -> impl Iterator<Item = (&str, &Error)> {
        self.items
            .iter()
            .filter_map(|i| i.result.as_ref().err().map(|e| (i.name.as_str(), e)))
    }

    /// True if any item failed for a reason other than a benign skip.
    pub fn has_failures(&self) -> bool {
        self.errors().any(|(_, e)| !e.is_skip())
    }
}
