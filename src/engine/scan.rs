//! Consistency scan between the journal and the container.
//!
//! A toss that crashed between the journal commit and the rename leaves a
//! record whose object never reached the container. Anything placed in the
//! container by hand has no record at all. `check` reports both, along with
//! records that no longer decode, and can drop the dangling records.

use super::RubbishBin;
use crate::error::{Error, Result};
use crate::journal::{JOURNAL_DIR, MetaData};
use std::collections::HashSet;

/// Outcome of a consistency scan.
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    /// Records whose object is missing from the container.
    pub missing: Vec<MetaData>,
    /// Container entries that no record tracks.
    pub untracked: Vec<String>,
    /// Keys of records that cannot be decoded. Never deleted by `fix`.
    pub malformed: Vec<String>,
    /// Number of missing records that were deleted.
    pub fixed: usize,
}

impl ScanReport {
    pub fn is_clean(&self) -> bool {
        self.missing.len() == self.fixed && self.untracked.is_empty() && self.malformed.is_empty()
    }
}

impl RubbishBin<'_> {
    /// Compares journal records with container entries. With `fix`, records
    /// of missing objects are deleted; untracked entries are only reported.
    ///
    /// # Errors
    ///
    /// Returns an error if the container cannot be listed or the journal
    /// cannot be read or, with `fix`, written.
    pub fn check(&self, fix: bool) -> Result<ScanReport> {
        let container = &self.config.container_path;
        tracing::debug!(container = %container.display(), fix, "Scanning bin");

        // Phase 1: container entries
        let mut on_disk: HashSet<String> = HashSet::new();
        let entries = std::fs::read_dir(container)
            .map_err(|e| Error::filesystem(format!("cannot list {}", container.display()), e))?;
        for entry in entries {
            let entry = entry.map_err(|e| {
                Error::filesystem(format!("cannot list {}", container.display()), e)
            })?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name != JOURNAL_DIR {
                on_disk.insert(name);
            }
        }

        // Phase 2: records against entries
        let mut report = ScanReport::default();
        let (records, malformed) = self.journal.list_lenient()?;
        for record in records {
            if !on_disk.remove(&record.item) {
                report.missing.push(record);
            }
        }
        for (item, _) in malformed {
            on_disk.remove(&item);
            report.malformed.push(item);
        }

        let mut untracked: Vec<String> = on_disk.into_iter().collect();
        untracked.sort();
        report.untracked = untracked;

        // Phase 3: drop dangling records
        if fix {
            for record in &report.missing {
                if self.journal.delete(&record.item)? {
                    report.fixed += 1;
                }
            }
        }

        if !report.missing.is_empty() || !report.untracked.is_empty() || !report.malformed.is_empty()
        {
            tracing::warn!(
                missing = report.missing.len(),
                untracked = report.untracked.len(),
                malformed = report.malformed.len(),
                fixed = report.fixed,
                "Bin and journal disagree"
            );
        }

        Ok(report)
    }
}
