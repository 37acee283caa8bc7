//! Read-only views over the journal: status listings and single-item info.

use super::{RubbishBin, Scope};
use crate::error::{Error, Result};
use crate::journal::MetaData;
use crate::paths;
use crate::utils::bin_size;
use chrono::{Duration, Utc};
use std::path::{Path, PathBuf};

/// One line of a status listing.
#[derive(Debug, Clone)]
pub struct StatusEntry {
    pub record: MetaData,
    /// Item name, prefixed with its origin directory relative to the working
    /// directory (local scope) or verbatim (global scope).
    pub display_name: String,
    pub wipeable: bool,
    /// Retention left; negative when overdue.
    pub remaining: Duration,
    pub elapsed: Duration,
}

/// A status listing plus bin totals.
#[derive(Debug, Clone)]
pub struct StatusReport {
    pub scope: Scope,
    pub entries: Vec<StatusEntry>,
    /// Bytes held by objects in the container, journal excluded.
    pub bin_size: u64,
}

impl StatusReport {
    pub fn wipeable(&self) -> usize {
        self.entries.iter().filter(|e| e.wipeable).count()
    }
}

impl RubbishBin<'_> {
    /// Lists the records in `scope`, optionally only the wipeable ones.
    ///
    /// # Errors
    ///
    /// Returns a journal error if the records cannot be read, or a
    /// filesystem error if the container cannot be walked.
    pub fn status(&self, scope: Scope, wipeable_only: bool) -> Result<StatusReport> {
        let now = Utc::now().timestamp();

        let entries = self
            .records(scope)?
            .into_iter()
            .map(|record| StatusEntry {
                display_name: self.display_name(&record, scope),
                wipeable: record.is_wipeable_at(now),
                remaining: record.remaining_at(now),
                elapsed: record.elapsed_at(now),
                record,
            })
            .filter(|entry| !wipeable_only || entry.wipeable)
            .collect();

        Ok(StatusReport {
            scope,
            entries,
            bin_size: bin_size(&self.config.container_path)?,
        })
    }

    /// Looks up a record by item name. A path is accepted; only its last
    /// component is used.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no record has this name.
    pub fn info(&self, name: &str) -> Result<MetaData> {
        let item = Path::new(name)
            .file_name()
            .map_or_else(|| name.to_string(), |n| n.to_string_lossy().into_owned());
        self.journal.get(&item)
    }

    /// Looks up a record by 1-based position in key order. Negative
    /// positions count from the end, so `-1` is the last record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPosition`] for 0 or a position past either end.
    pub fn info_at(&self, position: i64) -> Result<MetaData> {
        let mut records = self.journal.list()?;
        let len = records.len();

        let index = resolve_position(position, len)
            .ok_or(Error::InvalidPosition { position, len })?;
        Ok(records.swap_remove(index))
    }

    /// How a record is labelled in listings for `scope`.
    pub fn display_name(&self, record: &MetaData, scope: Scope) -> String {
        let dir = paths::clean(record.origin_dir());
        let shown: PathBuf = match scope {
            Scope::Global => dir.join(&record.item),
            Scope::Local => match dir.strip_prefix(self.working_dir()) {
                Ok(rel) => rel.join(&record.item),
                Err(_) => dir.join(&record.item),
            },
        };
        shown.display().to_string()
    }
}

/// Zero-based index for a 1-based, possibly negative position.
fn resolve_position(position: i64, len: usize) -> Option<usize> {
    let len = i64::try_from(len).ok()?;
    let index = match position {
        0 => return None,
        p if p > 0 => p - 1,
        p => len + p,
    };
    if (0..len).contains(&index) {
        usize::try_from(index).ok()
    } else {
        None
    }
}
