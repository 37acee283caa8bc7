//! Wipe: permanently purge tossed objects.
//!
//! A purge deletes the journal record first and then removes the object from
//! the container. If the removal fails, the original record is written back
//! unchanged so the object stays tracked.

use super::{BatchReport, RubbishBin, Scope, distinct};
use crate::error::{Error, Result};
use crate::journal::{ItemType, MetaData};
use chrono::Utc;
use std::io;

/// Asks whether a record may be purged.
///
/// Implementations may block indefinitely (e.g. on a terminal prompt).
pub trait Confirm {
    /// Returns `Ok(true)` to purge, `Ok(false)` to skip.
    ///
    /// # Errors
    ///
    /// Returns an error if the answer cannot be obtained.
    fn confirm(&mut self, record: &MetaData) -> io::Result<bool>;
}

/// Confirms every purge without asking.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoAcknowledge;

impl Confirm for AutoAcknowledge {
    fn confirm(&mut self, _record: &MetaData) -> io::Result<bool> {
        Ok(true)
    }
}

impl<F> Confirm for F
where
    F: FnMut(&MetaData) -> io::Result<bool>,
{
    fn confirm(&mut self, record: &MetaData) -> io::Result<bool> {
        self(record)
    }
}

/// Per-invocation wipe settings.
#[derive(Debug, Clone, Default)]
pub struct WipeOptions {
    pub scope: Scope,
    /// Ignore retention and consider every record in scope.
    pub force: bool,
    /// Skip confirmation prompts.
    pub auto_acknowledge: bool,
    /// Restrict the wipe to these item names, each wiped once; empty means
    /// every candidate.
    pub items: Vec<String>,
}

/// What happened to one wipe candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WipeOutcome {
    /// Record and object are gone.
    Purged(MetaData),
    /// Confirmation was declined; nothing changed.
    Declined(MetaData),
}

impl RubbishBin<'_> {
    /// Records eligible for wiping in `scope`.
    ///
    /// # Errors
    ///
    /// Returns a journal error if the records cannot be read.
    pub fn wipe_candidates(&self, scope: Scope, force: bool) -> Result<Vec<MetaData>> {
        let records = self.records(scope)?;
        if force {
            return Ok(records);
        }

        let now = Utc::now().timestamp();
        Ok(records
            .into_iter()
            .filter(|r| r.is_wipeable_at(now))
            .collect())
    }

    /// Wipes the selected candidates, asking `confirm` for each one unless
    /// auto-acknowledge is set.
    ///
    /// # Errors
    ///
    /// Returns an error only if the candidates cannot be read; per-item
    /// failures are collected in the report.
    pub fn wipe(
        &self,
        options: &WipeOptions,
        confirm: &mut dyn Confirm,
    ) -> Result<BatchReport<WipeOutcome>> {
        let candidates = self.wipe_candidates(options.scope, options.force)?;
        tracing::debug!(
            scope = ?options.scope,
            force = options.force,
            candidates = candidates.len(),
            "Selected wipe candidates"
        );

        let mut report = BatchReport::default();

        if options.items.is_empty() {
            for record in candidates {
                let name = record.item.clone();
                report.push(name, self.wipe_one(record, options, confirm));
            }
            return Ok(report);
        }

        for item in distinct(&options.items) {
            let result = match candidates.iter().find(|r| r.item == item) {
                Some(record) => self.wipe_one(record.clone(), options, confirm),
                None => Err(self.explain_missing(item, options.scope)),
            };
            report.push(item, result);
        }
        Ok(report)
    }

    fn wipe_one(
        &self,
        record: MetaData,
        options: &WipeOptions,
        confirm: &mut dyn Confirm,
    ) -> Result<WipeOutcome> {
        if !options.auto_acknowledge {
            let confirmed = confirm.confirm(&record).map_err(|e| Error::Prompt {
                item: record.item.clone(),
                source: e,
            })?;
            if !confirmed {
                tracing::debug!(item = %record.item, "Wipe declined");
                return Ok(WipeOutcome::Declined(record));
            }
        }

        self.purge(&record)?;
        Ok(WipeOutcome::Purged(record))
    }

    /// Why `item` is not among the candidates.
    fn explain_missing(&self, item: &str, scope: Scope) -> Error {
        match self.journal.find(item) {
            Ok(None) => Error::not_found(item),
            Ok(Some(record)) if scope == Scope::Local && !record.is_within(self.working_dir()) => {
                Error::NotInScope {
                    item: item.to_string(),
                }
            },
            Ok(Some(_)) => Error::NotWipeable {
                item: item.to_string(),
            },
            Err(e) => e,
        }
    }

    /// Deletes `record` and removes its object from the container.
    ///
    /// A record whose object is already missing is dropped with a warning.
    ///
    /// # Errors
    ///
    /// - A journal error if the record cannot be deleted; nothing changed.
    /// - [`Error::Filesystem`] if the object cannot be removed; the record
    ///   has been written back.
    /// - [`Error::Inconsistent`] if writing the record back failed too.
    pub fn purge(&self, record: &MetaData) -> Result<()> {
        let item = record.item.as_str();
        let entry = self.entry_path(item);

        self.journal.delete(item)?;

        let removal = match std::fs::symlink_metadata(&entry) {
            Ok(meta) if ItemType::from_metadata(&meta) == ItemType::Directory => {
                std::fs::remove_dir_all(&entry)
            },
            Ok(_) => std::fs::remove_file(&entry),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::warn!(item, "Bin entry already missing, dropping its record");
                Ok(())
            },
            Err(e) => Err(e),
        };

        if let Err(e) = removal {
            let original = Error::filesystem(format!("cannot remove {}", entry.display()), e);
            return Err(self.reinstate(record, original));
        }

        tracing::info!(item, kind = record.kind.as_str(), "Wiped");
        Ok(())
    }

    /// Writes `record` back after a failed removal and returns the error to
    /// report.
    fn reinstate(&self, record: &MetaData, original: Error) -> Error {
        match self.journal.insert(record) {
            Ok(()) => {
                tracing::warn!(item = %record.item, "Wipe failed, journal record restored");
                original
            },
            Err(compensation) => {
                tracing::error!(item = %record.item, "Wipe failed and journal record could not be restored");
                Error::inconsistent(original, compensation)
            },
        }
    }
}
