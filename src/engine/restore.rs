//! Restore: move a tossed object back out of the container.
//!
//! Only items tossed from inside the working directory subtree can be
//! restored, and they always come back into the working directory itself
//! under their original basename.

use super::{BatchReport, RubbishBin, Scope, distinct};
use crate::access;
use crate::error::{Error, Result};
use crate::journal::MetaData;
use std::path::PathBuf;

/// Per-invocation restore settings.
#[derive(Debug, Clone, Default)]
pub struct RestoreOptions {
    /// Replace an existing object at the restore target.
    pub override_existing: bool,
}

/// A completed restore.
#[derive(Debug, Clone)]
pub struct Restored {
    pub record: MetaData,
    /// Where the object was restored to.
    pub target: PathBuf,
}

impl RubbishBin<'_> {
    /// Restores `item` into the working directory.
    ///
    /// # Errors
    ///
    /// - [`Error::NotInScope`] if no local record has this name.
    /// - [`Error::Conflict`] if the target exists and override is off.
    /// - [`Error::Filesystem`] if the move fails; the record is kept.
    pub fn restore(&self, item: &str, options: &RestoreOptions) -> Result<Restored> {
        let local = self.records(Scope::Local)?;
        self.restore_from(&local, item, options)
    }

    /// Restores each item in turn against one snapshot of the local records.
    ///
    /// # Errors
    ///
    /// Returns an error only if the local records cannot be read; per-item
    /// failures are collected in the report.
    pub fn restore_all(
        &self,
        items: &[String],
        options: &RestoreOptions,
    ) -> Result<BatchReport<Restored>> {
        let local = self.records(Scope::Local)?;

        let mut report = BatchReport::default();
        for item in distinct(items) {
            report.push(item, self.restore_from(&local, item, options));
        }
        Ok(report)
    }

    fn restore_from(
        &self,
        local: &[MetaData],
        item: &str,
        options: &RestoreOptions,
    ) -> Result<Restored> {
        let record = local
            .iter()
            .find(|r| r.item == item)
            .ok_or_else(|| Error::NotInScope {
                item: item.to_string(),
            })?;

        let basename = record.origin.file_name().ok_or_else(|| Error::Protected {
            path: record.origin.clone(),
        })?;
        let target = self.working_dir().join(basename);

        if std::fs::symlink_metadata(&target).is_ok() && !options.override_existing {
            tracing::debug!(item, target = %target.display(), "Restore target exists");
            return Err(Error::Conflict {
                item: item.to_string(),
                target,
            });
        }

        access::validate_dir(&self.principal, self.working_dir())?;

        let source = self.entry_path(&record.item);
        std::fs::rename(&source, &target).map_err(|e| {
            Error::filesystem(
                format!("cannot restore {} to {}", source.display(), target.display()),
                e,
            )
        })?;

        if let Err(e) = self.journal.delete(&record.item) {
            tracing::warn!(item, error = %e, "Restored but journal record could not be removed");
            return Err(e);
        }

        tracing::info!(item, target = %target.display(), "Restored");
        Ok(Restored {
            record: record.clone(),
            target,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::Principal;
    use crate::engine::{BinConfig, TossOptions};
    use crate::journal::{JOURNAL_DIR, Journal};
    use std::fs;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Journal, BinConfig) {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("bin")).unwrap();
        fs::create_dir_all(tmp.path().join("work").join("sub")).unwrap();
        let journal = Journal::open(tmp.path().join("bin").join(JOURNAL_DIR)).unwrap();
        let config = BinConfig {
            container_path: tmp.path().join("bin"),
            working_dir: tmp.path().join("work"),
            wipeout_time: 30,
        };
        (tmp, journal, config)
    }

    fn root() -> Principal {
        Principal::new(0, 0, vec![])
    }

    #[test]
    fn test_restore_round_trip() {
        let (tmp, journal, config) = setup();
        let bin = RubbishBin::with_principal(config, &journal, root());
        let src = tmp.path().join("work").join("notes.txt");
        fs::write(&src, "hello").unwrap();

        let tossed = bin.toss(&src, &TossOptions::default()).unwrap();
        let restored = bin
            .restore(&tossed.record.item, &RestoreOptions::default())
            .unwrap();

        assert_eq!(restored.target, src);
        assert_eq!(fs::read_to_string(&src).unwrap(), "hello");
        assert!(!tossed.destination.exists());
        assert!(journal.find(&tossed.record.item).unwrap().is_none());
    }

    #[test]
    fn test_restore_targets_working_dir_not_origin() {
        let (tmp, journal, config) = setup();
        let bin = RubbishBin::with_principal(config, &journal, root());
        let src = tmp.path().join("work").join("sub").join("deep.txt");
        fs::write(&src, "deep").unwrap();

        let tossed = bin.toss(&src, &TossOptions::default()).unwrap();
        let restored = bin
            .restore(&tossed.record.item, &RestoreOptions::default())
            .unwrap();

        assert_eq!(restored.target, tmp.path().join("work").join("deep.txt"));
        assert!(!src.exists());
    }

    #[test]
    fn test_restore_all_handles_repeated_item_once() {
        let (tmp, journal, config) = setup();
        let bin = RubbishBin::with_principal(config, &journal, root());
        let src = tmp.path().join("work").join("notes.txt");
        fs::write(&src, "hello").unwrap();

        let item = bin.toss(&src, &TossOptions::default()).unwrap().record.item;
        let options = RestoreOptions {
            override_existing: true,
        };
        let report = bin.restore_all(&[item.clone(), item], &options).unwrap();

        assert_eq!(report.len(), 1);
        assert!(!report.has_failures());
        assert_eq!(fs::read_to_string(&src).unwrap(), "hello");
    }

    #[test]
    fn test_restore_conflict_leaves_everything() {
        let (tmp, journal, config) = setup();
        let bin = RubbishBin::with_principal(config, &journal, root());
        let src = tmp.path().join("work").join("notes.txt");
        fs::write(&src, "old").unwrap();
        let tossed = bin.toss(&src, &TossOptions::default()).unwrap();
        fs::write(&src, "new").unwrap();

        let err = bin
            .restore(&tossed.record.item, &RestoreOptions::default())
            .unwrap_err();

        assert!(matches!(err, Error::Conflict { .. }));
        assert_eq!(fs::read_to_string(&src).unwrap(), "new");
        assert!(tossed.destination.exists());
        assert!(journal.find(&tossed.record.item).unwrap().is_some());
    }

    #[test]
    fn test_restore_override_replaces_file() {
        let (tmp, journal, config) = setup();
        let bin = RubbishBin::with_principal(config, &journal, root());
        let src = tmp.path().join("work").join("notes.txt");
        fs::write(&src, "old").unwrap();
        let tossed = bin.toss(&src, &TossOptions::default()).unwrap();
        fs::write(&src, "new").unwrap();

        let options = RestoreOptions {
            override_existing: true,
        };
        bin.restore(&tossed.record.item, &options).unwrap();
        assert_eq!(fs::read_to_string(&src).unwrap(), "old");
    }

    #[test]
    fn test_restore_outside_scope_is_refused() {
        let (tmp, journal, config) = setup();
        let elsewhere = tmp.path().join("elsewhere");
        fs::create_dir(&elsewhere).unwrap();
        let src = elsewhere.join("far.txt");
        fs::write(&src, "far").unwrap();

        let mut other = config.clone();
        other.working_dir = elsewhere;
        let tossed = RubbishBin::with_principal(other, &journal, root())
            .toss(&src, &TossOptions::default())
            .unwrap();

        let bin = RubbishBin::with_principal(config, &journal, root());
        let err = bin
            .restore(&tossed.record.item, &RestoreOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::NotInScope { .. }));
        assert!(tossed.destination.exists());
    }

    #[test]
    fn test_failed_move_keeps_record() {
        let (tmp, journal, config) = setup();
        let bin = RubbishBin::with_principal(config, &journal, root());
        let src = tmp.path().join("work").join("notes.txt");
        fs::write(&src, "hello").unwrap();
        let tossed = bin.toss(&src, &TossOptions::default()).unwrap();

        // Object vanished from the container behind the journal's back
        fs::remove_file(&tossed.destination).unwrap();

        let err = bin
            .restore(&tossed.record.item, &RestoreOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::Filesystem { .. }));
        assert!(journal.find(&tossed.record.item).unwrap().is_some());
    }
}
