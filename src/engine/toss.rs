//! Toss: move an object into the container and record it.
//!
//! The journal record is written and committed before the rename. A crash
//! between the two leaves a record pointing at an object that never moved,
//! which `check` detects. The reverse order could leave an object in the
//! container that nothing tracks.

use super::{BatchReport, RubbishBin};
use crate::access;
use crate::error::{Error, Result};
use crate::journal::{ItemType, MetaData};
use crate::naming;
use crate::paths;
use std::path::{Path, PathBuf};

/// Per-invocation toss settings.
#[derive(Debug, Clone, Default)]
pub struct TossOptions {
    /// Retention in days overriding the configured default.
    pub retention: Option<u32>,
}

/// An object about to be tossed, classified once without following symlinks.
#[derive(Debug, Clone)]
pub struct Tossable {
    /// Absolute path of the object, free of `.` and `..` components.
    pub path: PathBuf,
    pub basename: String,
    pub kind: ItemType,
}

impl Tossable {
    /// Inspects `path`, cleaned of `.` and `..` components.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if nothing exists at `path`,
    /// [`Error::Protected`] if it has no basename, or [`Error::Filesystem`]
    /// if it cannot be inspected.
    pub fn inspect(path: &Path) -> Result<Self> {
        let absolute = paths::absolute(path).map_err(|e| {
            Error::filesystem(
                format!("cannot resolve absolute path of {}", path.display()),
                e,
            )
        })?;

        let meta = std::fs::symlink_metadata(&absolute).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::not_found(path.display().to_string())
            } else {
                Error::filesystem(format!("cannot inspect {}", path.display()), e)
            }
        })?;

        let basename = absolute
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| Error::Protected {
                path: absolute.clone(),
            })?;

        Ok(Self {
            path: absolute,
            basename,
            kind: ItemType::from_metadata(&meta),
        })
    }
}

/// A completed toss.
#[derive(Debug, Clone)]
pub struct Tossed {
    pub record: MetaData,
    /// Where the object now lives inside the container.
    pub destination: PathBuf,
}

impl RubbishBin<'_> {
    /// Moves `path` into the container.
    ///
    /// # Errors
    ///
    /// - [`Error::PermissionDenied`] if the object or its directory is not
    ///   writable; nothing is changed.
    /// - [`Error::Protected`] if `path` is the container, lies inside it, or
    ///   contains it.
    /// - [`Error::Filesystem`] if the rename fails; the journal record is
    ///   removed again.
    /// - [`Error::Inconsistent`] if the rename failed and removing the record
    ///   failed too.
    pub fn toss(&self, path: &Path, options: &TossOptions) -> Result<Tossed> {
        let tossable = Tossable::inspect(path)?;

        let container = &self.config.container_path;
        if tossable.path.starts_with(container) || container.starts_with(&tossable.path) {
            return Err(Error::Protected {
                path: tossable.path,
            });
        }

        access::validate(&self.principal, &tossable.path)?;

        let item = naming::resolve(
            &self.config.container_path,
            self.journal,
            &tossable.basename,
        )?;
        let destination = self.entry_path(&item);
        let wipeout_time = options.retention.unwrap_or(self.config.wipeout_time);

        let record = self.journal.add(&item, &tossable.path, wipeout_time)?;

        if let Err(e) = std::fs::rename(&tossable.path, &destination) {
            let original = Error::filesystem(
                format!(
                    "cannot move {} to {}",
                    tossable.path.display(),
                    destination.display()
                ),
                e,
            );

            return match self.journal.delete(&item) {
                Ok(_) => {
                    tracing::warn!(item = %item, "Toss failed, journal record rolled back");
                    Err(original)
                },
                Err(compensation) => {
                    tracing::error!(item = %item, "Toss failed and journal rollback failed");
                    Err(Error::inconsistent(original, compensation))
                },
            };
        }

        tracing::info!(
            item = %item,
            origin = %tossable.path.display(),
            kind = tossable.kind.as_str(),
            wipeout_time,
            "Tossed"
        );

        Ok(Tossed {
            record,
            destination,
        })
    }

    /// Tosses each path in turn, isolating failures per path.
    pub fn toss_all(&self, paths: &[PathBuf], options: &TossOptions) -> BatchReport<Tossed> {
        let mut report = BatchReport::default();
        for path in paths {
            report.push(path.display().to_string(), self.toss(path, options));
        }
        report
    }
}
