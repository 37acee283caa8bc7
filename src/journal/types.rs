//! Record types and table definition for the journal.

use crate::paths;
use chrono::{DateTime, Duration, Utc};
use redb::TableDefinition;
use serde::{Deserialize, Serialize};
use std::fs::Metadata;
use std::path::{Path, PathBuf};

/// Table holding one JSON-encoded [`MetaData`] per trashed item, keyed by item name.
pub(crate) const JOURNAL_TABLE: TableDefinition<'static, &'static str, &'static [u8]> =
    TableDefinition::new("journal");

/// Seconds in one retention day.
pub const SECS_PER_DAY: i64 = 86_400;

/// Kind of filesystem object a record describes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    File,
    Directory,
    Symlink,
    Other,
}

impl ItemType {
    /// Classifies an object from metadata obtained without following symlinks.
    pub fn from_metadata(meta: &Metadata) -> Self {
        let ft = meta.file_type();
        if ft.is_symlink() {
            Self::Symlink
        } else if ft.is_dir() {
            Self::Directory
        } else if ft.is_file() {
            Self::File
        } else {
            Self::Other
        }
    }

    /// Classifies the object at `path`; unreadable paths are [`ItemType::Other`].
    pub fn of_path(path: &Path) -> Self {
        std::fs::symlink_metadata(path).map_or(Self::Other, |meta| Self::from_metadata(&meta))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Directory => "directory",
            Self::Symlink => "symlink",
            Self::Other => "other",
        }
    }
}

/// Everything the bin knows about one trashed object.
///
/// Records are immutable once written. Restore and wipe only ever delete
/// them, and a failed wipe re-inserts the exact same value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MetaData {
    /// Name of the object inside the container, unique across the journal.
    pub item: String,
    /// Absolute path the object had before it was tossed.
    pub origin: PathBuf,
    #[serde(rename = "type")]
    pub kind: ItemType,
    /// Retention in days; 0 means wipeable immediately.
    pub wipeout_time: u32,
    /// Unix timestamp (seconds) of the toss.
    pub tossed_time: i64,
}

impl MetaData {
    /// Time spent in the bin as of `now` (Unix seconds).
    pub fn elapsed_at(&self, now: i64) -> Duration {
        Duration::seconds(now - self.tossed_time)
    }

    /// Time spent in the bin so far.
    pub fn elapsed(&self) -> Duration {
        self.elapsed_at(Utc::now().timestamp())
    }

    /// Whole days spent in the bin as of `now`, rounded down.
    pub fn elapsed_days_at(&self, now: i64) -> i64 {
        (now - self.tossed_time).div_euclid(SECS_PER_DAY)
    }

    /// True once the whole days elapsed reach the retention period.
    pub fn is_wipeable_at(&self, now: i64) -> bool {
        self.elapsed_days_at(now) >= i64::from(self.wipeout_time)
    }

    pub fn is_wipeable(&self) -> bool {
        self.is_wipeable_at(Utc::now().timestamp())
    }

    /// Retention left as of `now`; negative when overdue.
    pub fn remaining_at(&self, now: i64) -> Duration {
        Duration::days(i64::from(self.wipeout_time)) - self.elapsed_at(now)
    }

    pub fn remaining(&self) -> Duration {
        self.remaining_at(Utc::now().timestamp())
    }

    /// Retention days minus whole elapsed days; negative when overdue.
    pub fn remaining_days_at(&self, now: i64) -> i64 {
        i64::from(self.wipeout_time) - self.elapsed_days_at(now)
    }

    pub fn tossed_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.tossed_time, 0)
    }

    /// Moment the record becomes wipeable.
    pub fn wipeable_at(&self) -> Option<DateTime<Utc>> {
        self.tossed_at()
            .map(|t| t + Duration::days(i64::from(self.wipeout_time)))
    }

    /// Directory the object was tossed from.
    pub fn origin_dir(&self) -> &Path {
        self.origin.parent().unwrap_or_else(|| Path::new("/"))
    }

    /// True if the object was tossed from inside `dir` or one of its subdirectories.
    ///
    /// Both sides are compared in their lexically clean form, so
    /// `/w/sub/../x` lies in `/w` and not in `/w/sub`.
    pub fn is_within(&self, dir: &Path) -> bool {
        paths::clean(self.origin_dir()).starts_with(paths::clean(dir))
    }
}
