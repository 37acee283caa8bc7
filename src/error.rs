//! Error types for the rubbish bin core.
//!
//! Every engine operation returns [`Error`]. Permission and lookup failures
//! are raised before any mutation; filesystem and journal failures carry the
//! underlying cause, and a failed compensating action is reported together
//! with the error that triggered it.

use std::fmt;
use std::path::PathBuf;

/// Result type for bin operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Which object failed the write-permission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessTarget {
    /// The object being tossed.
    Object,
    /// The directory containing the object.
    ParentDirectory,
}

impl fmt::Display for AccessTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Object => write!(f, "item"),
            Self::ParentDirectory => write!(f, "parent directory"),
        }
    }
}

/// Permission class whose write bit was consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionClass {
    Owner,
    Group,
    Other,
}

impl fmt::Display for PermissionClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Owner => write!(f, "owner"),
            Self::Group => write!(f, "group"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Bin errors with structured context.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The principal may not write the object or its parent directory.
    #[error("no {class} write permission on {target} {path:?}")]
    PermissionDenied {
        path: PathBuf,
        target: AccessTarget,
        class: PermissionClass,
    },

    /// No journal record (or filesystem object) with this name.
    #[error("'{item}' not found in the rubbish bin")]
    NotFound { item: String },

    /// The record exists but its origin lies outside the working directory.
    #[error("'{item}' doesn't belong to this directory's rubbish")]
    NotInScope { item: String },

    /// The record exists but its retention period has not elapsed.
    #[error("'{item}' is not wipeable yet (use force to ignore retention)")]
    NotWipeable { item: String },

    /// Positional lookup outside the journal bounds.
    #[error("invalid item position {position} (bin holds {len} items)")]
    InvalidPosition { position: i64, len: usize },

    /// The journal store could not be opened or is not loaded.
    #[error("journal unavailable at {path:?}: {reason}")]
    StoreUnavailable { path: PathBuf, reason: String },

    /// A journal write transaction failed.
    #[error("journal write failed for '{item}': {source}")]
    JournalWrite {
        item: String,
        #[source]
        source: redb::Error,
    },

    /// A journal read transaction failed.
    #[error("journal read failed: {source}")]
    JournalRead {
        #[source]
        source: redb::Error,
    },

    /// A record could not be encoded or decoded.
    #[error("malformed journal record '{item}': {source}")]
    Codec {
        item: String,
        #[source]
        source: serde_json::Error,
    },

    /// A rename, remove or stat syscall failed.
    #[error("{context}: {source}")]
    Filesystem {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// Restore target already exists and override was not requested.
    #[error("'{item}' restores to {target:?} which already exists (use override to replace it)")]
    Conflict { item: String, target: PathBuf },

    /// The path is the bin itself, lives inside it or above it, or has no basename.
    #[error("refusing to toss {path:?}")]
    Protected { path: PathBuf },

    /// Reading the wipe confirmation failed.
    #[error("cannot confirm wipe of '{item}': {source}")]
    Prompt {
        item: String,
        #[source]
        source: std::io::Error,
    },

    /// No free destination name could be generated.
    #[error("could not find a free name in the bin for '{name}'")]
    NameExhausted { name: String },

    /// A compensating action failed after the original failure.
    #[error("{original}; compensation failed, journal and bin are inconsistent: {compensation}")]
    Inconsistent {
        original: Box<Error>,
        compensation: Box<Error>,
    },
}

impl Error {
    /// Create a filesystem error with context.
    pub fn filesystem(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Filesystem {
            context: context.into(),
            source,
        }
    }

    /// Create a journal write error.
    pub fn journal_write(item: impl Into<String>, source: impl Into<redb::Error>) -> Self {
        Self::JournalWrite {
            item: item.into(),
            source: source.into(),
        }
    }

    /// Create a journal read error.
    pub fn journal_read(source: impl Into<redb::Error>) -> Self {
        Self::JournalRead {
            source: source.into(),
        }
    }

    /// Create a not found error.
    pub fn not_found(item: impl Into<String>) -> Self {
        Self::NotFound { item: item.into() }
    }

    /// Pair an original failure with the failure of its compensation.
    pub fn inconsistent(original: Error, compensation: Error) -> Self {
        Self::Inconsistent {
            original: Box::new(original),
            compensation: Box::new(compensation),
        }
    }

    /// Returns true for outcomes that skip an item without anything going wrong.
    #[must_use]
    pub fn is_skip(&self) -> bool {
        matches!(self, Self::Conflict { .. } | Self::NotInScope { .. })
    }
}
