//! Shared utility functions.

use crate::error::{Error, Result};
use crate::journal::JOURNAL_DIR;
use std::fs;
use std::path::Path;

/// Format bytes in human-readable form.
///
/// # Examples
///
/// ```
/// use rubbish::utils::format_bytes;
///
/// assert_eq!(format_bytes(0), "0 bytes");
/// assert_eq!(format_bytes(1024), "1.0 KB");
/// assert_eq!(format_bytes(1536), "1.5 KB");
/// assert_eq!(format_bytes(1048576), "1.0 MB");
/// ```
#[allow(clippy::cast_precision_loss)]
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;
    const GB: u64 = 1024 * 1024 * 1024;
    const TB: u64 = 1024 * 1024 * 1024 * 1024;

    if bytes == 0 {
        "0 bytes".to_string()
    } else if bytes >= TB {
        format!("{:.2} TB", bytes as f64 / TB as f64)
    } else if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} bytes")
    }
}

/// Format a duration in human-readable form. The sign is dropped; callers
/// decide how to present overdue durations.
///
/// # Examples
///
/// ```
/// use chrono::Duration;
/// use rubbish::utils::format_duration;
///
/// assert_eq!(format_duration(Duration::seconds(30)), "30s");
/// assert_eq!(format_duration(Duration::seconds(90)), "1m 30s");
/// assert_eq!(format_duration(Duration::seconds(3660)), "1h 1m");
/// assert_eq!(format_duration(Duration::seconds(90000)), "1d 1h");
/// ```
pub fn format_duration(duration: chrono::Duration) -> String {
    let secs = duration.num_seconds().unsigned_abs();
    if secs < 60 {
        format!("{secs}s")
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs < 86400 {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    } else {
        format!("{}d {}h", secs / 86400, (secs % 86400) / 3600)
    }
}

/// Total size of the regular files under `container`, skipping the journal
/// directory. Symlinks are counted as entries but not followed.
///
/// # Errors
///
/// Returns [`Error::Filesystem`] if a directory cannot be read.
pub fn bin_size(container: &Path) -> Result<u64> {
    walk_size(container, true)
}

fn walk_size(dir: &Path, top: bool) -> Result<u64> {
    let entries = fs::read_dir(dir)
        .map_err(|e| Error::filesystem(format!("cannot list {}", dir.display()), e))?;

    let mut total = 0u64;
    for entry in entries {
        let entry =
            entry.map_err(|e| Error::filesystem(format!("cannot list {}", dir.display()), e))?;
        if top && entry.file_name() == JOURNAL_DIR {
            continue;
        }

        // Entries can vanish mid-walk
        let Ok(meta) = fs::symlink_metadata(entry.path()) else {
            continue;
        };
        if meta.is_dir() {
            total += walk_size(&entry.path(), false)?;
        } else if meta.is_file() {
            total += meta.len();
        }
    }
    Ok(total)
}
