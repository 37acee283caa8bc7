//! Path resolution for rubbish files.
//!
//! # Container
//! - [`get_container_dir`] - the bin directory (`RUBBISH_CONTAINER` or config)
//! - [`get_journal_dir`] - `<container>/.journal/`
//!
//! # Normalisation
//! - [`clean`] - lexical `.`/`..` resolution
//! - [`absolute`] - absolute and clean, without touching symlinks
//!
//! # Configuration
//! - [`SYSTEM_CONFIG_PATH`] - `/etc/rubbish/config.toml`
//! - [`get_user_config_path`] - `$XDG_CONFIG_HOME/rubbish.toml`

use anyhow::{Context, Result};
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::journal::JOURNAL_DIR;

/// Environment variable overriding the configured container directory.
pub const CONTAINER_ENV: &str = "RUBBISH_CONTAINER";

/// Container directory used when no config sets one.
pub const DEFAULT_CONTAINER: &str = "~/.local/share/rubbish";

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/rubbish/config.toml";

// =============================================================================
// Container
// =============================================================================

/// Get the container directory.
///
/// Resolution order:
/// 1. `RUBBISH_CONTAINER` environment variable (if set and non-empty)
/// 2. `configured`, as read from the config files
pub fn get_container_dir(configured: &str) -> Result<PathBuf> {
    let home = dirs::home_dir().context("Failed to get home directory")?;

    if let Ok(env) = std::env::var(CONTAINER_ENV)
        && !env.is_empty()
    {
        return Ok(normalize_container(&env, &home));
    }

    Ok(normalize_container(configured, &home))
}

/// Makes a configured container path absolute.
///
/// Absolute paths are kept, `~` and `~/...` expand to `home`, and any other
/// relative path is taken relative to `home`.
pub fn normalize_container(raw: &str, home: &Path) -> PathBuf {
    let raw = raw.trim();
    if raw == "~" {
        return home.to_path_buf();
    }
    if let Some(rest) = raw.strip_prefix("~/") {
        return clean(&home.join(rest));
    }

    let path = Path::new(raw);
    if path.is_absolute() {
        clean(path)
    } else {
        clean(&home.join(path))
    }
}

// =============================================================================
// Normalisation
// =============================================================================

/// Lexically normalises `path`.
///
/// `.` components are dropped and each `..` removes the component before it.
/// A `..` directly under the root stays at the root; leading `..` of a
/// relative path are kept. Symlinks are not consulted, so `link/..` becomes
/// the directory holding `link`.
pub fn clean(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {},
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                },
                Some(Component::RootDir | Component::Prefix(_)) => {},
                Some(Component::ParentDir | Component::CurDir) | None => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }

    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

/// Absolute, clean form of `path`, resolved against the current directory.
///
/// # Errors
///
/// Fails if `path` is relative and the current directory cannot be read.
pub fn absolute(path: &Path) -> io::Result<PathBuf> {
    std::path::absolute(path).map(|p| clean(&p))
}

/// Get the journal directory: `<container>/.journal/`
pub fn get_journal_dir(container: &Path) -> PathBuf {
    container.join(JOURNAL_DIR)
}

// =============================================================================
// Configuration Files
// =============================================================================

/// Get the user config path: `$XDG_CONFIG_HOME/rubbish.toml`
pub fn get_user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("rubbish.toml"))
}

/// Config files in the order they are layered.
pub fn config_files() -> Vec<PathBuf> {
    let mut files = vec![PathBuf::from(SYSTEM_CONFIG_PATH)];
    files.extend(get_user_config_path());
    files
}
