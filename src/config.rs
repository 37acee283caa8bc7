//! User settings for the rubbish CLI.
//!
//! Settings are read from TOML files layered in order, each optional:
//!
//! 1. `/etc/rubbish/config.toml` (system)
//! 2. `$XDG_CONFIG_HOME/rubbish.toml` (user)
//!
//! Keys present in a later file override the same keys from earlier ones.
//! Anything not set anywhere falls back to the built-in defaults.
//!
//! ```toml
//! wipeout_time = 30
//! container_path = "~/.local/share/rubbish"
//! max_retention = 365
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::paths;

/// Default retention in days.
pub const DEFAULT_WIPEOUT_TIME: u32 = 30;

/// Default upper bound for any retention, in days.
pub const DEFAULT_MAX_RETENTION: u32 = 365;

/// Result of configuration validation.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Non-fatal warnings that should be logged but don't prevent operation.
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// Returns true if there are any warnings.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Effective settings after layering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    /// Default retention in days for new tosses.
    pub wipeout_time: u32,
    /// Container directory as written in the config (`~` allowed).
    pub container_path: String,
    /// Largest retention a toss may request.
    pub max_retention: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            wipeout_time: DEFAULT_WIPEOUT_TIME,
            container_path: paths::DEFAULT_CONTAINER.to_string(),
            max_retention: DEFAULT_MAX_RETENTION,
        }
    }
}

/// One config file; unset keys leave earlier layers alone.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct Layer {
    wipeout_time: Option<u32>,
    container_path: Option<String>,
    max_retention: Option<u32>,
}

impl Settings {
    /// Load settings from the system and user config files.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing config file cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_files())
    }

    /// Load settings by layering the given files in order. Missing files are
    /// skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A file exists but cannot be read (IO error)
    /// - A file contains invalid TOML syntax
    /// - A key is unknown or has an invalid type
    pub fn load_from<P: AsRef<Path>>(files: &[P]) -> Result<Self> {
        let mut settings = Self::default();

        for path in files {
            let path = path.as_ref();
            if !path.exists() {
                continue;
            }

            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            let layer: Layer = toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

            tracing::debug!(path = %path.display(), "Loaded config layer");
            settings.apply(layer);
        }

        Ok(settings)
    }

    fn apply(&mut self, layer: Layer) {
        if let Some(wipeout_time) = layer.wipeout_time {
            self.wipeout_time = wipeout_time;
        }
        if let Some(container_path) = layer.container_path {
            self.container_path = container_path;
        }
        if let Some(max_retention) = layer.max_retention {
            self.max_retention = max_retention;
        }
    }

    /// Absolute container directory, honouring `RUBBISH_CONTAINER`.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn container_dir(&self) -> Result<PathBuf> {
        paths::get_container_dir(&self.container_path)
    }

    /// Checks a per-toss retention override against `max_retention`.
    ///
    /// # Errors
    ///
    /// Returns an error if `days` exceeds the configured maximum.
    pub fn check_retention(&self, days: u32) -> Result<()> {
        if days > self.max_retention {
            anyhow::bail!(
                "Retention of {days} days exceeds max_retention ({} days)",
                self.max_retention
            );
        }
        Ok(())
    }

    /// Validate settings.
    ///
    /// Returns a `ValidationResult` containing any non-fatal warnings.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails with one or more errors:
    /// - Empty container path
    /// - Default retention larger than `max_retention`
    /// - Zero `max_retention`
    pub fn validate(&self) -> Result<ValidationResult> {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        if self.container_path.trim().is_empty() {
            errors.push("container_path cannot be empty".to_string());
        } else if !self.container_path.starts_with('/') && !self.container_path.starts_with('~')
        {
            warnings.push(format!(
                "container_path '{}' is relative and will be resolved against the home directory",
                self.container_path
            ));
        }

        if self.max_retention == 0 {
            errors.push("max_retention cannot be 0".to_string());
        }

        if self.wipeout_time > self.max_retention {
            errors.push(format!(
                "wipeout_time ({}) cannot exceed max_retention ({})",
                self.wipeout_time, self.max_retention
            ));
        }

        if self.wipeout_time == 0 {
            warnings.push(
                "wipeout_time is 0: tossed items are wipeable immediately".to_string(),
            );
        }

        if !errors.is_empty() {
            anyhow::bail!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            );
        }

        Ok(ValidationResult { warnings })
    }
}
