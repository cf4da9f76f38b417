//! Persisted window state loaded from a TOML file.
//!
//! Every field has a default, so a missing or partial file still yields a
//! usable [`Config`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::nav::panel::{home_dir, ColumnKind};

/// Top-level configuration: one table per pane plus appearance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub left: PaneConfig,
    #[serde(default)]
    pub right: PaneConfig,
    #[serde(default)]
    pub appearance: AppearanceConfig,
}

impl Config {
    /// Loads configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// - [`CoreError::NotFound`] if the file does not exist.
    /// - [`CoreError::PermissionDenied`] if the file is not readable.
    /// - [`CoreError::ConfigParse`] if the TOML is malformed.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => CoreError::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => CoreError::PermissionDenied(path.to_path_buf()),
            _ => CoreError::Io(e),
        })?;
        toml::from_str(&content).map_err(|e| CoreError::ConfigParse(e.to_string()))
    }

    /// Loads `path`, falling back to defaults when the file does not exist.
    pub fn load_or_default(path: &Path) -> CoreResult<Self> {
        match Self::load(path) {
            Err(CoreError::NotFound(_)) => {
                tracing::debug!("no config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Writes the configuration to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> CoreResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| CoreError::ConfigParse(e.to_string()))?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| CoreError::from_io(e, parent))?;
        }
        std::fs::write(path, content).map_err(|e| CoreError::from_io(e, path))
    }

    /// `$HOME/.config/duopane/config.toml`, if `HOME` is set.
    pub fn default_path() -> Option<PathBuf> {
        home_dir().map(|home| home.join(".config").join("duopane").join("config.toml"))
    }
}

/// Saved state of one pane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaneConfig {
    /// Directory to open; empty or missing means the home directory.
    #[serde(default)]
    pub path: Option<PathBuf>,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default = "default_columns")]
    pub columns: Vec<ColumnKind>,
}

impl Default for PaneConfig {
    fn default() -> Self {
        Self {
            path: None,
            hidden: false,
            columns: default_columns(),
        }
    }
}

impl PaneConfig {
    /// The directory this pane should open.
    ///
    /// A configured path that is not an existing directory is replaced by
    /// `$HOME`, and `$HOME` by `/`.
    pub fn resolved_path(&self) -> PathBuf {
        if let Some(path) = self.path.as_ref().filter(|p| !p.as_os_str().is_empty()) {
            if path.is_dir() {
                return path.clone();
            }
            tracing::warn!("configured pane path {} is not a directory", path.display());
        }
        match home_dir().filter(|h| h.is_dir()) {
            Some(home) => home,
            None => {
                tracing::warn!("HOME is not usable, opening /");
                PathBuf::from("/")
            }
        }
    }
}

/// Look and feel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppearanceConfig {
    /// Stylesheet handed to the host UI as-is.
    #[serde(default)]
    pub stylesheet: Option<String>,
}

fn default_columns() -> Vec<ColumnKind> {
    vec![ColumnKind::Name]
}
