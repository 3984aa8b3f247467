use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::Deserialize;
use thiserror::Error;

use crate::sorter::RelocateMode;

/// Application configuration loaded from TOML config file.
/// All fields have sensible defaults — the config file is optional.
#[derive(Debug, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    /// Whether `sort` keeps (`copy`) or removes (`move`) the originals.
    pub mode: RelocateMode,
    /// Follow symlinks while walking the source folder.
    pub follow_links: bool,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error("Failed to parse {path}: {source}")]
    Parse { path: PathBuf, source: toml::de::Error },
}

impl AppConfig {
    /// Load config from `~/.config/tagsort/config.toml`.
    /// A missing file gives the defaults; an unreadable or broken one is
    /// logged and also gives the defaults, so config never stops a run.
    pub fn load() -> Self {
        let Some(path) = Self::config_path().filter(|p| p.exists()) else {
            log::debug!("No config file found, using defaults");
            return Self::default();
        };

        Self::read_from(&path).unwrap_or_else(|e| {
            log::warn!("{}. Using defaults.", e);
            Self::default()
        })
    }

    /// Read and parse one config file.
    pub fn read_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Get the config file path.
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", crate::APP_NAME)
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }
}
