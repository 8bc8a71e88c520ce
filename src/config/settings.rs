//! Application settings and paths.
//!
//! Settings are read from `settings.json` in the XDG config directory
//! (`~/.config/portprobe` on Linux) or from an explicit file. They are
//! never written back.

use crate::error::{ConfigError, ConfigResult};
use crate::scanner::DEFAULT_CONCURRENCY;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Application directory paths following the XDG Base Directory Specification.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Configuration directory (~/.config/portprobe)
    pub config_dir: PathBuf,
}

impl Paths {
    /// Resolve the platform config directory. Nothing is created on disk.
    pub fn new() -> ConfigResult<Self> {
        let project = ProjectDirs::from("com", "portprobe", "portprobe")
            .ok_or(ConfigError::DirectoryNotFound)?;

        Ok(Self {
            config_dir: project.config_dir().to_path_buf(),
        })
    }

    /// Get the path to the settings file.
    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join("settings.json")
    }
}

/// Scan defaults loaded from disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Maximum number of probes in flight.
    pub concurrency: usize,
    /// Per-port connect timeout in milliseconds.
    pub timeout_ms: u64,
    /// Liveness probe timeout in milliseconds.
    pub liveness_timeout_ms: u64,
    /// Run the liveness probe before scanning.
    pub liveness_check: bool,
    /// Default output format (plain, json or csv).
    pub output_format: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            timeout_ms: 1000,
            liveness_timeout_ms: 1000,
            liveness_check: true,
            output_format: "plain".to_string(),
        }
    }
}

impl AppSettings {
    /// Load settings from the default location, falling back to defaults
    /// when no file exists.
    pub fn load() -> ConfigResult<Self> {
        let file = Paths::new()?.settings_file();

        if !file.exists() {
            debug!(path = %file.display(), "no settings file, using defaults");
            return Ok(Self::default());
        }

        Self::load_from(&file)
    }

    /// Load settings from a specific file, which must exist.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let settings: Self = serde_json::from_str(&content)
            .map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;
        debug!(path = %path.display(), ?settings, "loaded settings");
        Ok(settings)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn liveness_timeout(&self) -> Duration {
        Duration::from_millis(self.liveness_timeout_ms)
    }
}
