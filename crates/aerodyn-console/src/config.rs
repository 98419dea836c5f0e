//! Console configuration: defaults, optional TOML file, CLI overrides.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Settings for the console, loadable from
/// `<config_dir>/aerodyn/console.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Base URL of the simulation backend.
    pub endpoint: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// UI tick interval in milliseconds.
    pub tick_ms: u64,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:5000".to_string(),
            timeout_secs: 8,
            tick_ms: 100,
        }
    }
}

impl ConsoleConfig {
    /// Default config file location, if a config directory exists.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("aerodyn").join("console.toml"))
    }

    /// Load configuration. An explicitly given path must exist; the default
    /// location is optional and silently skipped when absent.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(explicit) => {
                let raw = std::fs::read_to_string(explicit).map_err(|e| {
                    anyhow::anyhow!("cannot read config {}: {e}", explicit.display())
                })?;
                Ok(toml::from_str(&raw)?)
            }
            None => match Self::default_path() {
                Some(default) if default.exists() => {
                    let raw = std::fs::read_to_string(&default)?;
                    Ok(toml::from_str(&raw)?)
                }
                _ => Ok(Self::default()),
            },
        }
    }
}
