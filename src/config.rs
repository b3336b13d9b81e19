//! Configuration file handling.
//!
//! This module handles loading configuration from `.trialtab.toml`
//! files, or from the file named by `TRIALTAB_CONFIG`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = ".trialtab.toml";

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "TRIALTAB_CONFIG";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Results tree scanning.
    #[serde(default)]
    pub scan: ScanConfig,

    /// Default log scorer.
    #[serde(default)]
    pub scorer: ScorerConfig,

    /// Override script lookup and launch.
    #[serde(default)]
    pub plugin: PluginConfig,
}

/// Results tree scanning settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Entry names under the results root that are never tasks.
    #[serde(default = "default_exclude_dirs")]
    pub exclude_dirs: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            exclude_dirs: default_exclude_dirs(),
        }
    }
}

fn default_exclude_dirs() -> Vec<String> {
    vec!["__pycache__".to_string()]
}

/// Default scorer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScorerConfig {
    /// Log file expected inside every trial directory.
    #[serde(default = "default_log_file")]
    pub log_file: String,

    /// Substrings that mark a trial as successful.
    #[serde(default = "default_success_markers")]
    pub success_markers: Vec<String>,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            log_file: default_log_file(),
            success_markers: default_success_markers(),
        }
    }
}

fn default_log_file() -> String {
    "console_log.txt".to_string()
}

fn default_success_markers() -> Vec<String> {
    vec!["ALL TESTS PASSED !#!#".to_string()]
}

/// Override script settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginConfig {
    /// Look for an override script at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Script file name.
    #[serde(default = "default_file_name")]
    pub file_name: String,

    /// Subdirectories checked after the directory itself, in order.
    #[serde(default = "default_search_subdirs")]
    pub search_subdirs: Vec<String>,

    /// Program used to run the script. Empty runs the script directly.
    #[serde(default = "default_interpreter")]
    pub interpreter: String,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            file_name: default_file_name(),
            search_subdirs: default_search_subdirs(),
            interpreter: default_interpreter(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_file_name() -> String {
    "tabulate.py".to_string()
}

fn default_search_subdirs() -> Vec<String> {
    vec!["Scripts".to_string(), "scripts".to_string()]
}

fn default_interpreter() -> String {
    "python3".to_string()
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from `dir/.trialtab.toml`.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(DEFAULT_CONFIG_FILE);

        if config_path.is_file() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Path named by `TRIALTAB_CONFIG`, if set and non-empty.
    pub fn env_path() -> Option<PathBuf> {
        std::env::var_os(CONFIG_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
