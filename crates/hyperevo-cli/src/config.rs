//! Configuration management for the hyperevo CLI.

use anyhow::{Context, Result};
use hyperevo::prelude::{EvolutionConfig, PopulationPlan};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file name looked up in the current and parent directories.
pub const CONFIG_FILE: &str = "hyperevo.toml";

/// Hyperevo project configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub run: RunConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub population: PopulationPlan,
    #[serde(default)]
    pub engine: EvolutionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default = "default_generations")]
    pub generations: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Fixed-width log destination. Empty disables logging.
    #[serde(default = "default_log_path")]
    pub log_path: String,
    /// Optional JSON snapshot of the final state.
    #[serde(default)]
    pub snapshot_path: Option<String>,
}

// Default value functions
fn default_generations() -> u64 { 100 }
fn default_log_path() -> String { "hyperevo_log.csv".to_string() }

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            generations: default_generations(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            log_path: default_log_path(),
            snapshot_path: None,
        }
    }
}

impl Config {
    /// Load config from an explicit path, or from hyperevo.toml in the
    /// current or parent directories, or fall back to defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => find_config_file(),
        };
        match path {
            Some(path) => Self::load_from(&path),
            None => Ok(Config::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    /// Save config to the specified path.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }
}

/// Find hyperevo.toml in current or parent directories.
fn find_config_file() -> Option<PathBuf> {
    let mut dir = std::env::current_dir().ok()?;
    loop {
        let config_path = dir.join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }
        if !dir.pop() {
            break;
        }
    }
    None
}
