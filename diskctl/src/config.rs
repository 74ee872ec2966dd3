//! Configuration loading (.diskctl.toml)

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Name of the config file looked up from the working directory upwards
pub const CONFIG_FILE: &str = ".diskctl.toml";

/// Find a config file by walking up the directory tree, then checking global config.
///
/// Search order:
/// 1. Current directory and parent directories (walking up to root)
/// 2. Global config at ~/.config/diskctl/
fn find_config_file(filename: &str) -> Option<PathBuf> {
    let start = std::env::current_dir().ok()?;
    if let Some(found) = find_upwards(&start, filename) {
        return Some(found);
    }

    let global_path = dirs::config_dir()?.join("diskctl").join(filename);
    global_path.exists().then_some(global_path)
}

fn find_upwards(start: &Path, filename: &str) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(filename))
        .find(|candidate| candidate.exists())
}

/// Top-level configuration
#[derive(Debug, Default, Deserialize)]
pub struct DiskctlConfig {
    #[serde(default)]
    pub engine: EngineSection,
    #[serde(default)]
    pub console: ConsoleSection,
}

/// Where and how to reach the engine
#[derive(Debug, Deserialize)]
pub struct EngineSection {
    #[serde(default = "default_engine_url")]
    pub url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Console presentation
#[derive(Debug, Deserialize)]
pub struct ConsoleSection {
    /// Colour output when stdout is a terminal
    #[serde(default = "default_colors")]
    pub colors: bool,
}

// Default value functions
fn default_engine_url() -> String {
    "http://localhost:3001".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_colors() -> bool {
    true
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            url: default_engine_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for ConsoleSection {
    fn default() -> Self {
        Self {
            colors: default_colors(),
        }
    }
}

impl EngineSection {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

impl DiskctlConfig {
    /// Load config from .diskctl.toml, falling back to defaults
    pub fn load() -> Result<Self> {
        if let Some(config_path) = find_config_file(CONFIG_FILE) {
            tracing::debug!("Loading config from: {}", config_path.display());
            return Self::load_from_path(&config_path);
        }

        tracing::debug!("No {} found, using defaults", CONFIG_FILE);
        Ok(Self::default())
    }

    /// Load from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: DiskctlConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        Ok(config)
    }

    /// Apply command-line / environment overrides
    pub fn with_engine_url(mut self, url: Option<String>) -> Self {
        if let Some(url) = url {
            self.engine.url = url;
        }
        self
    }

    /// Get the default engine URL (for use elsewhere)
    pub fn default_engine_url() -> String {
        default_engine_url()
    }
}
