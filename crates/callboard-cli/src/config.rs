//! Configuration management for Callboard CLI
//!
//! Stores the backend URL and refresh settings in ~/.config/callboard/config.toml.
//! `CALLBOARD_API_BASE_URL` (environment or `.env`) overrides the stored URL.

use anyhow::{Context, Result};
use callboard::{PollerConfig, UnauthorizedBehavior, DEFAULT_BASE_URL};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

const CONFIG_DIR: &str = "callboard";
const CONFIG_FILE: &str = "config.toml";

/// Environment variable overriding `base_url`
pub const BASE_URL_ENV: &str = "CALLBOARD_API_BASE_URL";

/// CLI Configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Call list refresh interval for `calls watch`
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    /// Wait before re-reading the agent config after a knowledge base upload
    #[serde(default = "default_kb_refresh_delay_ms")]
    pub kb_refresh_delay_ms: u64,
    /// What reads do with a 401
    #[serde(default)]
    pub on_unauthorized: UnauthorizedBehavior,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_poll_interval_secs() -> u64 {
    30
}

fn default_kb_refresh_delay_ms() -> u64 {
    1000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            poll_interval_secs: default_poll_interval_secs(),
            kb_refresh_delay_ms: default_kb_refresh_delay_ms(),
            on_unauthorized: UnauthorizedBehavior::default(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join(CONFIG_DIR);
        Ok(config_dir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }

    /// Load config from file (or defaults), then apply the environment override
    pub fn load() -> Result<Self> {
        let mut config = Self::load_file()?;
        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            config.apply_base_url_override(Some(url));
        }
        Ok(config)
    }

    /// Load config from file without environment overrides
    pub fn load_file() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;

        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).with_context(|| "Failed to parse config file")
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let dir = Self::config_dir()?;
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create config directory {:?}", dir))?;

        let path = Self::config_path()?;
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&path, content)
            .with_context(|| format!("Failed to write config to {:?}", path))?;

        Ok(())
    }

    /// Replace the base URL when a non-empty override is given
    pub fn apply_base_url_override(&mut self, url: Option<String>) {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            self.base_url = url.trim().to_string();
        }
    }

    pub fn set_base_url(&mut self, url: String) {
        self.base_url = url;
    }

    pub fn poller_config(&self) -> PollerConfig {
        PollerConfig {
            interval: Duration::from_secs(self.poll_interval_secs.max(1)),
            ..PollerConfig::default()
        }
    }

    pub fn kb_refresh_delay(&self) -> Duration {
        Duration::from_millis(self.kb_refresh_delay_ms)
    }
}
