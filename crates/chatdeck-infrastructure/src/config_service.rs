//! Configuration service implementation.
//!
//! Loads `AppConfig` from `config.toml` (~/.config/chatdeck/config.toml by
//! default) and layers environment overrides on top.

use std::fs;
use std::path::{Path, PathBuf};

use chatdeck_core::config::AppConfig;
use chatdeck_core::error::Result;

use crate::paths::ChatPaths;

/// Overrides `gateway.endpoint`.
pub const ENV_ENDPOINT: &str = "CHATDECK_ENDPOINT";
/// Overrides `gateway.api_key`.
pub const ENV_API_KEY: &str = "CHATDECK_API_KEY";

pub struct ConfigService;

impl ConfigService {
    /// Loads the configuration from `path`.
    ///
    /// A missing or blank file yields the defaults.
    pub fn load_from(path: &Path) -> Result<AppConfig> {
        if !path.exists() {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(AppConfig::default());
        }

        let content = fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(AppConfig::default());
        }

        Ok(toml::from_str(&content)?)
    }

    /// Loads the configuration from the platform config file, then applies
    /// environment overrides.
    pub fn load(explicit_path: Option<&Path>) -> Result<AppConfig> {
        let path = match explicit_path {
            Some(path) => path.to_path_buf(),
            None => ChatPaths::config_file()?,
        };

        let mut config = Self::load_from(&path)?;
        Self::apply_overrides(&mut config, |key| std::env::var(key).ok());
        Ok(config)
    }

    /// Applies overrides from `lookup` (normally the process environment).
    pub fn apply_overrides<F>(config: &mut AppConfig, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(endpoint) = lookup(ENV_ENDPOINT).filter(|v| !v.trim().is_empty()) {
            config.gateway.endpoint = Some(endpoint);
        }
        if let Some(api_key) = lookup(ENV_API_KEY).filter(|v| !v.trim().is_empty()) {
            config.gateway.api_key = Some(api_key);
        }
    }

    /// Resolves where the history file lives for this configuration.
    pub fn history_file(config: &AppConfig) -> Result<PathBuf> {
        match config.storage.history_file.as_deref() {
            Some(path) => Ok(PathBuf::from(path)),
            None => Ok(ChatPaths::history_file()?),
        }
    }
}
