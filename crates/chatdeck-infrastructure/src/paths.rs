//! Unified path management for chatdeck files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/chatdeck/            # Config directory
//! └── config.toml                # Application configuration
//!
//! ~/.local/share/chatdeck/       # Data directory
//! └── chatbot_history.json       # The persisted history slot
//! ```

use std::path::PathBuf;

const APP_DIR_NAME: &str = "chatdeck";
const CONFIG_FILE_NAME: &str = "config.toml";
const HISTORY_FILE_NAME: &str = "chatbot_history.json";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for chatdeck_core::ChatError {
    fn from(err: PathError) -> Self {
        chatdeck_core::ChatError::config(err.to_string())
    }
}

/// Platform-specific locations (XDG on Linux, the usual places elsewhere).
pub struct ChatPaths;

impl ChatPaths {
    /// Returns the chatdeck configuration directory (e.g. `~/.config/chatdeck/`).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the chatdeck data directory (e.g. `~/.local/share/chatdeck/`).
    pub fn data_dir() -> Result<PathBuf, PathError> {
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the path to the main configuration file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Returns the default location of the persisted history.
    pub fn history_file() -> Result<PathBuf, PathError> {
        Ok(Self::data_dir()?.join(HISTORY_FILE_NAME))
    }
}
