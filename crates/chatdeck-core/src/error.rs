//! Error types for chatdeck.

use thiserror::Error;

/// A shared error type for the entire chatdeck workspace.
///
/// Every variant is recoverable: callers return to an interactive state
/// after reporting it, nothing here is meant to abort the process.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChatError {
    /// Persisted history could not be parsed into the expected shape.
    #[error("Malformed history store: {0}")]
    MalformedStore(String),

    /// A message was appended while no session was current.
    #[error("No active session")]
    NoActiveSession,

    /// An import artifact was unreadable or did not match the history shape.
    #[error("Invalid import format: {0}")]
    InvalidImportFormat(String),

    /// The completion gateway failed or timed out.
    #[error("Gateway failure: {0}")]
    Gateway(String),

    /// A user turn was submitted while another one is still in flight.
    #[error("A request is already in progress")]
    Busy,

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ChatError {
    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedStore(message.into())
    }

    pub fn invalid_import(message: impl Into<String>) -> Self {
        Self::InvalidImportFormat(message.into())
    }

    pub fn gateway(message: impl Into<String>) -> Self {
        Self::Gateway(message.into())
    }

    /// Returns true for errors the user should see as a transient notification
    /// rather than a hard failure (gateway trouble, busy).
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Gateway(_) | Self::Busy)
    }
}

impl From<std::io::Error> for ChatError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for ChatError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for ChatError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, ChatError>`.
pub type Result<T> = std::result::Result<T, ChatError>;
