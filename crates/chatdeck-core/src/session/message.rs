//! Conversation message type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::timestamp;

/// A single message in a conversation.
///
/// Messages are immutable once created and belong to exactly one session.
/// Ids are UUID v7, so they sort by creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Unique, time-ordered identifier
    pub id: String,
    /// Message body
    pub text: String,
    /// `true` for user turns, `false` for assistant replies
    pub is_user: bool,
    /// Creation instant
    #[serde(with = "crate::timestamp::millis")]
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Creates a user-authored message stamped with the current time.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(text, true)
    }

    /// Creates an assistant reply stamped with the current time.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(text, false)
    }

    fn new(text: impl Into<String>, is_user: bool) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            text: text.into(),
            is_user,
            timestamp: timestamp::now(),
        }
    }
}
