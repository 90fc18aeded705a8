//! Session domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::message::Message;
use crate::timestamp;

/// Title every session carries until its first user message arrives.
pub const DEFAULT_SESSION_TITLE: &str = "New Chat";

/// Number of words kept when deriving a title from the first message.
const TITLE_WORD_LIMIT: usize = 5;

/// One conversation thread with its own message history and title.
///
/// Invariants maintained by [`Session::push_message`]:
/// - `message_count == messages.len()`
/// - `updated_at >= created_at`
/// - the title is derived at most once, from a user-authored first message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Unique, time-ordered identifier
    pub id: String,
    /// Human-readable session title
    pub title: String,
    /// Conversation in insertion order
    pub messages: Vec<Message>,
    #[serde(with = "crate::timestamp::millis")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "crate::timestamp::millis")]
    pub updated_at: DateTime<Utc>,
    pub message_count: usize,
}

impl Session {
    /// Creates an empty session with the default title.
    pub fn new() -> Self {
        let now = timestamp::now();
        Self {
            id: Uuid::now_v7().to_string(),
            title: DEFAULT_SESSION_TITLE.to_string(),
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
            message_count: 0,
        }
    }

    /// Appends a message and refreshes the derived fields.
    ///
    /// `updated_at` never moves backwards, even if the wall clock does.
    pub fn push_message(&mut self, message: Message) {
        let derive_title = self.messages.is_empty() && message.is_user;
        if derive_title {
            self.title = generate_session_title(&message.text);
        }

        self.messages.push(message);
        self.message_count = self.messages.len();
        self.updated_at = timestamp::now().max(self.updated_at);
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Derives a session title from the first user message.
///
/// Keeps the first five space-separated words and appends `...` when the
/// message had more.
pub fn generate_session_title(first_message: &str) -> String {
    let words: Vec<&str> = first_message.split(' ').collect();
    let mut title = words
        .iter()
        .take(TITLE_WORD_LIMIT)
        .copied()
        .collect::<Vec<_>>()
        .join(" ");
    if words.len() > TITLE_WORD_LIMIT {
        title.push_str("...");
    }
    title
}
