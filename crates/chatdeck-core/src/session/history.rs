//! The durable collection of sessions plus the current-session pointer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::model::Session;
use crate::timestamp;

/// All sessions, newest first, and the id of the active one.
///
/// Invariants:
/// - a present `current_session_id` names exactly one entry of `sessions`
/// - an empty `sessions` implies an absent `current_session_id`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct History {
    pub sessions: Vec<Session>,
    #[serde(default)]
    pub current_session_id: Option<String>,
}

impl History {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn find(&self, session_id: &str) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id == session_id)
    }

    pub fn position(&self, session_id: &str) -> Option<usize> {
        self.sessions.iter().position(|s| s.id == session_id)
    }

    /// Returns the session the pointer resolves to, if any.
    pub fn current(&self) -> Option<&Session> {
        self.current_session_id
            .as_deref()
            .and_then(|id| self.find(id))
    }

    pub fn current_mut(&mut self) -> Option<&mut Session> {
        let id = self.current_session_id.clone()?;
        self.sessions.iter_mut().find(|s| s.id == id)
    }

    /// Truncates every instant to the millisecond precision of the
    /// encoded form, so the value survives an encode/decode cycle unchanged.
    pub fn truncate_to_millis(&mut self) {
        for session in &mut self.sessions {
            session.created_at = timestamp::truncate(session.created_at);
            session.updated_at = timestamp::truncate(session.updated_at);
            for message in &mut session.messages {
                message.timestamp = timestamp::truncate(message.timestamp);
            }
        }
    }

    /// Aggregate figures over every stored session.
    pub fn stats(&self) -> HistoryStats {
        let total_sessions = self.sessions.len();
        let total_messages: usize = self.sessions.iter().map(|s| s.message_count).sum();
        let oldest_session = self.sessions.iter().map(|s| s.created_at).min();
        let average_messages_per_session = if total_sessions > 0 {
            (total_messages as f64 / total_sessions as f64).round() as usize
        } else {
            0
        };

        HistoryStats {
            total_sessions,
            total_messages,
            oldest_session,
            average_messages_per_session,
        }
    }
}

/// Summary shown by the history panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryStats {
    pub total_sessions: usize,
    pub total_messages: usize,
    pub oldest_session: Option<DateTime<Utc>>,
    pub average_messages_per_session: usize,
}
