//! Persistence codec: lossless conversion between [`History`] and its JSON text.
//!
//! The encoded form uses camelCase keys and RFC 3339 millisecond timestamps:
//!
//! ```text
//! {
//!   "sessions": [
//!     { "id": "...", "title": "New Chat", "messages": [
//!         { "id": "...", "text": "hi", "isUser": true, "timestamp": "2024-05-01T10:00:00.123Z" }
//!       ],
//!       "createdAt": "...", "updatedAt": "...", "messageCount": 1 }
//!   ],
//!   "currentSessionId": "..."
//! }
//! ```
//!
//! Decoding type-checks the full shape; a single malformed session or message
//! rejects the whole value.

use std::collections::HashSet;

use serde_json::Value;

use crate::error::{ChatError, Result};
use crate::session::History;

/// Encodes the history as compact JSON.
pub fn encode(history: &History) -> Result<String> {
    Ok(serde_json::to_string(history)?)
}

/// Encodes the history as indented JSON, for artifacts people may open.
pub fn encode_pretty(history: &History) -> Result<String> {
    Ok(serde_json::to_string_pretty(history)?)
}

/// Decodes and validates a history.
///
/// # Errors
///
/// Returns [`ChatError::MalformedStore`] when the text is not JSON, when
/// `sessions` is missing or not an array, when any entry does not match the
/// session/message shape, when session ids repeat, when a session's
/// `messageCount` disagrees with its messages, or when a session was updated
/// before it was created.
///
/// Instants are truncated to milliseconds. A `currentSessionId` that names no
/// session is dropped rather than rejected.
pub fn decode(text: &str) -> Result<History> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| ChatError::malformed(format!("not valid JSON: {e}")))?;

    match value.get("sessions") {
        None => return Err(ChatError::malformed("missing `sessions` field")),
        Some(Value::Array(_)) => {}
        Some(_) => return Err(ChatError::malformed("`sessions` is not an array")),
    }

    let mut history: History = serde_json::from_value(value)
        .map_err(|e| ChatError::malformed(format!("unexpected history shape: {e}")))?;

    history.truncate_to_millis();
    validate(&mut history)?;
    Ok(history)
}

fn validate(history: &mut History) -> Result<()> {
    let mut seen = HashSet::with_capacity(history.sessions.len());
    for session in &history.sessions {
        if !seen.insert(session.id.as_str()) {
            return Err(ChatError::malformed(format!(
                "duplicate session id '{}'",
                session.id
            )));
        }
        if session.message_count != session.messages.len() {
            return Err(ChatError::malformed(format!(
                "session '{}' declares {} messages but holds {}",
                session.id,
                session.message_count,
                session.messages.len()
            )));
        }
        if session.updated_at < session.created_at {
            return Err(ChatError::malformed(format!(
                "session '{}' was updated before it was created",
                session.id
            )));
        }
    }

    if let Some(id) = history.current_session_id.as_deref() {
        if history.find(id).is_none() {
            tracing::warn!("Dropping current session pointer '{}': no such session", id);
            history.current_session_id = None;
        }
    }

    Ok(())
}
