use std::sync::Arc;

use super::history::{History, HistoryStats};
use super::message::Message;
use super::model::Session;
use crate::codec;
use crate::error::{ChatError, Result};
use crate::slot::HistorySlot;

/// Sole authority for reading and mutating the persisted history.
///
/// `SessionStore` is responsible for:
/// - Creating sessions (newest first) and making them current
/// - Appending messages to the current session
/// - Switching and deleting sessions while keeping the pointer consistent
/// - Clearing and wholesale replacing the persisted history
///
/// Every operation reads the slot, applies its change, and writes the full
/// value back before returning. Nothing is cached between calls, so the slot
/// is always the source of truth.
pub struct SessionStore {
    slot: Arc<dyn HistorySlot>,
}

impl SessionStore {
    /// Creates a store over the given slot.
    pub fn new(slot: Arc<dyn HistorySlot>) -> Self {
        Self { slot }
    }

    /// Returns the persisted history.
    ///
    /// An empty, unreadable, or malformed slot yields an empty history; the
    /// failure is logged and never surfaced.
    pub fn load(&self) -> History {
        let text = match self.slot.load() {
            Ok(Some(text)) => text,
            Ok(None) => return History::empty(),
            Err(e) => {
                tracing::warn!("Failed to read chat history, starting empty: {}", e);
                return History::empty();
            }
        };

        match codec::decode(&text) {
            Ok(history) => history,
            Err(e) => {
                tracing::warn!("Error loading chat history, starting empty: {}", e);
                History::empty()
            }
        }
    }

    fn save(&self, history: &History) -> Result<()> {
        let text = codec::encode(history)?;
        self.slot.save(&text)
    }

    /// Creates an empty session, prepends it, and makes it current.
    pub fn create_session(&self) -> Result<Session> {
        let mut history = self.load();
        let session = Session::new();

        history.sessions.insert(0, session.clone());
        history.current_session_id = Some(session.id.clone());
        self.save(&history)?;

        tracing::debug!("Created session {}", session.id);
        Ok(session)
    }

    /// Returns the session the current pointer resolves to.
    pub fn current_session(&self) -> Option<Session> {
        self.load().current().cloned()
    }

    /// Appends a message to the current session.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::NoActiveSession`] without touching the slot when
    /// no session is current. Callers recover by creating a session.
    pub fn append_message(&self, message: Message) -> Result<Session> {
        let mut history = self.load();
        let session = history
            .current_mut()
            .ok_or(ChatError::NoActiveSession)?;

        session.push_message(message);
        let updated = session.clone();
        self.save(&history)?;

        tracing::debug!(
            "Appended message to session {} ({} messages)",
            updated.id,
            updated.message_count
        );
        Ok(updated)
    }

    /// Makes `session_id` current.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(session))`: The session exists and is now current
    /// - `Ok(None)`: No such session; nothing was written
    pub fn switch_to(&self, session_id: &str) -> Result<Option<Session>> {
        let mut history = self.load();
        let Some(session) = history.find(session_id).cloned() else {
            tracing::debug!("Switch to unknown session {} ignored", session_id);
            return Ok(None);
        };

        history.current_session_id = Some(session.id.clone());
        self.save(&history)?;
        Ok(Some(session))
    }

    /// Removes a session.
    ///
    /// If it was current, the pointer moves to the first remaining session,
    /// or becomes absent when none remain. Deleting an unknown id is a no-op.
    pub fn delete_session(&self, session_id: &str) -> Result<()> {
        let mut history = self.load();
        let Some(index) = history.position(session_id) else {
            return Ok(());
        };

        history.sessions.remove(index);
        if history.current_session_id.as_deref() == Some(session_id) {
            history.current_session_id = history.sessions.first().map(|s| s.id.clone());
        }
        self.save(&history)?;

        tracing::debug!("Deleted session {}", session_id);
        Ok(())
    }

    /// Discards the entire persisted history.
    pub fn clear_all(&self) -> Result<()> {
        self.slot.clear()?;
        tracing::debug!("Cleared chat history");
        Ok(())
    }

    /// Overwrites the persisted history with `history`.
    pub fn replace(&self, history: &History) -> Result<()> {
        self.save(history)
    }

    pub fn session_by_id(&self, session_id: &str) -> Option<Session> {
        self.load().find(session_id).cloned()
    }

    pub fn sessions(&self) -> Vec<Session> {
        self.load().sessions
    }

    pub fn stats(&self) -> HistoryStats {
        self.load().stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::DEFAULT_SESSION_TITLE;
    use crate::slot::MemorySlot;

    fn store() -> (SessionStore, Arc<MemorySlot>) {
        let slot = Arc::new(MemorySlot::new());
        (SessionStore::new(slot.clone()), slot)
    }

    #[test]
    fn test_load_empty_slot() {
        let (store, _) = store();
        assert_eq!(store.load(), History::empty());
        assert!(store.current_session().is_none());
    }

    #[test]
    fn test_load_malformed_slot_degrades_to_empty() {
        let store = SessionStore::new(Arc::new(MemorySlot::with_content("{ broken")));
        assert_eq!(store.load(), History::empty());
    }

    #[test]
    fn test_create_session() {
        let (store, slot) = store();
        let session = store.create_session().unwrap();

        assert_eq!(session.message_count, 0);
        assert_eq!(session.title, DEFAULT_SESSION_TITLE);
        assert_eq!(store.current_session(), Some(session.clone()));
        assert!(slot.snapshot().unwrap().contains(&session.id));
    }

    #[test]
    fn test_create_prepends() {
        let (store, _) = store();
        let a = store.create_session().unwrap();
        let b = store.create_session().unwrap();

        let ids: Vec<String> = store.sessions().into_iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![b.id.clone(), a.id]);
        assert_eq!(store.load().current_session_id, Some(b.id));
    }

    #[test]
    fn test_append_without_session() {
        let (store, slot) = store();
        let err = store.append_message(Message::user("hi")).unwrap_err();

        assert_eq!(err, ChatError::NoActiveSession);
        assert!(slot.snapshot().is_none());
    }

    #[test]
    fn test_append_derives_title_and_count() {
        let (store, _) = store();
        let created = store.create_session().unwrap();

        let updated = store.append_message(Message::user("hi")).unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.title, "hi");
        assert_eq!(updated.message_count, 1);
        assert!(updated.updated_at >= created.updated_at);
        assert_eq!(store.current_session().unwrap(), updated);
    }

    #[test]
    fn test_append_goes_to_current_only() {
        let (store, _) = store();
        let a = store.create_session().unwrap();
        let b = store.create_session().unwrap();

        store.append_message(Message::user("for b")).unwrap();

        assert_eq!(store.session_by_id(&a.id).unwrap().message_count, 0);
        assert_eq!(store.session_by_id(&b.id).unwrap().message_count, 1);
    }

    #[test]
    fn test_switch_to_existing() {
        let (store, _) = store();
        let a = store.create_session().unwrap();
        store.create_session().unwrap();

        let switched = store.switch_to(&a.id).unwrap();

        assert_eq!(switched.map(|s| s.id), Some(a.id.clone()));
        assert_eq!(store.load().current_session_id, Some(a.id));
    }

    #[test]
    fn test_switch_to_unknown_leaves_state() {
        let (store, slot) = store();
        store.create_session().unwrap();
        let before = slot.snapshot();

        assert!(store.switch_to("nope").unwrap().is_none());
        assert_eq!(slot.snapshot(), before);
    }

    #[test]
    fn test_delete_current_moves_pointer_to_first() {
        let (store, _) = store();
        let a = store.create_session().unwrap();
        let b = store.create_session().unwrap();

        store.delete_session(&b.id).unwrap();

        let history = store.load();
        assert_eq!(history.sessions.len(), 1);
        assert_eq!(history.current_session_id, Some(a.id));
    }

    #[test]
    fn test_delete_last_clears_pointer() {
        let (store, _) = store();
        let a = store.create_session().unwrap();

        store.delete_session(&a.id).unwrap();

        let history = store.load();
        assert!(history.sessions.is_empty());
        assert_eq!(history.current_session_id, None);
    }

    #[test]
    fn test_delete_non_current_keeps_pointer() {
        let (store, _) = store();
        let a = store.create_session().unwrap();
        let b = store.create_session().unwrap();

        store.delete_session(&a.id).unwrap();

        assert_eq!(store.load().current_session_id, Some(b.id));
    }

    #[test]
    fn test_delete_unknown_is_noop() {
        let (store, slot) = store();
        store.create_session().unwrap();
        let before = slot.snapshot();

        store.delete_session("missing").unwrap();
        store.delete_session("missing").unwrap();

        assert_eq!(slot.snapshot(), before);
    }

    #[test]
    fn test_deleted_id_not_resolvable() {
        let (store, _) = store();
        let a = store.create_session().unwrap();
        store.create_session().unwrap();

        store.delete_session(&a.id).unwrap();

        assert!(store.switch_to(&a.id).unwrap().is_none());
        assert!(store.session_by_id(&a.id).is_none());
    }

    #[test]
    fn test_clear_all() {
        let (store, slot) = store();
        store.create_session().unwrap();

        store.clear_all().unwrap();

        assert!(slot.snapshot().is_none());
        assert_eq!(store.load(), History::empty());
    }

    #[test]
    fn test_replace_overwrites() {
        let (store, _) = store();
        store.create_session().unwrap();

        let mut imported = History::empty();
        let session = Session::new();
        imported.current_session_id = Some(session.id.clone());
        imported.sessions.push(session);
        store.replace(&imported).unwrap();

        assert_eq!(store.load(), imported);
    }

    #[test]
    fn test_stats() {
        let (store, _) = store();
        store.create_session().unwrap();
        store.append_message(Message::user("one")).unwrap();
        store.append_message(Message::assistant("two")).unwrap();
        store.create_session().unwrap();

        let stats = store.stats();
        assert_eq!(stats.total_sessions, 2);
        assert_eq!(stats.total_messages, 2);
        assert_eq!(stats.average_messages_per_session, 1);
    }
}
