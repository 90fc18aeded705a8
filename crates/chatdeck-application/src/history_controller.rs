//! History controller implementation.
//!
//! This module provides the `HistoryController`, which bridges the pull-based
//! `SessionStore` to a presentation layer that wants to be told about changes.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chatdeck_core::error::{ChatError, Result};
use chatdeck_core::gateway::CompletionGateway;
use chatdeck_core::session::{History, HistoryStats, Message, Session, SessionStore};
use chatdeck_core::transfer;
use tokio::sync::watch;

/// What the presentation layer renders from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HistoryView {
    /// All sessions, newest first
    pub sessions: Vec<Session>,
    /// The session the conversation pane shows
    pub current_session: Option<Session>,
    /// True while a gateway call is outstanding
    pub is_busy: bool,
}

/// Reactive adapter over the session store.
///
/// `HistoryController` is responsible for:
/// - Guaranteeing a current session exists once initialized
/// - Forwarding user turns to the completion gateway, one at a time
/// - Republishing a store-consistent [`HistoryView`] after every mutation
///
/// Views are published on a `tokio::sync::watch` channel; subscribers always
/// see the latest state.
pub struct HistoryController {
    store: Arc<SessionStore>,
    gateway: Arc<dyn CompletionGateway>,
    /// Upper bound on a single gateway call
    timeout: Duration,
    busy: AtomicBool,
    view: watch::Sender<HistoryView>,
}

impl HistoryController {
    /// Loads history and settles on a current session.
    ///
    /// Picks the session the stored pointer resolves to, else the first
    /// stored session (and points the store at it), else a new session.
    pub fn new(
        store: Arc<SessionStore>,
        gateway: Arc<dyn CompletionGateway>,
        timeout: Duration,
    ) -> Result<Self> {
        let (view, _) = watch::channel(HistoryView::default());
        let controller = Self {
            store,
            gateway,
            timeout,
            busy: AtomicBool::new(false),
            view,
        };

        controller.ensure_current_session()?;
        controller.refresh_sessions();
        Ok(controller)
    }

    fn ensure_current_session(&self) -> Result<Session> {
        let history = self.store.load();
        if let Some(session) = history.current() {
            return Ok(session.clone());
        }

        if let Some(first) = history.sessions.first() {
            tracing::debug!("No resolvable current session, selecting {}", first.id);
            if let Some(session) = self.store.switch_to(&first.id)? {
                return Ok(session);
            }
        }

        tracing::debug!("No sessions stored, creating one");
        self.store.create_session()
    }

    /// Returns a receiver that observes every published view.
    pub fn subscribe(&self) -> watch::Receiver<HistoryView> {
        self.view.subscribe()
    }

    /// Returns a copy of the latest view.
    pub fn view(&self) -> HistoryView {
        self.view.borrow().clone()
    }

    pub fn current_session(&self) -> Option<Session> {
        self.view.borrow().current_session.clone()
    }

    pub fn sessions(&self) -> Vec<Session> {
        self.view.borrow().sessions.clone()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    pub fn stats(&self) -> HistoryStats {
        self.store.stats()
    }

    /// Re-reads the store and publishes the result.
    pub fn refresh_sessions(&self) {
        let History {
            sessions,
            current_session_id,
        } = self.store.load();
        let current_session = current_session_id
            .as_deref()
            .and_then(|id| sessions.iter().find(|s| s.id == id))
            .cloned();

        self.view.send_replace(HistoryView {
            sessions,
            current_session,
            is_busy: self.is_busy(),
        });
    }

    /// Starts a new, empty conversation and makes it current.
    pub fn new_session(&self) -> Result<Session> {
        let session = self.store.create_session()?;
        self.refresh_sessions();
        Ok(session)
    }

    /// Switches to `session_id`; `None` for unknown (stale) ids.
    pub fn switch_session(&self, session_id: &str) -> Result<Option<Session>> {
        let session = self.store.switch_to(session_id)?;
        if session.is_some() {
            self.refresh_sessions();
        }
        Ok(session)
    }

    /// Records a message in the current session.
    ///
    /// If the store has no current session (it was cleared behind our back),
    /// a fresh one is created and the message goes there.
    pub fn add_message(&self, message: Message) -> Result<Session> {
        let result = match self.store.append_message(message.clone()) {
            Err(ChatError::NoActiveSession) => {
                tracing::warn!("No active session for message {}, creating one", message.id);
                self.store.create_session()?;
                self.store.append_message(message)
            }
            other => other,
        };
        self.refresh_sessions();
        result
    }

    /// Deletes a session, keeping a current session afterwards.
    pub fn delete_session(&self, session_id: &str) -> Result<()> {
        self.store.delete_session(session_id)?;
        if self.store.current_session().is_none() {
            self.store.create_session()?;
        }
        self.refresh_sessions();
        Ok(())
    }

    /// Discards all history and starts over with one empty session.
    pub fn clear_all(&self) -> Result<Session> {
        self.store.clear_all()?;
        let session = self.store.create_session()?;
        self.refresh_sessions();
        Ok(session)
    }

    /// Encodes the full history as a downloadable artifact.
    pub fn export_bytes(&self) -> Result<Vec<u8>> {
        transfer::export_bytes(&self.store)
    }

    /// Replaces the history with an imported artifact.
    ///
    /// On failure nothing changes and the view is left as it was.
    pub fn import_bytes(&self, bytes: &[u8]) -> Result<History> {
        let history = transfer::import_bytes(&self.store, bytes)?;
        self.reload()?;
        Ok(history)
    }

    /// Re-establishes a current session and republishes.
    ///
    /// Call after the store was replaced through another path, such as an
    /// import straight from a file.
    pub fn reload(&self) -> Result<()> {
        self.ensure_current_session()?;
        self.refresh_sessions();
        Ok(())
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Records a user turn, asks the gateway for a reply, and records it.
    ///
    /// The user message is persisted before the gateway is called and stays
    /// recorded whatever happens next. The gateway gets exactly one attempt,
    /// bounded by the configured timeout.
    ///
    /// # Errors
    ///
    /// - [`ChatError::Busy`] if another turn is in flight
    /// - [`ChatError::Gateway`] if the gateway fails or times out; no
    ///   assistant message is recorded
    pub async fn send_user_turn(&self, text: &str) -> Result<Message> {
        if self.busy.swap(true, Ordering::SeqCst) {
            return Err(ChatError::Busy);
        }
        let _busy = BusyGuard { controller: self };

        self.add_message(Message::user(text))?;

        let reply_text = match tokio::time::timeout(self.timeout, self.gateway.complete(text)).await
        {
            Ok(Ok(reply)) => reply,
            Ok(Err(e)) => {
                tracing::warn!("Error calling completion gateway: {}", e);
                return Err(e);
            }
            Err(_) => {
                tracing::warn!("Completion gateway timed out after {:?}", self.timeout);
                return Err(ChatError::gateway(format!(
                    "no reply within {} seconds",
                    self.timeout.as_secs_f32()
                )));
            }
        };

        let reply = Message::assistant(reply_text);
        self.add_message(reply.clone())?;
        Ok(reply)
    }
}

/// Clears the busy flag and republishes, however the turn ends.
struct BusyGuard<'a> {
    controller: &'a HistoryController,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.controller.busy.store(false, Ordering::SeqCst);
        self.controller.refresh_sessions();
    }
}
