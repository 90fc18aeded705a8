//! Durable slot abstraction for the serialized history.
//!
//! Defines the interface for the single named text slot the history lives in.

use std::sync::Mutex;

use crate::error::{ChatError, Result};

/// A single durable text slot holding the encoded history.
///
/// This trait decouples the session store from the storage mechanism
/// (a file on disk, an in-memory buffer in tests). Writes replace the whole
/// value; there is no append or partial update.
pub trait HistorySlot: Send + Sync {
    /// Reads the slot.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(text))`: The slot holds a value
    /// - `Ok(None)`: Nothing has been persisted (or the slot was cleared)
    /// - `Err(_)`: The slot exists but could not be read
    fn load(&self) -> Result<Option<String>>;

    /// Replaces the slot content with `text`.
    fn save(&self, text: &str) -> Result<()>;

    /// Removes the slot content, as if nothing had ever been persisted.
    fn clear(&self) -> Result<()>;
}

/// In-process slot for tests and embedders that do not need durability.
#[derive(Debug, Default)]
pub struct MemorySlot {
    content: Mutex<Option<String>>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a slot that already holds `text`.
    pub fn with_content(text: impl Into<String>) -> Self {
        Self {
            content: Mutex::new(Some(text.into())),
        }
    }

    /// Returns a copy of the raw slot value.
    pub fn snapshot(&self) -> Option<String> {
        self.content.lock().ok().and_then(|guard| guard.clone())
    }
}

impl HistorySlot for MemorySlot {
    fn load(&self) -> Result<Option<String>> {
        let guard = self
            .content
            .lock()
            .map_err(|e| ChatError::io(format!("memory slot poisoned: {e}")))?;
        Ok(guard.clone())
    }

    fn save(&self, text: &str) -> Result<()> {
        let mut guard = self
            .content
            .lock()
            .map_err(|e| ChatError::io(format!("memory slot poisoned: {e}")))?;
        *guard = Some(text.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut guard = self
            .content
            .lock()
            .map_err(|e| ChatError::io(format!("memory slot poisoned: {e}")))?;
        *guard = None;
        Ok(())
    }
}
