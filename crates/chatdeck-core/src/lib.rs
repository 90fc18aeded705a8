pub mod codec;
pub mod config;
pub mod error;
pub mod gateway;
pub mod session;
pub mod slot;
pub mod timestamp;
pub mod transfer;

// Re-export common types
pub use error::{ChatError, Result};
pub use gateway::CompletionGateway;
pub use session::{History, Message, Session, SessionStore};
pub use slot::{HistorySlot, MemorySlot};
