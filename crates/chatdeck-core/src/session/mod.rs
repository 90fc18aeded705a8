//! Session domain module.
//!
//! # Module Structure
//!
//! - `message`: a single conversation turn (`Message`)
//! - `model`: one conversation thread (`Session`) and title derivation
//! - `history`: all sessions plus the current pointer (`History`)
//! - `store`: the read-modify-write authority over persisted history (`SessionStore`)

mod history;
mod message;
mod model;
mod store;

pub use history::{History, HistoryStats};
pub use message::Message;
pub use model::{DEFAULT_SESSION_TITLE, Session, generate_session_title};
pub use store::SessionStore;
