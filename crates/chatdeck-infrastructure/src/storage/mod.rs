//! Storage layer for chatdeck.
//!
//! - `atomic_file`: whole-file replacement with tmp + rename, and the
//!   file-backed `HistorySlot`

pub mod atomic_file;

pub use atomic_file::{AtomicTextFile, FileHistorySlot};
