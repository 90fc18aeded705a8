//! Application layer: wires the session store to a completion gateway.

pub mod history_controller;

pub use history_controller::{HistoryController, HistoryView};
