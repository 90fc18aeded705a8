//! Export and import artifacts on disk.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use chatdeck_core::error::{ChatError, Result};
use chatdeck_core::session::{History, SessionStore};
use chatdeck_core::transfer;
use chrono::NaiveDate;

/// File name for an export made on `date`, e.g. `chat-history-2024-05-01.json`.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("chat-history-{}.json", date.format("%Y-%m-%d"))
}

/// Writes the full history into `dir` and returns the artifact path.
///
/// The directory is created if needed. An existing export from the same day
/// is overwritten.
pub fn export_to_dir(store: &SessionStore, dir: &Path) -> Result<PathBuf> {
    let bytes = transfer::export_bytes(store)?;
    fs::create_dir_all(dir)?;

    let path = dir.join(export_file_name(chrono::Utc::now().date_naive()));
    fs::write(&path, bytes)?;

    tracing::info!("Exported chat history to {}", path.display());
    Ok(path)
}

/// Imports the artifact at `path`, replacing the store's history.
pub fn import_from_file(store: &SessionStore, path: &Path) -> Result<History> {
    let file = File::open(path).map_err(|e| {
        ChatError::invalid_import(format!("Failed to read the file {} ({e})", path.display()))
    })?;
    transfer::import_reader(store, file)
}
