//! Atomic text file operations.
//!
//! Provides a thin layer for safe access to the single history file.

use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};

use chatdeck_core::error::{ChatError, Result};
use chatdeck_core::slot::HistorySlot;

/// A handle to a text file that is only ever replaced whole.
///
/// Provides:
/// - **Atomicity**: Updates are all-or-nothing via tmp file + atomic rename
/// - **Isolation**: An exclusive lock file serializes writers across processes
/// - **Durability**: Explicit fsync before rename
pub struct AtomicTextFile {
    path: PathBuf,
}

impl AtomicTextFile {
    /// Creates a new handle. Nothing is touched on disk until the first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the file.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(text))`: File exists and is not blank
    /// - `Ok(None)`: File doesn't exist or is blank
    /// - `Err`: File exists but could not be read
    pub fn read(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;

        if content.trim().is_empty() {
            return Ok(None);
        }

        Ok(Some(content))
    }

    /// Replaces the file content atomically.
    pub fn write(&self, content: &str) -> Result<()> {
        let _lock = FileLock::acquire(&self.path)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp_path = self.temp_path()?;
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(content.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    /// Deletes the file if it exists.
    pub fn remove(&self) -> Result<()> {
        let _lock = FileLock::acquire(&self.path)?;
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn temp_path(&self) -> Result<PathBuf> {
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| ChatError::io(format!("Path has no file name: {}", self.path.display())))?;

        let tmp_name = format!(".{}.tmp", file_name.to_string_lossy());
        Ok(self.path.with_file_name(tmp_name))
    }
}

/// The history slot backed by one JSON file on disk.
pub struct FileHistorySlot {
    file: AtomicTextFile,
}

impl FileHistorySlot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file: AtomicTextFile::new(path),
        }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

impl HistorySlot for FileHistorySlot {
    fn load(&self) -> Result<Option<String>> {
        self.file.read()
    }

    fn save(&self, text: &str) -> Result<()> {
        self.file.write(text)
    }

    fn clear(&self) -> Result<()> {
        self.file.remove()
    }
}

/// A file lock guard that automatically releases the lock when dropped.
struct FileLock {
    #[allow(dead_code)]
    file: File,
    lock_path: PathBuf,
}

impl FileLock {
    fn acquire(path: &Path) -> Result<Self> {
        let lock_path = path.with_extension("lock");

        if let Some(parent) = lock_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        #[cfg(unix)]
        {
            use fs2::FileExt;
            file.lock_exclusive()
                .map_err(|e| ChatError::io(format!("Failed to acquire lock: {}", e)))?;
        }

        Ok(FileLock { file, lock_path })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        // Unlock happens when the handle closes; removing the file is best effort
        let _ = fs::remove_file(&self.lock_path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_and_read() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicTextFile::new(temp_dir.path().join("history.json"));

        file.write("{\"sessions\":[]}").unwrap();

        assert_eq!(file.read().unwrap().as_deref(), Some("{\"sessions\":[]}"));
    }

    #[test]
    fn test_read_nonexistent_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicTextFile::new(temp_dir.path().join("missing.json"));
        assert!(file.read().unwrap().is_none());
    }

    #[test]
    fn test_blank_file_reads_as_none() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("blank.json");
        fs::write(&path, "  \n").unwrap();

        assert!(AtomicTextFile::new(path).read().unwrap().is_none());
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested/deeper/history.json");
        let file = AtomicTextFile::new(path.clone());

        file.write("x").unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_atomic_write_leaves_no_temp_or_lock() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("history.json");
        let file = AtomicTextFile::new(path.clone());

        file.write("first").unwrap();
        file.write("second").unwrap();

        assert!(!temp_dir.path().join(".history.json.tmp").exists());
        assert!(!temp_dir.path().join("history.lock").exists());
        assert_eq!(fs::read_to_string(path).unwrap(), "second");
    }

    #[test]
    fn test_remove_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicTextFile::new(temp_dir.path().join("history.json"));

        file.write("data").unwrap();
        file.remove().unwrap();
        file.remove().unwrap();

        assert!(file.read().unwrap().is_none());
    }

    #[test]
    fn test_file_slot_implements_history_slot() {
        let temp_dir = TempDir::new().unwrap();
        let slot = FileHistorySlot::new(temp_dir.path().join("chatbot_history.json"));

        assert_eq!(slot.load().unwrap(), None);
        slot.save("{}").unwrap();
        assert_eq!(slot.load().unwrap().as_deref(), Some("{}"));
        slot.clear().unwrap();
        assert_eq!(slot.load().unwrap(), None);
    }
}
