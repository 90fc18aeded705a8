//! History export and import.
//!
//! Export is a pure read of the store. Import replaces the persisted history
//! wholesale, and only after the artifact has been fully validated; any
//! failure leaves the store untouched.

use std::io::Read;

use crate::codec;
use crate::error::{ChatError, Result};
use crate::session::{History, SessionStore};

/// Message shown to the user when an artifact cannot be imported.
const IMPORT_FAILURE_HINT: &str = "Failed to import chat history. Please check the file format.";

/// Encodes the full current history as an indented JSON artifact.
pub fn export_bytes(store: &SessionStore) -> Result<Vec<u8>> {
    let history = store.load();
    let text = codec::encode_pretty(&history)?;
    Ok(text.into_bytes())
}

/// Validates `bytes` as an encoded history and overwrites the store with it.
///
/// # Errors
///
/// Returns [`ChatError::InvalidImportFormat`] if the bytes are not UTF-8, not
/// JSON, lack a `sessions` array, or contain any malformed session or message.
pub fn import_bytes(store: &SessionStore, bytes: &[u8]) -> Result<History> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| ChatError::invalid_import(format!("{IMPORT_FAILURE_HINT} ({e})")))?;

    let history = codec::decode(text).map_err(|e| {
        tracing::warn!("Error importing chat history: {}", e);
        let detail = match e {
            ChatError::MalformedStore(detail) => detail,
            other => other.to_string(),
        };
        ChatError::invalid_import(format!("{IMPORT_FAILURE_HINT} ({detail})"))
    })?;

    store.replace(&history)?;
    tracing::info!("Imported {} sessions", history.sessions.len());
    Ok(history)
}

/// Reads an artifact from `reader` and imports it.
pub fn import_reader<R: Read>(store: &SessionStore, mut reader: R) -> Result<History> {
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| ChatError::invalid_import(format!("Failed to read the file ({e})")))?;
    import_bytes(store, &bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Message;
    use crate::slot::MemorySlot;
    use std::sync::Arc;

    fn populated_store() -> SessionStore {
        let store = SessionStore::new(Arc::new(MemorySlot::new()));
        store.create_session().unwrap();
        store.append_message(Message::user("first chat")).unwrap();
        store.create_session().unwrap();
        store.append_message(Message::user("second chat")).unwrap();
        store.append_message(Message::assistant("reply")).unwrap();
        store
    }

    #[test]
    fn test_export_is_pure_read() {
        let store = populated_store();
        let before = store.load();

        let bytes = export_bytes(&store).unwrap();

        assert_eq!(store.load(), before);
        assert!(String::from_utf8(bytes).unwrap().contains("\"sessions\""));
    }

    #[test]
    fn test_export_then_import_into_fresh_store() {
        let source = populated_store();
        let bytes = export_bytes(&source).unwrap();

        let target = SessionStore::new(Arc::new(MemorySlot::new()));
        target.create_session().unwrap();
        let imported = import_bytes(&target, &bytes).unwrap();

        assert_eq!(imported, source.load());
        assert_eq!(target.load(), source.load());
    }

    #[test]
    fn test_import_missing_sessions_leaves_store() {
        let store = populated_store();
        let before = store.load();

        let err = import_bytes(&store, br#"{"currentSessionId": "x"}"#).unwrap_err();

        assert!(matches!(err, ChatError::InvalidImportFormat(_)));
        assert!(err.to_string().contains("missing `sessions` field"));
        assert_eq!(store.load(), before);
    }

    #[test]
    fn test_import_non_json_rejected() {
        let store = populated_store();
        let before = store.load();

        assert!(import_bytes(&store, b"<html></html>").is_err());
        assert!(import_bytes(&store, &[0xff, 0xfe, 0x00]).is_err());
        assert_eq!(store.load(), before);
    }

    #[test]
    fn test_import_rejects_session_updated_before_created() {
        let store = populated_store();
        let before = store.load();

        let mut value: serde_json::Value =
            serde_json::from_slice(&export_bytes(&store).unwrap()).unwrap();
        value["sessions"][0]["createdAt"] = serde_json::Value::from("2030-01-01T00:00:00.000Z");

        let err = import_bytes(&store, value.to_string().as_bytes()).unwrap_err();

        assert!(matches!(err, ChatError::InvalidImportFormat(_)));
        assert!(err.to_string().contains("updated before it was created"));
        assert_eq!(store.load(), before);
    }

    #[test]
    fn test_import_is_all_or_nothing() {
        let store = populated_store();
        let before = store.load();

        let mut value: serde_json::Value =
            serde_json::from_slice(&export_bytes(&store).unwrap()).unwrap();
        value["sessions"][1]["createdAt"] = serde_json::Value::from(42);

        let err = import_bytes(&store, value.to_string().as_bytes()).unwrap_err();

        assert!(matches!(err, ChatError::InvalidImportFormat(_)));
        assert_eq!(store.load(), before);
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("disk on fire"))
        }
    }

    #[test]
    fn test_import_unreadable_stream() {
        let store = populated_store();
        let err = import_reader(&store, FailingReader).unwrap_err();
        assert!(matches!(err, ChatError::InvalidImportFormat(_)));
    }

    #[test]
    fn test_import_reader_success() {
        let source = populated_store();
        let bytes = export_bytes(&source).unwrap();
        let target = SessionStore::new(Arc::new(MemorySlot::new()));

        import_reader(&target, bytes.as_slice()).unwrap();

        assert_eq!(target.load(), source.load());
    }
}
