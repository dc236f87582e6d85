//! # Filesystem-backed document store
//!
//! [`FileDocumentStore`] keeps every collection in memory (through a
//! [`MemoryDocumentStore`], which also serves the live queries) and writes the
//! whole collection back to disk after each successful write. It is used on
//! desktop to retain notes across app restarts.
//!
//! ## Layout
//!
//! ```text
//! <base_dir>/
//! ├── notes.toml          # optional config, see crate::config
//! └── <collection>.json   # JSON array of documents, in insertion order
//! ```

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::document::{DocumentStore, Filter, SnapshotListener};
use crate::error::StoreError;
use crate::memory::{MemoryDocumentStore, MemorySubscription};
use crate::models::Document;

/// Filesystem-backed DocumentStore for desktop persistence.
#[derive(Clone)]
pub struct FileDocumentStore {
    base: PathBuf,
    memory: MemoryDocumentStore,
}

impl FileDocumentStore {
    /// Open `base`, loading every `<collection>.json` file found in it.
    pub fn open(base: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let base = base.into();
        std::fs::create_dir_all(&base)?;

        let memory = MemoryDocumentStore::new();
        for entry in std::fs::read_dir(&base)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(collection) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let documents = read_collection(&path)?;
            tracing::debug!(collection, count = documents.len(), "loaded collection");
            memory.load(collection, documents);
        }

        Ok(Self { base, memory })
    }

    fn collection_path(&self, collection: &str) -> PathBuf {
        self.base.join(format!("{collection}.json"))
    }

    fn persist(&self, collection: &str) -> Result<(), StoreError> {
        self.write_collection(collection, &self.memory.documents(collection))
    }

    fn write_collection(&self, collection: &str, documents: &[Document]) -> Result<(), StoreError> {
        let path = self.collection_path(collection);
        let tmp = path.with_extension("json.tmp");
        let data = serde_json::to_vec_pretty(documents)?;
        std::fs::write(&tmp, data)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }
}

fn read_collection(path: &Path) -> Result<Vec<Document>, StoreError> {
    let data = std::fs::read(path)?;
    if data.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_slice(&data)?)
}

impl DocumentStore for FileDocumentStore {
    type Subscription = MemorySubscription;

    fn subscribe(
        &self,
        collection: &str,
        filter: Filter,
        listener: SnapshotListener,
    ) -> MemorySubscription {
        self.memory.subscribe(collection, filter, listener)
    }

    async fn create(
        &self,
        collection: &str,
        fields: Map<String, Value>,
    ) -> Result<String, StoreError> {
        let id = self.memory.create(collection, fields).await?;
        if let Err(e) = self.persist(collection) {
            tracing::error!("Failed to persist {collection}: {e}");
            self.memory.delete(collection, &id).await?;
            return Err(e);
        }
        Ok(id)
    }

    /// The file is rewritten first, so a failed write leaves the live
    /// queries untouched.
    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let mut remaining = self.memory.documents(collection);
        let before = remaining.len();
        remaining.retain(|d| d.id != id);
        if remaining.len() == before {
            return Ok(());
        }
        if let Err(e) = self.write_collection(collection, &remaining) {
            tracing::error!("Failed to persist {collection}: {e}");
            return Err(e);
        }
        self.memory.delete(collection, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "notes_file_store_{name}_{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    fn fields(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("fields must be an object"),
        }
    }

    #[tokio::test]
    async fn test_file_store_roundtrip() {
        let dir = temp_dir("roundtrip");

        let store = FileDocumentStore::open(&dir).unwrap();
        let keep = store
            .create("notes", fields(json!({ "owner": "alice", "text": "keep" })))
            .await
            .unwrap();
        let gone = store
            .create("notes", fields(json!({ "owner": "alice", "text": "gone" })))
            .await
            .unwrap();
        store.delete("notes", &gone).await.unwrap();

        // Re-open from same directory
        let reopened = FileDocumentStore::open(&dir).unwrap();
        let docs = reopened.memory.documents("notes");
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, keep);
        assert_eq!(docs[0].fields["text"], json!("keep"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_failed_delete_keeps_document() {
        let dir = temp_dir("failed_delete");

        let store = FileDocumentStore::open(&dir).unwrap();
        let id = store
            .create("notes", fields(json!({ "owner": "alice", "text": "stay" })))
            .await
            .unwrap();

        // A directory in place of the temp file blocks the write
        std::fs::create_dir_all(dir.join("notes.json.tmp")).unwrap();
        assert!(store.delete("notes", &id).await.is_err());
        assert_eq!(store.memory.documents("notes").len(), 1);

        let reopened = FileDocumentStore::open(&dir).unwrap();
        assert_eq!(reopened.memory.documents("notes").len(), 1);

        std::fs::remove_dir_all(dir.join("notes.json.tmp")).unwrap();
        store.delete("notes", &id).await.unwrap();
        assert!(store.memory.documents("notes").is_empty());
        assert!(FileDocumentStore::open(&dir).unwrap().memory.documents("notes").is_empty());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_open_ignores_other_files() {
        let dir = temp_dir("other_files");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("notes.toml"), "[store]\n").unwrap();
        std::fs::write(dir.join("notes.json"), "").unwrap();

        let store = FileDocumentStore::open(&dir).unwrap();
        assert!(store.memory.documents("notes").is_empty());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_corrupt_collection_fails_to_open() {
        let dir = temp_dir("corrupt");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("notes.json"), "{ not json").unwrap();

        assert!(matches!(
            FileDocumentStore::open(&dir),
            Err(StoreError::Json(_))
        ));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
