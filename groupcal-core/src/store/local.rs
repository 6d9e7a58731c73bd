//! Filesystem document store.
//!
//! One directory per collection, one pretty-printed JSON file per document
//! (`<id>.json`). Suits a single-machine deployment and keeps the data
//! directory inspectable with ordinary tools.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use super::document::{Document, DocumentStore};
use crate::error::{GroupCalError, GroupCalResult};

pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        LocalStore { root: root.into() }
    }

    fn collection_dir(&self, collection: &str) -> PathBuf {
        self.root.join(collection)
    }

    fn document_path(&self, collection: &str, id: &str) -> PathBuf {
        self.collection_dir(collection).join(format!("{id}.json"))
    }

    fn write_document(&self, collection: &str, id: &str, data: &Value) -> GroupCalResult<()> {
        std::fs::create_dir_all(self.collection_dir(collection))?;

        let content = serde_json::to_string_pretty(data)
            .map_err(|e| GroupCalError::Serialization(e.to_string()))?;
        std::fs::write(self.document_path(collection, id), content)?;

        Ok(())
    }
}

fn read_document(path: &Path) -> Option<Document> {
    let id = path.file_stem()?.to_str()?.to_string();
    let content = std::fs::read_to_string(path).ok()?;
    let data = serde_json::from_str(&content).ok()?;

    Some(Document { id, data })
}

#[async_trait]
impl DocumentStore for LocalStore {
    async fn list(&self, collection: &str) -> GroupCalResult<Vec<Document>> {
        let Ok(entries) = std::fs::read_dir(self.collection_dir(collection)) else {
            // A collection nobody has written to yet is simply empty.
            return Ok(Vec::new());
        };

        let documents = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|e| e == "json"))
            .filter_map(|path| read_document(&path))
            .collect();

        Ok(documents)
    }

    async fn get(&self, collection: &str, id: &str) -> GroupCalResult<Option<Document>> {
        let path = self.document_path(collection, id);
        if !path.exists() {
            return Ok(None);
        }

        Ok(read_document(&path))
    }

    async fn add(&self, collection: &str, data: Value) -> GroupCalResult<String> {
        let id = uuid::Uuid::new_v4().to_string();
        self.write_document(collection, &id, &data)?;
        debug!(collection, id, "document added");

        Ok(id)
    }

    async fn put(&self, collection: &str, id: &str, data: Value) -> GroupCalResult<()> {
        self.write_document(collection, id, &data)
    }

    async fn update(&self, collection: &str, id: &str, data: Value) -> GroupCalResult<()> {
        if !self.document_path(collection, id).exists() {
            return Err(GroupCalError::NotFound(format!("{collection}/{id}")));
        }

        self.write_document(collection, id, &data)
    }

    async fn delete(&self, collection: &str, id: &str) -> GroupCalResult<()> {
        let path = self.document_path(collection, id);
        if path.exists() {
            std::fs::remove_file(&path)?;
            debug!(collection, id, "document deleted");
        }

        Ok(())
    }
}
