//! Storage-client capability over JSON documents.
//!
//! The typed stores are written against this narrow interface rather than
//! any concrete backend. Collections are flat namespaces of documents; ids
//! are either store-assigned (`add`) or caller-keyed (`put`).

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{GroupCalError, GroupCalResult};

/// A stored document: opaque id plus JSON payload. The id lives on the
/// document, not inside its body.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: String,
    pub data: Value,
}

/// Capability set expected from a document backend.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// List every document in a collection, in unspecified order.
    async fn list(&self, collection: &str) -> GroupCalResult<Vec<Document>>;

    /// Fetch one document by id, `None` if absent.
    async fn get(&self, collection: &str, id: &str) -> GroupCalResult<Option<Document>>;

    /// Insert a document under a store-assigned id; returns the id.
    async fn add(&self, collection: &str, data: Value) -> GroupCalResult<String>;

    /// Insert or replace a document under a caller-chosen id.
    async fn put(&self, collection: &str, id: &str, data: Value) -> GroupCalResult<()>;

    /// Replace an existing document. Errors if the id is absent.
    async fn update(&self, collection: &str, id: &str, data: Value) -> GroupCalResult<()>;

    /// Remove a document. Removing an absent id is not an error.
    async fn delete(&self, collection: &str, id: &str) -> GroupCalResult<()>;
}

/// In-memory document store for tests and ephemeral use.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, HashMap<String, Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_poisoned<T>(_: T) -> GroupCalError {
    GroupCalError::Storage("memory store lock poisoned".into())
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn list(&self, collection: &str) -> GroupCalResult<Vec<Document>> {
        let collections = self.collections.read().map_err(lock_poisoned)?;

        Ok(collections
            .get(collection)
            .map(|documents| {
                documents
                    .iter()
                    .map(|(id, data)| Document {
                        id: id.clone(),
                        data: data.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn get(&self, collection: &str, id: &str) -> GroupCalResult<Option<Document>> {
        let collections = self.collections.read().map_err(lock_poisoned)?;

        Ok(collections
            .get(collection)
            .and_then(|documents| documents.get(id))
            .map(|data| Document {
                id: id.to_string(),
                data: data.clone(),
            }))
    }

    async fn add(&self, collection: &str, data: Value) -> GroupCalResult<String> {
        let id = uuid::Uuid::new_v4().to_string();
        self.put(collection, &id, data).await?;
        Ok(id)
    }

    async fn put(&self, collection: &str, id: &str, data: Value) -> GroupCalResult<()> {
        let mut collections = self.collections.write().map_err(lock_poisoned)?;
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), data);
        Ok(())
    }

    async fn update(&self, collection: &str, id: &str, data: Value) -> GroupCalResult<()> {
        let mut collections = self.collections.write().map_err(lock_poisoned)?;

        let documents = collections
            .get_mut(collection)
            .ok_or_else(|| GroupCalError::NotFound(format!("{collection}/{id}")))?;
        let slot = documents
            .get_mut(id)
            .ok_or_else(|| GroupCalError::NotFound(format!("{collection}/{id}")))?;

        *slot = data;
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> GroupCalResult<()> {
        let mut collections = self.collections.write().map_err(lock_poisoned)?;
        if let Some(documents) = collections.get_mut(collection) {
            documents.remove(id);
        }
        Ok(())
    }
}
