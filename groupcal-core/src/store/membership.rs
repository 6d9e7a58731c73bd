//! Admin membership lookups.
//!
//! Privilege is the existence of a record in the `admins` collection,
//! keyed by the identity string. No list of privileged identities ever
//! lives in client code; the collection is the single source of truth.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::document::DocumentStore;
use crate::error::{GroupCalError, GroupCalResult};

const COLLECTION: &str = "admins";

/// Keyed lookup consumed by the session gate: does an admin record exist
/// for this identity?
#[async_trait]
pub trait MembershipStore: Send + Sync {
    async fn exists(&self, identity: &str) -> GroupCalResult<bool>;
}

/// Admin record stored per identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminRecord {
    pub email: String,
    pub is_admin: bool,
    pub date_added: DateTime<Utc>,
}

/// Membership store backed by the `admins` collection.
///
/// The management operations are operator tooling with direct store
/// access; they run outside the session gate.
pub struct AdminDirectory {
    store: Arc<dyn DocumentStore>,
}

impl AdminDirectory {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        AdminDirectory { store }
    }

    /// Grant admin capability to an identity. Granting twice refreshes the
    /// record's timestamp.
    pub async fn add(&self, identity: &str) -> GroupCalResult<()> {
        let record = AdminRecord {
            email: identity.to_string(),
            is_admin: true,
            date_added: Utc::now(),
        };
        let data = serde_json::to_value(&record)
            .map_err(|e| GroupCalError::Serialization(e.to_string()))?;

        self.store.put(COLLECTION, identity, data).await
    }

    /// Revoke admin capability. Revoking an absent identity is a no-op.
    pub async fn remove(&self, identity: &str) -> GroupCalResult<()> {
        self.store.delete(COLLECTION, identity).await
    }

    /// All privileged identities, sorted.
    pub async fn list(&self) -> GroupCalResult<Vec<String>> {
        let documents = self.store.list(COLLECTION).await?;

        let mut identities: Vec<String> =
            documents.into_iter().map(|document| document.id).collect();
        identities.sort();

        Ok(identities)
    }
}

#[async_trait]
impl MembershipStore for AdminDirectory {
    async fn exists(&self, identity: &str) -> GroupCalResult<bool> {
        Ok(self.store.get(COLLECTION, identity).await?.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn make_directory() -> AdminDirectory {
        AdminDirectory::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_add_then_exists() {
        let directory = make_directory();

        assert!(!directory.exists("admin@example.com").await.unwrap());
        directory.add("admin@example.com").await.unwrap();
        assert!(directory.exists("admin@example.com").await.unwrap());
    }

    #[tokio::test]
    async fn test_remove_revokes() {
        let directory = make_directory();

        directory.add("admin@example.com").await.unwrap();
        directory.remove("admin@example.com").await.unwrap();
        assert!(!directory.exists("admin@example.com").await.unwrap());

        // Revoking again is harmless.
        directory.remove("admin@example.com").await.unwrap();
    }

    #[tokio::test]
    async fn test_list_is_sorted() {
        let directory = make_directory();

        directory.add("zoe@example.com").await.unwrap();
        directory.add("amy@example.com").await.unwrap();

        assert_eq!(
            directory.list().await.unwrap(),
            vec!["amy@example.com", "zoe@example.com"]
        );
    }
}
