//! Contact work entry store.

use std::sync::Arc;

use chrono::{DateTime, NaiveTime, Utc};
use serde_json::Value;

use super::document::{Document, DocumentStore};
use crate::entry::{ContactWorkEntry, RecurrenceDuration};
use crate::error::{GroupCalError, GroupCalResult};

const COLLECTION: &str = "contact_work";

/// Typed store for contact work entries.
///
/// Assigns ids and audit timestamps, validates records on the way in, and
/// keeps listings ordered by start time. Callers are expected to have
/// passed the session gate before invoking any mutation.
pub struct EntryStore {
    store: Arc<dyn DocumentStore>,
}

impl EntryStore {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        EntryStore { store }
    }

    /// All entries, ordered by start time. Malformed documents are skipped.
    pub async fn list(&self) -> GroupCalResult<Vec<ContactWorkEntry>> {
        let documents = self.store.list(COLLECTION).await?;

        let mut entries: Vec<ContactWorkEntry> =
            documents.into_iter().filter_map(decode_entry).collect();
        entries.sort_by_key(|entry| entry.start_time);

        Ok(entries)
    }

    pub async fn get(&self, id: &str) -> GroupCalResult<ContactWorkEntry> {
        let document = self
            .store
            .get(COLLECTION, id)
            .await?
            .ok_or_else(|| GroupCalError::NotFound(format!("contact work entry '{id}'")))?;

        decode_entry(document)
            .ok_or_else(|| GroupCalError::Storage(format!("malformed entry document '{id}'")))
    }

    /// Persist a new entry. The store assigns the id and audit timestamps.
    pub async fn create(&self, mut entry: ContactWorkEntry) -> GroupCalResult<ContactWorkEntry> {
        validate(&entry)?;

        let now = Utc::now();
        entry.created_at = now;
        entry.updated_at = now;

        entry.id = self.store.add(COLLECTION, encode_entry(&entry)?).await?;
        Ok(entry)
    }

    /// Replace an existing entry, refreshing its update timestamp.
    pub async fn update(&self, mut entry: ContactWorkEntry) -> GroupCalResult<ContactWorkEntry> {
        validate(&entry)?;

        entry.updated_at = Utc::now();
        self.store
            .update(COLLECTION, &entry.id, encode_entry(&entry)?)
            .await?;

        Ok(entry)
    }

    /// Delete a whole series (or a single non-recurring entry).
    pub async fn delete(&self, id: &str) -> GroupCalResult<()> {
        self.store.delete(COLLECTION, id).await
    }

    /// Suppress a single occurrence of a recurring entry.
    ///
    /// The marker is stored at UTC midnight of the occurrence's calendar
    /// date; marking the same date twice is a no-op.
    pub async fn mark_occurrence_deleted(
        &self,
        id: &str,
        occurrence: DateTime<Utc>,
    ) -> GroupCalResult<ContactWorkEntry> {
        let mut entry = self.get(id).await?;

        let date_key = occurrence.date_naive();
        let already_deleted = entry
            .deleted_occurrences
            .iter()
            .any(|marker| marker.date_naive() == date_key);

        if already_deleted {
            return Ok(entry);
        }

        entry
            .deleted_occurrences
            .push(date_key.and_time(NaiveTime::MIN).and_utc());
        self.update(entry).await
    }
}

/// Reject records that would break expansion downstream.
fn validate(entry: &ContactWorkEntry) -> GroupCalResult<()> {
    if entry.end_time <= entry.start_time {
        return Err(GroupCalError::Validation(
            "end time must be after start time".into(),
        ));
    }

    match (entry.is_recurring, &entry.recurring_pattern) {
        (true, None) => {
            return Err(GroupCalError::Validation(
                "recurring entry is missing its recurrence rule".into(),
            ));
        }
        (false, Some(_)) => {
            return Err(GroupCalError::Validation(
                "non-recurring entry carries a recurrence rule".into(),
            ));
        }
        (true, Some(pattern)) => {
            let Some(duration) = pattern.duration else {
                return Err(GroupCalError::Validation(
                    "recurrence rule is missing a duration".into(),
                ));
            };

            if duration == RecurrenceDuration::Custom
                && (pattern.custom_duration.is_none() || pattern.custom_duration_unit.is_none())
            {
                return Err(GroupCalError::Validation(
                    "custom duration requires a count and a unit".into(),
                ));
            }
        }
        (false, None) => {}
    }

    Ok(())
}

/// The id lives on the document, not in its body.
fn encode_entry(entry: &ContactWorkEntry) -> GroupCalResult<Value> {
    let mut data =
        serde_json::to_value(entry).map_err(|e| GroupCalError::Serialization(e.to_string()))?;
    if let Some(object) = data.as_object_mut() {
        object.remove("id");
    }

    Ok(data)
}

fn decode_entry(document: Document) -> Option<ContactWorkEntry> {
    let mut data = document.data;
    data.as_object_mut()?
        .insert("id".to_string(), Value::String(document.id));

    serde_json::from_value(data).ok()
}
