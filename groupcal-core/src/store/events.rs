//! Organizational event store.

use std::sync::Arc;

use serde_json::Value;

use super::document::{Document, DocumentStore};
use crate::error::{GroupCalError, GroupCalResult};
use crate::event::Event;

const COLLECTION: &str = "events";

/// Typed store for organizational events. Callers are expected to have
/// passed the session gate before invoking any mutation.
pub struct EventStore {
    store: Arc<dyn DocumentStore>,
}

impl EventStore {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        EventStore { store }
    }

    /// All events, ordered by start. Malformed documents are skipped.
    pub async fn list(&self) -> GroupCalResult<Vec<Event>> {
        let documents = self.store.list(COLLECTION).await?;

        let mut events: Vec<Event> = documents.into_iter().filter_map(decode_event).collect();
        events.sort_by_key(|event| event.start);

        Ok(events)
    }

    pub async fn get(&self, id: &str) -> GroupCalResult<Event> {
        let document = self
            .store
            .get(COLLECTION, id)
            .await?
            .ok_or_else(|| GroupCalError::NotFound(format!("event '{id}'")))?;

        decode_event(document)
            .ok_or_else(|| GroupCalError::Storage(format!("malformed event document '{id}'")))
    }

    /// Persist a new event. The store assigns the id.
    pub async fn create(&self, mut event: Event) -> GroupCalResult<Event> {
        validate(&event)?;

        event.id = self.store.add(COLLECTION, encode_event(&event)?).await?;
        Ok(event)
    }

    pub async fn update(&self, event: Event) -> GroupCalResult<Event> {
        validate(&event)?;

        self.store
            .update(COLLECTION, &event.id, encode_event(&event)?)
            .await?;

        Ok(event)
    }

    pub async fn delete(&self, id: &str) -> GroupCalResult<()> {
        self.store.delete(COLLECTION, id).await
    }
}

fn validate(event: &Event) -> GroupCalResult<()> {
    if event.end <= event.start {
        return Err(GroupCalError::Validation(
            "end time must be after start time".into(),
        ));
    }

    Ok(())
}

/// The id lives on the document, not in its body.
fn encode_event(event: &Event) -> GroupCalResult<Value> {
    let mut data =
        serde_json::to_value(event).map_err(|e| GroupCalError::Serialization(e.to_string()))?;
    if let Some(object) = data.as_object_mut() {
        object.remove("id");
    }

    Ok(data)
}

fn decode_event(document: Document) -> Option<Event> {
    let mut data = document.data;
    data.as_object_mut()?
        .insert("id".to_string(), Value::String(document.id));

    serde_json::from_value(data).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Group;
    use crate::store::MemoryStore;
    use chrono::{TimeZone, Utc};

    fn make_store() -> EventStore {
        EventStore::new(Arc::new(MemoryStore::new()))
    }

    fn make_event(day: u32) -> Event {
        Event::new(
            "Club night".to_string(),
            Utc.with_ymd_and_hms(2024, 3, day, 18, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 3, day, 20, 0, 0).unwrap(),
            Group::YoungLife,
            "Weekly club".to_string(),
            "Gym hall".to_string(),
            None,
        )
    }

    #[tokio::test]
    async fn test_create_and_list_sorted() {
        let store = make_store();

        let later = store.create(make_event(20)).await.unwrap();
        let earlier = store.create(make_event(5)).await.unwrap();

        let listed = store.list().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, earlier.id);
        assert_eq!(listed[1].id, later.id);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let store = make_store();
        let created = store.create(make_event(5)).await.unwrap();

        let mut changed = created.clone();
        changed.title = "Camp weekend".to_string();
        store.update(changed).await.unwrap();
        assert_eq!(store.get(&created.id).await.unwrap().title, "Camp weekend");

        store.delete(&created.id).await.unwrap();
        assert!(matches!(
            store.get(&created.id).await,
            Err(GroupCalError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_rejects_inverted_times() {
        let store = make_store();
        let mut event = make_event(5);
        event.end = event.start;

        assert!(matches!(
            store.create(event).await,
            Err(GroupCalError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_joint_event_round_trips_groups() {
        let store = make_store();
        let mut event = make_event(5);
        event.group = Group::Joint;
        event.groups = Some(vec![Group::YoungLife, Group::WyldLife]);

        let created = store.create(event).await.unwrap();
        let fetched = store.get(&created.id).await.unwrap();

        assert_eq!(fetched.group, Group::Joint);
        assert_eq!(
            fetched.groups,
            Some(vec![Group::YoungLife, Group::WyldLife])
        );
    }
}
