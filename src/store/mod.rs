//! Document stores for events and admin-managed reference data.
//!
//! Both stores follow the same discipline: an `Arc<RwLock<HashMap>>` of
//! records loaded from a JSON file in the data directory, written back
//! after every mutation. Queries are the three shapes the app needs:
//! newest-first listing, `created_by == uid`, and point lookup.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::auth::{random_hex, Identity};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("only the event creator may modify it")]
    NotOwner,
    #[error("name must not be empty")]
    EmptyName,
    #[error("areas require a city")]
    MissingCity,
}

// =============================================================================
// Events
// =============================================================================

/// A published sports meetup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: String,
    pub title: String,
    pub sport: String,
    pub city: String,
    pub area: String,
    /// datetime-local form value, e.g. "2025-01-01T18:00"
    pub date_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub created_by: String,
    pub creator_email: String,
    pub created_at: DateTime<Utc>,
}

/// The user-editable subset of an event (create and edit share this shape;
/// id / created_by / creator_email / created_at are never client-supplied)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventFields {
    pub title: String,
    pub sport: String,
    pub city: String,
    pub area: String,
    pub date_time: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Event store backed by `events.json`
#[derive(Clone)]
pub struct EventStore {
    events: Arc<RwLock<HashMap<String, EventRecord>>>,
    data_dir: PathBuf,
}

impl EventStore {
    pub fn new(data_dir: PathBuf) -> Self {
        let events = Self::load_from_disk(&data_dir);
        Self {
            events: Arc::new(RwLock::new(events)),
            data_dir,
        }
    }

    fn events_file(data_dir: &PathBuf) -> PathBuf {
        data_dir.join("events.json")
    }

    fn load_from_disk(data_dir: &PathBuf) -> HashMap<String, EventRecord> {
        let path = Self::events_file(data_dir);
        if let Ok(content) = fs::read_to_string(&path) {
            if let Ok(events) = serde_json::from_str(&content) {
                return events;
            }
        }
        HashMap::new()
    }

    async fn save_to_disk(&self) {
        let events = self.events.read().await;
        let path = Self::events_file(&self.data_dir);

        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }

        if let Ok(json) = serde_json::to_string_pretty(&*events) {
            let _ = fs::write(path, json);
        }
    }

    fn sort_newest_first(mut list: Vec<EventRecord>) -> Vec<EventRecord> {
        // Tie-break on id so equal timestamps still order deterministically
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        list
    }

    /// All events, newest first
    pub async fn list_recent(&self) -> Vec<EventRecord> {
        let events = self.events.read().await;
        Self::sort_newest_first(events.values().cloned().collect())
    }

    /// Events created by one user, newest first
    pub async fn list_by_creator(&self, user_id: &str) -> Vec<EventRecord> {
        let events = self.events.read().await;
        Self::sort_newest_first(
            events
                .values()
                .filter(|e| e.created_by == user_id)
                .cloned()
                .collect(),
        )
    }

    pub async fn get(&self, event_id: &str) -> Option<EventRecord> {
        let events = self.events.read().await;
        events.get(event_id).cloned()
    }

    /// Create an event, stamping ownership fields from the acting identity
    pub async fn create(&self, fields: EventFields, creator: &Identity) -> EventRecord {
        let record = EventRecord {
            id: random_hex(16),
            title: fields.title,
            sport: fields.sport,
            city: fields.city,
            area: fields.area,
            date_time: fields.date_time,
            image_url: fields.image_url,
            created_by: creator.id.clone(),
            creator_email: creator.email.clone(),
            created_at: Utc::now(),
        };

        let mut events = self.events.write().await;
        events.insert(record.id.clone(), record.clone());
        drop(events);
        self.save_to_disk().await;

        tracing::info!("Created event {} by {}", record.id, record.creator_email);
        record
    }

    /// Update the mutable fields of an event; only the creator may do so
    pub async fn update(
        &self,
        event_id: &str,
        acting_user: &str,
        fields: EventFields,
    ) -> Result<EventRecord, StoreError> {
        let mut events = self.events.write().await;

        let event = events.get_mut(event_id).ok_or(StoreError::NotFound)?;
        if event.created_by != acting_user {
            return Err(StoreError::NotOwner);
        }

        event.title = fields.title;
        event.sport = fields.sport;
        event.city = fields.city;
        event.area = fields.area;
        event.date_time = fields.date_time;
        if fields.image_url.is_some() {
            event.image_url = fields.image_url;
        }

        let result = event.clone();
        drop(events);
        self.save_to_disk().await;
        Ok(result)
    }

    /// Delete an event; only the creator may do so
    pub async fn delete(&self, event_id: &str, acting_user: &str) -> Result<(), StoreError> {
        let mut events = self.events.write().await;

        let event = events.get(event_id).ok_or(StoreError::NotFound)?;
        if event.created_by != acting_user {
            return Err(StoreError::NotOwner);
        }

        events.remove(event_id);
        drop(events);
        self.save_to_disk().await;
        Ok(())
    }
}

// =============================================================================
// Reference data (categories / cities / areas)
// =============================================================================

/// The closed set of admin-managed reference collections. All dispatch is
/// keyed on this enum; collection names are never assembled from strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefKind {
    Categories,
    Cities,
    Areas,
}

impl RefKind {
    pub const ALL: [RefKind; 3] = [RefKind::Categories, RefKind::Cities, RefKind::Areas];

    fn file_name(self) -> &'static str {
        match self {
            RefKind::Categories => "categories.json",
            RefKind::Cities => "cities.json",
            RefKind::Areas => "areas.json",
        }
    }
}

/// One reference record. `city_name` is set only for areas and is a soft
/// reference to a city's name; renaming or deleting a city does not cascade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefItem {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city_name: Option<String>,
}

/// Reference-data store; one JSON file per collection
#[derive(Clone)]
pub struct RefStore {
    collections: Arc<RwLock<HashMap<RefKind, HashMap<String, RefItem>>>>,
    data_dir: PathBuf,
}

impl RefStore {
    pub fn new(data_dir: PathBuf) -> Self {
        let mut collections = HashMap::new();
        for kind in RefKind::ALL {
            collections.insert(kind, Self::load_collection(&data_dir, kind));
        }
        Self {
            collections: Arc::new(RwLock::new(collections)),
            data_dir,
        }
    }

    fn load_collection(data_dir: &PathBuf, kind: RefKind) -> HashMap<String, RefItem> {
        let path = data_dir.join(kind.file_name());
        if let Ok(content) = fs::read_to_string(&path) {
            if let Ok(items) = serde_json::from_str(&content) {
                return items;
            }
        }
        HashMap::new()
    }

    async fn save_collection(&self, kind: RefKind) {
        let collections = self.collections.read().await;
        let Some(items) = collections.get(&kind) else {
            return;
        };
        let path = self.data_dir.join(kind.file_name());

        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }

        if let Ok(json) = serde_json::to_string_pretty(items) {
            let _ = fs::write(path, json);
        }
    }

    /// All items of one collection, ordered by name
    pub async fn list(&self, kind: RefKind) -> Vec<RefItem> {
        let collections = self.collections.read().await;
        let mut items: Vec<RefItem> = collections
            .get(&kind)
            .map(|m| m.values().cloned().collect())
            .unwrap_or_default();
        items.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        items
    }

    /// Areas whose soft city reference equals the given city name
    pub async fn areas_for_city(&self, city_name: &str) -> Vec<RefItem> {
        let mut items = self.list(RefKind::Areas).await;
        items.retain(|a| a.city_name.as_deref() == Some(city_name));
        items
    }

    /// Add a record. Blank names are rejected; duplicates are permitted.
    pub async fn add(
        &self,
        kind: RefKind,
        name: &str,
        city_name: Option<String>,
    ) -> Result<RefItem, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::EmptyName);
        }
        if kind == RefKind::Areas && city_name.as_deref().map_or(true, |c| c.trim().is_empty()) {
            return Err(StoreError::MissingCity);
        }

        let item = RefItem {
            id: random_hex(16),
            name: name.to_string(),
            city_name: if kind == RefKind::Areas {
                city_name.map(|c| c.trim().to_string())
            } else {
                None
            },
        };

        let mut collections = self.collections.write().await;
        collections
            .entry(kind)
            .or_default()
            .insert(item.id.clone(), item.clone());
        drop(collections);
        self.save_collection(kind).await;

        Ok(item)
    }

    pub async fn delete(&self, kind: RefKind, id: &str) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        let removed = collections
            .entry(kind)
            .or_default()
            .remove(id)
            .ok_or(StoreError::NotFound)?;
        drop(collections);
        self.save_collection(kind).await;

        tracing::info!("Deleted {:?} item: {}", kind, removed.name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(id: &str, email: &str) -> Identity {
        Identity {
            id: id.to_string(),
            email: email.to_string(),
        }
    }

    fn fields(title: &str) -> EventFields {
        EventFields {
            title: title.to_string(),
            sport: "Football".to_string(),
            city: "Pune".to_string(),
            area: "Kothrud".to_string(),
            date_time: "2025-01-01T18:00".to_string(),
            image_url: None,
        }
    }

    #[tokio::test]
    async fn listing_is_newest_first() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = EventStore::new(dir.path().to_path_buf());
        let u1 = identity("u1", "u1@example.com");

        let first = store.create(fields("first"), &u1).await;
        let second = store.create(fields("second"), &u1).await;

        let list = store.list_recent().await;
        assert_eq!(list.len(), 2);
        // Newest first: the second-created event leads
        let titles: Vec<&str> = list.iter().map(|e| e.title.as_str()).collect();
        let pos_first = titles.iter().position(|t| *t == "first").expect("first");
        let pos_second = titles.iter().position(|t| *t == "second").expect("second");
        assert!(pos_second < pos_first);
        assert_eq!(first.created_by, "u1");
        assert_eq!(second.creator_email, "u1@example.com");
    }

    #[tokio::test]
    async fn creator_filter_only_returns_own_events() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = EventStore::new(dir.path().to_path_buf());

        store
            .create(fields("mine"), &identity("u1", "u1@example.com"))
            .await;
        store
            .create(fields("theirs"), &identity("u2", "u2@example.com"))
            .await;

        let mine = store.list_by_creator("u1").await;
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].title, "mine");
    }

    #[tokio::test]
    async fn update_rejects_non_owner() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = EventStore::new(dir.path().to_path_buf());

        let event = store
            .create(fields("owned"), &identity("u1", "u1@example.com"))
            .await;

        let err = store
            .update(&event.id, "u2", fields("hijacked"))
            .await
            .expect_err("non-owner update must fail");
        assert!(matches!(err, StoreError::NotOwner));

        // Record unchanged
        let current = store.get(&event.id).await.expect("event");
        assert_eq!(current.title, "owned");
    }

    #[tokio::test]
    async fn update_preserves_ownership_stamps() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = EventStore::new(dir.path().to_path_buf());

        let event = store
            .create(fields("before"), &identity("u1", "u1@example.com"))
            .await;
        let updated = store
            .update(&event.id, "u1", fields("after"))
            .await
            .expect("owner update");

        assert_eq!(updated.title, "after");
        assert_eq!(updated.created_by, event.created_by);
        assert_eq!(updated.creator_email, event.creator_email);
        assert_eq!(updated.created_at, event.created_at);
        assert_eq!(updated.id, event.id);
    }

    #[tokio::test]
    async fn delete_rejects_non_owner() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = EventStore::new(dir.path().to_path_buf());

        let event = store
            .create(fields("keep"), &identity("u1", "u1@example.com"))
            .await;

        assert!(matches!(
            store.delete(&event.id, "u2").await,
            Err(StoreError::NotOwner)
        ));
        assert!(store.get(&event.id).await.is_some());

        store.delete(&event.id, "u1").await.expect("owner delete");
        assert!(store.get(&event.id).await.is_none());
    }

    #[tokio::test]
    async fn events_survive_reload() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = EventStore::new(dir.path().to_path_buf());
        let event = store
            .create(fields("durable"), &identity("u1", "u1@example.com"))
            .await;

        let reloaded = EventStore::new(dir.path().to_path_buf());
        let found = reloaded.get(&event.id).await.expect("event after reload");
        assert_eq!(found.title, "durable");
    }

    #[tokio::test]
    async fn ref_add_list_delete() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = RefStore::new(dir.path().to_path_buf());

        let cricket = store
            .add(RefKind::Categories, "Cricket", None)
            .await
            .expect("add");
        store
            .add(RefKind::Categories, "Football", None)
            .await
            .expect("add");

        let names: Vec<String> = store
            .list(RefKind::Categories)
            .await
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(names, vec!["Cricket", "Football"]);

        store
            .delete(RefKind::Categories, &cricket.id)
            .await
            .expect("delete");
        assert_eq!(store.list(RefKind::Categories).await.len(), 1);
    }

    #[tokio::test]
    async fn blank_names_rejected_duplicates_allowed() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = RefStore::new(dir.path().to_path_buf());

        assert!(matches!(
            store.add(RefKind::Cities, "   ", None).await,
            Err(StoreError::EmptyName)
        ));

        store.add(RefKind::Cities, "Pune", None).await.expect("add");
        store.add(RefKind::Cities, "Pune", None).await.expect("dup add");
        assert_eq!(store.list(RefKind::Cities).await.len(), 2);
    }

    #[tokio::test]
    async fn areas_require_and_filter_by_city() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = RefStore::new(dir.path().to_path_buf());

        assert!(matches!(
            store.add(RefKind::Areas, "Kothrud", None).await,
            Err(StoreError::MissingCity)
        ));

        store
            .add(RefKind::Areas, "Kothrud", Some("Pune".into()))
            .await
            .expect("add");
        store
            .add(RefKind::Areas, "Andheri", Some("Mumbai".into()))
            .await
            .expect("add");

        let pune: Vec<String> = store
            .areas_for_city("Pune")
            .await
            .into_iter()
            .map(|a| a.name)
            .collect();
        assert_eq!(pune, vec!["Kothrud"]);

        assert!(store.areas_for_city("Nagpur").await.is_empty());
    }

    #[tokio::test]
    async fn deleting_city_leaves_areas_untouched() {
        // Soft references: no cascade on city delete
        let dir = tempfile::tempdir().expect("temp dir");
        let store = RefStore::new(dir.path().to_path_buf());

        let pune = store.add(RefKind::Cities, "Pune", None).await.expect("add");
        store
            .add(RefKind::Areas, "Kothrud", Some("Pune".into()))
            .await
            .expect("add");

        store.delete(RefKind::Cities, &pune.id).await.expect("delete");

        assert_eq!(store.areas_for_city("Pune").await.len(), 1);
    }
}
