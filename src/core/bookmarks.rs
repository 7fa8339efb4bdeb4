//! Per-user bookmarks of declarations
//!
//! Bookmarks are the only state kept across sessions. They are stored as one
//! JSON document keyed by user id.

use std::collections::BTreeMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::models::{PollutionDeclaration, PollutionLevel, PollutionType};

/// Storage key of the bookmark document
pub const BOOKMARKS_STORAGE_KEY: &str = "pollution_watch_bookmarks";

/// Snapshot of a bookmarked declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    pub pollution_id: i64,
    pub titre: String,
    #[serde(rename = "type")]
    pub pollution_type: PollutionType,
    pub niveau: PollutionLevel,
    pub saved_at: DateTime<Utc>,
}

impl Bookmark {
    pub fn from_declaration(declaration: &PollutionDeclaration, now: DateTime<Utc>) -> Self {
        Self {
            pollution_id: declaration.id,
            titre: declaration.titre.clone(),
            pollution_type: declaration.pollution_type,
            niveau: declaration.niveau,
            saved_at: now,
        }
    }
}

/// Key-value persistence for the bookmark document
pub trait BookmarkStorage {
    fn load(&self) -> Option<String>;
    fn save(&self, data: &str) -> Result<(), String>;
}

/// In-memory storage, used on the server and in tests
#[derive(Debug, Default)]
pub struct MemoryStorage {
    data: Mutex<Option<String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(data: &str) -> Self {
        Self {
            data: Mutex::new(Some(data.to_string())),
        }
    }
}

impl BookmarkStorage for MemoryStorage {
    fn load(&self) -> Option<String> {
        self.data
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn save(&self, data: &str) -> Result<(), String> {
        *self
            .data
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(data.to_string());
        Ok(())
    }
}

/// Bookmarks of every user who used this browser
#[derive(Debug)]
pub struct Bookmarks<S> {
    storage: S,
    entries: BTreeMap<i64, Vec<Bookmark>>,
}

impl<S: BookmarkStorage> Bookmarks<S> {
    /// Load from storage; a missing or corrupt document starts empty
    pub fn load(storage: S) -> Self {
        let entries = match storage.load() {
            Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!("Discarding unreadable bookmarks: {}", e);
                BTreeMap::new()
            }),
            None => BTreeMap::new(),
        };
        Self { storage, entries }
    }

    fn persist(&self) {
        let result = serde_json::to_string(&self.entries)
            .map_err(|e| e.to_string())
            .and_then(|json| self.storage.save(&json));
        if let Err(e) = result {
            tracing::warn!("Failed to save bookmarks: {}", e);
        }
    }

    pub fn contains(&self, user_id: i64, pollution_id: i64) -> bool {
        self.list(user_id)
            .iter()
            .any(|b| b.pollution_id == pollution_id)
    }

    /// Bookmarks of a user, most recent first
    pub fn list(&self, user_id: i64) -> &[Bookmark] {
        self.entries.get(&user_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn count(&self, user_id: i64) -> usize {
        self.list(user_id).len()
    }

    /// Returns false when already bookmarked
    pub fn add(&mut self, user_id: i64, declaration: &PollutionDeclaration, now: DateTime<Utc>) -> bool {
        if self.contains(user_id, declaration.id) {
            return false;
        }
        self.entries
            .entry(user_id)
            .or_default()
            .insert(0, Bookmark::from_declaration(declaration, now));
        self.persist();
        true
    }

    /// Returns false when the bookmark did not exist
    pub fn remove(&mut self, user_id: i64, pollution_id: i64) -> bool {
        let Some(list) = self.entries.get_mut(&user_id) else {
            return false;
        };
        let before = list.len();
        list.retain(|b| b.pollution_id != pollution_id);
        let removed = list.len() != before;
        if list.is_empty() {
            self.entries.remove(&user_id);
        }
        if removed {
            self.persist();
        }
        removed
    }

    /// Flip the bookmark; returns whether it is now bookmarked
    pub fn toggle(&mut self, user_id: i64, declaration: &PollutionDeclaration, now: DateTime<Utc>) -> bool {
        if self.remove(user_id, declaration.id) {
            false
        } else {
            self.add(user_id, declaration, now)
        }
    }

    pub fn clear(&mut self, user_id: i64) {
        if self.entries.remove(&user_id).is_some() {
            self.persist();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn declaration(id: i64) -> PollutionDeclaration {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "titre": format!("Déclaration {id}"),
            "type": "Chimique",
            "description": "Fuite de solvant",
            "dateObservation": "2024-04-04",
            "niveau": "Élevé",
            "latitude": 45.0,
            "longitude": 4.8
        }))
        .unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 5, 10, 0, 0).unwrap()
    }

    #[test]
    fn test_add_remove_contains() {
        let mut bookmarks = Bookmarks::load(MemoryStorage::new());

        assert!(bookmarks.add(1, &declaration(10), now()));
        assert!(!bookmarks.add(1, &declaration(10), now()));
        assert!(bookmarks.contains(1, 10));
        assert!(!bookmarks.contains(2, 10));

        assert!(bookmarks.remove(1, 10));
        assert!(!bookmarks.remove(1, 10));
        assert_eq!(bookmarks.count(1), 0);
    }

    #[test]
    fn test_toggle_and_order() {
        let mut bookmarks = Bookmarks::load(MemoryStorage::new());

        assert!(bookmarks.toggle(1, &declaration(10), now()));
        assert!(bookmarks.toggle(1, &declaration(11), now()));
        let ids: Vec<i64> = bookmarks.list(1).iter().map(|b| b.pollution_id).collect();
        assert_eq!(ids, vec![11, 10]);

        assert!(!bookmarks.toggle(1, &declaration(10), now()));
        assert_eq!(bookmarks.count(1), 1);
    }

    #[test]
    fn test_persisted_across_loads() {
        let mut bookmarks = Bookmarks::load(MemoryStorage::new());
        bookmarks.add(3, &declaration(10), now());
        bookmarks.add(4, &declaration(12), now());

        let saved = bookmarks.storage.load().unwrap();
        let reloaded = Bookmarks::load(MemoryStorage::with_data(&saved));

        assert!(reloaded.contains(3, 10));
        assert!(reloaded.contains(4, 12));
        assert_eq!(reloaded.list(3)[0].pollution_type, PollutionType::Chimique);
        assert_eq!(reloaded.list(3)[0].saved_at, now());
    }

    #[test]
    fn test_corrupt_storage_loads_empty() {
        let bookmarks = Bookmarks::load(MemoryStorage::with_data("{not json"));
        assert_eq!(bookmarks.count(1), 0);
    }

    #[test]
    fn test_clear_only_affects_one_user() {
        let mut bookmarks = Bookmarks::load(MemoryStorage::new());
        bookmarks.add(1, &declaration(10), now());
        bookmarks.add(2, &declaration(10), now());

        bookmarks.clear(1);

        assert_eq!(bookmarks.count(1), 0);
        assert_eq!(bookmarks.count(2), 1);
    }
}
