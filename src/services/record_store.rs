// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! The hike record collection and its persistence.
//!
//! The store owns the only mutable copy of the collection. Every mutation
//! rewrites the full collection under [`keys::HIKING_RECORDS`]; if that write
//! fails the in-memory change is undone so memory and storage never diverge.

use crate::db::{keys, LocalStorage, StorageError};
use crate::models::{Coordinates, HikeRecord, HikeStatus, NewHike};
use crate::time_utils::{format_iso_date, timestamp_millis};
use chrono::{DateTime, Utc};

/// In-memory record collection mirrored to local storage.
pub struct RecordStore {
    storage: LocalStorage,
    /// Newest first
    records: Vec<HikeRecord>,
}

impl RecordStore {
    /// Load the persisted collection, seeding example records when there is
    /// nothing usable in storage.
    pub fn load(storage: LocalStorage) -> Self {
        let persisted = match storage.get_item(keys::HIKING_RECORDS) {
            Ok(Some(json)) => match serde_json::from_str::<Vec<HikeRecord>>(&json) {
                Ok(records) => Some(records),
                Err(e) => {
                    tracing::warn!(error = %e, "Persisted records are malformed, reseeding");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read persisted records, reseeding");
                None
            }
        };

        if let Some(records) = persisted {
            tracing::info!(count = records.len(), "Loaded hike records");
            return Self { storage, records };
        }

        let store = Self {
            storage,
            records: seed_records(),
        };
        if let Err(e) = store.persist() {
            tracing::warn!(error = %e, "Failed to persist seed records");
        }
        tracing::info!(count = store.records.len(), "Seeded hike records");
        store
    }

    /// Records in display order (newest first).
    pub fn records(&self) -> &[HikeRecord] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&HikeRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Prepend a record.
    pub fn add(&mut self, record: HikeRecord) -> Result<(), StoreError> {
        if self.get(&record.id).is_some() {
            return Err(StoreError::DuplicateId(record.id));
        }

        self.records.insert(0, record);
        if let Err(e) = self.persist() {
            self.records.remove(0);
            return Err(e);
        }

        tracing::info!(
            id = %self.records[0].id,
            mountain = %self.records[0].mountain_name,
            status = ?self.records[0].status,
            "Added hike record"
        );
        Ok(())
    }

    /// Build a record from the creation form with a fresh id and add it.
    pub fn create(&mut self, hike: NewHike, now: DateTime<Utc>) -> Result<HikeRecord, StoreError> {
        let id = self.next_id(now);
        let record = hike.into_record(id, &format_iso_date(now));
        self.add(record.clone())?;
        Ok(record)
    }

    /// Remove the record with `id`. Returns `false` (without writing) if absent.
    pub fn remove(&mut self, id: &str) -> Result<bool, StoreError> {
        let Some(index) = self.records.iter().position(|r| r.id == id) else {
            return Ok(false);
        };

        let removed = self.records.remove(index);
        if let Err(e) = self.persist() {
            self.records.insert(index, removed);
            return Err(e);
        }

        tracing::info!(id, mountain = %removed.mountain_name, "Removed hike record");
        Ok(true)
    }

    /// Flip COMPLETED <-> WISH. Returns the new status, or `None` if absent.
    pub fn toggle_status(&mut self, id: &str) -> Result<Option<HikeStatus>, StoreError> {
        let Some(record) = self.records.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };

        let previous = record.status;
        record.status = previous.toggled();

        if let Err(e) = self.persist() {
            if let Some(record) = self.records.iter_mut().find(|r| r.id == id) {
                record.status = previous;
            }
            return Err(e);
        }

        let status = previous.toggled();
        tracing::info!(id, ?status, "Toggled hike status");
        Ok(Some(status))
    }

    /// Rewrite the whole collection to storage.
    fn persist(&self) -> Result<(), StoreError> {
        let json = serde_json::to_string(&self.records)?;
        self.storage.set_item(keys::HIKING_RECORDS, &json)?;
        Ok(())
    }

    /// Timestamp-derived id, bumped past any id already in use.
    fn next_id(&self, now: DateTime<Utc>) -> String {
        let mut candidate = timestamp_millis(now);
        while self.get(&candidate.to_string()).is_some() {
            candidate += 1;
        }
        candidate.to_string()
    }
}

/// Example records used when nothing has been persisted yet.
pub fn seed_records() -> Vec<HikeRecord> {
    vec![
        HikeRecord {
            id: "1".to_string(),
            mountain_name: "북한산 (Bukhansan)".to_string(),
            elevation: 836,
            date: "2024-03-15".to_string(),
            description: "백운대 코스로 올라갔는데 정상이 정말 멋졌어요.".to_string(),
            status: HikeStatus::Completed,
            coords: Coordinates {
                lat: 37.6611,
                lng: 126.9922,
            },
            rating: Some(5),
            image: Some("https://picsum.photos/seed/bukhansan/600/400".to_string()),
        },
        HikeRecord {
            id: "2".to_string(),
            mountain_name: "설악산 (Seoraksan)".to_string(),
            elevation: 1708,
            date: "2024-05-10".to_string(),
            description: "공룡능선 도전 예정!".to_string(),
            status: HikeStatus::Wish,
            coords: Coordinates {
                lat: 38.1189,
                lng: 128.4358,
            },
            rating: None,
            image: None,
        },
    ]
}

/// Errors from record store mutations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Duplicate record id: {0}")]
    DuplicateId(String),

    #[error("Failed to persist records: {0}")]
    Storage(#[from] StorageError),

    #[error("Failed to serialize records: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn new_hike(name: &str, status: HikeStatus) -> NewHike {
        NewHike {
            mountain_name: name.to_string(),
            status: Some(status),
            ..Default::default()
        }
    }

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp_millis(1_717_200_000_000).unwrap()
    }

    #[test]
    fn test_load_seeds_and_persists_when_empty() {
        let storage = LocalStorage::new_mock();
        let store = RecordStore::load(storage.clone());

        assert_eq!(store.records(), seed_records().as_slice());
        assert_eq!(store.records()[0].status, HikeStatus::Completed);
        assert_eq!(store.records()[1].status, HikeStatus::Wish);

        let persisted = storage.get_item(keys::HIKING_RECORDS).unwrap().unwrap();
        let parsed: Vec<HikeRecord> = serde_json::from_str(&persisted).unwrap();
        assert_eq!(parsed, seed_records());
    }

    #[test]
    fn test_load_falls_back_to_seed_on_malformed_payload() {
        let storage = LocalStorage::new_mock();
        storage
            .set_item(keys::HIKING_RECORDS, "{not json")
            .unwrap();

        let store = RecordStore::load(storage);
        assert_eq!(store.records(), seed_records().as_slice());
    }

    #[test]
    fn test_load_keeps_persisted_empty_collection() {
        let storage = LocalStorage::new_mock();
        storage.set_item(keys::HIKING_RECORDS, "[]").unwrap();

        let store = RecordStore::load(storage);
        assert!(store.records().is_empty());
    }

    #[test]
    fn test_add_prepends_and_persists() {
        let storage = LocalStorage::new_mock();
        let mut store = RecordStore::load(storage.clone());

        let record = store
            .create(new_hike("관악산", HikeStatus::Wish), now())
            .unwrap();

        assert_eq!(store.records().len(), 3);
        assert_eq!(store.records()[0], record);
        assert_eq!(record.id, "1717200000000");
        assert_eq!(record.date, "2024-06-01");

        let reloaded = RecordStore::load(storage);
        assert_eq!(reloaded.records(), store.records());
    }

    #[test]
    fn test_create_never_reuses_an_id() {
        let mut store = RecordStore::load(LocalStorage::new_mock());
        let a = store.create(new_hike("A", HikeStatus::Wish), now()).unwrap();
        let b = store.create(new_hike("B", HikeStatus::Wish), now()).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_add_rejects_duplicate_id() {
        let mut store = RecordStore::load(LocalStorage::new_mock());
        let duplicate = seed_records().remove(0);

        let err = store.add(duplicate).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateId(id) if id == "1"));
        assert_eq!(store.records().len(), 2);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut store = RecordStore::load(LocalStorage::new_mock());
        assert!(!store.remove("does-not-exist").unwrap());
        assert_eq!(store.records().len(), 2);

        assert!(store.remove("2").unwrap());
        assert_eq!(store.records().len(), 1);
        assert!(store.get("2").is_none());
    }

    #[test]
    fn test_toggle_twice_restores_status() {
        let mut store = RecordStore::load(LocalStorage::new_mock());

        assert_eq!(store.toggle_status("1").unwrap(), Some(HikeStatus::Wish));
        assert_eq!(
            store.toggle_status("1").unwrap(),
            Some(HikeStatus::Completed)
        );
        assert_eq!(store.get("1").unwrap().status, HikeStatus::Completed);

        assert_eq!(store.toggle_status("missing").unwrap(), None);
    }

    #[test]
    fn test_toggle_only_changes_status() {
        let mut store = RecordStore::load(LocalStorage::new_mock());
        let before = store.get("2").unwrap().clone();

        store.toggle_status("2").unwrap();
        let after = store.get("2").unwrap();

        assert_eq!(after.status, HikeStatus::Completed);
        assert_eq!(
            HikeRecord {
                status: before.status,
                ..after.clone()
            },
            before
        );
    }

    #[test]
    fn test_ids_stay_unique_across_mixed_operations() {
        let mut store = RecordStore::load(LocalStorage::new_mock());
        let mut expected: HashSet<String> = ["1", "2"].iter().map(|s| s.to_string()).collect();

        for i in 0..20 {
            let status = if i % 2 == 0 {
                HikeStatus::Completed
            } else {
                HikeStatus::Wish
            };
            let record = store
                .create(new_hike(&format!("Peak {}", i), status), now())
                .unwrap();
            expected.insert(record.id.clone());

            if i % 3 == 0 {
                store.toggle_status(&record.id).unwrap();
            }
            if i % 4 == 0 {
                assert!(store.remove(&record.id).unwrap());
                expected.remove(&record.id);
            }
        }

        let ids: Vec<&str> = store.records().iter().map(|r| r.id.as_str()).collect();
        let unique: HashSet<&str> = ids.iter().copied().collect();
        assert_eq!(ids.len(), unique.len(), "duplicate ids: {:?}", ids);
        assert_eq!(
            unique,
            expected.iter().map(String::as_str).collect::<HashSet<_>>()
        );
    }

    #[test]
    fn test_persist_failure_rolls_back() {
        let dir = tempfile::TempDir::new().unwrap();
        let storage = LocalStorage::open(dir.path()).unwrap();
        let mut store = RecordStore::load(storage);

        // Make the target path a directory so the rename fails.
        let target = dir.path().join("hiking_records.json");
        std::fs::remove_file(&target).unwrap();
        std::fs::create_dir(&target).unwrap();

        let err = store.create(new_hike("관악산", HikeStatus::Wish), now());
        assert!(matches!(err, Err(StoreError::Storage(_))));
        assert_eq!(store.records(), seed_records().as_slice());

        assert!(store.toggle_status("1").is_err());
        assert_eq!(store.get("1").unwrap().status, HikeStatus::Completed);

        assert!(store.remove("2").is_err());
        assert!(store.get("2").is_some());
    }
}
