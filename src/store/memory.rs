//! In-memory store backed by a sharded concurrent map.

use super::snapshot::{check_version, Snapshot, SnapshotError, SNAPSHOT_VERSION};
use super::{sort_by_creation, Entity, Store, StoreError};
use chrono::Utc;
use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

/// [`Store`] implementation holding entities in a [`DashMap`].
///
/// Entities are cloned on the way in and out, so a reader can never observe
/// a value that is still being built.
pub struct MemoryStore<T: Entity> {
    entries: DashMap<String, T>,
}

impl<T: Entity> MemoryStore<T> {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: Entity> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> Store<T> for MemoryStore<T> {
    fn get(&self, id: &str) -> Result<Option<T>, StoreError> {
        Ok(self.entries.get(id).map(|entry| entry.value().clone()))
    }

    fn get_all(&self) -> Result<Vec<T>, StoreError> {
        Ok(self
            .entries
            .iter()
            .map(|entry| entry.value().clone())
            .collect())
    }

    fn put(&self, id: Option<String>, entity: T) -> Result<T, StoreError> {
        let id = id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let entity = entity.with_id(id.clone());
        self.entries.insert(id, entity.clone());
        Ok(entity)
    }
}

impl<T: Entity + Serialize + DeserializeOwned> MemoryStore<T> {
    /// Capture every entity, oldest first.
    pub fn snapshot(&self) -> Snapshot<T> {
        let mut entries: Vec<T> = self
            .entries
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        sort_by_creation(&mut entries);

        Snapshot {
            version: SNAPSHOT_VERSION,
            id: Uuid::new_v4().to_string(),
            taken_at: Utc::now(),
            entries,
        }
    }

    /// Rebuild a store from a snapshot.
    ///
    /// Fails if the snapshot version is unsupported or if any entity has an
    /// empty or repeated id.
    pub fn restore(snapshot: Snapshot<T>) -> Result<Self, SnapshotError> {
        check_version(snapshot.version)?;

        let entries = DashMap::with_capacity(snapshot.entries.len());
        for (position, entity) in snapshot.entries.into_iter().enumerate() {
            if entity.id().is_empty() {
                return Err(SnapshotError::MissingId(position));
            }
            let id = entity.id().to_string();
            if entries.insert(id.clone(), entity).is_some() {
                return Err(SnapshotError::DuplicateId(id));
            }
        }

        Ok(Self { entries })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Action, Definition, DefinitionSpec, State};
    use std::sync::Arc;

    fn definition(name: &str) -> Definition {
        let spec = DefinitionSpec {
            name: name.to_string(),
            description: None,
            states: vec![State::new("a", "A").initial().into()],
            actions: vec![Action::new("loop", "Loop", ["a"], "a").into()],
        };
        Definition::from_spec("", spec, Utc::now())
    }

    #[test]
    fn put_without_id_generates_one() {
        let store = MemoryStore::new();
        let stored = store.put(None, definition("one")).unwrap();

        assert!(!stored.id.is_empty());
        assert_eq!(store.get(&stored.id).unwrap(), Some(stored));
    }

    #[test]
    fn put_with_empty_id_generates_one() {
        let store = MemoryStore::new();
        let stored = store.put(Some(String::new()), definition("one")).unwrap();

        assert!(!stored.id.is_empty());
    }

    #[test]
    fn put_with_id_uses_it() {
        let store = MemoryStore::new();
        let stored = store
            .put(Some("fixed".to_string()), definition("one"))
            .unwrap();

        assert_eq!(stored.id, "fixed");
        assert!(store.get("fixed").unwrap().is_some());
    }

    #[test]
    fn put_replaces_existing_entry() {
        let store = MemoryStore::new();
        store.put(Some("k".to_string()), definition("first")).unwrap();
        store.put(Some("k".to_string()), definition("second")).unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("k").unwrap().unwrap().name, "second");
    }

    #[test]
    fn get_missing_returns_none() {
        let store: MemoryStore<Definition> = MemoryStore::new();

        assert!(store.get("nope").unwrap().is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn get_all_returns_every_entry() {
        let store = MemoryStore::new();
        for name in ["a", "b", "c"] {
            store.put(None, definition(name)).unwrap();
        }

        assert_eq!(store.get_all().unwrap().len(), 3);
    }

    #[test]
    fn concurrent_puts_are_all_kept() {
        let store = Arc::new(MemoryStore::new());

        std::thread::scope(|scope| {
            for i in 0..8 {
                let store = Arc::clone(&store);
                scope.spawn(move || {
                    for j in 0..25 {
                        store.put(None, definition(&format!("{i}-{j}"))).unwrap();
                    }
                });
            }
        });

        assert_eq!(store.len(), 200);
    }

    #[test]
    fn snapshot_restores_every_entry() {
        let store = MemoryStore::new();
        let a = store.put(None, definition("a")).unwrap();
        let b = store.put(None, definition("b")).unwrap();

        let restored = MemoryStore::restore(store.snapshot()).unwrap();

        assert_eq!(restored.len(), 2);
        assert_eq!(restored.get(&a.id).unwrap(), Some(a));
        assert_eq!(restored.get(&b.id).unwrap(), Some(b));
    }

    #[test]
    fn restore_rejects_unknown_version() {
        let store = MemoryStore::new();
        store.put(None, definition("a")).unwrap();
        let mut snapshot = store.snapshot();
        snapshot.version = SNAPSHOT_VERSION + 1;

        let result = MemoryStore::restore(snapshot);

        assert!(matches!(
            result,
            Err(SnapshotError::UnsupportedVersion { .. })
        ));
    }

    #[test]
    fn restore_rejects_duplicate_ids() {
        let store = MemoryStore::new();
        let a = store.put(None, definition("a")).unwrap();
        let mut snapshot = store.snapshot();
        snapshot.entries.push(a.clone());

        let result = MemoryStore::restore(snapshot);

        assert!(matches!(result, Err(SnapshotError::DuplicateId(id)) if id == a.id));
    }

    #[test]
    fn restore_rejects_missing_ids() {
        let store = MemoryStore::new();
        store.put(None, definition("a")).unwrap();
        let mut snapshot = store.snapshot();
        snapshot.entries.push(definition("no-id"));

        let result = MemoryStore::restore(snapshot);

        assert!(matches!(result, Err(SnapshotError::MissingId(1))));
    }
}
