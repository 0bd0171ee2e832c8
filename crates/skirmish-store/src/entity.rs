use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use skirmish_core::{EngineError, EngineResult, EntityId};
use tracing::debug;

/// State attached to one connected entity.
pub trait EntityState: Default + Send + Sync {
    /// Called once when the owning entity disconnects, before the state is dropped.
    fn release(&self) {}
}

/// Explicit `EntityId -> state` store.
///
/// State is created on first access and discarded on disconnect. Lookups on
/// hot paths use [`EntityStore::get`]; wiring code that requires the entity
/// to be present uses [`EntityStore::get_or_err`].
pub struct EntityStore<S> {
    entries: RwLock<HashMap<EntityId, Arc<S>>>,
}

impl<S: EntityState> EntityStore<S> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Get the state of an entity, creating it if this is the first access.
    pub fn connect(&self, id: EntityId) -> Arc<S> {
        if let Some(state) = self.entries.read().get(&id) {
            return Arc::clone(state);
        }
        let mut entries = self.entries.write();
        let state = entries.entry(id).or_insert_with(|| {
            debug!("Connected entity {}", id);
            Arc::new(S::default())
        });
        Arc::clone(state)
    }

    /// Get the state of an entity if it is connected.
    pub fn get(&self, id: EntityId) -> Option<Arc<S>> {
        self.entries.read().get(&id).cloned()
    }

    /// Get the state of an entity, failing if it is not connected.
    pub fn get_or_err(&self, id: EntityId) -> EngineResult<Arc<S>> {
        self.get(id)
            .ok_or_else(|| EngineError::missing("entity", id.to_string()))
    }

    /// Discard the state of an entity. Returns `true` if it was connected.
    pub fn disconnect(&self, id: EntityId) -> bool {
        let removed = self.entries.write().remove(&id);
        match removed {
            Some(state) => {
                state.release();
                debug!("Disconnected entity {}", id);
                true
            }
            None => false,
        }
    }

    /// Whether an entity currently has state.
    pub fn contains(&self, id: EntityId) -> bool {
        self.entries.read().contains_key(&id)
    }

    /// Ids of every connected entity.
    pub fn ids(&self) -> Vec<EntityId> {
        self.entries.read().keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl<S: EntityState> Default for EntityStore<S> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[derive(Default)]
    struct Counter {
        hits: AtomicU32,
        released: AtomicU32,
    }

    impl EntityState for Counter {
        fn release(&self) {
            self.released.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_connect_is_lazy_and_shared() {
        let store = EntityStore::<Counter>::new();
        let id = EntityId::new();
        assert!(store.get(id).is_none());

        store.connect(id).hits.fetch_add(1, Ordering::SeqCst);
        store.connect(id).hits.fetch_add(1, Ordering::SeqCst);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(id).unwrap().hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_disconnect_runs_release_once() {
        let store = EntityStore::<Counter>::new();
        let id = EntityId::new();
        let state = store.connect(id);

        assert!(store.disconnect(id));
        assert!(!store.disconnect(id));
        assert_eq!(state.released.load(Ordering::SeqCst), 1);
        assert!(store.is_empty());
    }

    #[test]
    fn test_get_or_err_reports_missing_entity() {
        let store = EntityStore::<Counter>::new();
        let err = store.get_or_err(EntityId::new()).err().unwrap();
        assert!(matches!(err, EngineError::MissingEntry { kind: "entity", .. }));
    }
}
