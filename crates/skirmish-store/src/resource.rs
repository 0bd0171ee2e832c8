use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use skirmish_core::{EngineError, EngineResult};

/// Named storage for shared handlers (skills, skill handlers, ...).
pub struct Registry<V: ?Sized> {
    kind: &'static str,
    map: RwLock<HashMap<String, Arc<V>>>,
}

impl<V: ?Sized> Registry<V> {
    /// Create an empty registry. `kind` names the entries in error messages.
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            map: RwLock::new(HashMap::new()),
        }
    }

    /// Insert an entry, returning the one it replaced.
    pub fn register(&self, id: impl Into<String>, value: Arc<V>) -> Option<Arc<V>> {
        self.map.write().insert(id.into(), value)
    }

    /// Look up an entry. Absence is an expected case.
    pub fn get(&self, id: &str) -> Option<Arc<V>> {
        self.map.read().get(id).cloned()
    }

    /// Look up an entry that must exist.
    pub fn get_or_err(&self, id: &str) -> EngineResult<Arc<V>> {
        self.get(id).ok_or_else(|| EngineError::missing(self.kind, id))
    }

    /// Remove an entry, returning it if it existed.
    pub fn remove(&self, id: &str) -> Option<Arc<V>> {
        self.map.write().remove(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.map.read().contains_key(id)
    }

    /// Snapshot of every registered entry.
    pub fn values(&self) -> Vec<Arc<V>> {
        self.map.read().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.map.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.read().is_empty()
    }
}
