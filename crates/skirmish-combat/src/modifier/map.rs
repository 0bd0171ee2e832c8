//! Per-entity keyed modifier collection

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use skirmish_core::ModifierId;
use tracing::debug;

use super::entity::EntityModifier;
use super::equipment::Hand;

/// Modifiers of one kind owned by a single entity, keyed by unique id.
///
/// Holds at most one modifier per id. Modifiers live for the entity's
/// in-memory session only.
pub struct ModifierMap<T: EntityModifier + ?Sized> {
    modifiers: RwLock<HashMap<ModifierId, Arc<T>>>,
}

impl<T: EntityModifier + ?Sized> ModifierMap<T> {
    pub fn new() -> Self {
        Self {
            modifiers: RwLock::new(HashMap::new()),
        }
    }

    /// Snapshot of every modifier in the map
    pub fn modifiers(&self) -> Vec<Arc<T>> {
        self.modifiers.read().values().cloned().collect()
    }

    /// Modifiers that count when acting with `hand`
    pub fn isolate_modifiers(&self, hand: Hand) -> Vec<Arc<T>> {
        self.modifiers
            .read()
            .values()
            .filter(|m| hand.is_compatible(m.source(), m.slot()))
            .cloned()
            .collect()
    }

    pub fn get(&self, id: ModifierId) -> Option<Arc<T>> {
        self.modifiers.read().get(&id).cloned()
    }

    pub fn contains(&self, id: ModifierId) -> bool {
        self.modifiers.read().contains_key(&id)
    }

    /// Insert a modifier, returning the one previously stored under the same id.
    ///
    /// The replaced modifier is not released: it is the same modifier.
    pub fn add_modifier(&self, modifier: Arc<T>) -> Option<Arc<T>> {
        self.modifiers.write().insert(modifier.unique_id(), modifier)
    }

    /// Remove a modifier and release it. Removing an absent id is a no-op.
    pub fn remove_modifier(&self, id: ModifierId) -> Option<Arc<T>> {
        let removed = self.modifiers.write().remove(&id);
        if let Some(modifier) = &removed {
            modifier.release();
        }
        removed
    }

    /// Remove and release every modifier whose key equals `key`.
    pub fn remove_modifiers(&self, key: &str) -> usize {
        let removed: Vec<Arc<T>> = {
            let mut modifiers = self.modifiers.write();
            let ids: Vec<ModifierId> = modifiers
                .values()
                .filter(|m| m.key() == key)
                .map(|m| m.unique_id())
                .collect();
            ids.iter().filter_map(|id| modifiers.remove(id)).collect()
        };
        for modifier in &removed {
            modifier.release();
        }
        if !removed.is_empty() {
            debug!("Removed {} modifiers keyed '{}'", removed.len(), key);
        }
        removed.len()
    }

    /// Remove and release every modifier.
    pub fn clear(&self) {
        let drained: Vec<Arc<T>> = self.modifiers.write().drain().map(|(_, m)| m).collect();
        for modifier in drained {
            modifier.release();
        }
    }

    pub fn len(&self) -> usize {
        self.modifiers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.modifiers.read().is_empty()
    }
}

impl<T: EntityModifier + ?Sized> Default for ModifierMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modifier::{EquipmentSlot, ModifierHeader, ModifierSource};
    use crate::state::CombatState;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct Tagged {
        header: ModifierHeader,
        releases: AtomicU32,
    }

    impl Tagged {
        fn new(key: &str, source: ModifierSource, slot: EquipmentSlot) -> Arc<Self> {
            Arc::new(Self {
                header: ModifierHeader::new(key, source, slot),
                releases: AtomicU32::new(0),
            })
        }
    }

    impl EntityModifier for Tagged {
        fn header(&self) -> &ModifierHeader {
            &self.header
        }
        fn register(&self, _state: &CombatState) {}
        fn unregister(&self, _state: &CombatState) {}
        fn release(&self) {
            self.releases.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_add_returns_previous_with_same_id() {
        let map = ModifierMap::<Tagged>::new();
        let first = Tagged::new("sword", ModifierSource::MeleeWeapon, EquipmentSlot::MainHand);
        let again = Arc::new(Tagged {
            header: first.header.clone(),
            releases: AtomicU32::new(0),
        });

        assert!(map.add_modifier(Arc::clone(&first)).is_none());
        let previous = map.add_modifier(again).unwrap();
        assert!(Arc::ptr_eq(&previous, &first));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_remove_twice_releases_once() {
        let map = ModifierMap::<Tagged>::new();
        let m = Tagged::new("ring", ModifierSource::Accessory, EquipmentSlot::Accessory);
        map.add_modifier(Arc::clone(&m));

        assert!(map.remove_modifier(m.unique_id()).is_some());
        assert!(map.remove_modifier(m.unique_id()).is_none());
        assert_eq!(m.releases.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_remove_by_key() {
        let map = ModifierMap::<Tagged>::new();
        let a = Tagged::new("item-1", ModifierSource::Armor, EquipmentSlot::Armor);
        let b = Tagged::new("item-1", ModifierSource::Armor, EquipmentSlot::Armor);
        let c = Tagged::new("item-2", ModifierSource::Armor, EquipmentSlot::Armor);
        for m in [&a, &b, &c] {
            map.add_modifier(Arc::clone(m));
        }

        assert_eq!(map.remove_modifiers("item-1"), 2);
        assert_eq!(map.len(), 1);
        assert!(map.contains(c.unique_id()));
        assert_eq!(a.releases.load(Ordering::SeqCst), 1);
        assert_eq!(c.releases.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_isolate_by_hand() {
        let map = ModifierMap::<Tagged>::new();
        let main = Tagged::new("a", ModifierSource::MeleeWeapon, EquipmentSlot::MainHand);
        let off = Tagged::new("b", ModifierSource::MeleeWeapon, EquipmentSlot::OffHand);
        let aura = Tagged::new("c", ModifierSource::Other, EquipmentSlot::Other);
        for m in [&main, &off, &aura] {
            map.add_modifier(Arc::clone(m));
        }

        let mut isolated: Vec<_> = map
            .isolate_modifiers(Hand::MainHand)
            .iter()
            .map(|m| m.key().to_string())
            .collect();
        isolated.sort();
        assert_eq!(isolated, vec!["a", "c"]);
        assert_eq!(map.isolate_modifiers(Hand::OffHand).len(), 2);
    }
}
