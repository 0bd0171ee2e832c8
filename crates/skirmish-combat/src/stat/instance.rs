//! Numeric modifiers and two-pass value aggregation
//!
//! Flat modifiers are summed onto the base first. Relative modifiers then
//! scale the running total by `1 + value / 100` each.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use skirmish_core::ModifierId;

use crate::modifier::{EntityModifier, Hand, ModifierType};

/// A single numeric contribution to a value.
pub trait InstanceModifier: EntityModifier {
    fn value(&self) -> f64;

    fn modifier_type(&self) -> ModifierType;
}

/// Apply the flat pass then the relative pass over `modifiers`.
///
/// Shared by stat totals and skill parameter resolution so both follow the
/// same rules.
pub fn aggregate<'a, T, I>(
    mut base: f64,
    modifiers: I,
    filter: impl Fn(&T) -> bool,
    value_of: impl Fn(&T) -> f64,
) -> f64
where
    T: InstanceModifier + ?Sized + 'a,
    I: IntoIterator<Item = &'a T> + Clone,
{
    for m in modifiers.clone() {
        if m.modifier_type() == ModifierType::Flat && filter(m) {
            base += value_of(m);
        }
    }
    for m in modifiers {
        if m.modifier_type() == ModifierType::Relative && filter(m) {
            base *= 1.0 + value_of(m) / 100.0;
        }
    }
    base
}

/// The modifiers applied to one value of one entity.
///
/// Reads take a snapshot, so totals can be computed while other callers
/// register or remove modifiers.
pub struct ModifiedInstance<T: InstanceModifier + ?Sized> {
    modifiers: RwLock<HashMap<ModifierId, Arc<T>>>,
}

impl<T: InstanceModifier + ?Sized> ModifiedInstance<T> {
    pub fn new() -> Self {
        Self {
            modifiers: RwLock::new(HashMap::new()),
        }
    }

    /// Total of `base` and every modifier compatible with the main hand.
    pub fn total(&self, base: f64) -> f64 {
        self.filtered_total_with(base, main_hand_filter, |m| m.value())
    }

    /// Like [`total`](Self::total), with `value_of` substituting the value
    /// each modifier contributes (e.g. to dampen debuffs).
    pub fn total_with(&self, base: f64, value_of: impl Fn(&T) -> f64) -> f64 {
        self.filtered_total_with(base, main_hand_filter, value_of)
    }

    pub fn filtered_total(&self, base: f64, filter: impl Fn(&T) -> bool) -> f64 {
        self.filtered_total_with(base, filter, |m| m.value())
    }

    pub fn filtered_total_with(
        &self,
        base: f64,
        filter: impl Fn(&T) -> bool,
        value_of: impl Fn(&T) -> f64,
    ) -> f64 {
        let snapshot = self.modifiers();
        aggregate(base, snapshot.iter().map(|m| m.as_ref()), filter, value_of)
    }

    pub fn modifier(&self, id: ModifierId) -> Option<Arc<T>> {
        self.modifiers.read().get(&id).cloned()
    }

    /// Store a modifier. Registering an id that is already present replaces
    /// the stored modifier without releasing it.
    pub fn register_modifier(&self, modifier: Arc<T>) -> Option<Arc<T>> {
        self.modifiers.write().insert(modifier.unique_id(), modifier)
    }

    /// Remove and release a modifier. Removing an absent id is a no-op.
    pub fn remove_modifier(&self, id: ModifierId) -> Option<Arc<T>> {
        let removed = self.modifiers.write().remove(&id);
        if let Some(modifier) = &removed {
            modifier.release();
        }
        removed
    }

    /// Remove and release every modifier whose key matches.
    pub fn remove_if(&self, condition: impl Fn(&str) -> bool) -> usize {
        let removed: Vec<Arc<T>> = {
            let mut modifiers = self.modifiers.write();
            let ids: Vec<ModifierId> = modifiers
                .values()
                .filter(|m| condition(m.key()))
                .map(|m| m.unique_id())
                .collect();
            ids.iter().filter_map(|id| modifiers.remove(id)).collect()
        };
        for modifier in &removed {
            modifier.release();
        }
        removed.len()
    }

    /// Remove and release every modifier.
    pub fn clear(&self) {
        self.remove_if(|_| true);
    }

    pub fn modifiers(&self) -> Vec<Arc<T>> {
        self.modifiers.read().values().cloned().collect()
    }

    pub fn ids(&self) -> Vec<ModifierId> {
        self.modifiers.read().keys().copied().collect()
    }

    pub fn contains(&self, id: ModifierId) -> bool {
        self.modifiers.read().contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.modifiers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.modifiers.read().is_empty()
    }
}

impl<T: InstanceModifier + ?Sized> Default for ModifiedInstance<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn main_hand_filter<T: InstanceModifier + ?Sized>(m: &T) -> bool {
    Hand::MainHand.is_compatible(m.source(), m.slot())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modifier::{EquipmentSlot, ModifierHeader, ModifierSource};
    use crate::stat::StatModifier;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn flat(value: f64) -> Arc<StatModifier> {
        Arc::new(StatModifier::new(
            "attack",
            ModifierHeader::other("test"),
            value,
            ModifierType::Flat,
        ))
    }

    fn relative(value: f64) -> Arc<StatModifier> {
        Arc::new(StatModifier::new(
            "attack",
            ModifierHeader::other("test"),
            value,
            ModifierType::Relative,
        ))
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_flat_modifiers_sum() {
        let instance = ModifiedInstance::new();
        for v in [3.0, -1.5, 10.0, 0.25] {
            instance.register_modifier(flat(v));
        }
        assert!(approx(instance.total(20.0), 20.0 + 3.0 - 1.5 + 10.0 + 0.25));
    }

    #[test]
    fn test_single_relative_scales() {
        let instance = ModifiedInstance::new();
        instance.register_modifier(relative(25.0));
        assert!(approx(instance.total(80.0), 100.0));
    }

    #[test]
    fn test_flat_applies_before_relative() {
        let instance = ModifiedInstance::new();
        instance.register_modifier(relative(50.0));
        instance.register_modifier(flat(10.0));
        assert!(approx(instance.total(10.0), 30.0));
    }

    #[test]
    fn test_registration_order_does_not_matter() {
        let mods = [flat(4.0), relative(10.0), flat(-2.0), relative(-30.0)];

        let forward = ModifiedInstance::new();
        for m in &mods {
            forward.register_modifier(Arc::clone(m));
        }
        let backward = ModifiedInstance::new();
        for m in mods.iter().rev() {
            backward.register_modifier(Arc::clone(m));
        }
        assert!(approx(forward.total(50.0), backward.total(50.0)));
    }

    #[test]
    fn test_default_filter_isolates_main_hand() {
        let instance = ModifiedInstance::new();
        let off_hand = StatModifier::new(
            "attack",
            ModifierHeader::new("dagger", ModifierSource::MeleeWeapon, EquipmentSlot::OffHand),
            7.0,
            ModifierType::Flat,
        );
        instance.register_modifier(Arc::new(off_hand));
        instance.register_modifier(flat(1.0));

        assert!(approx(instance.total(0.0), 1.0));
        let off =
            instance.filtered_total(0.0, |m| Hand::OffHand.is_compatible(m.source(), m.slot()));
        assert!(approx(off, 8.0));
    }

    #[test]
    fn test_value_substitution_leaves_stored_modifier() {
        let instance = ModifiedInstance::new();
        let debuff = flat(-10.0);
        instance.register_modifier(Arc::clone(&debuff));

        let dampened = instance.total_with(100.0, |m| {
            if m.value() < 0.0 { m.value() / 2.0 } else { m.value() }
        });
        assert!(approx(dampened, 95.0));
        assert!(approx(instance.modifier(debuff.unique_id()).unwrap().value(), -10.0));
    }

    struct Releasing {
        header: ModifierHeader,
        releases: AtomicU32,
    }

    impl EntityModifier for Releasing {
        fn header(&self) -> &ModifierHeader {
            &self.header
        }
        fn register(&self, _state: &crate::state::CombatState) {}
        fn unregister(&self, _state: &crate::state::CombatState) {}
        fn release(&self) {
            self.releases.fetch_add(1, Ordering::SeqCst);
        }
    }

    impl InstanceModifier for Releasing {
        fn value(&self) -> f64 {
            1.0
        }
        fn modifier_type(&self) -> ModifierType {
            ModifierType::Flat
        }
    }

    #[test]
    fn test_remove_is_idempotent_and_releases_once() {
        let instance = ModifiedInstance::new();
        let m = Arc::new(Releasing {
            header: ModifierHeader::other("buff"),
            releases: AtomicU32::new(0),
        });
        instance.register_modifier(Arc::clone(&m));
        instance.register_modifier(Arc::clone(&m));
        assert_eq!(instance.len(), 1);

        assert!(instance.remove_modifier(m.unique_id()).is_some());
        assert!(instance.remove_modifier(m.unique_id()).is_none());
        assert_eq!(m.releases.load(Ordering::SeqCst), 1);
        assert!(instance.is_empty());
    }

    #[test]
    fn test_remove_if_matches_key() {
        let instance = ModifiedInstance::new();
        let item = |key: &str| {
            Arc::new(StatModifier::new(
                "attack",
                ModifierHeader::other(key),
                1.0,
                ModifierType::Flat,
            ))
        };
        let a = item("item:1");
        let b = item("item:2");
        instance.register_modifier(Arc::clone(&a));
        instance.register_modifier(Arc::clone(&b));

        assert_eq!(instance.remove_if(|key| key == "item:1"), 1);
        assert!(!instance.contains(a.unique_id()));
        assert_eq!(instance.ids(), vec![b.unique_id()]);
    }

    #[test]
    fn test_totals_stay_consistent_under_concurrent_updates() {
        let instance = ModifiedInstance::new();
        let permanent = flat(10.0);
        instance.register_modifier(Arc::clone(&permanent));

        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    for _ in 0..200 {
                        let buff = flat(5.0);
                        instance.register_modifier(Arc::clone(&buff));
                        instance.remove_modifier(buff.unique_id());
                    }
                });
            }
            s.spawn(|| {
                for _ in 0..500 {
                    let total = instance.total(0.0);
                    // the permanent modifier plus up to one buff per writer
                    assert!(total >= 10.0 && total <= 30.0, "total {}", total);
                    assert_eq!((total - 10.0) % 5.0, 0.0);
                }
            });
        });

        assert_eq!(instance.len(), 1);
        assert!(approx(instance.total(0.0), 10.0));
        assert!(instance.contains(permanent.unique_id()));
    }
}
