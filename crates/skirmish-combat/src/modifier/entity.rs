//! Base modifier identity and the capability interface shared by every kind

use skirmish_core::ModifierId;

use super::equipment::{EquipmentSlot, ModifierSource};
use crate::state::CombatState;

/// Identity and anchoring shared by every modifier kind.
#[derive(Debug, Clone, PartialEq)]
pub struct ModifierHeader {
    pub unique_id: ModifierId,
    pub source: ModifierSource,
    pub slot: EquipmentSlot,
    /// Non-unique grouping label, e.g. the instance key of the item that granted it
    pub key: String,
}

impl ModifierHeader {
    /// Header with a freshly generated id
    pub fn new(key: impl Into<String>, source: ModifierSource, slot: EquipmentSlot) -> Self {
        Self::with_id(ModifierId::new(), key, source, slot)
    }

    /// Header reusing a known id, for idempotent re-registration
    pub fn with_id(
        unique_id: ModifierId,
        key: impl Into<String>,
        source: ModifierSource,
        slot: EquipmentSlot,
    ) -> Self {
        Self {
            unique_id,
            source,
            slot,
            key: key.into(),
        }
    }

    /// Header for auras and buffs that apply whatever the acting hand
    pub fn other(key: impl Into<String>) -> Self {
        Self::new(key, ModifierSource::Other, EquipmentSlot::Other)
    }
}

/// A modifier attached to an entity.
///
/// Equality of modifiers is identity equality: two modifiers are the same
/// when their [`unique_id`](EntityModifier::unique_id) matches.
pub trait EntityModifier: Send + Sync {
    fn header(&self) -> &ModifierHeader;

    /// Attach this modifier to the entity's combat state.
    fn register(&self, state: &CombatState);

    /// Detach this modifier from the entity's combat state.
    fn unregister(&self, state: &CombatState);

    /// Release anything the modifier holds. Runs once when the modifier is
    /// removed from a map or instance.
    fn release(&self) {}

    fn unique_id(&self) -> ModifierId {
        self.header().unique_id
    }

    fn source(&self) -> ModifierSource {
        self.header().source
    }

    fn slot(&self) -> EquipmentSlot {
        self.header().slot
    }

    fn key(&self) -> &str {
        &self.header().key
    }
}
