//! Modifier model
//!
//! Sources, slots and hand compatibility, the base modifier interface and
//! the per-entity modifier map.

pub mod entity;
pub mod equipment;
pub mod map;

pub use entity::{EntityModifier, ModifierHeader};
pub use equipment::{EquipmentSlot, Hand, ModifierSource, ModifierType};
pub use map::ModifierMap;
