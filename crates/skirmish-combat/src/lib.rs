//! Skirmish Combat - Modifiers, attack resolution, interaction rules and skills
//!
//! Provides the [`CombatEngine`] a game server embeds: per-entity stat and
//! skill modifiers, the damage pipeline, the pvp/offense rule matrix and
//! skill casting.

pub mod config;
pub mod damage;
pub mod engine;
pub mod event;
pub mod host;
pub mod interaction;
pub mod modifier;
pub mod skill;
pub mod stat;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{ConfigAdapter, ConfigError, TomlConfig};
pub use engine::CombatEngine;
pub use event::{
    AttackEvent, AttackUnregisteredEvent, CastEvent, CombatListener, EventBus, KillEvent,
    PreCastEvent,
};
pub use host::{HeldItem, HostWorld};
pub use state::CombatState;

// Damage re-exports
pub use damage::{
    AttackHandler, AttackKind, AttackMetadata, AttackOutcome, DamageCause, DamageMetadata,
    DamageOccurrence, DamagePacket, DamageType, Damager, Element, EntityMetadata, IndicatorSink,
    OccurrenceKey, SharedAttack, MINIMAL_DAMAGE,
};
pub use interaction::{InteractionRestriction, InteractionType, Relationship, RelationshipHandler};
pub use modifier::{
    EntityModifier, EquipmentSlot, Hand, ModifierHeader, ModifierSource, ModifierType,
};
pub use skill::{
    CastOutcome, CastTask, HandlerInfo, Skill, SkillHandler, SkillId, SkillMetadata,
    SkillModifier, SkillResult, SkillRunnable,
};
pub use stat::{InstanceModifier, ModifiedInstance, StatModifier};
