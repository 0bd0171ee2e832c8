//! Attacks: damage plus who dealt it to whom

use std::sync::Arc;

use parking_lot::Mutex;
use skirmish_core::{EngineResult, EntityId};

use super::element::Element;
use super::manager::OccurrenceKey;
use super::metadata::DamageMetadata;
use super::packet::DamageType;
use crate::engine::CombatEngine;
use crate::modifier::{EquipmentSlot, Hand};

/// An attack shared between everything contributing to one resolution window
pub type SharedAttack = Arc<Mutex<AttackMetadata>>;

/// An entity acting with one hand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityMetadata {
    entity: EntityId,
    hand: Hand,
}

impl EntityMetadata {
    /// Fails with `InvalidArgument` unless `slot` is a hand
    pub fn new(entity: EntityId, slot: EquipmentSlot) -> EngineResult<Self> {
        Ok(Self::with_hand(entity, slot.require_hand()?))
    }

    pub fn with_hand(entity: EntityId, hand: Hand) -> Self {
        Self { entity, hand }
    }

    pub fn entity(&self) -> EntityId {
        self.entity
    }

    pub fn hand(&self) -> Hand {
        self.hand
    }

    /// Deal damage to `target` this tick.
    ///
    /// The packet is appended to the attack already registered for the
    /// current window, or registers a new one.
    pub fn attack(
        &self,
        engine: &CombatEngine,
        target: EntityId,
        damage: f64,
        element: Option<Element>,
        types: impl IntoIterator<Item = DamageType>,
    ) -> EngineResult<SharedAttack> {
        let damage = DamageMetadata::new(damage, element, types)?;
        let key = OccurrenceKey::new(target, Some(self.entity), engine.host().current_tick());
        let attack = AttackMetadata::new(damage, target, Some(*self), AttackKind::Generic);
        Ok(engine.damage().register_attack(key, attack))
    }
}

/// How the attack reached its target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackKind {
    Generic,
    Melee,
    Projectile { projectile: EntityId },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttackMetadata {
    damage: DamageMetadata,
    target: EntityId,
    attacker: Option<EntityMetadata>,
    kind: AttackKind,
}

impl AttackMetadata {
    pub fn new(
        damage: DamageMetadata,
        target: EntityId,
        attacker: Option<EntityMetadata>,
        kind: AttackKind,
    ) -> Self {
        Self {
            damage,
            target,
            attacker,
            kind,
        }
    }

    pub fn damage(&self) -> &DamageMetadata {
        &self.damage
    }

    pub fn damage_mut(&mut self) -> &mut DamageMetadata {
        &mut self.damage
    }

    pub fn target(&self) -> EntityId {
        self.target
    }

    pub fn attacker(&self) -> Option<&EntityMetadata> {
        self.attacker.as_ref()
    }

    pub fn has_attacker(&self) -> bool {
        self.attacker.is_some()
    }

    pub fn kind(&self) -> AttackKind {
        self.kind
    }

    pub fn is_projectile(&self) -> bool {
        matches!(self.kind, AttackKind::Projectile { .. })
    }

    pub fn shared(self) -> SharedAttack {
        Arc::new(Mutex::new(self))
    }
}
