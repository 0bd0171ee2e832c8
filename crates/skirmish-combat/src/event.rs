//! Combat notifications and the listener registry
//!
//! Listeners run in priority order (lower first). The listener list is
//! copied before dispatch, so no engine lock is held while a listener runs
//! and listeners may register further listeners.

use std::sync::Arc;

use parking_lot::RwLock;
use skirmish_core::EntityId;
use tracing::debug;

use crate::damage::{AttackMetadata, SharedAttack};
use crate::skill::{SkillId, SkillMetadata, SkillResult};

/// An attack is about to be applied. Cancelling it prevents any damage.
pub struct AttackEvent {
    attack: SharedAttack,
    cancelled: bool,
}

impl AttackEvent {
    pub fn new(attack: SharedAttack) -> Self {
        Self {
            attack,
            cancelled: false,
        }
    }

    /// The attack being resolved. Listeners may add packets or modifiers.
    pub fn attack(&self) -> &SharedAttack {
        &self.attack
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn set_cancelled(&mut self, cancelled: bool) {
        self.cancelled = cancelled;
    }
}

/// An attack was applied and is being discarded
#[derive(Debug, Clone)]
pub struct AttackUnregisteredEvent {
    pub attack: AttackMetadata,
    /// Damage written back to the host
    pub final_damage: f64,
}

/// An attack killed its target
#[derive(Debug, Clone)]
pub struct KillEvent {
    pub attacker: EntityId,
    pub target: EntityId,
    pub attack: AttackMetadata,
}

/// A skill passed its checks and is about to be cast
pub struct PreCastEvent<'a> {
    pub meta: &'a SkillMetadata,
    pub result: &'a SkillResult,
    cancelled: bool,
}

impl<'a> PreCastEvent<'a> {
    pub fn new(meta: &'a SkillMetadata, result: &'a SkillResult) -> Self {
        Self {
            meta,
            result,
            cancelled: false,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn set_cancelled(&mut self, cancelled: bool) {
        self.cancelled = cancelled;
    }
}

/// A skill was cast
pub struct CastEvent<'a> {
    pub meta: &'a SkillMetadata,
    pub result: &'a SkillResult,
}

/// Subscriber to combat notifications. Every method defaults to doing nothing.
pub trait CombatListener: Send + Sync {
    /// Dispatch order, lower runs first
    fn priority(&self) -> i32 {
        0
    }

    fn on_attack(&self, _event: &mut AttackEvent) {}

    fn on_attack_unregistered(&self, _event: &AttackUnregisteredEvent) {}

    fn on_kill(&self, _event: &KillEvent) {}

    fn on_pre_cast(&self, _event: &mut PreCastEvent<'_>) {}

    fn on_post_cast(&self, _event: &CastEvent<'_>) {}

    fn on_cast_start(&self, _caster: EntityId, _skill: &SkillId) {}

    fn on_cast_end(&self, _caster: EntityId, _skill: &SkillId) {}
}

/// Ordered set of combat listeners
#[derive(Default)]
pub struct EventBus {
    listeners: RwLock<Vec<Arc<dyn CombatListener>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, listener: Arc<dyn CombatListener>) {
        let mut listeners = self.listeners.write();
        listeners.push(listener);
        // stable: equal priorities keep registration order
        listeners.sort_by_key(|l| l.priority());
        debug!("Registered combat listener ({} total)", listeners.len());
    }

    /// Remove a listener by identity. Returns `true` if it was registered.
    pub fn unregister(&self, listener: &Arc<dyn CombatListener>) -> bool {
        let mut listeners = self.listeners.write();
        let before = listeners.len();
        listeners.retain(|l| !Arc::ptr_eq(l, listener));
        listeners.len() != before
    }

    pub fn len(&self) -> usize {
        self.listeners.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.read().is_empty()
    }

    fn snapshot(&self) -> Vec<Arc<dyn CombatListener>> {
        self.listeners.read().clone()
    }

    pub fn attack(&self, event: &mut AttackEvent) {
        for listener in self.snapshot() {
            listener.on_attack(event);
        }
    }

    pub fn attack_unregistered(&self, event: &AttackUnregisteredEvent) {
        for listener in self.snapshot() {
            listener.on_attack_unregistered(event);
        }
    }

    pub fn kill(&self, event: &KillEvent) {
        for listener in self.snapshot() {
            listener.on_kill(event);
        }
    }

    pub fn pre_cast(&self, event: &mut PreCastEvent<'_>) {
        for listener in self.snapshot() {
            listener.on_pre_cast(event);
        }
    }

    pub fn post_cast(&self, event: &CastEvent<'_>) {
        for listener in self.snapshot() {
            listener.on_post_cast(event);
        }
    }

    pub fn cast_start(&self, caster: EntityId, skill: &SkillId) {
        for listener in self.snapshot() {
            listener.on_cast_start(caster, skill);
        }
    }

    pub fn cast_end(&self, caster: EntityId, skill: &SkillId) {
        for listener in self.snapshot() {
            listener.on_cast_end(caster, skill);
        }
    }
}
