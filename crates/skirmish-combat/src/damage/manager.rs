//! Attack registration and the damage resolution pipeline
//!
//! Everything that happens to one target from one attacker within one tick
//! shares a resolution window. Contributions registered in the window are
//! merged into a single attack, which is then checked, finalized, written
//! back to the host and discarded.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use skirmish_core::{EngineError, EngineResult, EntityId};
use tracing::{debug, error};

use super::attack::{AttackKind, AttackMetadata, EntityMetadata, SharedAttack};
use super::cause::DamageCause;
use super::metadata::DamageMetadata;
use super::packet::DamageType;
use crate::engine::CombatEngine;
use crate::event::{AttackEvent, AttackUnregisteredEvent, KillEvent};
use crate::interaction::InteractionType;
use crate::modifier::Hand;

/// Identifies a resolution window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OccurrenceKey {
    pub target: EntityId,
    pub attacker: Option<EntityId>,
    pub tick: u64,
}

impl OccurrenceKey {
    pub fn new(target: EntityId, attacker: Option<EntityId>, tick: u64) -> Self {
        Self {
            target,
            attacker,
            tick,
        }
    }
}

/// What dealt the damage, as seen by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Damager {
    Entity(EntityId),
    Projectile {
        projectile: EntityId,
        shooter: Option<EntityId>,
    },
}

/// The host's damage primitive, handed to the engine before the host applies it
#[derive(Debug, Clone, PartialEq)]
pub struct DamageOccurrence {
    target: EntityId,
    damager: Option<Damager>,
    cause: DamageCause,
    amount: f64,
    tick: u64,
    cancelled: bool,
    final_damage: Option<f64>,
}

impl DamageOccurrence {
    pub fn new(
        target: EntityId,
        damager: Option<Damager>,
        cause: DamageCause,
        amount: f64,
        tick: u64,
    ) -> Self {
        Self {
            target,
            damager,
            cause,
            amount,
            tick,
            cancelled: false,
            final_damage: None,
        }
    }

    pub fn key(&self) -> OccurrenceKey {
        OccurrenceKey::new(self.target, self.attacker(), self.tick)
    }

    pub fn target(&self) -> EntityId {
        self.target
    }

    pub fn damager(&self) -> Option<Damager> {
        self.damager
    }

    /// The entity responsible: the damager itself or a projectile's shooter
    pub fn attacker(&self) -> Option<EntityId> {
        match self.damager? {
            Damager::Entity(entity) => Some(entity),
            Damager::Projectile { shooter, .. } => shooter,
        }
    }

    pub fn cause(&self) -> DamageCause {
        self.cause
    }

    /// Raw amount the host was about to apply
    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Damage the host must apply, once the occurrence has been resolved
    pub fn final_damage(&self) -> Option<f64> {
        self.final_damage
    }

    /// Fails with `IllegalState` if a final damage was already written
    pub fn write_final_damage(&mut self, damage: f64) -> EngineResult<()> {
        if let Some(previous) = self.final_damage {
            return Err(EngineError::illegal_state(format!(
                "final damage already written ({})",
                previous
            )));
        }
        self.final_damage = Some(damage);
        Ok(())
    }
}

/// Turns host occurrences nobody registered into attacks.
///
/// Handlers are asked in registration order; the first attack returned wins.
pub trait AttackHandler: Send + Sync {
    fn attack(
        &self,
        engine: &CombatEngine,
        occurrence: &DamageOccurrence,
    ) -> Option<AttackMetadata>;
}

/// How a resolution window ended
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttackOutcome {
    /// Not an attack (zero-damage occurrence)
    Ignored,
    Cancelled,
    /// The interaction rules forbid the attacker from hitting the target
    Denied,
    Applied { damage: f64, killed: bool },
}

/// Registered attacks by window, plus attack handlers
#[derive(Default)]
pub struct DamageManager {
    handlers: RwLock<Vec<Arc<dyn AttackHandler>>>,
    attacks: Mutex<HashMap<OccurrenceKey, SharedAttack>>,
}

impl DamageManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_handler(&self, handler: Arc<dyn AttackHandler>) {
        self.handlers.write().push(handler);
    }

    /// Register `attack` for the window `key`.
    ///
    /// If an attack is already registered there, the new damage is merged
    /// into it and the existing attack is returned. Windows of earlier ticks
    /// can no longer be resolved and are dropped.
    pub fn register_attack(&self, key: OccurrenceKey, attack: AttackMetadata) -> SharedAttack {
        let mut attacks = self.attacks.lock();
        drop_stale(&mut attacks, key.tick);
        if let Some(existing) = attacks.get(&key) {
            existing.lock().damage_mut().merge(attack.damage());
            return Arc::clone(existing);
        }
        let shared = attack.shared();
        attacks.insert(key, Arc::clone(&shared));
        shared
    }

    pub fn registered_attack(&self, key: &OccurrenceKey) -> Option<SharedAttack> {
        self.attacks.lock().get(key).cloned()
    }

    pub fn unregister_attack(&self, key: &OccurrenceKey) -> Option<SharedAttack> {
        self.attacks.lock().remove(key)
    }

    /// Close the window `key` if `attack` is still the one registered there
    fn close_window(&self, key: &OccurrenceKey, attack: &SharedAttack) {
        let mut attacks = self.attacks.lock();
        if attacks.get(key).is_some_and(|open| Arc::ptr_eq(open, attack)) {
            attacks.remove(key);
        }
    }

    /// Drop every window opened before `tick`. Returns how many were dropped.
    pub fn expire(&self, tick: u64) -> usize {
        drop_stale(&mut self.attacks.lock(), tick)
    }

    /// Number of open windows
    pub fn pending(&self) -> usize {
        self.attacks.lock().len()
    }

    /// The attack behind a host occurrence, or `None` for fake occurrences.
    ///
    /// Discovered attacks are registered under the occurrence's window.
    pub fn find_attack(
        &self,
        engine: &CombatEngine,
        occurrence: &DamageOccurrence,
    ) -> EngineResult<Option<SharedAttack>> {
        if occurrence.amount() == 0.0 {
            return Ok(None);
        }
        let key = occurrence.key();
        if let Some(attack) = self.registered_attack(&key) {
            return Ok(Some(attack));
        }

        let handlers = self.handlers.read().clone();
        if let Some(attack) = handlers.iter().find_map(|h| h.attack(engine, occurrence)) {
            return Ok(Some(self.register_attack(key, attack)));
        }

        let host = engine.host();
        let target = occurrence.target();
        let cause = occurrence.cause();
        let attack = match occurrence.damager() {
            Some(Damager::Entity(damager)) if host.is_alive(damager) => {
                let hand = Hand::MainHand;
                let types = cause.melee_damage_types(host.held_item(damager, hand));
                AttackMetadata::new(
                    DamageMetadata::new(occurrence.amount(), None, types)?,
                    target,
                    Some(EntityMetadata::with_hand(damager, hand)),
                    if cause.is_melee() {
                        AttackKind::Melee
                    } else {
                        AttackKind::Generic
                    },
                )
            }
            Some(Damager::Projectile {
                projectile,
                shooter: Some(shooter),
            }) if shooter != target && host.is_alive(shooter) => AttackMetadata::new(
                DamageMetadata::new(
                    occurrence.amount(),
                    None,
                    [DamageType::Weapon, DamageType::Physical, DamageType::Projectile],
                )?,
                target,
                Some(EntityMetadata::with_hand(shooter, Hand::MainHand)),
                AttackKind::Projectile { projectile },
            ),
            _ => AttackMetadata::new(
                DamageMetadata::new(occurrence.amount(), None, cause.damage_types())?,
                target,
                None,
                AttackKind::Generic,
            ),
        };
        Ok(Some(self.register_attack(key, attack)))
    }

    /// Run a host occurrence through the pipeline.
    ///
    /// On success the final damage is written into `occurrence`. Denied,
    /// cancelled and failed windows cancel the occurrence instead. Fake
    /// (zero-damage) occurrences leave the window untouched.
    pub fn resolve(
        &self,
        engine: &CombatEngine,
        occurrence: &mut DamageOccurrence,
    ) -> AttackOutcome {
        if occurrence.amount() == 0.0 {
            return AttackOutcome::Ignored;
        }
        let key = occurrence.key();
        self.expire(key.tick);
        if occurrence.is_cancelled() {
            self.unregister_attack(&key);
            return AttackOutcome::Cancelled;
        }

        match self.try_resolve(engine, &key, occurrence) {
            Ok(outcome) => outcome,
            Err(err) => {
                error!(target_entity = %key.target, "Could not resolve attack: {}", err);
                occurrence.cancel();
                AttackOutcome::Cancelled
            }
        }
    }

    fn try_resolve(
        &self,
        engine: &CombatEngine,
        key: &OccurrenceKey,
        occurrence: &mut DamageOccurrence,
    ) -> EngineResult<AttackOutcome> {
        let Some(attack) = self.find_attack(engine, occurrence)? else {
            return Ok(AttackOutcome::Ignored);
        };
        let host = engine.host();
        let health = host.health(key.target);

        let (attacker, skill) = {
            let attack = attack.lock();
            (
                attack.attacker().map(|a| a.entity()),
                attack.damage().has_type(DamageType::Skill),
            )
        };
        if let Some(attacker) = attacker.filter(|&a| host.is_player(a)) {
            let interaction = if skill {
                InteractionType::OffenseSkill
            } else {
                InteractionType::OffenseAction
            };
            if !engine
                .interactions()
                .can_interact(host, attacker, key.target, interaction)
            {
                debug!(
                    %attacker,
                    target_entity = %key.target,
                    "Attack denied by interaction rules"
                );
                self.close_window(key, &attack);
                occurrence.cancel();
                return Ok(AttackOutcome::Denied);
            }
        }

        let mut event = AttackEvent::new(Arc::clone(&attack));
        engine.events().attack(&mut event);
        if event.is_cancelled() {
            self.close_window(key, &attack);
            occurrence.cancel();
            return Ok(AttackOutcome::Cancelled);
        }

        // closed before the snapshot: later contributions open a new window
        self.close_window(key, &attack);
        let finalized = attack.lock().clone();
        let damage = finalized.damage().damage();
        occurrence.write_final_damage(damage)?;

        let killed = match (finalized.attacker(), health) {
            (Some(attacker), Some(health)) if damage >= health => {
                engine.events().kill(&KillEvent {
                    attacker: attacker.entity(),
                    target: key.target,
                    attack: finalized.clone(),
                });
                true
            }
            _ => false,
        };

        engine.events().attack_unregistered(&AttackUnregisteredEvent {
            attack: finalized,
            final_damage: damage,
        });
        Ok(AttackOutcome::Applied { damage, killed })
    }
}

fn drop_stale(attacks: &mut HashMap<OccurrenceKey, SharedAttack>, tick: u64) -> usize {
    let before = attacks.len();
    attacks.retain(|key, _| key.tick >= tick);
    let dropped = before - attacks.len();
    if dropped > 0 {
        debug!(dropped, tick, "Dropped unresolved attack windows");
    }
    dropped
}
