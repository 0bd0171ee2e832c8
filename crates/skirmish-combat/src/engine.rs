//! The combat engine context
//!
//! Owns every piece of process-wide combat state. The host creates one
//! engine, forwards entity lifecycle and damage occurrences to it, and
//! drives its scheduler.

use std::sync::Arc;

use skirmish_core::{EngineResult, EntityId};
use skirmish_store::{EntityStore, Registry, Scheduler};
use tracing::{debug, info};

use crate::config::ConfigAdapter;
use crate::damage::{
    AttackOutcome, DamageIndicators, DamageManager, DamageOccurrence, EntityMetadata, IndicatorSink,
};
use crate::event::EventBus;
use crate::host::HostWorld;
use crate::interaction::InteractionGate;
use crate::skill::{CastOutcome, Skill, SkillHandler, SkillId, SkillMetadata};
use crate::state::CombatState;

pub struct CombatEngine {
    host: Arc<dyn HostWorld>,
    scheduler: Arc<dyn Scheduler>,
    events: EventBus,
    entities: EntityStore<CombatState>,
    interactions: InteractionGate,
    damage: DamageManager,
    handlers: Registry<dyn SkillHandler>,
    skills: Registry<Skill>,
}

impl CombatEngine {
    pub fn new(
        host: Arc<dyn HostWorld>,
        scheduler: Arc<dyn Scheduler>,
        config: &dyn ConfigAdapter,
    ) -> Self {
        info!("Starting combat engine");
        Self {
            host,
            scheduler,
            events: EventBus::new(),
            entities: EntityStore::new(),
            interactions: InteractionGate::from_config(config),
            damage: DamageManager::new(),
            handlers: Registry::new("skill handler"),
            skills: Registry::new("skill"),
        }
    }

    pub fn host(&self) -> &dyn HostWorld {
        self.host.as_ref()
    }

    pub fn scheduler(&self) -> &dyn Scheduler {
        self.scheduler.as_ref()
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn entities(&self) -> &EntityStore<CombatState> {
        &self.entities
    }

    pub fn interactions(&self) -> &InteractionGate {
        &self.interactions
    }

    pub fn damage(&self) -> &DamageManager {
        &self.damage
    }

    /// Reload everything that is read from configuration
    pub fn reload(&self, config: &dyn ConfigAdapter) {
        self.interactions.reload(config);
    }

    /// Start tracking an entity. Connecting twice keeps the existing state.
    pub fn connect(&self, entity: EntityId) -> Arc<CombatState> {
        self.entities.connect(entity)
    }

    /// Stop tracking an entity and release its state
    pub fn disconnect(&self, entity: EntityId) -> bool {
        self.entities.disconnect(entity)
    }

    pub fn state(&self, entity: EntityId) -> Option<Arc<CombatState>> {
        self.entities.get(entity)
    }

    /// Fails with `MissingEntry` if the entity is not connected
    pub fn state_or_err(&self, entity: EntityId) -> EngineResult<Arc<CombatState>> {
        self.entities.get_or_err(entity)
    }

    pub fn register_handler(&self, handler: Arc<dyn SkillHandler>) {
        let id = handler.id().to_string();
        if self.handlers.register(id.clone(), handler).is_some() {
            debug!("Replaced skill handler '{}'", id);
        }
    }

    pub fn handler(&self, id: &SkillId) -> Option<Arc<dyn SkillHandler>> {
        self.handlers.get(id.as_str())
    }

    pub fn handler_or_err(&self, id: &SkillId) -> EngineResult<Arc<dyn SkillHandler>> {
        self.handlers.get_or_err(id.as_str())
    }

    /// Register a configured skill under its handler's id
    pub fn register_skill(&self, skill: Skill) -> Arc<Skill> {
        let skill = Arc::new(skill);
        self.skills.register(skill.id().to_string(), Arc::clone(&skill));
        skill
    }

    pub fn skill(&self, id: &SkillId) -> Option<Arc<Skill>> {
        self.skills.get(id.as_str())
    }

    pub fn skill_or_err(&self, id: &SkillId) -> EngineResult<Arc<Skill>> {
        self.skills.get_or_err(id.as_str())
    }

    /// Resolve a host damage occurrence. See [`DamageManager::resolve`].
    pub fn resolve_damage(&self, occurrence: &mut DamageOccurrence) -> AttackOutcome {
        self.damage.resolve(self, occurrence)
    }

    /// Cast a registered skill.
    ///
    /// Fails with `MissingEntry` if the skill is unknown or the caster is not
    /// connected.
    pub fn cast(
        self: &Arc<Self>,
        caster: EntityMetadata,
        skill: &SkillId,
        target: Option<EntityId>,
    ) -> EngineResult<CastOutcome> {
        let skill = self.skill_or_err(skill)?;
        let state = self.state_or_err(caster.entity())?;
        let meta = SkillMetadata::new(Arc::clone(&skill), caster, state, target);
        skill.cast(self, meta)
    }

    /// Show damage indicators through `sink`, unless
    /// `game-indicators.damage.enabled` is off. Returns whether they were enabled.
    pub fn enable_indicators(
        &self,
        config: &dyn ConfigAdapter,
        sink: Arc<dyn IndicatorSink>,
    ) -> bool {
        if !config.get_bool("game-indicators.damage.enabled", true) {
            info!("Damage indicators disabled");
            return false;
        }
        self.events.register(Arc::new(DamageIndicators::new(sink)));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TomlConfig;
    use crate::damage::{Damager, DamageCause, Indicator};
    use crate::modifier::Hand;
    use crate::skill::HandlerInfo;
    use crate::testing::{harness, Counting};
    use parking_lot::Mutex;
    use skirmish_core::EngineError;

    #[derive(Default)]
    struct Collect(Mutex<Vec<Indicator>>);

    impl IndicatorSink for Collect {
        fn display(&self, _target: EntityId, indicator: &Indicator) {
            self.0.lock().push(indicator.clone());
        }
    }

    #[test]
    fn test_cast_through_registry() {
        let h = harness();
        let caster = h.host.spawn_player(20.0);
        let handler = Arc::new(Counting::new(HandlerInfo::new("Clear Blue Sky", [])));
        h.engine.register_handler(handler.clone());
        let id = SkillId::new("clear-blue-sky");
        let hand = EntityMetadata::with_hand(caster, Hand::MainHand);

        assert!(matches!(
            h.engine.cast(hand, &id, None),
            Err(EngineError::MissingEntry { kind: "skill", .. })
        ));

        let handler = h.engine.handler_or_err(&id).unwrap();
        h.engine.register_skill(Skill::new(handler));
        assert!(matches!(
            h.engine.cast(hand, &id, None),
            Err(EngineError::MissingEntry { kind: "entity", .. })
        ));

        h.engine.connect(caster);
        assert_eq!(h.engine.cast(hand, &id, None).unwrap(), CastOutcome::Cast);
    }

    #[test]
    fn test_disconnect_releases_state() {
        let h = harness();
        let entity = h.host.spawn_mob(10.0);
        let state = h.engine.connect(entity);
        assert!(Arc::ptr_eq(&state, &h.engine.connect(entity)));
        state.casting().on_cast_start(SkillId::new("dash"));

        assert!(h.engine.disconnect(entity));
        assert!(!state.casting().is_casting());
        assert!(h.engine.state(entity).is_none());
        assert!(!h.engine.disconnect(entity));
    }

    #[test]
    fn test_indicators_follow_config() {
        let h = harness();
        let disabled = TomlConfig::parse("[game-indicators.damage]\nenabled = false\n").unwrap();
        let sink = Arc::new(Collect::default());
        assert!(!h.engine.enable_indicators(&disabled, sink.clone()));
        assert!(h.engine.enable_indicators(&TomlConfig::empty(), sink.clone()));

        let attacker = h.host.spawn_mob(20.0);
        let target = h.host.spawn_mob(20.0);
        let mut occurrence = DamageOccurrence::new(
            target,
            Some(Damager::Entity(attacker)),
            DamageCause::EntityAttack,
            3.0,
            0,
        );
        h.engine.resolve_damage(&mut occurrence);

        let shown = sink.0.lock();
        assert_eq!(shown.len(), 1);
        assert!(shown[0].physical);
        assert_eq!(shown[0].amount, 3.0);
    }
}
