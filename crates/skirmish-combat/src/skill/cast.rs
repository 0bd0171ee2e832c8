//! Configured skills and the cast pipeline

use std::collections::HashMap;
use std::sync::Arc;

use skirmish_core::{EngineError, EngineResult, EntityId, TaskId};
use tracing::{debug, warn};

use super::cooldown::seconds_to_ticks;
use super::handler::{SkillHandler, SkillId, SkillResult};
use crate::damage::{AttackMetadata, EntityMetadata};
use crate::engine::CombatEngine;
use crate::event::{CastEvent, PreCastEvent};
use crate::state::CombatState;

/// A handler with concrete parameter values
pub struct Skill {
    handler: Arc<dyn SkillHandler>,
    parameters: HashMap<String, f64>,
}

impl Skill {
    pub fn new(handler: Arc<dyn SkillHandler>) -> Self {
        Self {
            handler,
            parameters: HashMap::new(),
        }
    }

    /// Set a base parameter value.
    ///
    /// Fails with `InvalidArgument` if the handler does not declare `name`.
    pub fn with_parameter(mut self, name: &str, value: f64) -> EngineResult<Self> {
        if !self.handler.parameters().contains(name) {
            return Err(EngineError::invalid_argument(format!(
                "skill '{}' has no parameter '{}'",
                self.id(),
                name
            )));
        }
        self.parameters.insert(name.to_string(), value);
        Ok(self)
    }

    pub fn id(&self) -> &SkillId {
        self.handler.id()
    }

    pub fn handler(&self) -> &Arc<dyn SkillHandler> {
        &self.handler
    }

    /// Base value of a parameter, zero when unset
    pub fn parameter(&self, name: &str) -> f64 {
        self.parameters.get(name).copied().unwrap_or(0.0)
    }

    /// Run the cast pipeline.
    ///
    /// The handler must accept the cast, the skill must be off cooldown and
    /// no listener may cancel the pre-cast event. A positive `delay`
    /// parameter postpones the effects by that many seconds.
    pub fn cast(
        self: &Arc<Self>,
        engine: &Arc<CombatEngine>,
        meta: SkillMetadata,
    ) -> EngineResult<CastOutcome> {
        let result = self.handler.result(engine, &meta);
        if !result.is_successful() {
            return Ok(CastOutcome::Refused);
        }

        let now = engine.host().current_tick();
        if !meta.caster_state().cooldowns().test_silently(self.id(), now) {
            return Ok(CastOutcome::OnCooldown);
        }

        let cancelled = {
            let mut event = PreCastEvent::new(&meta, &result);
            engine.events().pre_cast(&mut event);
            event.is_cancelled()
        };
        if cancelled {
            return Ok(CastOutcome::Cancelled);
        }

        let delay = seconds_to_ticks(meta.parameter("delay"));
        if delay == 0 {
            self.cast_instantly(engine, &meta, &result)?;
            return Ok(CastOutcome::Cast);
        }

        let skill = Arc::clone(self);
        let weak = Arc::downgrade(engine);
        let task = engine.scheduler().schedule(
            Arc::new(move || {
                let Some(engine) = weak.upgrade() else {
                    return;
                };
                if let Err(err) = skill.cast_instantly(&engine, &meta, &result) {
                    warn!(skill = %skill.id(), "Delayed cast failed: {}", err);
                }
            }),
            delay,
            0,
        );
        debug!(skill = %self.id(), %task, "Cast delayed by {} ticks", delay);
        Ok(CastOutcome::Delayed(task))
    }

    /// Apply the effects: cooldown, then the handler, then the post-cast event
    pub fn cast_instantly(
        &self,
        engine: &Arc<CombatEngine>,
        meta: &SkillMetadata,
        result: &SkillResult,
    ) -> EngineResult<()> {
        let cooldown = seconds_to_ticks(meta.parameter("cooldown"));
        meta.caster_state()
            .cooldowns()
            .put(self.id().clone(), engine.host().current_tick(), cooldown);

        self.handler.when_cast(engine, meta, result)?;
        engine.events().post_cast(&CastEvent { meta, result });
        Ok(())
    }
}

/// How a cast attempt ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastOutcome {
    /// The handler refused the cast
    Refused,
    OnCooldown,
    /// A listener cancelled the pre-cast event
    Cancelled,
    Cast,
    /// Effects will apply when the task runs
    Delayed(TaskId),
}

/// Everything about one cast
#[derive(Clone)]
pub struct SkillMetadata {
    skill: Arc<Skill>,
    caster: EntityMetadata,
    caster_state: Arc<CombatState>,
    target: Option<EntityId>,
    attack_source: Option<AttackMetadata>,
}

impl SkillMetadata {
    pub fn new(
        skill: Arc<Skill>,
        caster: EntityMetadata,
        caster_state: Arc<CombatState>,
        target: Option<EntityId>,
    ) -> Self {
        Self {
            skill,
            caster,
            caster_state,
            target,
            attack_source: None,
        }
    }

    /// The attack that triggered the cast, for on-hit skills
    pub fn with_attack_source(mut self, attack: AttackMetadata) -> Self {
        self.attack_source = Some(attack);
        self
    }

    pub fn skill(&self) -> &Arc<Skill> {
        &self.skill
    }

    pub fn caster(&self) -> &EntityMetadata {
        &self.caster
    }

    pub fn caster_state(&self) -> &Arc<CombatState> {
        &self.caster_state
    }

    pub fn target(&self) -> Option<EntityId> {
        self.target
    }

    pub fn attack_source(&self) -> Option<&AttackMetadata> {
        self.attack_source.as_ref()
    }

    /// Parameter value after the caster's skill modifiers
    pub fn parameter(&self, name: &str) -> f64 {
        self.caster_state
            .skill_modifiers()
            .calculate_value(self.skill.id(), self.skill.parameter(name), name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::CombatListener;
    use crate::host::HostWorld;
    use crate::modifier::{EntityModifier, Hand, ModifierHeader, ModifierType};
    use crate::skill::{HandlerInfo, SkillModifier};
    use crate::testing::{harness, Counting, Recorder};

    fn skill(handler: &Arc<Counting>, cooldown: f64, delay: f64) -> Arc<Skill> {
        Arc::new(
            Skill::new(Arc::clone(handler) as Arc<dyn SkillHandler>)
                .with_parameter("cooldown", cooldown)
                .unwrap()
                .with_parameter("delay", delay)
                .unwrap(),
        )
    }

    #[test]
    fn test_undeclared_parameter_rejected() {
        let handler = Arc::new(Counting::new(HandlerInfo::new("dash", [])));
        let result = Skill::new(handler).with_parameter("radius", 1.0);
        assert!(matches!(result, Err(EngineError::InvalidArgument(_))));
    }

    #[test]
    fn test_parameter_resolution() {
        let h = harness();
        let caster = h.host.spawn_player(20.0);
        let state = h.engine.connect(caster);
        let handler = Arc::new(Counting::new(HandlerInfo::new("dash", [])));
        let skill = skill(&handler, 10.0, 0.0);

        SkillModifier::new(
            ModifierHeader::other("ring"),
            [SkillId::new("dash")],
            "cooldown",
            -50.0,
            ModifierType::Relative,
        )
        .unwrap()
        .register(&state);

        let meta = SkillMetadata::new(
            skill,
            EntityMetadata::with_hand(caster, Hand::MainHand),
            state,
            None,
        );
        assert_eq!(meta.parameter("cooldown"), 5.0);
        assert_eq!(meta.parameter("mana"), 0.0);
    }

    #[test]
    fn test_cast_puts_cooldown() {
        let h = harness();
        let recorder = Recorder::install(&h.engine);
        let caster = h.host.spawn_player(20.0);
        let state = h.engine.connect(caster);
        let handler = Arc::new(Counting::new(HandlerInfo::new("dash", [])));
        let skill = skill(&handler, 1.0, 0.0);
        let meta = SkillMetadata::new(
            Arc::clone(&skill),
            EntityMetadata::with_hand(caster, Hand::MainHand),
            Arc::clone(&state),
            None,
        );

        assert_eq!(skill.cast(&h.engine, meta.clone()).unwrap(), CastOutcome::Cast);
        assert_eq!(handler.casts(), 1);
        assert_eq!(recorder.post_casts(), 1);
        assert_eq!(skill.cast(&h.engine, meta.clone()).unwrap(), CastOutcome::OnCooldown);

        h.host.advance(20);
        assert_eq!(state.cooldowns().remaining(skill.id(), h.host.current_tick()), 0);
        assert_eq!(skill.cast(&h.engine, meta).unwrap(), CastOutcome::Cast);
        assert_eq!(handler.casts(), 2);
    }

    #[test]
    fn test_refused_and_cancelled_casts_have_no_effect() {
        struct Veto;

        impl CombatListener for Veto {
            fn on_pre_cast(&self, event: &mut PreCastEvent<'_>) {
                event.set_cancelled(true);
            }
        }

        let h = harness();
        let caster = h.host.spawn_player(20.0);
        let state = h.engine.connect(caster);
        let handler = Arc::new(Counting::new(HandlerInfo::new("dash", [])));
        let skill = skill(&handler, 5.0, 0.0);
        let meta = SkillMetadata::new(
            Arc::clone(&skill),
            EntityMetadata::with_hand(caster, Hand::MainHand),
            Arc::clone(&state),
            None,
        );

        handler.set_accept(false);
        assert_eq!(skill.cast(&h.engine, meta.clone()).unwrap(), CastOutcome::Refused);

        handler.set_accept(true);
        h.engine.events().register(Arc::new(Veto));
        assert_eq!(skill.cast(&h.engine, meta).unwrap(), CastOutcome::Cancelled);
        assert_eq!(handler.casts(), 0);
        assert!(state.cooldowns().test_silently(skill.id(), h.host.current_tick()));
    }

    #[test]
    fn test_delayed_cast_runs_later() {
        let h = harness();
        let caster = h.host.spawn_player(20.0);
        let state = h.engine.connect(caster);
        let handler = Arc::new(Counting::new(HandlerInfo::new("dash", [])));
        let skill = skill(&handler, 0.0, 0.5);
        let meta = SkillMetadata::new(
            skill.clone(),
            EntityMetadata::with_hand(caster, Hand::MainHand),
            state,
            None,
        );

        let outcome = skill.cast(&h.engine, meta).unwrap();
        assert!(matches!(outcome, CastOutcome::Delayed(_)));
        h.scheduler.advance(9);
        assert_eq!(handler.casts(), 0);
        h.scheduler.tick();
        assert_eq!(handler.casts(), 1);
    }
}
