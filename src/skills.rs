//! Skills used in the scripted skirmish

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use skirmish_combat::damage::Damager;
use skirmish_combat::{
    CastTask, CombatEngine, DamageCause, DamageType, Element, HandlerInfo, InteractionType,
    SkillHandler, SkillMetadata, SkillResult, SkillRunnable,
};
use skirmish_core::EngineResult;
use tracing::info;

use crate::arena::Arena;

/// Single-target fire projectile
pub struct FireBolt {
    info: HandlerInfo,
    arena: Arc<Arena>,
}

impl FireBolt {
    pub fn new(arena: Arc<Arena>) -> Self {
        Self {
            info: HandlerInfo::new("Fire Bolt", ["damage"]),
            arena,
        }
    }
}

impl SkillHandler for FireBolt {
    fn info(&self) -> &HandlerInfo {
        &self.info
    }

    fn result(&self, engine: &CombatEngine, meta: &SkillMetadata) -> SkillResult {
        let caster = meta.caster().entity();
        match meta.target() {
            Some(target)
                if engine.interactions().can_interact(
                    engine.host(),
                    caster,
                    target,
                    InteractionType::OffenseSkill,
                ) =>
            {
                SkillResult::success(Some(target))
            }
            _ => SkillResult::failure(),
        }
    }

    fn when_cast(
        &self,
        engine: &Arc<CombatEngine>,
        meta: &SkillMetadata,
        result: &SkillResult,
    ) -> EngineResult<()> {
        let Some(target) = result.target() else {
            return Ok(());
        };
        let caster = meta.caster();
        let damage = meta.parameter("damage");
        caster.attack(
            engine,
            target,
            damage,
            Some(Element::Fire),
            [DamageType::Skill, DamageType::Magic],
        )?;
        self.arena.strike(
            engine,
            Some(Damager::Entity(caster.entity())),
            target,
            DamageCause::Magic,
            damage,
        );
        Ok(())
    }
}

/// Burns every mob around the caster for a few seconds
pub struct BurningAura {
    info: HandlerInfo,
    arena: Arc<Arena>,
}

impl BurningAura {
    pub fn new(arena: Arc<Arena>) -> Self {
        Self {
            info: HandlerInfo::new("Burning Aura", ["damage", "pulses"]),
            arena,
        }
    }
}

impl SkillHandler for BurningAura {
    fn info(&self) -> &HandlerInfo {
        &self.info
    }

    fn result(&self, engine: &CombatEngine, meta: &SkillMetadata) -> SkillResult {
        let casting = meta.caster_state().casting();
        if casting.is_casting_skill(meta.skill().id())
            || !engine.host().is_alive(meta.caster().entity())
        {
            return SkillResult::failure();
        }
        SkillResult::success(None)
    }

    fn when_cast(
        &self,
        engine: &Arc<CombatEngine>,
        meta: &SkillMetadata,
        _result: &SkillResult,
    ) -> EngineResult<()> {
        let pulse = AuraPulse {
            arena: Arc::clone(&self.arena),
            damage: meta.parameter("damage"),
            pulses: meta.parameter("pulses").max(0.0) as u32,
            done: AtomicU32::new(0),
        };
        CastTask::new(engine, meta.clone(), pulse).run_task(0, 10)?;
        Ok(())
    }
}

struct AuraPulse {
    arena: Arc<Arena>,
    damage: f64,
    pulses: u32,
    done: AtomicU32,
}

impl SkillRunnable for AuraPulse {
    fn should_cancel(&self, engine: &CombatEngine, meta: &SkillMetadata) -> bool {
        self.done.load(Ordering::SeqCst) >= self.pulses
            || !engine.host().is_alive(meta.caster().entity())
            || self.arena.living(false).is_empty()
    }

    fn tick(&self, engine: &CombatEngine, meta: &SkillMetadata) {
        self.done.fetch_add(1, Ordering::SeqCst);
        let caster = meta.caster();
        for target in self.arena.living(false) {
            if caster
                .attack(
                    engine,
                    target,
                    self.damage,
                    Some(Element::Fire),
                    [DamageType::Skill, DamageType::Dot],
                )
                .is_ok()
            {
                self.arena.strike(
                    engine,
                    Some(Damager::Entity(caster.entity())),
                    target,
                    DamageCause::FireTick,
                    self.damage,
                );
            }
        }
    }

    fn on_start(&self, _engine: &CombatEngine, meta: &SkillMetadata) {
        info!("{} is wreathed in flames", self.arena.name(meta.caster().entity()));
    }

    fn on_end(&self, _engine: &CombatEngine, meta: &SkillMetadata) {
        info!("The flames around {} die down", self.arena.name(meta.caster().entity()));
    }
}
