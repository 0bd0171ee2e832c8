//! Skirmish - scripted fight driven through the combat engine
//!
//! A knight armed with a sword, a ring and two spells fights a pack of
//! wolves in an in-memory arena. Every hit goes through the engine's damage
//! pipeline.

mod arena;
mod settings;
mod skills;

use std::sync::Arc;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use skirmish_combat::damage::{Damager, Indicator};
use skirmish_combat::{
    CastOutcome, CombatEngine, CombatListener, DamageCause, DamageType, EntityMetadata,
    EntityModifier, EquipmentSlot, Hand, HeldItem, HostWorld, IndicatorSink, KillEvent,
    ModifierHeader, ModifierSource, ModifierType, Skill, SkillId, SkillModifier, StatModifier,
    TomlConfig,
};
use skirmish_core::EntityId;
use skirmish_store::{Scheduler, TickScheduler};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use arena::Arena;
use settings::Settings;
use skills::{BurningAura, FireBolt};

const ATTACK_DAMAGE: &str = "attack_damage";
const CRIT_CHANCE: f64 = 0.2;

/// Prints indicators to the log
struct LogIndicators {
    arena: Arc<Arena>,
}

impl IndicatorSink for LogIndicators {
    fn display(&self, target: EntityId, indicator: &Indicator) {
        info!("  {} -> {}", indicator.text(), self.arena.name(target));
    }
}

/// Announces kills
struct Herald {
    arena: Arc<Arena>,
}

impl CombatListener for Herald {
    fn on_kill(&self, event: &KillEvent) {
        info!(
            "{} slays {}",
            self.arena.name(event.attacker),
            self.arena.name(event.target)
        );
    }
}

fn main() -> Result<()> {
    // Logging starts at info so settings loading is visible
    let settings = {
        let bootstrap = FmtSubscriber::builder().with_target(false).finish();
        tracing::subscriber::with_default(bootstrap, Settings::load)
    };

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_new(&settings.logging.filter).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(settings.logging.targets)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set subscriber")?;

    // first run: write the defaults so they can be edited
    if Settings::config_dir().is_some_and(|dir| !dir.join("settings.toml").exists()) {
        if let Err(e) = settings.save() {
            warn!("Failed to save default settings: {}", e);
        }
    }

    let config = match settings.combat_config_path() {
        Some(path) if path.exists() => TomlConfig::load(&path),
        _ => {
            info!("No combat configuration, using defaults");
            TomlConfig::empty()
        }
    };

    let arena = Arc::new(Arena::new(false));
    let scheduler = Arc::new(TickScheduler::new());
    let engine = Arc::new(CombatEngine::new(
        Arc::clone(&arena) as Arc<dyn HostWorld>,
        Arc::clone(&scheduler) as Arc<dyn Scheduler>,
        &config,
    ));
    engine.enable_indicators(&config, Arc::new(LogIndicators { arena: Arc::clone(&arena) }));
    engine.events().register(Arc::new(Herald { arena: Arc::clone(&arena) }));

    let fire_bolt = SkillId::new("fire bolt");
    let burning_aura = SkillId::new("burning aura");
    engine.register_handler(Arc::new(FireBolt::new(Arc::clone(&arena))));
    engine.register_handler(Arc::new(BurningAura::new(Arc::clone(&arena))));
    engine.register_skill(
        Skill::new(engine.handler_or_err(&fire_bolt)?)
            .with_parameter("damage", 6.0)?
            .with_parameter("cooldown", 2.0)?,
    );
    engine.register_skill(
        Skill::new(engine.handler_or_err(&burning_aura)?)
            .with_parameter("damage", 1.5)?
            .with_parameter("pulses", 4.0)?
            .with_parameter("cooldown", 6.0)?
            .with_parameter("delay", 0.5)?,
    );

    let knight = arena.spawn("Knight", 40.0, true, HeldItem::Weapon);
    let state = engine.connect(knight);
    StatModifier::new(
        ATTACK_DAMAGE,
        ModifierHeader::new("iron_sword", ModifierSource::MeleeWeapon, EquipmentSlot::MainHand),
        5.0,
        ModifierType::Flat,
    )
    .register(&state);
    StatModifier::relative(ATTACK_DAMAGE, "ring_of_might", 20.0).register(&state);
    // an offhand dagger never counts for main-hand swings
    StatModifier::new(
        ATTACK_DAMAGE,
        ModifierHeader::new("dagger", ModifierSource::MeleeWeapon, EquipmentSlot::OffHand),
        3.0,
        ModifierType::Flat,
    )
    .register(&state);
    SkillModifier::new(
        ModifierHeader::other("ring_of_might"),
        [fire_bolt.clone()],
        "cooldown",
        -50.0,
        ModifierType::Relative,
    )?
    .register(&state);
    info!(
        "Knight swings for {:.1}",
        state.stats().total(ATTACK_DAMAGE, 1.0)
    );

    let wolves: Vec<EntityId> = (0..settings.arena.wolves)
        .map(|i| {
            let wolf = arena.spawn(&format!("Wolf {}", i + 1), 18.0, false, HeldItem::Empty);
            engine.connect(wolf);
            wolf
        })
        .collect();

    let mut rng = match settings.arena.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let knight_hand = EntityMetadata::with_hand(knight, Hand::MainHand);

    for tick in 1..=settings.arena.ticks {
        arena.advance();
        scheduler.tick();

        if !arena.is_alive(knight) || arena.living(false).is_empty() {
            break;
        }
        let Some(&prey) = arena.living(false).first() else {
            break;
        };

        if tick % 15 == 0 {
            match engine.cast(knight_hand, &burning_aura, None)? {
                CastOutcome::Delayed(task) => info!("Knight channels Burning Aura ({})", task),
                CastOutcome::Cast => info!("Knight casts Burning Aura"),
                _ => {}
            }
        }
        if tick % 7 == 0 {
            if engine.cast(knight_hand, &fire_bolt, Some(prey))? == CastOutcome::Cast {
                info!("Knight hurls a Fire Bolt at {}", arena.name(prey));
            }
        }

        if tick % 5 == 0 {
            let attack = knight_hand.attack(
                &engine,
                prey,
                state.stats().total(ATTACK_DAMAGE, 1.0),
                None,
                [DamageType::Weapon, DamageType::Physical],
            )?;
            if rng.gen_bool(CRIT_CHANCE) {
                let mut attack = attack.lock();
                attack.damage_mut().multiplicative_modifier(1.5)?;
                attack.damage_mut().set_weapon_crit(true);
            }
            arena.strike(
                &engine,
                Some(Damager::Entity(knight)),
                prey,
                DamageCause::EntityAttack,
                1.0,
            );
        }

        for &wolf in &wolves {
            if arena.is_alive(wolf) && rng.gen_bool(0.1) {
                let bite = rng.gen_range(1.0..3.0);
                arena.strike(
                    &engine,
                    Some(Damager::Entity(wolf)),
                    knight,
                    DamageCause::EntityAttack,
                    bite,
                );
            }
        }
    }

    let survivors = arena.living(false).len();
    if arena.is_alive(knight) {
        info!(
            "Knight stands with {:.1} hp, {} wolves left",
            arena.health(knight).unwrap_or(0.0),
            survivors
        );
    } else {
        warn!("Knight has fallen, {} wolves left", survivors);
    }

    for wolf in wolves {
        engine.disconnect(wolf);
    }
    engine.disconnect(knight);
    Ok(())
}
