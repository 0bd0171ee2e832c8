//! In-memory arena hosting the scripted skirmish

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use skirmish_combat::{
    AttackOutcome, CombatEngine, DamageCause, DamageOccurrence, Damager, Hand, HeldItem, HostWorld,
};
use skirmish_core::EntityId;
use tracing::info;

#[derive(Debug, Clone)]
struct Fighter {
    name: String,
    health: f64,
    player: bool,
    held: HeldItem,
}

/// Every fighter of the skirmish, with its health
pub struct Arena {
    tick: AtomicU64,
    pvp: bool,
    fighters: RwLock<HashMap<EntityId, Fighter>>,
}

impl Arena {
    pub fn new(pvp: bool) -> Self {
        Self {
            tick: AtomicU64::new(0),
            pvp,
            fighters: RwLock::new(HashMap::new()),
        }
    }

    pub fn spawn(&self, name: &str, health: f64, player: bool, held: HeldItem) -> EntityId {
        let id = EntityId::new();
        self.fighters.write().insert(
            id,
            Fighter {
                name: name.to_string(),
                health,
                player,
                held,
            },
        );
        info!("{} enters the arena ({} hp)", name, health);
        id
    }

    pub fn name(&self, entity: EntityId) -> String {
        self.fighters
            .read()
            .get(&entity)
            .map_or_else(|| entity.to_string(), |f| f.name.clone())
    }

    /// Living fighters, players or mobs
    pub fn living(&self, players: bool) -> Vec<EntityId> {
        let mut living: Vec<(String, EntityId)> = self
            .fighters
            .read()
            .iter()
            .filter(|(_, f)| f.player == players && f.health > 0.0)
            .map(|(id, f)| (f.name.clone(), *id))
            .collect();
        living.sort();
        living.into_iter().map(|(_, id)| id).collect()
    }

    pub fn advance(&self) -> u64 {
        self.tick.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Damage `target` the way a game server would: hand the occurrence to
    /// the engine, then apply whatever it decided.
    pub fn strike(
        &self,
        engine: &CombatEngine,
        damager: Option<Damager>,
        target: EntityId,
        cause: DamageCause,
        amount: f64,
    ) -> AttackOutcome {
        let mut occurrence =
            DamageOccurrence::new(target, damager, cause, amount, self.current_tick());
        let outcome = engine.resolve_damage(&mut occurrence);
        if let Some(damage) = occurrence.final_damage() {
            self.apply(target, damage);
        }
        outcome
    }

    fn apply(&self, target: EntityId, damage: f64) {
        let mut fighters = self.fighters.write();
        let Some(fighter) = fighters.get_mut(&target) else {
            return;
        };
        fighter.health = (fighter.health - damage).max(0.0);
        if fighter.health == 0.0 {
            info!("{} falls", fighter.name);
        }
    }

    fn with<T>(&self, entity: EntityId, read: impl FnOnce(&Fighter) -> T) -> Option<T> {
        self.fighters.read().get(&entity).map(read)
    }
}

impl HostWorld for Arena {
    fn current_tick(&self) -> u64 {
        self.tick.load(Ordering::SeqCst)
    }

    fn is_alive(&self, entity: EntityId) -> bool {
        self.with(entity, |f| f.health > 0.0).unwrap_or(false)
    }

    fn health(&self, entity: EntityId) -> Option<f64> {
        self.with(entity, |f| f.health).filter(|&h| h > 0.0)
    }

    fn is_player(&self, entity: EntityId) -> bool {
        self.with(entity, |f| f.player).unwrap_or(false)
    }

    fn pvp_enabled(&self, _entity: EntityId) -> bool {
        self.pvp
    }

    fn held_item(&self, entity: EntityId, hand: Hand) -> HeldItem {
        match hand {
            Hand::MainHand => self.with(entity, |f| f.held).unwrap_or(HeldItem::Empty),
            Hand::OffHand => HeldItem::Empty,
        }
    }
}
