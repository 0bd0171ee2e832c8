//! In-memory host and helpers shared by unit tests

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use skirmish_core::{EngineResult, EntityId};
use skirmish_store::TickScheduler;

use crate::config::TomlConfig;
use crate::engine::CombatEngine;
use crate::event::{AttackEvent, AttackUnregisteredEvent, CastEvent, CombatListener, KillEvent};
use crate::host::{HeldItem, HostWorld};
use crate::modifier::Hand;
use crate::skill::{HandlerInfo, SkillHandler, SkillId, SkillMetadata, SkillResult};

#[derive(Debug, Clone)]
struct FakeEntity {
    health: f64,
    alive: bool,
    player: bool,
    pvp: bool,
    held: [HeldItem; 2],
}

/// Host whose entities are plain records
#[derive(Default)]
pub(crate) struct FakeHost {
    tick: AtomicU64,
    entities: RwLock<HashMap<EntityId, FakeEntity>>,
}

impl FakeHost {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn spawn(&self, health: f64, player: bool) -> EntityId {
        let id = EntityId::new();
        self.entities.write().insert(
            id,
            FakeEntity {
                health,
                alive: true,
                player,
                pvp: true,
                held: [HeldItem::Empty; 2],
            },
        );
        id
    }

    pub(crate) fn spawn_player(&self, health: f64) -> EntityId {
        self.spawn(health, true)
    }

    pub(crate) fn spawn_mob(&self, health: f64) -> EntityId {
        self.spawn(health, false)
    }

    fn update(&self, entity: EntityId, change: impl FnOnce(&mut FakeEntity)) {
        if let Some(record) = self.entities.write().get_mut(&entity) {
            change(record);
        }
    }

    pub(crate) fn kill(&self, entity: EntityId) {
        self.update(entity, |e| {
            e.alive = false;
            e.health = 0.0;
        });
    }

    pub(crate) fn set_pvp(&self, entity: EntityId, pvp: bool) {
        self.update(entity, |e| e.pvp = pvp);
    }

    pub(crate) fn set_held(&self, entity: EntityId, hand: Hand, item: HeldItem) {
        let index = match hand {
            Hand::MainHand => 0,
            Hand::OffHand => 1,
        };
        self.update(entity, |e| e.held[index] = item);
    }

    pub(crate) fn advance(&self, ticks: u64) {
        self.tick.fetch_add(ticks, Ordering::SeqCst);
    }

    fn with<T>(&self, entity: EntityId, read: impl FnOnce(&FakeEntity) -> T) -> Option<T> {
        self.entities.read().get(&entity).map(read)
    }
}

impl HostWorld for FakeHost {
    fn current_tick(&self) -> u64 {
        self.tick.load(Ordering::SeqCst)
    }

    fn is_alive(&self, entity: EntityId) -> bool {
        self.with(entity, |e| e.alive).unwrap_or(false)
    }

    fn health(&self, entity: EntityId) -> Option<f64> {
        self.with(entity, |e| e.alive.then_some(e.health)).flatten()
    }

    fn is_player(&self, entity: EntityId) -> bool {
        self.with(entity, |e| e.player).unwrap_or(false)
    }

    fn pvp_enabled(&self, entity: EntityId) -> bool {
        self.with(entity, |e| e.pvp).unwrap_or(false)
    }

    fn held_item(&self, entity: EntityId, hand: Hand) -> HeldItem {
        let index = match hand {
            Hand::MainHand => 0,
            Hand::OffHand => 1,
        };
        self.with(entity, |e| e.held[index]).unwrap_or(HeldItem::Empty)
    }
}

pub(crate) struct Harness {
    pub host: Arc<FakeHost>,
    pub scheduler: Arc<TickScheduler>,
    pub engine: Arc<CombatEngine>,
}

/// Engine over a fresh [`FakeHost`] and [`TickScheduler`], default configuration
pub(crate) fn harness() -> Harness {
    let host = Arc::new(FakeHost::new());
    let scheduler = Arc::new(TickScheduler::new());
    let engine = Arc::new(CombatEngine::new(
        Arc::clone(&host) as Arc<dyn HostWorld>,
        Arc::clone(&scheduler) as Arc<dyn skirmish_store::Scheduler>,
        &TomlConfig::empty(),
    ));
    Harness {
        host,
        scheduler,
        engine,
    }
}

/// Listener recording what it sees
#[derive(Default)]
pub(crate) struct Recorder {
    cancel_attacks: AtomicBool,
    attacks: AtomicUsize,
    kills: Mutex<Vec<KillEvent>>,
    finalized: Mutex<Vec<AttackUnregisteredEvent>>,
    post_casts: AtomicUsize,
    cast_starts: AtomicUsize,
    cast_ends: AtomicUsize,
}

impl Recorder {
    pub(crate) fn install(engine: &CombatEngine) -> Arc<Recorder> {
        let recorder = Arc::new(Recorder::default());
        engine.events().register(Arc::clone(&recorder) as Arc<dyn CombatListener>);
        recorder
    }

    pub(crate) fn cancel_attacks(&self, cancel: bool) {
        self.cancel_attacks.store(cancel, Ordering::SeqCst);
    }

    pub(crate) fn attacks_seen(&self) -> usize {
        self.attacks.load(Ordering::SeqCst)
    }

    pub(crate) fn kills(&self) -> Vec<KillEvent> {
        self.kills.lock().clone()
    }

    pub(crate) fn finalized(&self) -> Vec<AttackUnregisteredEvent> {
        self.finalized.lock().clone()
    }

    pub(crate) fn post_casts(&self) -> usize {
        self.post_casts.load(Ordering::SeqCst)
    }

    pub(crate) fn cast_starts(&self) -> usize {
        self.cast_starts.load(Ordering::SeqCst)
    }

    pub(crate) fn cast_ends(&self) -> usize {
        self.cast_ends.load(Ordering::SeqCst)
    }
}

impl CombatListener for Recorder {
    fn on_attack(&self, event: &mut AttackEvent) {
        self.attacks.fetch_add(1, Ordering::SeqCst);
        if self.cancel_attacks.load(Ordering::SeqCst) {
            event.set_cancelled(true);
        }
    }

    fn on_attack_unregistered(&self, event: &AttackUnregisteredEvent) {
        self.finalized.lock().push(event.clone());
    }

    fn on_kill(&self, event: &KillEvent) {
        self.kills.lock().push(event.clone());
    }

    fn on_post_cast(&self, _event: &CastEvent<'_>) {
        self.post_casts.fetch_add(1, Ordering::SeqCst);
    }

    fn on_cast_start(&self, _caster: EntityId, _skill: &SkillId) {
        self.cast_starts.fetch_add(1, Ordering::SeqCst);
    }

    fn on_cast_end(&self, _caster: EntityId, _skill: &SkillId) {
        self.cast_ends.fetch_add(1, Ordering::SeqCst);
    }
}

/// Handler counting its casts
pub(crate) struct Counting {
    info: HandlerInfo,
    accept: AtomicBool,
    casts: AtomicUsize,
}

impl Counting {
    pub(crate) fn new(info: HandlerInfo) -> Self {
        Self {
            info,
            accept: AtomicBool::new(true),
            casts: AtomicUsize::new(0),
        }
    }

    pub(crate) fn set_accept(&self, accept: bool) {
        self.accept.store(accept, Ordering::SeqCst);
    }

    pub(crate) fn casts(&self) -> usize {
        self.casts.load(Ordering::SeqCst)
    }
}

impl SkillHandler for Counting {
    fn info(&self) -> &HandlerInfo {
        &self.info
    }

    fn result(&self, _engine: &CombatEngine, meta: &SkillMetadata) -> SkillResult {
        if self.accept.load(Ordering::SeqCst) {
            SkillResult::success(meta.target())
        } else {
            SkillResult::failure()
        }
    }

    fn when_cast(
        &self,
        _engine: &Arc<CombatEngine>,
        _meta: &SkillMetadata,
        _result: &SkillResult,
    ) -> EngineResult<()> {
        self.casts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
