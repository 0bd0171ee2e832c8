//! Queries the engine makes against the host game server
//!
//! Every query is synchronous and side-effect free. Unknown entities are
//! reported as dead, non-player, and without health.

use skirmish_core::EntityId;

use crate::modifier::Hand;

/// What an entity holds in a hand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeldItem {
    Empty,
    Weapon,
    Other,
}

/// The host's view of its entities and world
pub trait HostWorld: Send + Sync {
    /// Current server tick
    fn current_tick(&self) -> u64;

    /// Whether the entity exists, is living and is not dead
    fn is_alive(&self, entity: EntityId) -> bool;

    /// Remaining health of a living entity
    fn health(&self, entity: EntityId) -> Option<f64>;

    fn is_player(&self, entity: EntityId) -> bool;

    /// Whether the entity may be targeted at all, e.g. not invulnerable or hidden
    fn is_targetable(&self, entity: EntityId) -> bool {
        self.is_alive(entity)
    }

    /// Whether PvP is enabled where the entity stands
    fn pvp_enabled(&self, entity: EntityId) -> bool;

    fn held_item(&self, entity: EntityId, hand: Hand) -> HeldItem;
}
