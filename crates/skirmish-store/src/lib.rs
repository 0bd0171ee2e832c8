//! Skirmish Store - Entity-scoped state and host-facing plumbing
//!
//! Per-entity state lives in an [`EntityStore`] whose lifecycle follows the
//! host's connect and disconnect notifications. Named handlers live in a
//! [`Registry`]. Periodic work goes through the [`Scheduler`] contract.

mod entity;
mod resource;
mod system;

pub use entity::{EntityState, EntityStore};
pub use resource::Registry;
pub use system::{Scheduler, TaskCallback, TickScheduler};
