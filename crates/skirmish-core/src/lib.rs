//! Skirmish Core - Shared types for the Skirmish combat engine
//!
//! This crate provides the foundational types used throughout the engine:
//! - Entity, modifier and task identifiers
//! - The engine error taxonomy

pub mod error;
pub mod types;

pub use error::{EngineError, EngineResult};
pub use types::{EntityId, ModifierId, TaskId};
