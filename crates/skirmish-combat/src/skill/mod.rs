//! Skill casting
//!
//! A [`SkillHandler`] implements what a skill does; a [`Skill`] gives it
//! parameter values. Parameters are resolved through the caster's skill
//! modifiers at cast time.

pub mod cast;
pub mod cooldown;
pub mod handler;
pub mod modifier;
pub mod runnable;

pub use cast::{CastOutcome, Skill, SkillMetadata};
pub use cooldown::{seconds_to_ticks, CooldownMap, TICKS_PER_SECOND};
pub use handler::{HandlerInfo, SkillHandler, SkillId, SkillResult, DEFAULT_PARAMETERS};
pub use modifier::{SkillModifier, SkillModifierMap};
pub use runnable::{CastTask, CastingSet, SkillRunnable};
