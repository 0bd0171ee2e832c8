//! Skill handlers: the behaviour behind a skill

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use skirmish_core::{EngineResult, EntityId};

use super::cast::SkillMetadata;
use crate::engine::CombatEngine;

/// Parameters every handler accepts
pub const DEFAULT_PARAMETERS: [&str; 5] = ["cooldown", "mana", "stamina", "timer", "delay"];

/// Normalized skill identifier: lowercase, `-` and spaces turned into `_`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SkillId(String);

impl SkillId {
    pub fn new(id: &str) -> Self {
        Self(id.to_lowercase().replace(['-', ' '], "_"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SkillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SkillId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// What a handler decided when asked whether its skill can be cast
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkillResult {
    successful: bool,
    target: Option<EntityId>,
}

impl SkillResult {
    pub fn success(target: Option<EntityId>) -> Self {
        Self {
            successful: true,
            target,
        }
    }

    pub fn failure() -> Self {
        Self {
            successful: false,
            target: None,
        }
    }

    pub fn is_successful(&self) -> bool {
        self.successful
    }

    /// Entity the skill will affect, when the handler picked one
    pub fn target(&self) -> Option<EntityId> {
        self.target
    }
}

/// Identifier and declared parameters of a handler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerInfo {
    id: SkillId,
    parameters: BTreeSet<String>,
}

impl HandlerInfo {
    /// Info declaring the default parameters plus `extra`
    pub fn new<'a>(id: &str, extra: impl IntoIterator<Item = &'a str>) -> Self {
        let parameters = DEFAULT_PARAMETERS
            .into_iter()
            .chain(extra)
            .map(String::from)
            .collect();
        Self {
            id: SkillId::new(id),
            parameters,
        }
    }

    pub fn id(&self) -> &SkillId {
        &self.id
    }

    pub fn parameters(&self) -> &BTreeSet<String> {
        &self.parameters
    }
}

/// Behaviour of a skill.
///
/// `result` decides whether the skill can be cast right now and is called
/// before any other check. `when_cast` applies the effects.
pub trait SkillHandler: Send + Sync {
    fn info(&self) -> &HandlerInfo;

    fn result(&self, engine: &CombatEngine, meta: &SkillMetadata) -> SkillResult;

    /// Apply the effects. Takes the shared engine so effects can schedule
    /// a [`CastTask`](super::CastTask).
    fn when_cast(
        &self,
        engine: &Arc<CombatEngine>,
        meta: &SkillMetadata,
        result: &SkillResult,
    ) -> EngineResult<()>;

    fn id(&self) -> &SkillId {
        self.info().id()
    }

    fn parameters(&self) -> &BTreeSet<String> {
        self.info().parameters()
    }
}
