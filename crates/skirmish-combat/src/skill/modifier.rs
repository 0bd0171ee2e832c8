//! Modifiers of skill parameters

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use skirmish_core::{EngineError, EngineResult};

use super::handler::SkillId;
use crate::modifier::{EntityModifier, ModifierHeader, ModifierMap, ModifierType};
use crate::stat::{aggregate, InstanceModifier};
use crate::state::CombatState;

/// Changes one parameter of a set of skills, e.g. -20% cooldown on two skills
#[derive(Debug, Clone)]
pub struct SkillModifier {
    header: ModifierHeader,
    value: f64,
    modifier_type: ModifierType,
    targets: BTreeSet<SkillId>,
    parameter: String,
}

impl SkillModifier {
    /// Fails with `InvalidArgument` if `targets` is empty
    pub fn new(
        header: ModifierHeader,
        targets: impl IntoIterator<Item = SkillId>,
        parameter: impl Into<String>,
        value: f64,
        modifier_type: ModifierType,
    ) -> EngineResult<Self> {
        let targets: BTreeSet<SkillId> = targets.into_iter().collect();
        if targets.is_empty() {
            return Err(EngineError::invalid_argument(
                "a skill modifier must target at least one skill",
            ));
        }
        Ok(Self {
            header,
            value,
            modifier_type,
            targets,
            parameter: parameter.into(),
        })
    }

    pub fn targets(&self) -> &BTreeSet<SkillId> {
        &self.targets
    }

    pub fn parameter(&self) -> &str {
        &self.parameter
    }

    /// Whether this modifier changes `parameter` of `skill`
    pub fn applies_to(&self, skill: &SkillId, parameter: &str) -> bool {
        self.parameter == parameter && self.targets.contains(skill)
    }

    /// Copy with the same identity and `value + offset`
    pub fn add(&self, offset: f64) -> Self {
        Self {
            value: self.value + offset,
            ..self.clone()
        }
    }
}

impl EntityModifier for SkillModifier {
    fn header(&self) -> &ModifierHeader {
        &self.header
    }

    fn register(&self, state: &CombatState) {
        state.skill_modifiers().add_modifier(Arc::new(self.clone()));
    }

    fn unregister(&self, state: &CombatState) {
        state.skill_modifiers().remove_modifier(self.unique_id());
    }
}

impl InstanceModifier for SkillModifier {
    fn value(&self) -> f64 {
        self.value
    }

    fn modifier_type(&self) -> ModifierType {
        self.modifier_type
    }
}

impl PartialEq for SkillModifier {
    fn eq(&self, other: &Self) -> bool {
        self.unique_id() == other.unique_id()
    }
}

impl Eq for SkillModifier {}

impl fmt::Display for SkillModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suffix = match self.modifier_type {
            ModifierType::Flat => "",
            ModifierType::Relative => "%",
        };
        write!(f, "{}{} {}", self.value, suffix, self.parameter)
    }
}

/// The skill modifiers of one entity
pub type SkillModifierMap = ModifierMap<SkillModifier>;

impl ModifierMap<SkillModifier> {
    /// Resolve `parameter` of `skill` starting from `base`.
    ///
    /// Acting hands play no part here.
    pub fn calculate_value(&self, skill: &SkillId, base: f64, parameter: &str) -> f64 {
        let modifiers = self.modifiers();
        aggregate(
            base,
            modifiers.iter().map(|m| &**m),
            |m: &SkillModifier| m.applies_to(skill, parameter),
            |m: &SkillModifier| m.value(),
        )
    }
}
