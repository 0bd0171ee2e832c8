//! Stat modifiers

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::modifier::{EntityModifier, ModifierHeader, ModifierType};
use crate::state::CombatState;

use super::instance::InstanceModifier;

/// A numeric modifier applied to one named stat of an entity
#[derive(Debug, Clone)]
pub struct StatModifier {
    header: ModifierHeader,
    stat: String,
    value: f64,
    modifier_type: ModifierType,
}

impl StatModifier {
    pub fn new(
        stat: impl Into<String>,
        header: ModifierHeader,
        value: f64,
        modifier_type: ModifierType,
    ) -> Self {
        Self {
            header,
            stat: stat.into(),
            value,
            modifier_type,
        }
    }

    /// Flat modifier that applies whatever the acting hand
    pub fn flat(stat: impl Into<String>, key: impl Into<String>, value: f64) -> Self {
        Self::new(stat, ModifierHeader::other(key), value, ModifierType::Flat)
    }

    /// Relative modifier that applies whatever the acting hand
    pub fn relative(stat: impl Into<String>, key: impl Into<String>, value: f64) -> Self {
        Self::new(stat, ModifierHeader::other(key), value, ModifierType::Relative)
    }

    pub fn stat(&self) -> &str {
        &self.stat
    }

    /// Copy with the same identity and `value + offset`, used when a buff stacks
    pub fn add(&self, offset: f64) -> Self {
        Self {
            value: self.value + offset,
            ..self.clone()
        }
    }
}

impl EntityModifier for StatModifier {
    fn header(&self) -> &ModifierHeader {
        &self.header
    }

    fn register(&self, state: &CombatState) {
        state
            .stats()
            .instance(&self.stat)
            .register_modifier(Arc::new(self.clone()));
    }

    fn unregister(&self, state: &CombatState) {
        if let Some(instance) = state.stats().get(&self.stat) {
            instance.remove_modifier(self.unique_id());
        }
    }
}

impl InstanceModifier for StatModifier {
    fn value(&self) -> f64 {
        self.value
    }

    fn modifier_type(&self) -> ModifierType {
        self.modifier_type
    }
}

impl PartialEq for StatModifier {
    fn eq(&self, other: &Self) -> bool {
        self.unique_id() == other.unique_id()
    }
}

impl Eq for StatModifier {}

impl Hash for StatModifier {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.unique_id().hash(state);
    }
}

impl fmt::Display for StatModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.modifier_type {
            ModifierType::Flat => write!(f, "{}", self.value),
            ModifierType::Relative => write!(f, "{}%", self.value),
        }
    }
}
