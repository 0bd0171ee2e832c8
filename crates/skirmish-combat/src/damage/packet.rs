//! Damage types and damage packets
//!
//! An attack is split into packets so each part can be scaled
//! independently: a sword hit carrying a fire enchant is one physical
//! weapon packet plus one fire packet.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use skirmish_core::{EngineError, EngineResult};

use super::element::Element;

/// What kind of damage a packet deals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DamageType {
    Magic,
    Physical,
    /// Dealt with a weapon
    Weapon,
    /// Dealt by a skill
    Skill,
    Projectile,
    /// Bare-handed
    Unarmed,
    /// Damage over time
    Dot,
}

impl DamageType {
    pub fn all() -> &'static [DamageType] {
        &[
            Self::Magic,
            Self::Physical,
            Self::Weapon,
            Self::Skill,
            Self::Projectile,
            Self::Unarmed,
            Self::Dot,
        ]
    }

    /// Display name
    pub fn name(self) -> &'static str {
        match self {
            Self::Magic => "Magic",
            Self::Physical => "Physical",
            Self::Weapon => "Weapon",
            Self::Skill => "Skill",
            Self::Projectile => "Projectile",
            Self::Unarmed => "Unarmed",
            Self::Dot => "DoT",
        }
    }
}

/// One discrete contribution to an attack
#[derive(Debug, Clone, PartialEq)]
pub struct DamagePacket {
    value: f64,
    types: BTreeSet<DamageType>,
    element: Option<Element>,
    additive_modifiers: f64,
    multiplicative_modifiers: f64,
}

impl DamagePacket {
    /// Fails with `InvalidArgument` if `value` is negative
    pub fn new(
        value: f64,
        element: Option<Element>,
        types: impl IntoIterator<Item = DamageType>,
    ) -> EngineResult<Self> {
        check_value(value)?;
        Ok(Self {
            value,
            types: types.into_iter().collect(),
            element,
            additive_modifiers: 0.0,
            multiplicative_modifiers: 1.0,
        })
    }

    /// Raw value before modifiers
    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn set_value(&mut self, value: f64) -> EngineResult<()> {
        check_value(value)?;
        self.value = value;
        Ok(())
    }

    pub fn types(&self) -> &BTreeSet<DamageType> {
        &self.types
    }

    pub fn element(&self) -> Option<Element> {
        self.element
    }

    pub fn set_element(&mut self, element: Option<Element>) {
        self.element = element;
    }

    pub fn has_type(&self, damage_type: DamageType) -> bool {
        self.types.contains(&damage_type)
    }

    /// Exact element match, `None` matching element-less packets
    pub fn is_element(&self, element: Option<Element>) -> bool {
        self.element == element
    }

    /// Stacking bonus: `0.2` adds 20% of the raw value
    pub fn additive_modifier(&mut self, multiplier: f64) {
        self.additive_modifiers += multiplier;
    }

    /// Non-stacking scale, used for crits: `1.5` increases final damage by 50%.
    ///
    /// Fails with `InvalidArgument` if `coefficient` is negative.
    pub fn multiplicative_modifier(&mut self, coefficient: f64) -> EngineResult<()> {
        if coefficient < 0.0 {
            return Err(EngineError::invalid_argument(format!(
                "damage coefficient cannot be negative, got {}",
                coefficient
            )));
        }
        self.multiplicative_modifiers *= coefficient;
        Ok(())
    }

    /// Value after every modifier, never negative
    pub fn final_value(&self) -> f64 {
        self.value * (1.0 + self.additive_modifiers).max(0.0) * self.multiplicative_modifiers
    }
}

impl fmt::Display for DamagePacket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}*{}*{})x",
            self.value, self.additive_modifiers, self.multiplicative_modifiers
        )?;
        let names: Vec<&str> = self.types.iter().map(|t| t.name()).collect();
        write!(f, "{}", names.join("/"))?;
        if let Some(element) = self.element {
            write!(f, ", element={}", element.name())?;
        }
        Ok(())
    }
}

fn check_value(value: f64) -> EngineResult<()> {
    if value < 0.0 || value.is_nan() {
        return Err(EngineError::invalid_argument(format!(
            "damage value cannot be negative, got {}",
            value
        )));
    }
    Ok(())
}
