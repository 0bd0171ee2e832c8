//! Modifier sources, equipment slots and hand isolation
//!
//! A modifier is anchored to an [`EquipmentSlot`] and classified by a
//! [`ModifierSource`]. Whether it counts toward a computation performed with
//! a given acting hand is decided by [`EquipmentSlot::is_compatible`] alone.

use std::fmt;

use serde::{Deserialize, Serialize};
use skirmish_core::{EngineError, EngineResult};

/// Why a modifier exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModifierSource {
    /// Melee weapon held in either hand
    MeleeWeapon,
    /// Ranged weapon held in either hand
    RangedWeapon,
    /// Item that only applies from the off hand
    OffhandItem,
    /// Item that only applies from the main hand
    MainhandItem,
    /// Item that applies from either hand
    HandItem,
    Armor,
    Accessory,
    /// Auras, buffs and anything not tied to equipment
    Other,
    /// Never applies
    Void,
}

impl ModifierSource {
    /// All modifier sources
    pub fn all() -> &'static [ModifierSource] {
        &[
            Self::MeleeWeapon,
            Self::RangedWeapon,
            Self::OffhandItem,
            Self::MainhandItem,
            Self::HandItem,
            Self::Armor,
            Self::Accessory,
            Self::Other,
            Self::Void,
        ]
    }

    /// Display name
    pub fn name(self) -> &'static str {
        match self {
            Self::MeleeWeapon => "Melee Weapon",
            Self::RangedWeapon => "Ranged Weapon",
            Self::OffhandItem => "Off-hand Item",
            Self::MainhandItem => "Main-hand Item",
            Self::HandItem => "Hand Item",
            Self::Armor => "Armor",
            Self::Accessory => "Accessory",
            Self::Other => "Other",
            Self::Void => "Void",
        }
    }

    pub fn is_weapon(self) -> bool {
        matches!(self, Self::MeleeWeapon | Self::RangedWeapon)
    }

    /// Whether the source is an equipped item of any kind
    pub fn is_equipment(self) -> bool {
        !matches!(self, Self::Other | Self::Void)
    }

    /// Whether the source is an item held in a hand
    pub fn is_handheld(self) -> bool {
        self.is_equipment() && !matches!(self, Self::Armor | Self::Accessory)
    }
}

/// Where a modifier is anchored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquipmentSlot {
    Armor,
    Accessory,
    MainHand,
    OffHand,
    /// Fictive slot: modifiers anchored here always apply
    Other,
}

impl EquipmentSlot {
    /// All equipment slot variants
    pub fn all() -> &'static [EquipmentSlot] {
        &[
            Self::Armor,
            Self::Accessory,
            Self::MainHand,
            Self::OffHand,
            Self::Other,
        ]
    }

    /// Display name
    pub fn name(self) -> &'static str {
        match self {
            Self::Armor => "Armor",
            Self::Accessory => "Accessory",
            Self::MainHand => "Main Hand",
            Self::OffHand => "Off Hand",
            Self::Other => "Other",
        }
    }

    pub fn is_hand(self) -> bool {
        self.as_hand().is_some()
    }

    /// The hand this slot stands for, if it is one
    pub fn as_hand(self) -> Option<Hand> {
        match self {
            Self::MainHand => Some(Hand::MainHand),
            Self::OffHand => Some(Hand::OffHand),
            _ => None,
        }
    }

    /// Fails with `InvalidArgument` unless this slot is a hand
    pub fn require_hand(self) -> EngineResult<Hand> {
        self.as_hand().ok_or_else(|| {
            EngineError::invalid_argument(format!("{} is not a hand slot", self.name()))
        })
    }

    /// The other hand
    pub fn opposite_hand(self) -> EngineResult<EquipmentSlot> {
        Ok(self.require_hand()?.opposite().slot())
    }

    /// Whether a modifier anchored at `slot` with the given `source` counts
    /// toward a computation performed with this slot as the acting hand.
    ///
    /// Fails with `InvalidArgument` if this slot is not a hand.
    pub fn is_compatible(self, source: ModifierSource, slot: EquipmentSlot) -> EngineResult<bool> {
        Ok(self.require_hand()?.is_compatible(source, slot))
    }
}

impl fmt::Display for EquipmentSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An acting hand. Stored wherever a hand is remembered so that a non-hand
/// slot can never be used as one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Hand {
    #[default]
    MainHand,
    OffHand,
}

impl Hand {
    pub fn all() -> &'static [Hand] {
        &[Self::MainHand, Self::OffHand]
    }

    pub fn slot(self) -> EquipmentSlot {
        match self {
            Self::MainHand => EquipmentSlot::MainHand,
            Self::OffHand => EquipmentSlot::OffHand,
        }
    }

    pub fn opposite(self) -> Hand {
        match self {
            Self::MainHand => Self::OffHand,
            Self::OffHand => Self::MainHand,
        }
    }

    /// Compatibility rules, first match wins.
    pub fn is_compatible(self, source: ModifierSource, slot: EquipmentSlot) -> bool {
        if slot == EquipmentSlot::Other {
            return true;
        }
        match source {
            ModifierSource::Void => false,
            ModifierSource::Other => true,
            // weapon modifiers from the other hand never apply
            ModifierSource::MeleeWeapon | ModifierSource::RangedWeapon => slot == self.slot(),
            ModifierSource::OffhandItem => slot == EquipmentSlot::OffHand,
            ModifierSource::MainhandItem => slot == EquipmentSlot::MainHand,
            ModifierSource::HandItem => slot.is_hand(),
            ModifierSource::Armor => slot == EquipmentSlot::Armor,
            ModifierSource::Accessory => slot == EquipmentSlot::Accessory,
        }
    }
}

impl From<Hand> for EquipmentSlot {
    fn from(hand: Hand) -> Self {
        hand.slot()
    }
}

/// How a modifier's value is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModifierType {
    /// Added to the running total
    Flat,
    /// Scales the running total by `1 + value / 100`
    Relative,
}
