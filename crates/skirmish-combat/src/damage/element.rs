//! Damage elements
//!
//! 8 elements: Fire, Ice, Earth, Wind, Thunder, Water, Darkness, Lightness.
//! Elements only tag damage packets; they carry no multiplier of their own.

use serde::{Deserialize, Serialize};

/// The 8 damage elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Element {
    Fire,
    Ice,
    Earth,
    Wind,
    Thunder,
    Water,
    Darkness,
    Lightness,
}

impl Element {
    /// Display name
    pub fn name(self) -> &'static str {
        match self {
            Self::Fire => "Fire",
            Self::Ice => "Ice",
            Self::Earth => "Earth",
            Self::Wind => "Wind",
            Self::Thunder => "Thunder",
            Self::Water => "Water",
            Self::Darkness => "Darkness",
            Self::Lightness => "Lightness",
        }
    }

    /// Glyph shown next to damage indicators
    pub fn icon(self) -> &'static str {
        match self {
            Self::Fire => "\u{1F525}",
            Self::Ice => "\u{2744}",
            Self::Earth => "\u{1FAA8}",
            Self::Wind => "\u{1F32C}",
            Self::Thunder => "\u{26A1}",
            Self::Water => "\u{1F4A7}",
            Self::Darkness => "\u{1F311}",
            Self::Lightness => "\u{2600}",
        }
    }

    /// All element variants
    pub fn all() -> &'static [Element] {
        &[
            Self::Fire,
            Self::Ice,
            Self::Earth,
            Self::Wind,
            Self::Thunder,
            Self::Water,
            Self::Darkness,
            Self::Lightness,
        ]
    }
}
