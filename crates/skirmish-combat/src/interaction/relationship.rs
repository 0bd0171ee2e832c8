//! Relationships between two entities and interaction kinds

use serde::{Deserialize, Serialize};
use skirmish_core::EntityId;

/// Social link between a source and a target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Relationship {
    /// Source and target are the same entity
    SelfTarget,
    PartyMember,
    /// In the same party
    PartyOther,
    GuildAlly,
    GuildNeutral,
    /// Belongs to an enemy guild
    GuildEnemy,
    Friend,
    Neutral,
}

impl Relationship {
    pub fn all() -> &'static [Relationship] {
        &[
            Self::SelfTarget,
            Self::PartyMember,
            Self::PartyOther,
            Self::GuildAlly,
            Self::GuildNeutral,
            Self::GuildEnemy,
            Self::Friend,
            Self::Neutral,
        ]
    }

    /// Kebab-case name used in configuration paths
    pub fn config_name(self) -> &'static str {
        match self {
            Self::SelfTarget => "self",
            Self::PartyMember => "party-member",
            Self::PartyOther => "party-other",
            Self::GuildAlly => "guild-ally",
            Self::GuildNeutral => "guild-neutral",
            Self::GuildEnemy => "guild-enemy",
            Self::Friend => "friend",
            Self::Neutral => "neutral",
        }
    }
}

/// Kind of interaction a source attempts on a target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InteractionType {
    /// Basic attack
    OffenseAction,
    OffenseSkill,
    /// Non-skill support, e.g. trading or healing items
    SupportAction,
    SupportSkill,
}

impl InteractionType {
    pub fn is_offense(self) -> bool {
        matches!(self, Self::OffenseAction | Self::OffenseSkill)
    }

    pub fn is_support(self) -> bool {
        !self.is_offense()
    }

    pub fn is_skill(self) -> bool {
        matches!(self, Self::OffenseSkill | Self::SupportSkill)
    }

    pub fn is_action(self) -> bool {
        !self.is_skill()
    }
}

/// Classifies the relationship between two entities (parties, guilds, ...).
pub trait RelationshipHandler: Send + Sync {
    fn relationship(&self, source: EntityId, target: EntityId) -> Relationship;
}

/// Veto over any interaction, e.g. invulnerable NPCs or protected regions.
pub trait InteractionRestriction: Send + Sync {
    /// `false` denies the interaction
    fn can_target(&self, source: EntityId, target: EntityId, interaction: InteractionType) -> bool;
}
