//! Interaction rule matrix
//!
//! One boolean per (relationship, offense or support, pvp on or off), read
//! from `interaction-rules.<pvp-on|pvp-off>.<offense|support>.<relationship>`.
//! Unconfigured entries permit the interaction.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use super::relationship::{InteractionType, Relationship};
use crate::config::ConfigAdapter;

/// Decides which interactions are allowed between related entities
pub trait InteractionRules: Send + Sync {
    /// Whether support interactions may target non-player entities
    fn is_support_skills_on_mobs(&self) -> bool;

    fn is_enabled(
        &self,
        interaction: InteractionType,
        relationship: Relationship,
        pvp: bool,
    ) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct RuleKey {
    relationship: Relationship,
    offensive: bool,
    pvp: bool,
}

/// Rules loaded from configuration
#[derive(Debug, Clone)]
pub struct RuleMatrix {
    support_skills_on_mobs: bool,
    rules: HashMap<RuleKey, bool>,
}

impl RuleMatrix {
    pub fn load(config: &dyn ConfigAdapter) -> Self {
        let mut matrix = Self {
            support_skills_on_mobs: config
                .get_bool("interaction-rules.support-skills-on-mobs", true),
            rules: HashMap::new(),
        };

        for &relationship in Relationship::all() {
            for (offensive, pvp) in [(true, true), (false, true), (true, false), (false, false)] {
                let enabled = config.get_bool(&Self::path(relationship, offensive, pvp), true);
                matrix.set(relationship, offensive, pvp, enabled);
            }
            // offense outside pvp only ever targets oneself
            if relationship != Relationship::SelfTarget {
                matrix.set(relationship, true, false, false);
            }
        }
        matrix.set(Relationship::PartyOther, true, true, true);
        matrix.set(Relationship::GuildEnemy, true, true, true);
        matrix
    }

    fn path(relationship: Relationship, offensive: bool, pvp: bool) -> String {
        format!(
            "interaction-rules.{}.{}.{}",
            if pvp { "pvp-on" } else { "pvp-off" },
            if offensive { "offense" } else { "support" },
            relationship.config_name()
        )
    }

    fn set(&mut self, relationship: Relationship, offensive: bool, pvp: bool, enabled: bool) {
        self.rules.insert(
            RuleKey {
                relationship,
                offensive,
                pvp,
            },
            enabled,
        );
    }
}

impl InteractionRules for RuleMatrix {
    fn is_support_skills_on_mobs(&self) -> bool {
        self.support_skills_on_mobs
    }

    fn is_enabled(
        &self,
        interaction: InteractionType,
        relationship: Relationship,
        pvp: bool,
    ) -> bool {
        let key = RuleKey {
            relationship,
            offensive: interaction.is_offense(),
            pvp,
        };
        self.rules.get(&key).copied().unwrap_or(true)
    }
}

/// Rules that allow everything, used when interaction rules are disabled
#[derive(Debug, Clone, Copy, Default)]
pub struct PermissiveRules;

impl InteractionRules for PermissiveRules {
    fn is_support_skills_on_mobs(&self) -> bool {
        true
    }

    fn is_enabled(
        &self,
        _interaction: InteractionType,
        _relationship: Relationship,
        _pvp: bool,
    ) -> bool {
        true
    }
}

/// Build the rules described by `config`.
///
/// `interaction-rules.enabled = false` installs [`PermissiveRules`].
pub fn load_rules(config: &dyn ConfigAdapter) -> Arc<dyn InteractionRules> {
    if config.get_bool("interaction-rules.enabled", true) {
        Arc::new(RuleMatrix::load(config))
    } else {
        info!("Interaction rules disabled, every interaction is allowed");
        Arc::new(PermissiveRules)
    }
}
