//! Gate deciding whether one entity may interact with another

use std::sync::Arc;

use parking_lot::RwLock;
use skirmish_core::EntityId;
use tracing::info;

use super::relationship::{
    InteractionRestriction, InteractionType, Relationship, RelationshipHandler,
};
use super::rules::{load_rules, InteractionRules};
use crate::config::ConfigAdapter;
use crate::host::HostWorld;

/// Restrictions, relationship handlers and the active rule set.
///
/// The rule set is swapped atomically on reload; readers keep the rules they
/// started with.
pub struct InteractionGate {
    rules: RwLock<Arc<dyn InteractionRules>>,
    restrictions: RwLock<Vec<Arc<dyn InteractionRestriction>>>,
    relationship_handlers: RwLock<Vec<Arc<dyn RelationshipHandler>>>,
}

impl InteractionGate {
    pub fn new(rules: Arc<dyn InteractionRules>) -> Self {
        Self {
            rules: RwLock::new(rules),
            restrictions: RwLock::new(Vec::new()),
            relationship_handlers: RwLock::new(Vec::new()),
        }
    }

    pub fn from_config(config: &dyn ConfigAdapter) -> Self {
        Self::new(load_rules(config))
    }

    /// The active rule set
    pub fn rules(&self) -> Arc<dyn InteractionRules> {
        Arc::clone(&self.rules.read())
    }

    /// Rebuild the rules from configuration and swap them in.
    pub fn reload(&self, config: &dyn ConfigAdapter) {
        let rules = load_rules(config);
        *self.rules.write() = rules;
        info!("Reloaded interaction rules");
    }

    pub fn register_restriction(&self, restriction: Arc<dyn InteractionRestriction>) {
        self.restrictions.write().push(restriction);
    }

    pub fn register_relationship_handler(&self, handler: Arc<dyn RelationshipHandler>) {
        self.relationship_handlers.write().push(handler);
    }

    /// Whether `source` may perform `interaction` on `target`.
    pub fn can_interact(
        &self,
        host: &dyn HostWorld,
        source: EntityId,
        target: EntityId,
        interaction: InteractionType,
    ) -> bool {
        if source == target
            || !host.is_alive(source)
            || !host.is_alive(target)
            || !host.is_targetable(target)
        {
            return false;
        }

        let restrictions = self.restrictions.read().clone();
        if restrictions
            .iter()
            .any(|r| !r.can_target(source, target, interaction))
        {
            return false;
        }

        let rules = self.rules();
        if host.is_player(target) {
            let pvp = host.pvp_enabled(target);
            if interaction.is_offense() && !pvp {
                return false;
            }
            self.is_interaction_allowed(rules.as_ref(), source, target, interaction, pvp)
        } else {
            interaction.is_offense() || rules.is_support_skills_on_mobs()
        }
    }

    /// Check every relationship between `source` and `target` against the rules.
    pub fn is_interaction_allowed(
        &self,
        rules: &dyn InteractionRules,
        source: EntityId,
        target: EntityId,
        interaction: InteractionType,
        pvp: bool,
    ) -> bool {
        if source == target {
            return rules.is_enabled(interaction, Relationship::SelfTarget, pvp);
        }
        let handlers = self.relationship_handlers.read().clone();
        handlers
            .iter()
            .all(|h| rules.is_enabled(interaction, h.relationship(source, target), pvp))
    }
}
