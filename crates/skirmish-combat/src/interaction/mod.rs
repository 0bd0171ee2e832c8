//! Interaction rules
//!
//! Relationship classification, the pvp/offense rule matrix and the gate
//! every entity-to-entity interaction goes through.

pub mod gate;
pub mod relationship;
pub mod rules;

pub use gate::InteractionGate;
pub use relationship::{InteractionRestriction, InteractionType, Relationship, RelationshipHandler};
pub use rules::{load_rules, InteractionRules, PermissiveRules, RuleMatrix};
