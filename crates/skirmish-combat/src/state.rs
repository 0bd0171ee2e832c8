//! Combat state of one connected entity

use skirmish_store::EntityState;

use crate::skill::{CastingSet, CooldownMap, SkillModifierMap};
use crate::stat::StatMap;

/// Stats, skill modifiers, cooldowns and ongoing casts of an entity.
///
/// Created when the entity connects, released when it disconnects.
#[derive(Default)]
pub struct CombatState {
    stats: StatMap,
    skill_modifiers: SkillModifierMap,
    cooldowns: CooldownMap,
    casting: CastingSet,
}

impl CombatState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> &StatMap {
        &self.stats
    }

    pub fn skill_modifiers(&self) -> &SkillModifierMap {
        &self.skill_modifiers
    }

    pub fn cooldowns(&self) -> &CooldownMap {
        &self.cooldowns
    }

    pub fn casting(&self) -> &CastingSet {
        &self.casting
    }
}

impl EntityState for CombatState {
    fn release(&self) {
        self.stats.clear();
        self.skill_modifiers.clear();
        self.cooldowns.clear();
        self.casting.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modifier::EntityModifier;
    use crate::stat::StatModifier;

    #[test]
    fn test_release_drops_everything() {
        let state = CombatState::new();
        StatModifier::flat("attack_damage", "sword", 4.0).register(&state);
        state.casting().on_cast_start("dash".into());
        assert_eq!(state.stats().total("attack_damage", 1.0), 5.0);

        state.release();
        assert_eq!(state.stats().total("attack_damage", 1.0), 1.0);
        assert!(!state.casting().is_casting());
    }
}
