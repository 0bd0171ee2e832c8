//! Host damage causes and the damage types they imply

use serde::{Deserialize, Serialize};

use super::packet::DamageType;
use crate::host::HeldItem;

/// Why the host is applying damage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageCause {
    EntityAttack,
    SweepAttack,
    Projectile,
    Magic,
    DragonBreath,
    Poison,
    Wither,
    FireTick,
    Melting,
    Starvation,
    DryOut,
    Freeze,
    Fire,
    Lava,
    HotFloor,
    Lightning,
    Contact,
    Drowning,
    Suffocation,
    Fall,
    FlyIntoWall,
    FallingBlock,
    BlockExplosion,
    EntityExplosion,
    Thorns,
    Cramming,
    Void,
    Suicide,
    Custom,
}

impl DamageCause {
    /// Whether a living attacker hit the target directly
    pub fn is_melee(self) -> bool {
        matches!(self, Self::EntityAttack | Self::SweepAttack)
    }

    /// Damage types implied by the cause alone
    pub fn damage_types(self) -> Vec<DamageType> {
        use DamageType::*;
        match self {
            Self::Magic | Self::DragonBreath => vec![Magic],
            Self::Poison | Self::Wither => vec![Magic, Dot],
            Self::FireTick | Self::Melting => vec![Physical, Dot],
            Self::Starvation | Self::DryOut | Self::Freeze => vec![Dot],
            Self::Projectile => vec![Physical, Projectile],
            Self::Custom => Vec::new(),
            _ => vec![Physical],
        }
    }

    /// Damage types of a hit dealt with `held` in the attacking hand
    pub fn melee_damage_types(self, held: HeldItem) -> Vec<DamageType> {
        if !self.is_melee() {
            return self.damage_types();
        }
        match held {
            HeldItem::Empty => vec![DamageType::Unarmed, DamageType::Physical],
            HeldItem::Weapon => vec![DamageType::Weapon, DamageType::Physical],
            HeldItem::Other => vec![DamageType::Physical],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cause_mapping() {
        assert_eq!(DamageCause::Wither.damage_types(), vec![DamageType::Magic, DamageType::Dot]);
        assert_eq!(
            DamageCause::Melting.damage_types(),
            vec![DamageType::Physical, DamageType::Dot]
        );
        assert_eq!(DamageCause::Freeze.damage_types(), vec![DamageType::Dot]);
        assert_eq!(
            DamageCause::Projectile.damage_types(),
            vec![DamageType::Physical, DamageType::Projectile]
        );
        assert_eq!(DamageCause::Fall.damage_types(), vec![DamageType::Physical]);
        assert!(DamageCause::Custom.damage_types().is_empty());
    }

    #[test]
    fn test_melee_depends_on_held_item() {
        let cause = DamageCause::EntityAttack;
        assert_eq!(
            cause.melee_damage_types(HeldItem::Empty),
            vec![DamageType::Unarmed, DamageType::Physical]
        );
        assert_eq!(
            cause.melee_damage_types(HeldItem::Weapon),
            vec![DamageType::Weapon, DamageType::Physical]
        );
        assert_eq!(cause.melee_damage_types(HeldItem::Other), vec![DamageType::Physical]);
        // held item is irrelevant outside melee
        assert_eq!(
            DamageCause::Magic.melee_damage_types(HeldItem::Weapon),
            vec![DamageType::Magic]
        );
    }
}
