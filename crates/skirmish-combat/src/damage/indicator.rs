//! Floating damage numbers
//!
//! Packets of a finalized attack are grouped by (physical, element) and each
//! group becomes one indicator. Indicators never alter the attack.

use std::collections::BTreeMap;
use std::sync::Arc;

use skirmish_core::EntityId;

use super::element::Element;
use super::metadata::{DamageMetadata, MINIMAL_DAMAGE};
use super::packet::DamageType;
use crate::event::{AttackUnregisteredEvent, CombatListener};

const WEAPON_ICON: &str = "\u{1F5E1}";
const SKILL_ICON: &str = "\u{2605}";

/// One damage number shown above a target
#[derive(Debug, Clone, PartialEq)]
pub struct Indicator {
    pub physical: bool,
    pub element: Option<Element>,
    pub crit: bool,
    pub amount: f64,
}

impl Indicator {
    pub fn icon(&self) -> String {
        let mut icon = String::from(if self.physical { WEAPON_ICON } else { SKILL_ICON });
        if let Some(element) = self.element {
            icon.push_str(element.icon());
        }
        icon
    }

    /// Rendered text, e.g. `🗡🔥 12.5`. Crits are marked with `!`.
    pub fn text(&self) -> String {
        format!(
            "{} {:.1}{}",
            self.icon(),
            self.amount,
            if self.crit { "!" } else { "" }
        )
    }
}

/// Build the indicators of an attack whose final damage was `final_damage`.
///
/// The difference between `final_damage` and the metadata's own total (host
/// armor and the like) is spread evenly over the groups.
pub fn indicators(metadata: &DamageMetadata, final_damage: f64) -> Vec<Indicator> {
    if metadata.damage() <= MINIMAL_DAMAGE {
        return Vec::new();
    }

    let mut grouped: BTreeMap<(bool, Option<Element>), f64> = BTreeMap::new();
    for packet in metadata.packets() {
        let group = (packet.has_type(DamageType::Physical), packet.element());
        *grouped.entry(group).or_insert(0.0) += packet.final_value();
    }

    let modifier = (final_damage - metadata.damage()) / grouped.len().max(1) as f64;
    grouped
        .into_iter()
        .map(|((physical, element), amount)| Indicator {
            physical,
            element,
            crit: is_crit(metadata, physical, element),
            amount: amount + modifier,
        })
        .collect()
}

fn is_crit(metadata: &DamageMetadata, physical: bool, element: Option<Element>) -> bool {
    let crit = if physical {
        metadata.is_weapon_crit()
    } else {
        metadata.is_skill_crit()
    };
    crit || element.is_some_and(|e| metadata.is_element_crit(e))
}

/// Where indicators end up, e.g. holograms spawned by the host
pub trait IndicatorSink: Send + Sync {
    fn display(&self, target: EntityId, indicator: &Indicator);
}

/// Listener turning finalized attacks into indicators
pub struct DamageIndicators {
    sink: Arc<dyn IndicatorSink>,
}

impl DamageIndicators {
    pub fn new(sink: Arc<dyn IndicatorSink>) -> Self {
        Self { sink }
    }
}

impl CombatListener for DamageIndicators {
    // after every other listener has had its say
    fn priority(&self) -> i32 {
        i32::MAX
    }

    fn on_attack_unregistered(&self, event: &AttackUnregisteredEvent) {
        let target = event.attack.target();
        for indicator in indicators(event.attack.damage(), event.final_damage) {
            self.sink.display(target, &indicator);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groups_by_physical_and_element() {
        let mut damage =
            DamageMetadata::new(6.0, None, [DamageType::Weapon, DamageType::Physical]).unwrap();
        damage.add(4.0, None, [DamageType::Physical, DamageType::Unarmed]).unwrap();
        damage.add(3.0, Some(Element::Fire), [DamageType::Skill]).unwrap();
        damage.add(2.0, Some(Element::Fire), [DamageType::Magic]).unwrap();
        damage.set_weapon_crit(true);

        let shown = indicators(&damage, damage.damage());
        assert_eq!(shown.len(), 2);

        let skill = &shown[0];
        assert!(!skill.physical);
        assert_eq!(skill.element, Some(Element::Fire));
        assert_eq!(skill.amount, 5.0);
        assert!(!skill.crit);

        let weapon = &shown[1];
        assert!(weapon.physical);
        assert_eq!(weapon.amount, 10.0);
        assert!(weapon.crit);
    }

    #[test]
    fn test_final_damage_difference_is_spread() {
        let mut damage = DamageMetadata::new(10.0, None, [DamageType::Physical]).unwrap();
        damage.add(10.0, Some(Element::Ice), [DamageType::Magic]).unwrap();
        let shown = indicators(&damage, 16.0);
        assert!(shown.iter().all(|i| i.amount == 8.0));
    }

    #[test]
    fn test_element_crit_marks_group() {
        let mut damage =
            DamageMetadata::new(1.0, Some(Element::Thunder), [DamageType::Magic]).unwrap();
        damage.register_elemental_crit(Element::Thunder);
        let shown = indicators(&damage, 1.0);
        assert!(shown[0].crit);
        assert_eq!(shown[0].text(), format!("{}{} 1.0!", SKILL_ICON, Element::Thunder.icon()));
    }

    #[test]
    fn test_negligible_damage_shows_nothing() {
        let damage = DamageMetadata::new(0.0, None, [DamageType::Physical]).unwrap();
        assert!(indicators(&damage, 0.0).is_empty());
    }
}
