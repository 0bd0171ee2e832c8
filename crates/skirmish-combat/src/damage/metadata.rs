//! Accumulated damage of one attack

use std::collections::{BTreeSet, HashMap};

use skirmish_core::EngineResult;

use super::element::Element;
use super::packet::{DamagePacket, DamageType};

/// Damage below this is treated as no damage by indicators
pub const MINIMAL_DAMAGE: f64 = 0.01;

/// The packets making up one attack, plus crit bookkeeping.
///
/// Crit flags record that a crit multiplier was already applied upstream;
/// they never change the numbers here.
#[derive(Debug, Clone, PartialEq)]
pub struct DamageMetadata {
    packets: Vec<DamagePacket>,
    initial_packet: Option<DamagePacket>,
    weapon_crit: bool,
    skill_crit: bool,
    elemental_crits: BTreeSet<Element>,
}

impl DamageMetadata {
    /// Metadata with no packet
    pub fn empty() -> Self {
        Self {
            packets: Vec::new(),
            initial_packet: None,
            weapon_crit: false,
            skill_crit: false,
            elemental_crits: BTreeSet::new(),
        }
    }

    /// Metadata starting with a single packet
    pub fn new(
        damage: f64,
        element: Option<Element>,
        types: impl IntoIterator<Item = DamageType>,
    ) -> EngineResult<Self> {
        let packet = DamagePacket::new(damage, element, types)?;
        let mut metadata = Self::empty();
        metadata.initial_packet = Some(packet.clone());
        metadata.packets.push(packet);
        Ok(metadata)
    }

    pub fn packets(&self) -> &[DamagePacket] {
        &self.packets
    }

    pub fn packets_mut(&mut self) -> &mut [DamagePacket] {
        &mut self.packets
    }

    /// The packet the metadata was created with, as it was created
    pub fn initial_packet(&self) -> Option<&DamagePacket> {
        self.initial_packet.as_ref()
    }

    /// Total final damage, never below [`MINIMAL_DAMAGE`]
    pub fn damage(&self) -> f64 {
        let total: f64 = self.packets.iter().map(|p| p.final_value()).sum();
        total.max(MINIMAL_DAMAGE)
    }

    /// Final damage of packets carrying exactly this element
    pub fn damage_of_element(&self, element: Option<Element>) -> f64 {
        self.packets
            .iter()
            .filter(|p| p.is_element(element))
            .map(|p| p.final_value())
            .sum()
    }

    /// Final damage of packets carrying this type
    pub fn damage_of_type(&self, damage_type: DamageType) -> f64 {
        self.packets
            .iter()
            .filter(|p| p.has_type(damage_type))
            .map(|p| p.final_value())
            .sum()
    }

    /// Final damage per element, element-less packets excluded
    pub fn elemental_damage(&self) -> HashMap<Element, f64> {
        let mut mapped = HashMap::new();
        for packet in &self.packets {
            if let Some(element) = packet.element() {
                *mapped.entry(element).or_insert(0.0) += packet.final_value();
            }
        }
        mapped
    }

    pub fn collect_types(&self) -> BTreeSet<DamageType> {
        self.packets.iter().flat_map(|p| p.types().iter().copied()).collect()
    }

    pub fn collect_elements(&self) -> BTreeSet<Element> {
        self.packets.iter().filter_map(|p| p.element()).collect()
    }

    pub fn has_type(&self, damage_type: DamageType) -> bool {
        self.packets.iter().any(|p| p.has_type(damage_type))
    }

    pub fn has_element(&self, element: Option<Element>) -> bool {
        self.packets.iter().any(|p| p.is_element(element))
    }

    /// Append a packet
    pub fn add(
        &mut self,
        value: f64,
        element: Option<Element>,
        types: impl IntoIterator<Item = DamageType>,
    ) -> EngineResult<&mut Self> {
        self.packets.push(DamagePacket::new(value, element, types)?);
        Ok(self)
    }

    pub fn add_packet(&mut self, packet: DamagePacket) -> &mut Self {
        self.packets.push(packet);
        self
    }

    pub fn additive_modifier(&mut self, multiplier: f64) -> &mut Self {
        for packet in &mut self.packets {
            packet.additive_modifier(multiplier);
        }
        self
    }

    pub fn additive_modifier_for_type(
        &mut self,
        multiplier: f64,
        damage_type: DamageType,
    ) -> &mut Self {
        for packet in self.packets.iter_mut().filter(|p| p.has_type(damage_type)) {
            packet.additive_modifier(multiplier);
        }
        self
    }

    pub fn additive_modifier_for_element(
        &mut self,
        multiplier: f64,
        element: Option<Element>,
    ) -> &mut Self {
        for packet in self.packets.iter_mut().filter(|p| p.is_element(element)) {
            packet.additive_modifier(multiplier);
        }
        self
    }

    pub fn multiplicative_modifier(&mut self, coefficient: f64) -> EngineResult<&mut Self> {
        self.scale(coefficient, |_| true)
    }

    pub fn multiplicative_modifier_for_type(
        &mut self,
        coefficient: f64,
        damage_type: DamageType,
    ) -> EngineResult<&mut Self> {
        self.scale(coefficient, |p| p.has_type(damage_type))
    }

    pub fn multiplicative_modifier_for_element(
        &mut self,
        coefficient: f64,
        element: Option<Element>,
    ) -> EngineResult<&mut Self> {
        self.scale(coefficient, |p| p.is_element(element))
    }

    fn scale(
        &mut self,
        coefficient: f64,
        filter: impl Fn(&DamagePacket) -> bool,
    ) -> EngineResult<&mut Self> {
        // validate once so a bad coefficient leaves every packet untouched
        DamagePacket::new(0.0, None, [])?.multiplicative_modifier(coefficient)?;
        for packet in self.packets.iter_mut().filter(|p| filter(p)) {
            packet.multiplicative_modifier(coefficient)?;
        }
        Ok(self)
    }

    pub fn is_weapon_crit(&self) -> bool {
        self.weapon_crit
    }

    pub fn set_weapon_crit(&mut self, crit: bool) {
        self.weapon_crit = crit;
    }

    pub fn is_skill_crit(&self) -> bool {
        self.skill_crit
    }

    pub fn set_skill_crit(&mut self, crit: bool) {
        self.skill_crit = crit;
    }

    pub fn is_element_crit(&self, element: Element) -> bool {
        self.elemental_crits.contains(&element)
    }

    pub fn register_elemental_crit(&mut self, element: Element) {
        self.elemental_crits.insert(element);
    }

    /// Fold another contribution into this one: packets are appended and
    /// crit flags are OR-ed.
    pub fn merge(&mut self, other: &DamageMetadata) {
        self.packets.extend(other.packets.iter().cloned());
        self.weapon_crit |= other.weapon_crit;
        self.skill_crit |= other.skill_crit;
        self.elemental_crits.extend(other.elemental_crits.iter().copied());
        if self.initial_packet.is_none() {
            self.initial_packet = other.initial_packet.clone();
        }
    }
}

impl Default for DamageMetadata {
    fn default() -> Self {
        Self::empty()
    }
}
