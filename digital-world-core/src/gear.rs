//! Abilities and equipment carried by creatures.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::advantage::{self, DamageBreakdown, Element};
use crate::creature::{Creature, ResourceError, ResourceName};

/// Whether an ability strikes physically or with energy, deciding which
/// defense applies on the target's side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DamageKind {
    #[default]
    Physical,
    Energy,
}

impl DamageKind {
    pub fn name(&self) -> &'static str {
        match self {
            DamageKind::Physical => "physical",
            DamageKind::Energy => "energy",
        }
    }
}

impl fmt::Display for DamageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// An ability a creature can use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityCard {
    pub name: String,
    pub base_damage: i32,
    pub damage_kind: DamageKind,
    pub element: Element,
    pub energy_cost: i32,
}

impl AbilityCard {
    pub fn new(name: impl Into<String>, base_damage: i32, damage_kind: DamageKind) -> Self {
        Self {
            name: name.into(),
            base_damage,
            damage_kind,
            element: Element::Neutral,
            energy_cost: 0,
        }
    }

    pub fn with_element(mut self, element: Element) -> Self {
        self.element = element;
        self
    }

    pub fn with_cost(mut self, energy_cost: i32) -> Self {
        self.energy_cost = energy_cost;
        self
    }
}

/// A piece of equipment. Armor only counts while equipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentPiece {
    pub name: String,
    pub armor: i32,
    pub equipped: bool,
}

impl EquipmentPiece {
    pub fn new(name: impl Into<String>, armor: i32) -> Self {
        Self {
            name: name.into(),
            armor,
            equipped: false,
        }
    }

    pub fn equipped(mut self) -> Self {
        self.equipped = true;
        self
    }

    pub fn total_armor(&self) -> i32 {
        if self.equipped {
            self.armor
        } else {
            0
        }
    }
}

/// Armor contributed by a whole loadout.
pub fn total_armor(equipment: &[EquipmentPiece]) -> i32 {
    equipment.iter().map(|piece| piece.total_armor()).sum()
}

lazy_static::lazy_static! {
    /// Well-known companion abilities, for quick setup and reference.
    pub static ref STANDARD_ABILITIES: Vec<AbilityCard> = vec![
        AbilityCard::new("Pepper Breath", 2, DamageKind::Energy)
            .with_element(Element::Fire)
            .with_cost(1),
        AbilityCard::new("Blue Blaster", 2, DamageKind::Energy)
            .with_element(Element::Water)
            .with_cost(1),
        AbilityCard::new("Super Thunder Strike", 2, DamageKind::Energy)
            .with_element(Element::Electric)
            .with_cost(1),
        AbilityCard::new("Poison Ivy", 1, DamageKind::Physical)
            .with_element(Element::Plant),
        AbilityCard::new("Boom Bubble", 1, DamageKind::Physical)
            .with_element(Element::Wind),
        AbilityCard::new("Claw Attack", 1, DamageKind::Physical),
    ];
}

/// Spend the ability's energy cost from the attacker, then work out the
/// advantage-adjusted damage against the defender.
///
/// The attacker's attribute and the ability's element are measured against
/// the defender's attribute and element. A failed energy spend leaves the
/// attacker untouched.
pub fn resolve_strike(
    attacker: &mut Creature,
    defender: &Creature,
    ability: &AbilityCard,
) -> Result<DamageBreakdown, ResourceError> {
    attacker.spend(ResourceName::Energy, ability.energy_cost)?;
    Ok(advantage::calculate_damage(
        ability.base_damage,
        attacker.attribute,
        defender.attribute,
        ability.element,
        defender.element,
    ))
}
