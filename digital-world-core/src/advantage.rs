//! Attribute and element advantage cycles.
//!
//! Damage between two creatures is shifted by where their categories sit in
//! a handful of fixed cycles: the attribute triangle (Vaccine > Virus >
//! Data > Vaccine), two elemental triangles and the Light/Dark pair. A
//! category immediately ahead of another in its cycle grants +1, immediately
//! behind grants -1, anything else is 0.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error for category strings that don't name a known attribute or element.
///
/// Only the parsing surface is fallible. The lookups themselves are total:
/// a neutral or unrelated category simply contributes 0.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CategoryParseError {
    #[error("Unknown attribute category: {0}")]
    UnknownAttribute(String),
    #[error("Unknown element category: {0}")]
    UnknownElement(String),
}

/// A creature's attribute category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Attribute {
    Vaccine,
    Virus,
    Data,
    /// Neutral: never ahead of or behind anything.
    #[default]
    Free,
}

impl Attribute {
    pub fn name(&self) -> &'static str {
        match self {
            Attribute::Vaccine => "vaccine",
            Attribute::Virus => "virus",
            Attribute::Data => "data",
            Attribute::Free => "free",
        }
    }

    pub fn all() -> [Attribute; 4] {
        [
            Attribute::Vaccine,
            Attribute::Virus,
            Attribute::Data,
            Attribute::Free,
        ]
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Attribute {
    type Err = CategoryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "vaccine" => Ok(Attribute::Vaccine),
            "virus" => Ok(Attribute::Virus),
            "data" => Ok(Attribute::Data),
            "free" => Ok(Attribute::Free),
            other => Err(CategoryParseError::UnknownAttribute(other.to_string())),
        }
    }
}

/// A creature's or ability's element category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Element {
    Fire,
    Plant,
    Water,
    Electric,
    Wind,
    Earth,
    Light,
    Dark,
    /// Neutral: never ahead of or behind anything.
    #[default]
    Neutral,
}

impl Element {
    pub fn name(&self) -> &'static str {
        match self {
            Element::Fire => "fire",
            Element::Plant => "plant",
            Element::Water => "water",
            Element::Electric => "electric",
            Element::Wind => "wind",
            Element::Earth => "earth",
            Element::Light => "light",
            Element::Dark => "dark",
            Element::Neutral => "neutral",
        }
    }

    pub fn all() -> [Element; 9] {
        [
            Element::Fire,
            Element::Plant,
            Element::Water,
            Element::Electric,
            Element::Wind,
            Element::Earth,
            Element::Light,
            Element::Dark,
            Element::Neutral,
        ]
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Element {
    type Err = CategoryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fire" => Ok(Element::Fire),
            "plant" => Ok(Element::Plant),
            "water" => Ok(Element::Water),
            "electric" => Ok(Element::Electric),
            "wind" => Ok(Element::Wind),
            "earth" => Ok(Element::Earth),
            "light" => Ok(Element::Light),
            "dark" => Ok(Element::Dark),
            "neutral" => Ok(Element::Neutral),
            other => Err(CategoryParseError::UnknownElement(other.to_string())),
        }
    }
}

/// The attribute triangle: Vaccine > Virus > Data > Vaccine.
const ATTRIBUTE_CYCLE: [Attribute; 3] = [Attribute::Vaccine, Attribute::Virus, Attribute::Data];

/// Fire > Water > Plant > Fire.
const FLAME_CYCLE: [Element; 3] = [Element::Fire, Element::Water, Element::Plant];

/// Electric > Wind > Earth > Electric.
const STORM_CYCLE: [Element; 3] = [Element::Electric, Element::Wind, Element::Earth];

/// Light and Dark each have the edge over the other.
const LIGHT_DARK_PAIR: [Element; 2] = [Element::Light, Element::Dark];

/// Signed modifier for `a` attacking `b` within one cycle.
///
/// +1 when `b` is the category immediately after `a`, -1 when `a` is the
/// category immediately after `b`, 0 otherwise. A 2-cycle degenerates to
/// +1 between its two distinct members.
fn cycle_modifier<T: PartialEq + Copy>(cycle: &[T], a: T, b: T) -> i32 {
    let len = cycle.len();
    let ia = cycle.iter().position(|&c| c == a);
    let ib = cycle.iter().position(|&c| c == b);
    match (ia, ib) {
        (Some(ia), Some(ib)) => {
            if (ia + 1) % len == ib {
                1
            } else if (ib + 1) % len == ia {
                -1
            } else {
                0
            }
        }
        _ => 0,
    }
}

/// Modifier for the attacker's attribute against the defender's.
pub fn attribute_modifier(attacker: Attribute, defender: Attribute) -> i32 {
    if attacker == Attribute::Free || defender == Attribute::Free {
        return 0;
    }
    cycle_modifier(&ATTRIBUTE_CYCLE, attacker, defender)
}

/// Modifier for the attacker's element against the defender's.
pub fn element_modifier(attacker: Element, defender: Element) -> i32 {
    if attacker == Element::Neutral || defender == Element::Neutral {
        return 0;
    }
    for cycle in [&FLAME_CYCLE[..], &STORM_CYCLE[..], &LIGHT_DARK_PAIR[..]] {
        let modifier = cycle_modifier(cycle, attacker, defender);
        if modifier != 0 {
            return modifier;
        }
    }
    0
}

/// Damage after attribute and element shifts, with the shifts broken out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageBreakdown {
    pub damage: i32,
    pub attribute_mod: i32,
    pub element_mod: i32,
}

/// Apply attribute and element advantage to a base damage amount.
///
/// The two modifiers are computed independently, summed onto the base, and
/// the total is floored at zero. Damage is never negative.
pub fn calculate_damage(
    base_damage: i32,
    attack_attribute: Attribute,
    defense_attribute: Attribute,
    attack_element: Element,
    defense_element: Element,
) -> DamageBreakdown {
    let attribute_mod = attribute_modifier(attack_attribute, defense_attribute);
    let element_mod = element_modifier(attack_element, defense_element);
    let damage = (base_damage + attribute_mod + element_mod).max(0);
    DamageBreakdown {
        damage,
        attribute_mod,
        element_mod,
    }
}
