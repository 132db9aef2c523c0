//! Creature records: characters, NPCs, tamers and their partner companions.
//!
//! A creature is a plain data record. All rule behavior lives in free
//! functions and small engines (`derivation`, `dice`, `evolution`) that
//! operate on it; there is no inheritance chain and no hidden recomputation
//! hook. After mutating base parameters or the stage, callers run
//! [`crate::derivation::derive`] themselves.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

use crate::advantage::{Attribute, Element};
use crate::dice::DicePool;
use crate::stages::{Stage, StageProfile};

// ============================================================================
// Identity
// ============================================================================

/// Unique identifier for creatures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CreatureId(pub Uuid);

impl CreatureId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CreatureId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CreatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The four creature kinds.
///
/// Matched exhaustively everywhere, so adding a kind is a compile-time
/// checked change rather than a stringly-typed one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CreatureKind {
    PrimaryCharacter,
    NonPlayerCharacter { challenge: i32 },
    /// A tamer: holds the digisoul ledger that funds a partner's evolution.
    Controller,
    /// A digimon: carries a stage and an evolution table.
    Companion,
}

impl CreatureKind {
    pub fn name(&self) -> &'static str {
        match self {
            CreatureKind::PrimaryCharacter => "character",
            CreatureKind::NonPlayerCharacter { .. } => "npc",
            CreatureKind::Controller => "tamer",
            CreatureKind::Companion => "digimon",
        }
    }

    /// Companions read parameters as raw dice-pool values; the humanoid
    /// kinds use ten-centered modifiers.
    pub fn uses_pool_values(&self) -> bool {
        matches!(self, CreatureKind::Companion)
    }
}

impl fmt::Display for CreatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ============================================================================
// Parameters
// ============================================================================

/// Named base parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParamName {
    Vigor,
    Agility,
    Spirit,
    Instinct,
    Willpower,
    Intellect,
}

impl ParamName {
    pub fn name(&self) -> &'static str {
        match self {
            ParamName::Vigor => "vigor",
            ParamName::Agility => "agility",
            ParamName::Spirit => "spirit",
            ParamName::Instinct => "instinct",
            ParamName::Willpower => "willpower",
            ParamName::Intellect => "intellect",
        }
    }

    pub fn all() -> [ParamName; 6] {
        [
            ParamName::Vigor,
            ParamName::Agility,
            ParamName::Spirit,
            ParamName::Instinct,
            ParamName::Willpower,
            ParamName::Intellect,
        ]
    }
}

impl fmt::Display for ParamName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A base value and its derived modifier.
///
/// The modifier is owned by the derivation engine; everything else treats
/// it as read-only output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub value: i32,
    pub modifier: i32,
}

impl Parameter {
    pub fn new(value: i32) -> Self {
        Self { value, modifier: 0 }
    }
}

// ============================================================================
// Resources
// ============================================================================

/// Named resource pools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceName {
    Health,
    Energy,
    Digisoul,
}

impl ResourceName {
    pub fn name(&self) -> &'static str {
        match self {
            ResourceName::Health => "health",
            ResourceName::Energy => "energy",
            ResourceName::Digisoul => "digisoul",
        }
    }
}

impl fmt::Display for ResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A bounded spendable pool. `0 <= current <= max` holds at every
/// observation point; transactions that would break it roll back instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourcePool {
    pub current: i32,
    pub max: i32,
}

impl ResourcePool {
    /// A pool filled to its maximum.
    pub fn full(max: i32) -> Self {
        let max = max.max(0);
        Self { current: max, max }
    }

    /// Restore the invariant after cap changes.
    pub fn clamp(&mut self) {
        self.max = self.max.max(0);
        self.current = self.current.clamp(0, self.max);
    }
}

/// Errors from resource spend operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceError {
    #[error("insufficient {resource}: need {needed}, have {available}")]
    Insufficient {
        resource: ResourceName,
        needed: i32,
        available: i32,
    },
    #[error("no {0} pool on this creature")]
    MissingPool(ResourceName),
}

// ============================================================================
// Crests
// ============================================================================

/// Tamer crests. Invoking a crest on a matching check grants one automatic
/// success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Crest {
    Courage,
    Friendship,
    Love,
    Knowledge,
    Sincerity,
    Reliability,
    Hope,
    Light,
    Kindness,
}

impl Crest {
    pub fn label(&self) -> &'static str {
        match self {
            Crest::Courage => "Courage",
            Crest::Friendship => "Friendship",
            Crest::Love => "Love",
            Crest::Knowledge => "Knowledge",
            Crest::Sincerity => "Sincerity",
            Crest::Reliability => "Reliability",
            Crest::Hope => "Hope",
            Crest::Light => "Light",
            Crest::Kindness => "Kindness",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Crest::Courage => "Grants success when acting bravely",
            Crest::Friendship => "Grants success when supporting allies",
            Crest::Love => "Grants success when protecting others",
            Crest::Knowledge => "Grants success when using intellect",
            Crest::Sincerity => "Grants success when being honest",
            Crest::Reliability => "Grants success when being dependable",
            Crest::Hope => "Grants success when inspiring others",
            Crest::Light => "Grants success when bringing clarity",
            Crest::Kindness => "Grants success when showing compassion",
        }
    }

    /// Automatic successes granted when the crest applies to a check.
    pub fn auto_successes(&self) -> i32 {
        1
    }
}

impl fmt::Display for Crest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ============================================================================
// Creature
// ============================================================================

/// A creature record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Creature {
    pub id: CreatureId,
    pub name: String,
    pub kind: CreatureKind,
    /// Base parameters. A missing entry reads as value 0.
    pub parameters: HashMap<ParamName, Parameter>,
    pub resources: HashMap<ResourceName, ResourcePool>,
    /// Current stage; only companions carry one.
    pub stage: Option<Stage>,
    /// The companion's own evolution table, indexed by stage.
    pub evolution: HashMap<Stage, StageProfile>,
    /// Link to the paired tamer or companion. Symmetric: set and cleared
    /// on both sides together via [`link_partners`] / [`unlink_partners`].
    pub partner: Option<CreatureId>,
    pub crest: Option<Crest>,
    pub attribute: Attribute,
    pub element: Element,
    /// Derived: `max(1, ceil((vigor + agility) / 4))`.
    pub defense: i32,
    /// Derived: `max(1, ceil((spirit + agility) / 4))`.
    pub magic_defense: i32,
}

impl Creature {
    pub fn new(name: impl Into<String>, kind: CreatureKind) -> Self {
        Self {
            id: CreatureId::new(),
            name: name.into(),
            kind,
            parameters: HashMap::new(),
            resources: HashMap::new(),
            stage: None,
            evolution: HashMap::new(),
            partner: None,
            crest: None,
            attribute: Attribute::Free,
            element: Element::Neutral,
            defense: 1,
            magic_defense: 1,
        }
    }

    pub fn with_parameter(mut self, param: ParamName, value: i32) -> Self {
        self.parameters.insert(param, Parameter::new(value));
        self
    }

    pub fn with_resource(mut self, resource: ResourceName, max: i32) -> Self {
        self.resources.insert(resource, ResourcePool::full(max));
        self
    }

    pub fn with_stage(mut self, stage: Stage) -> Self {
        self.stage = Some(stage);
        self
    }

    pub fn with_evolution_entry(mut self, stage: Stage, profile: StageProfile) -> Self {
        self.evolution.insert(stage, profile);
        self
    }

    pub fn with_crest(mut self, crest: Crest) -> Self {
        self.crest = Some(crest);
        self
    }

    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attribute = attribute;
        self
    }

    pub fn with_element(mut self, element: Element) -> Self {
        self.element = element;
        self
    }

    /// Base value of a parameter; 0 when the parameter is absent.
    pub fn parameter_value(&self, param: ParamName) -> i32 {
        self.parameters.get(&param).map(|p| p.value).unwrap_or(0)
    }

    /// Derived modifier of a parameter; 0 when absent.
    pub fn modifier(&self, param: ParamName) -> i32 {
        self.parameters.get(&param).map(|p| p.modifier).unwrap_or(0)
    }

    /// Flat bonus the current stage grants to a parameter.
    pub fn stage_bonus(&self, param: ParamName) -> i32 {
        match self.stage {
            Some(stage) => self
                .evolution
                .get(&stage)
                .map(|profile| profile.bonus(param))
                .unwrap_or(0),
            None => 0,
        }
    }

    /// Base value plus the current stage's bonus. This is what caps,
    /// modifiers and dice pools are computed from.
    pub fn effective_value(&self, param: ParamName) -> i32 {
        self.parameter_value(param) + self.stage_bonus(param)
    }

    pub fn pool(&self, resource: ResourceName) -> Option<&ResourcePool> {
        self.resources.get(&resource)
    }

    /// Build a check against a difficulty from one parameter's pool value.
    pub fn check(&self, param: ParamName, difficulty: i32) -> DicePool {
        DicePool::new(self.effective_value(param), 0, difficulty)
    }

    /// Deduct from a pool, failing without mutation when it would go
    /// negative.
    pub fn spend(&mut self, resource: ResourceName, amount: i32) -> Result<(), ResourceError> {
        let amount = amount.max(0);
        let pool = self
            .resources
            .get_mut(&resource)
            .ok_or(ResourceError::MissingPool(resource))?;
        if pool.current < amount {
            return Err(ResourceError::Insufficient {
                resource,
                needed: amount,
                available: pool.current,
            });
        }
        pool.current -= amount;
        Ok(())
    }

    /// Restore into a pool, clamped at its maximum.
    pub fn recover(&mut self, resource: ResourceName, amount: i32) -> Result<(), ResourceError> {
        let amount = amount.max(0);
        let pool = self
            .resources
            .get_mut(&resource)
            .ok_or(ResourceError::MissingPool(resource))?;
        pool.current = (pool.current + amount).min(pool.max);
        Ok(())
    }
}

/// Link two creatures as partners, both directions at once.
pub fn link_partners(a: &mut Creature, b: &mut Creature) {
    a.partner = Some(b.id);
    b.partner = Some(a.id);
}

/// Clear a partner link on both sides.
pub fn unlink_partners(a: &mut Creature, b: &mut Creature) {
    a.partner = None;
    b.partner = None;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn companion() -> Creature {
        Creature::new("Testmon", CreatureKind::Companion)
            .with_parameter(ParamName::Vigor, 6)
            .with_resource(ResourceName::Energy, 10)
    }

    #[test]
    fn test_missing_parameter_reads_as_zero() {
        let creature = companion();
        assert_eq!(creature.parameter_value(ParamName::Vigor), 6);
        assert_eq!(creature.parameter_value(ParamName::Willpower), 0);
        assert_eq!(creature.modifier(ParamName::Willpower), 0);
    }

    #[test]
    fn test_spend_and_recover() {
        let mut creature = companion();
        creature.spend(ResourceName::Energy, 4).unwrap();
        assert_eq!(creature.pool(ResourceName::Energy).unwrap().current, 6);

        let err = creature.spend(ResourceName::Energy, 7).unwrap_err();
        assert_eq!(
            err,
            ResourceError::Insufficient {
                resource: ResourceName::Energy,
                needed: 7,
                available: 6,
            }
        );
        // Failed spend mutates nothing.
        assert_eq!(creature.pool(ResourceName::Energy).unwrap().current, 6);

        creature.recover(ResourceName::Energy, 100).unwrap();
        assert_eq!(creature.pool(ResourceName::Energy).unwrap().current, 10);
    }

    #[test]
    fn test_spend_missing_pool() {
        let mut creature = companion();
        assert_eq!(
            creature.spend(ResourceName::Digisoul, 1),
            Err(ResourceError::MissingPool(ResourceName::Digisoul))
        );
    }

    #[test]
    fn test_partner_link_is_symmetric() {
        let mut tamer = Creature::new("Taichi", CreatureKind::Controller);
        let mut partner = companion();
        link_partners(&mut tamer, &mut partner);
        assert_eq!(tamer.partner, Some(partner.id));
        assert_eq!(partner.partner, Some(tamer.id));

        unlink_partners(&mut tamer, &mut partner);
        assert_eq!(tamer.partner, None);
        assert_eq!(partner.partner, None);
    }

    #[test]
    fn test_stage_bonus_feeds_effective_value() {
        use crate::stages::{Stage, StageProfile};
        let creature = companion()
            .with_stage(Stage::Adult)
            .with_evolution_entry(
                Stage::Adult,
                StageProfile::for_stage(Stage::Adult)
                    .unlocked()
                    .with_bonus(ParamName::Vigor, 2),
            );
        assert_eq!(creature.effective_value(ParamName::Vigor), 8);
        assert_eq!(creature.effective_value(ParamName::Agility), 0);
    }

    #[test]
    fn test_crest_data() {
        assert_eq!(Crest::Courage.label(), "Courage");
        assert_eq!(
            Crest::Knowledge.description(),
            "Grants success when using intellect"
        );
        assert_eq!(Crest::Hope.auto_successes(), 1);
    }
}
