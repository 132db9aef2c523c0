//! Evolution stages and per-stage progression data.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::creature::ParamName;

/// The canonical stage ladder, lowest to highest.
///
/// The derived `Ord` follows declaration order, which is the ordering every
/// cost and progression rule is defined against.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub enum Stage {
    #[default]
    Baby1,
    Baby2,
    Child,
    Adult,
    Perfect,
    Ultimate,
    SuperUltimate,
}

impl Stage {
    pub fn all() -> [Stage; 7] {
        [
            Stage::Baby1,
            Stage::Baby2,
            Stage::Child,
            Stage::Adult,
            Stage::Perfect,
            Stage::Ultimate,
            Stage::SuperUltimate,
        ]
    }

    /// Position on the ladder, 0-based.
    pub fn index(&self) -> usize {
        Stage::all()
            .iter()
            .position(|s| s == self)
            .unwrap_or_default()
    }

    /// Display label, e.g. "Baby I" or "Super Ultimate".
    pub fn label(&self) -> &'static str {
        match self {
            Stage::Baby1 => "Baby I",
            Stage::Baby2 => "Baby II",
            Stage::Child => "Child",
            Stage::Adult => "Adult",
            Stage::Perfect => "Perfect",
            Stage::Ultimate => "Ultimate",
            Stage::SuperUltimate => "Super Ultimate",
        }
    }

    /// Data key used by sheet and document layers.
    pub fn key(&self) -> &'static str {
        match self {
            Stage::Baby1 => "baby1",
            Stage::Baby2 => "baby2",
            Stage::Child => "child",
            Stage::Adult => "adult",
            Stage::Perfect => "perfect",
            Stage::Ultimate => "ultimate",
            Stage::SuperUltimate => "superUltimate",
        }
    }

    pub fn from_key(key: &str) -> Option<Stage> {
        Stage::all().into_iter().find(|s| s.key() == key)
    }

    /// Default base health for a companion at this stage, before vigor.
    ///
    /// Individual companions may override this through their own evolution
    /// table; these are the book values.
    pub fn default_base_hp(&self) -> i32 {
        match self {
            Stage::Baby1 => 5,
            Stage::Baby2 => 8,
            Stage::Child => 12,
            Stage::Adult => 18,
            Stage::Perfect => 25,
            Stage::Ultimate => 32,
            Stage::SuperUltimate => 40,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One entry of a companion's evolution table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageProfile {
    /// Base health granted at this stage, before vigor.
    pub base_hp: i32,
    /// Whether the companion may currently shift to this stage.
    pub unlocked: bool,
    /// Flat parameter bonuses active while at this stage.
    pub bonuses: HashMap<ParamName, i32>,
}

impl StageProfile {
    pub fn new(base_hp: i32) -> Self {
        Self {
            base_hp,
            unlocked: false,
            bonuses: HashMap::new(),
        }
    }

    /// Book-value profile for a stage, locked until earned.
    pub fn for_stage(stage: Stage) -> Self {
        Self::new(stage.default_base_hp())
    }

    pub fn unlocked(mut self) -> Self {
        self.unlocked = true;
        self
    }

    pub fn with_bonus(mut self, param: ParamName, amount: i32) -> Self {
        self.bonuses.insert(param, amount);
        self
    }

    pub fn bonus(&self, param: ParamName) -> i32 {
        self.bonuses.get(&param).copied().unwrap_or(0)
    }
}

/// Cost in the funding resource to shift between two stages.
///
/// Symmetric by rule: shifting down the ladder costs the same as shifting
/// up the same distance.
pub fn evolution_cost(from: Stage, to: Stage) -> i32 {
    (to.index() as i32 - from.index() as i32).abs()
}
