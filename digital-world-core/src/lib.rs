//! Rules engine for Digimon: Digital World Adventures.
//!
//! This crate provides the system's resolution core:
//! - Derived data: parameter modifiers, resource caps and defenses
//!   recomputed on demand from base values and the current stage
//! - d6 dice-pool checks with automatic successes and critical tiers
//! - The attribute and element advantage cycles that shift damage
//! - The evolution state machine, funding stage shifts from a linked
//!   tamer's digisoul ledger
//!
//! Sheets, chat output and document persistence live in the host layer;
//! they call in through [`derivation::derive`], [`DicePool::resolve`],
//! [`advantage::calculate_damage`] and
//! [`EvolutionController::attempt_evolve`].
//!
//! # Quick Start
//!
//! ```ignore
//! use digital_world_core::testing::create_linked_pair;
//! use digital_world_core::{
//!     EvolutionController, InMemoryRepository, RandomFaceSource, Stage,
//! };
//!
//! #[tokio::main]
//! async fn main() {
//!     let (tamer, companion) = create_linked_pair("Taichi", "Agumon");
//!     let companion_id = companion.id;
//!
//!     let repo = InMemoryRepository::new();
//!     repo.insert(tamer);
//!     repo.insert(companion);
//!
//!     let controller = EvolutionController::new();
//!     let receipt = controller
//!         .attempt_evolve(&repo, &companion_id, Stage::Adult)
//!         .unwrap();
//!     println!("{} -> {} (cost {})", receipt.from, receipt.to, receipt.cost);
//! }
//! ```

pub mod advantage;
pub mod creature;
pub mod derivation;
pub mod dice;
pub mod evolution;
pub mod gear;
pub mod stages;
pub mod testing;

// Primary public API
pub use advantage::{calculate_damage, Attribute, DamageBreakdown, Element};
pub use creature::{
    Creature, CreatureId, CreatureKind, Crest, ParamName, Parameter, ResourceName, ResourcePool,
};
pub use dice::{DicePool, FaceSource, Outcome, PoolResult, RandomFaceSource};
pub use evolution::{
    CreatureRepository, EvolutionController, EvolutionError, EvolutionReceipt, InMemoryRepository,
};
pub use stages::{evolution_cost, Stage, StageProfile};
