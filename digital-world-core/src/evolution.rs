//! Stage transitions funded across a linked tamer/companion pair.
//!
//! Evolving is the one place in the system where two creatures change
//! together: the funding entity pays the digisoul (or energy) cost and the
//! companion changes stage and re-derives. The whole sequence is staged on
//! working copies and committed through the repository as a single unit, so
//! a rejection at any step leaves stored state untouched.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, PoisonError};
use thiserror::Error;

use crate::creature::{Creature, CreatureId, CreatureKind, ResourceError, ResourceName};
use crate::derivation;
use crate::stages::{evolution_cost, Stage};

/// Errors from the repository capability.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("no creature with id {0}")]
    NotFound(CreatureId),
    #[error("storage error: {0}")]
    Storage(String),
}

/// Lookup and persistence capability for creatures.
///
/// Passed into the controller by the caller; partner resolution never goes
/// through ambient global state. `commit` persists every creature in the
/// slice or none of them.
pub trait CreatureRepository: Send + Sync {
    fn fetch(&self, id: &CreatureId) -> Result<Creature, RepositoryError>;
    fn commit(&self, creatures: &[Creature]) -> Result<(), RepositoryError>;
}

/// Mutex-backed in-memory repository.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    creatures: Mutex<HashMap<CreatureId, Creature>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, creature: Creature) {
        let mut map = self
            .creatures
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        map.insert(creature.id, creature);
    }
}

impl CreatureRepository for InMemoryRepository {
    fn fetch(&self, id: &CreatureId) -> Result<Creature, RepositoryError> {
        let map = self
            .creatures
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        map.get(id).cloned().ok_or(RepositoryError::NotFound(*id))
    }

    fn commit(&self, creatures: &[Creature]) -> Result<(), RepositoryError> {
        let mut map = self
            .creatures
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        for creature in creatures {
            map.insert(creature.id, creature.clone());
        }
        Ok(())
    }
}

/// Errors from an evolution request. All recoverable: the caller reports
/// them and may retry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvolutionError {
    #[error("{stage} is not an unlocked stage for this companion")]
    LockedStage { stage: Stage },

    #[error(transparent)]
    Resource(#[from] ResourceError),

    #[error("no funding entity is linked and the companion cannot self-fund")]
    UnlinkedEntity,

    #[error("an evolution for {0} is already in flight")]
    TransitionInFlight(CreatureId),

    #[error("{0} is not an evolvable companion")]
    NotEvolvable(CreatureId),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Record of a completed transition, handed to the caller's notification
/// layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvolutionReceipt {
    pub companion: CreatureId,
    pub from: Stage,
    pub to: Stage,
    pub cost: i32,
}

/// Executes validated stage transitions.
///
/// Requests for the same companion are serialized: a second request while
/// one is in flight is rejected rather than interleaved, which is what
/// keeps the check-then-deduct sequence from double-spending the ledger.
#[derive(Debug, Default)]
pub struct EvolutionController {
    in_flight: Mutex<HashSet<CreatureId>>,
}

impl EvolutionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attempt to move a companion to `target`.
    ///
    /// The move may go up or down the ladder and costs the absolute stage
    /// distance from the funding entity's pool: the linked tamer's
    /// digisoul, or the companion's own energy when it has no partner.
    pub fn attempt_evolve(
        &self,
        repo: &dyn CreatureRepository,
        companion_id: &CreatureId,
        target: Stage,
    ) -> Result<EvolutionReceipt, EvolutionError> {
        let _guard = self.claim(companion_id)?;

        let mut companion = repo.fetch(companion_id)?;
        if !matches!(companion.kind, CreatureKind::Companion) {
            return Err(EvolutionError::NotEvolvable(*companion_id));
        }
        let from = companion
            .stage
            .ok_or(EvolutionError::NotEvolvable(*companion_id))?;

        let unlocked = companion
            .evolution
            .get(&target)
            .map(|profile| profile.unlocked)
            .unwrap_or(false);
        if !unlocked {
            tracing::debug!(companion = %companion_id, target = %target, "evolution rejected: locked stage");
            return Err(EvolutionError::LockedStage { stage: target });
        }

        let cost = evolution_cost(from, target);

        // Resolve the funding entity. A dangling or non-tamer link cannot
        // fund anything.
        let mut funder = match companion.partner {
            Some(partner_id) => match repo.fetch(&partner_id) {
                Ok(partner) if matches!(partner.kind, CreatureKind::Controller) => Some(partner),
                Ok(_) => return Err(EvolutionError::UnlinkedEntity),
                Err(RepositoryError::NotFound(_)) => return Err(EvolutionError::UnlinkedEntity),
                Err(err) => return Err(err.into()),
            },
            None => None,
        };

        // Check-then-deduct on working copies only. Nothing below touches
        // stored state until the single commit.
        match funder.as_mut() {
            Some(partner) => partner.spend(ResourceName::Digisoul, cost)?,
            None => companion.spend(ResourceName::Energy, cost)?,
        }
        companion.stage = Some(target);
        derivation::derive(&mut companion);

        let receipt = EvolutionReceipt {
            companion: *companion_id,
            from,
            to: target,
            cost,
        };

        let mut batch = vec![companion];
        if let Some(partner) = funder {
            batch.push(partner);
        }
        repo.commit(&batch)?;

        tracing::info!(
            companion = %receipt.companion,
            from = %receipt.from,
            to = %receipt.to,
            cost = receipt.cost,
            "companion evolved"
        );
        Ok(receipt)
    }

    fn claim(&self, id: &CreatureId) -> Result<InFlightGuard<'_>, EvolutionError> {
        let mut set = self
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if !set.insert(*id) {
            return Err(EvolutionError::TransitionInFlight(*id));
        }
        Ok(InFlightGuard {
            set: &self.in_flight,
            id: *id,
        })
    }
}

/// Releases the in-flight claim when the request finishes, on any path.
#[derive(Debug)]
struct InFlightGuard<'a> {
    set: &'a Mutex<HashSet<CreatureId>>,
    id: CreatureId,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        let mut set = self.set.lock().unwrap_or_else(PoisonError::into_inner);
        set.remove(&self.id);
    }
}
