//! QA tests for the evolution state machine across a linked pair.
//!
//! Run with: `cargo test -p digital-world-core --test qa_evolution`

use digital_world_core::evolution::RepositoryError;
use digital_world_core::stages::evolution_cost;
use digital_world_core::testing::{create_linked_pair, create_sample_companion};
use digital_world_core::{
    CreatureRepository, EvolutionController, EvolutionError, InMemoryRepository, ParamName,
    ResourceName, Stage,
};

fn seeded_pair() -> (InMemoryRepository, digital_world_core::CreatureId, digital_world_core::CreatureId) {
    let (tamer, companion) = create_linked_pair("Taichi", "Agumon");
    let (tamer_id, companion_id) = (tamer.id, companion.id);
    let repo = InMemoryRepository::new();
    repo.insert(tamer);
    repo.insert(companion);
    (repo, tamer_id, companion_id)
}

// =============================================================================
// TEST 1: Happy path, evolving up one stage
// =============================================================================

#[test]
fn test_evolution_moves_stage_and_spends_ledger() {
    let (repo, tamer_id, companion_id) = seeded_pair();
    let controller = EvolutionController::new();

    let ledger_before = repo
        .fetch(&tamer_id)
        .unwrap()
        .pool(ResourceName::Digisoul)
        .unwrap()
        .current;

    let receipt = controller
        .attempt_evolve(&repo, &companion_id, Stage::Adult)
        .expect("adult stage is unlocked");

    assert_eq!(receipt.from, Stage::Child);
    assert_eq!(receipt.to, Stage::Adult);
    assert_eq!(receipt.cost, 1);

    let companion = repo.fetch(&companion_id).unwrap();
    assert_eq!(companion.stage, Some(Stage::Adult));

    let tamer = repo.fetch(&tamer_id).unwrap();
    assert_eq!(
        tamer.pool(ResourceName::Digisoul).unwrap().current,
        ledger_before - 1
    );
}

// =============================================================================
// TEST 2: Re-derivation happens inside the transaction
// =============================================================================

#[test]
fn test_evolution_rederives_caps() {
    let (repo, _, companion_id) = seeded_pair();
    let controller = EvolutionController::new();

    let vigor = repo
        .fetch(&companion_id)
        .unwrap()
        .effective_value(ParamName::Vigor);

    controller
        .attempt_evolve(&repo, &companion_id, Stage::Adult)
        .unwrap();

    let companion = repo.fetch(&companion_id).unwrap();
    assert_eq!(
        companion.pool(ResourceName::Health).unwrap().max,
        Stage::Adult.default_base_hp() + vigor
    );
}

// =============================================================================
// TEST 3: Cost symmetry over multi-stage jumps
// =============================================================================

#[test]
fn test_multi_stage_jump_costs_distance_both_ways() {
    let (repo, _, companion_id) = seeded_pair();
    let controller = EvolutionController::new();

    assert_eq!(evolution_cost(Stage::Child, Stage::Baby1), 2);

    let down = controller
        .attempt_evolve(&repo, &companion_id, Stage::Baby1)
        .unwrap();
    assert_eq!(down.cost, 2);

    let up = controller
        .attempt_evolve(&repo, &companion_id, Stage::Child)
        .unwrap();
    assert_eq!(up.cost, 2);
}

// =============================================================================
// TEST 4: Locked and unknown stages are rejected untouched
// =============================================================================

#[test]
fn test_locked_stage_rejection_mutates_nothing() {
    let (repo, tamer_id, companion_id) = seeded_pair();
    let controller = EvolutionController::new();

    let companion_before = repo.fetch(&companion_id).unwrap();
    let tamer_before = repo.fetch(&tamer_id).unwrap();

    // Perfect exists in the table but is not unlocked.
    let err = controller
        .attempt_evolve(&repo, &companion_id, Stage::Perfect)
        .unwrap_err();
    assert_eq!(
        err,
        EvolutionError::LockedStage {
            stage: Stage::Perfect
        }
    );

    // SuperUltimate has no table entry at all.
    let err = controller
        .attempt_evolve(&repo, &companion_id, Stage::SuperUltimate)
        .unwrap_err();
    assert!(matches!(err, EvolutionError::LockedStage { .. }));

    assert_eq!(repo.fetch(&companion_id).unwrap(), companion_before);
    assert_eq!(repo.fetch(&tamer_id).unwrap(), tamer_before);
}

// =============================================================================
// TEST 5: Insufficient digisoul leaves the transaction atomic
// =============================================================================

#[test]
fn test_insufficient_funding_is_atomic() {
    let (repo, tamer_id, companion_id) = seeded_pair();
    let controller = EvolutionController::new();

    // Leave exactly 1 digisoul against a cost of 2.
    let mut tamer = repo.fetch(&tamer_id).unwrap();
    let current = tamer.pool(ResourceName::Digisoul).unwrap().current;
    tamer.spend(ResourceName::Digisoul, current - 1).unwrap();
    repo.commit(&[tamer]).unwrap();

    let companion_before = repo.fetch(&companion_id).unwrap();
    let tamer_before = repo.fetch(&tamer_id).unwrap();

    let err = controller
        .attempt_evolve(&repo, &companion_id, Stage::Baby1)
        .unwrap_err();
    assert!(matches!(
        err,
        EvolutionError::Resource(digital_world_core::creature::ResourceError::Insufficient {
            needed: 2,
            available: 1,
            ..
        })
    ));

    // Post-state equals pre-state exactly, on both entities.
    assert_eq!(repo.fetch(&companion_id).unwrap(), companion_before);
    assert_eq!(repo.fetch(&tamer_id).unwrap(), tamer_before);
}

// =============================================================================
// TEST 6: Self-funding and unlinked failure modes
// =============================================================================

#[test]
fn test_wild_companion_funds_itself() {
    let companion = create_sample_companion("Wild Agumon");
    let companion_id = companion.id;
    let energy_before = companion.pool(ResourceName::Energy).unwrap().current;

    let repo = InMemoryRepository::new();
    repo.insert(companion);

    let controller = EvolutionController::new();
    controller
        .attempt_evolve(&repo, &companion_id, Stage::Adult)
        .expect("self-funding from energy");

    let companion = repo.fetch(&companion_id).unwrap();
    assert_eq!(
        companion.pool(ResourceName::Energy).unwrap().current,
        energy_before - 1
    );
}

#[test]
fn test_dangling_partner_is_unlinked_entity() {
    let mut companion = create_sample_companion("Orphaned");
    companion.partner = Some(digital_world_core::CreatureId::new());
    let companion_id = companion.id;

    let repo = InMemoryRepository::new();
    repo.insert(companion);

    let controller = EvolutionController::new();
    let err = controller
        .attempt_evolve(&repo, &companion_id, Stage::Adult)
        .unwrap_err();
    assert_eq!(err, EvolutionError::UnlinkedEntity);
}

// =============================================================================
// TEST 7: Unknown companion id surfaces the repository error
// =============================================================================

#[test]
fn test_unknown_companion_reports_repository_error() {
    let repo = InMemoryRepository::new();
    let controller = EvolutionController::new();
    let ghost = digital_world_core::CreatureId::new();

    let err = controller
        .attempt_evolve(&repo, &ghost, Stage::Adult)
        .unwrap_err();
    assert_eq!(
        err,
        EvolutionError::Repository(RepositoryError::NotFound(ghost))
    );
}

// =============================================================================
// TEST 8: Receipts serialize for the notification layer
// =============================================================================

#[test]
fn test_receipt_round_trips_as_json() {
    let (repo, _, companion_id) = seeded_pair();
    let controller = EvolutionController::new();

    let receipt = controller
        .attempt_evolve(&repo, &companion_id, Stage::Adult)
        .unwrap();

    let json = serde_json::to_string(&receipt).unwrap();
    let back: digital_world_core::EvolutionReceipt = serde_json::from_str(&json).unwrap();
    assert_eq!(back, receipt);
}
