//! Walk a linked tamer/companion pair up and down the stage ladder.

use digital_world_core::testing::create_linked_pair;
use digital_world_core::{
    CreatureRepository, EvolutionController, InMemoryRepository, ResourceName, Stage,
};

fn main() {
    let (tamer, companion) = create_linked_pair("Taichi", "Agumon");
    let (tamer_id, companion_id) = (tamer.id, companion.id);

    let repo = InMemoryRepository::new();
    repo.insert(tamer);
    repo.insert(companion);

    let controller = EvolutionController::new();

    for target in [Stage::Adult, Stage::Child, Stage::Perfect] {
        match controller.attempt_evolve(&repo, &companion_id, target) {
            Ok(receipt) => {
                let tamer = repo.fetch(&tamer_id).unwrap();
                let digisoul = tamer.pool(ResourceName::Digisoul).unwrap();
                println!(
                    "{} -> {} (cost {}, digisoul {}/{})",
                    receipt.from, receipt.to, receipt.cost, digisoul.current, digisoul.max
                );
            }
            Err(err) => println!("{} refused: {err}", target),
        }
    }

    let companion = repo.fetch(&companion_id).unwrap();
    let health = companion.pool(ResourceName::Health).unwrap();
    println!(
        "\n{} is now {} with {}/{} health, defense {}",
        companion.name,
        companion.stage.map(|s| s.label()).unwrap_or("stageless"),
        health.current,
        health.max,
        companion.defense
    );
}
