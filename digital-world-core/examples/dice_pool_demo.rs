//! Roll a few dice pools against the difficulty ladder.

use digital_world_core::dice::{difficulty_label, resolve_pool, RandomFaceSource};

#[tokio::main]
async fn main() {
    println!("=== Dice Pool Checks ===\n");

    let mut source = RandomFaceSource::new();

    for (pool, auto, difficulty) in [(6, 0, 2), (4, 1, 3), (8, 0, 5), (-2, 1, 1)] {
        let result = resolve_pool(&mut source, pool, auto, difficulty).await;
        println!(
            "pool {pool:>2} (+{auto} auto) vs {} -> {result}",
            difficulty_label(difficulty)
        );
    }
}
