//! d6 dice-pool resolution.
//!
//! Checks roll a pool of six-sided dice and count faces of 4+ as successes;
//! automatic successes are added on top and the total is classified against
//! a difficulty. Randomness comes through the [`FaceSource`] capability so a
//! shared or remote roller can stand in for the local RNG. The draw is the
//! only suspension point, and the counting and classification around it are
//! pure.

use async_trait::async_trait;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Faces per die.
pub const DIE_FACES: u8 = 6;

/// Lowest face that counts as a success (the upper half of the die).
pub const SUCCESS_THRESHOLD: u8 = 4;

/// Source of uniform die faces in `1..=DIE_FACES`.
///
/// Asynchronous on purpose: in a multi-party session the faces may come
/// from a remote shared roller rather than a local RNG. Cancelling a
/// resolution simply drops the pending draw.
#[async_trait]
pub trait FaceSource: Send {
    async fn draw(&mut self, count: u32) -> Vec<u8>;
}

/// Local RNG-backed face source.
#[derive(Debug, Default)]
pub struct RandomFaceSource;

impl RandomFaceSource {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FaceSource for RandomFaceSource {
    async fn draw(&mut self, count: u32) -> Vec<u8> {
        let mut rng = rand::thread_rng();
        (0..count).map(|_| rng.gen_range(1..=DIE_FACES)).collect()
    }
}

/// A check: how many dice, how many free successes, against what
/// difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DicePool {
    /// Number of dice. Negative values clamp to zero at resolution;
    /// penalties can push a pool below nothing, and that is a roll of no
    /// dice, not an error.
    pub pool_size: i32,
    pub auto_successes: i32,
    pub difficulty: i32,
}

impl DicePool {
    pub fn new(pool_size: i32, auto_successes: i32, difficulty: i32) -> Self {
        Self {
            pool_size,
            auto_successes,
            difficulty,
        }
    }

    /// Draw faces from the source and classify the check.
    pub async fn resolve<S: FaceSource + ?Sized>(&self, source: &mut S) -> PoolResult {
        let count = self.pool_size.max(0) as u32;
        let faces = source.draw(count).await;
        let dice: Vec<DieResult> = faces
            .iter()
            .map(|&face| DieResult {
                face,
                success: face >= SUCCESS_THRESHOLD,
            })
            .collect();
        let successes = count_successes(&faces, self.auto_successes);
        let outcome = Outcome::classify(successes, self.difficulty);
        tracing::debug!(
            pool = count,
            successes,
            difficulty = self.difficulty,
            outcome = outcome.name(),
            "resolved dice pool"
        );
        PoolResult {
            dice,
            successes,
            auto_successes: self.auto_successes,
            difficulty: self.difficulty,
            outcome,
        }
    }
}

impl fmt::Display for DicePool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}d{} (+{} auto) vs {}",
            self.pool_size.max(0),
            DIE_FACES,
            self.auto_successes,
            self.difficulty
        )
    }
}

/// Successes in a set of faces, plus automatic successes.
pub fn count_successes(faces: &[u8], auto_successes: i32) -> i32 {
    auto_successes
        + faces
            .iter()
            .filter(|&&face| face >= SUCCESS_THRESHOLD)
            .count() as i32
}

/// One rolled die.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DieResult {
    pub face: u8,
    pub success: bool,
}

/// Outcome of a check against its difficulty.
///
/// Criticals use a fixed margin of three either side of the difficulty,
/// regardless of pool size. A margin in between falls back to the plain
/// meets-it-or-not comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    CriticalSuccess,
    Success,
    Failure,
    CriticalFailure,
}

impl Outcome {
    /// Classify a success total against a difficulty. Total over
    /// `(successes, difficulty)` and each pair maps to exactly one tier.
    pub fn classify(successes: i32, difficulty: i32) -> Outcome {
        let difference = successes - difficulty;
        if difference >= 3 {
            Outcome::CriticalSuccess
        } else if difference <= -3 {
            Outcome::CriticalFailure
        } else if successes >= difficulty {
            Outcome::Success
        } else {
            Outcome::Failure
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Outcome::CriticalSuccess => "critical-success",
            Outcome::Success => "success",
            Outcome::Failure => "failure",
            Outcome::CriticalFailure => "critical-failure",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::CriticalSuccess | Outcome::Success)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Complete result of a resolved check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolResult {
    /// The rolled dice in draw order.
    pub dice: Vec<DieResult>,
    pub successes: i32,
    pub auto_successes: i32,
    pub difficulty: i32,
    pub outcome: Outcome,
}

impl fmt::Display for PoolResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let faces: Vec<String> = self.dice.iter().map(|d| d.face.to_string()).collect();
        write!(
            f,
            "[{}] = {} successes vs {} ({})",
            faces.join(", "),
            self.successes,
            self.difficulty,
            self.outcome
        )
    }
}

/// Convenience wrapper over [`DicePool::resolve`].
pub async fn resolve_pool<S: FaceSource + ?Sized>(
    source: &mut S,
    pool_size: i32,
    auto_successes: i32,
    difficulty: i32,
) -> PoolResult {
    DicePool::new(pool_size, auto_successes, difficulty)
        .resolve(source)
        .await
}

/// Rank label for a difficulty value.
pub fn difficulty_label(difficulty: i32) -> String {
    match difficulty {
        1 => "Simple (Baby I/II)".to_string(),
        2 => "Moderate (Child)".to_string(),
        3 => "Demanding (Adult)".to_string(),
        4 => "Extreme (Perfect)".to_string(),
        5 => "Impossible (Ultimate)".to_string(),
        6 => "Legendary (Super Ultimate)".to_string(),
        other => format!("Difficulty {other}"),
    }
}
