//! Testing utilities: deterministic face sources and sample creatures.

use async_trait::async_trait;
use std::collections::VecDeque;

use crate::advantage::{Attribute, Element};
use crate::creature::{link_partners, Creature, CreatureKind, Crest, ParamName};
use crate::derivation;
use crate::dice::FaceSource;
use crate::stages::{Stage, StageProfile};

/// A face source that replays a scripted sequence.
///
/// When the script runs out it keeps producing 1s (failures), so a test
/// that under-provisions faces fails loudly on its assertions rather than
/// panicking.
#[derive(Debug, Clone)]
pub struct ScriptedFaceSource {
    faces: VecDeque<u8>,
}

impl ScriptedFaceSource {
    pub fn new(faces: impl IntoIterator<Item = u8>) -> Self {
        Self {
            faces: faces.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.faces.len()
    }
}

#[async_trait]
impl FaceSource for ScriptedFaceSource {
    async fn draw(&mut self, count: u32) -> Vec<u8> {
        (0..count).map(|_| self.faces.pop_front().unwrap_or(1)).collect()
    }
}

/// A ready-to-play character, derived.
pub fn create_sample_character(name: impl Into<String>) -> Creature {
    let mut character = Creature::new(name, CreatureKind::PrimaryCharacter)
        .with_parameter(ParamName::Willpower, 12)
        .with_parameter(ParamName::Intellect, 14)
        .with_crest(Crest::Courage);
    derivation::derive(&mut character);
    character
}

/// A child-stage companion with the lower ladder unlocked, derived.
pub fn create_sample_companion(name: impl Into<String>) -> Creature {
    let mut companion = Creature::new(name, CreatureKind::Companion)
        .with_parameter(ParamName::Vigor, 6)
        .with_parameter(ParamName::Agility, 4)
        .with_parameter(ParamName::Spirit, 5)
        .with_parameter(ParamName::Instinct, 3)
        .with_attribute(Attribute::Vaccine)
        .with_element(Element::Fire)
        .with_stage(Stage::Child);
    for stage in [Stage::Baby1, Stage::Baby2, Stage::Child, Stage::Adult] {
        companion
            .evolution
            .insert(stage, StageProfile::for_stage(stage).unlocked());
    }
    companion.evolution.insert(
        Stage::Perfect,
        StageProfile::for_stage(Stage::Perfect).with_bonus(ParamName::Vigor, 2),
    );
    derivation::derive(&mut companion);
    companion
}

/// A tamer holding a digisoul ledger, derived.
pub fn create_sample_tamer(name: impl Into<String>) -> Creature {
    let mut tamer = Creature::new(name, CreatureKind::Controller)
        .with_parameter(ParamName::Willpower, 14)
        .with_parameter(ParamName::Intellect, 12);
    derivation::derive(&mut tamer);
    tamer
}

/// A linked tamer/companion pair, both derived.
pub fn create_linked_pair(
    tamer_name: impl Into<String>,
    companion_name: impl Into<String>,
) -> (Creature, Creature) {
    let mut tamer = create_sample_tamer(tamer_name);
    let mut companion = create_sample_companion(companion_name);
    link_partners(&mut tamer, &mut companion);
    (tamer, companion)
}
