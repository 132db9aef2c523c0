//! Derived data: parameter modifiers, resource caps and defenses.
//!
//! [`derive`] is the single entry point. It recomputes everything from base
//! values plus the current stage, so running it after any base-parameter or
//! stage mutation brings the record fully up to date, and running it twice
//! changes nothing. Owning workflows call it explicitly; nothing in this
//! crate recomputes behind the caller's back.

use crate::creature::{Creature, CreatureKind, ParamName, ResourceName, ResourcePool};

/// Ten-centered modifier: `floor((value - 10) / 2)`.
///
/// Euclidean division keeps the floor correct below 10: a value of 7 is -2,
/// not -1.
pub fn modifier_for(value: i32) -> i32 {
    (value - 10).div_euclid(2)
}

/// Defense formula shared by physical and magic defense:
/// `ceil((a + b) / 4)`, never below 1.
pub fn defense_value(a: i32, b: i32) -> i32 {
    (a + b + 3).div_euclid(4).max(1)
}

/// Recompute all derived fields on a creature in place.
pub fn derive(creature: &mut Creature) {
    derive_modifiers(creature);
    derive_resource_caps(creature);
    derive_defenses(creature);
    for pool in creature.resources.values_mut() {
        pool.clamp();
    }
}

/// Parameter modifiers. Companions use raw pool values, so their modifiers
/// stay 0; the humanoid kinds get the ten-centered modifier from their
/// effective (stage-adjusted) value.
fn derive_modifiers(creature: &mut Creature) {
    let pool_style = creature.kind.uses_pool_values();
    let names: Vec<ParamName> = creature.parameters.keys().copied().collect();
    for name in names {
        let modifier = if pool_style {
            0
        } else {
            modifier_for(creature.effective_value(name))
        };
        if let Some(parameter) = creature.parameters.get_mut(&name) {
            parameter.modifier = modifier;
        }
    }
}

/// Per-kind resource caps. The formulas are fixed book constants, not
/// tunables.
fn derive_resource_caps(creature: &mut Creature) {
    match creature.kind {
        CreatureKind::PrimaryCharacter => {
            let willpower = creature.effective_value(ParamName::Willpower);
            let intellect = creature.effective_value(ParamName::Intellect);
            set_cap(creature, ResourceName::Health, 10 + 2 * willpower);
            set_cap(creature, ResourceName::Energy, 10 + intellect);
        }
        CreatureKind::NonPlayerCharacter { challenge } => {
            set_cap(creature, ResourceName::Health, 10 + 5 * challenge);
            set_cap(creature, ResourceName::Energy, 10 + 3 * challenge);
        }
        CreatureKind::Controller => {
            let willpower = creature.effective_value(ParamName::Willpower);
            set_cap(creature, ResourceName::Health, 10 + 2 * willpower);
            set_cap(
                creature,
                ResourceName::Digisoul,
                10 + modifier_for(willpower),
            );
        }
        CreatureKind::Companion => {
            let base_hp = creature
                .stage
                .map(|stage| {
                    creature
                        .evolution
                        .get(&stage)
                        .map(|profile| profile.base_hp)
                        .unwrap_or_else(|| stage.default_base_hp())
                })
                .unwrap_or(0);
            let vigor = creature.effective_value(ParamName::Vigor);
            let spirit = creature.effective_value(ParamName::Spirit);
            set_cap(creature, ResourceName::Health, base_hp + vigor);
            set_cap(creature, ResourceName::Energy, spirit + 5);
        }
    }
}

fn derive_defenses(creature: &mut Creature) {
    let vigor = creature.effective_value(ParamName::Vigor);
    let agility = creature.effective_value(ParamName::Agility);
    let spirit = creature.effective_value(ParamName::Spirit);
    creature.defense = defense_value(vigor, agility);
    creature.magic_defense = defense_value(spirit, agility);
}

/// Update a pool's cap, creating the pool full on first derivation.
fn set_cap(creature: &mut Creature, resource: ResourceName, max: i32) {
    let max = max.max(0);
    let pool = creature
        .resources
        .entry(resource)
        .or_insert_with(|| ResourcePool::full(max));
    pool.max = max;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::creature::Creature;
    use crate::stages::{Stage, StageProfile};

    fn character(willpower: i32, intellect: i32) -> Creature {
        let mut c = Creature::new("Sora", CreatureKind::PrimaryCharacter)
            .with_parameter(ParamName::Willpower, willpower)
            .with_parameter(ParamName::Intellect, intellect);
        derive(&mut c);
        c
    }

    #[test]
    fn test_modifier_formula() {
        assert_eq!(modifier_for(10), 0);
        assert_eq!(modifier_for(11), 0);
        assert_eq!(modifier_for(12), 1);
        assert_eq!(modifier_for(9), -1);
        assert_eq!(modifier_for(8), -1);
        assert_eq!(modifier_for(7), -2);
        assert_eq!(modifier_for(1), -5);
    }

    #[test]
    fn test_modifier_is_monotonic() {
        for v in -20..40 {
            assert!(modifier_for(v) <= modifier_for(v + 1));
        }
    }

    #[test]
    fn test_character_caps() {
        let c = character(12, 14);
        assert_eq!(c.pool(ResourceName::Health).unwrap().max, 34);
        assert_eq!(c.pool(ResourceName::Energy).unwrap().max, 24);
        assert_eq!(c.modifier(ParamName::Willpower), 1);
        assert_eq!(c.modifier(ParamName::Intellect), 2);
    }

    #[test]
    fn test_npc_caps_follow_challenge() {
        let mut npc = Creature::new(
            "Kuwagamon",
            CreatureKind::NonPlayerCharacter { challenge: 3 },
        );
        derive(&mut npc);
        assert_eq!(npc.pool(ResourceName::Health).unwrap().max, 25);
        assert_eq!(npc.pool(ResourceName::Energy).unwrap().max, 19);
    }

    #[test]
    fn test_companion_caps_use_stage_and_pool_values() {
        let mut companion = Creature::new("Agumon", CreatureKind::Companion)
            .with_parameter(ParamName::Vigor, 6)
            .with_parameter(ParamName::Agility, 4)
            .with_parameter(ParamName::Spirit, 5)
            .with_stage(Stage::Child)
            .with_evolution_entry(Stage::Child, StageProfile::for_stage(Stage::Child).unlocked());
        derive(&mut companion);

        assert_eq!(companion.pool(ResourceName::Health).unwrap().max, 18); // 12 + 6
        assert_eq!(companion.pool(ResourceName::Energy).unwrap().max, 10); // 5 + 5
        // Pool-style kind: no ten-centered modifiers.
        assert_eq!(companion.modifier(ParamName::Vigor), 0);
    }

    #[test]
    fn test_stage_bonus_applies_before_caps() {
        let mut companion = Creature::new("Greymon", CreatureKind::Companion)
            .with_parameter(ParamName::Vigor, 6)
            .with_stage(Stage::Adult)
            .with_evolution_entry(
                Stage::Adult,
                StageProfile::for_stage(Stage::Adult)
                    .unlocked()
                    .with_bonus(ParamName::Vigor, 2),
            );
        derive(&mut companion);
        // 18 base + (6 + 2) vigor
        assert_eq!(companion.pool(ResourceName::Health).unwrap().max, 26);
    }

    #[test]
    fn test_defense_boundary_clamps_to_one() {
        assert_eq!(defense_value(1, 1), 1); // ceil(2/4) = 1 already
        assert_eq!(defense_value(0, 0), 1); // clamped
        assert_eq!(defense_value(6, 4), 3); // ceil(10/4)
        assert_eq!(defense_value(5, 4), 3); // ceil(9/4)
    }

    #[test]
    fn test_defenses_on_creature() {
        let mut companion = Creature::new("Patamon", CreatureKind::Companion)
            .with_parameter(ParamName::Vigor, 1)
            .with_parameter(ParamName::Agility, 1)
            .with_parameter(ParamName::Spirit, 7);
        derive(&mut companion);
        assert_eq!(companion.defense, 1);
        assert_eq!(companion.magic_defense, 2); // ceil(8/4)
    }

    #[test]
    fn test_derive_is_idempotent() {
        let mut a = Creature::new("Gabumon", CreatureKind::Companion)
            .with_parameter(ParamName::Vigor, 5)
            .with_parameter(ParamName::Agility, 3)
            .with_parameter(ParamName::Spirit, 4)
            .with_stage(Stage::Child)
            .with_evolution_entry(Stage::Child, StageProfile::for_stage(Stage::Child).unlocked());
        derive(&mut a);
        let once = a.clone();
        derive(&mut a);
        assert_eq!(a, once);
    }

    #[test]
    fn test_shrinking_cap_clamps_current() {
        let mut companion = Creature::new("MetalGreymon", CreatureKind::Companion)
            .with_parameter(ParamName::Vigor, 6)
            .with_stage(Stage::Perfect)
            .with_evolution_entry(
                Stage::Perfect,
                StageProfile::for_stage(Stage::Perfect).unlocked(),
            )
            .with_evolution_entry(Stage::Baby1, StageProfile::for_stage(Stage::Baby1).unlocked());
        derive(&mut companion);
        assert_eq!(companion.pool(ResourceName::Health).unwrap().current, 31);

        // Devolving shrinks the cap; current follows it down.
        companion.stage = Some(Stage::Baby1);
        derive(&mut companion);
        let health = *companion.pool(ResourceName::Health).unwrap();
        assert_eq!(health.max, 11);
        assert_eq!(health.current, 11);
    }

    #[test]
    fn test_missing_parameters_do_not_fail() {
        let mut bare = Creature::new("Blank", CreatureKind::PrimaryCharacter);
        derive(&mut bare);
        assert_eq!(bare.pool(ResourceName::Health).unwrap().max, 10);
        assert_eq!(bare.pool(ResourceName::Energy).unwrap().max, 10);
        assert_eq!(bare.defense, 1);
    }
}
