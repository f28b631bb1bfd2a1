//! Fixed timestep simulation tick
//!
//! One call advances a world by exactly one logical step. The loop thread is
//! the only caller, so a tick always runs to completion before the next.

use serde::{Deserialize, Serialize};

use super::animation;
use super::combat;
use super::interact::{self, Interaction};
use super::physics::{self, StepResult};
use super::state::{Direction, World};

/// Discrete input intents, already decoded from whatever device produced them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    MoveLeftStart,
    MoveLeftStop,
    MoveRightStart,
    MoveRightStop,
    JumpRequest,
    AttackStart,
    AttackRelease,
    InteractRequest,
}

/// What happened during one tick
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    pub step: StepResult,
    /// Enemies hit by attack releases this tick
    pub hits: usize,
    pub interactions: Vec<Interaction>,
}

/// Apply an intent that changes movement state; everything else is deferred
/// to the combat/interaction phase. Returns false for deferred intents.
fn apply_control(world: &mut World, intent: Intent) -> bool {
    let body = &mut world.player.body;
    match intent {
        Intent::MoveLeftStart => {
            body.direction = Direction::Left;
            body.moving = true;
        }
        Intent::MoveRightStart => {
            body.direction = Direction::Right;
            body.moving = true;
        }
        // A stop only cancels the direction it belongs to, so releasing one
        // key while the other is held keeps the newer run going
        Intent::MoveLeftStop => {
            if body.direction == Direction::Left {
                body.moving = false;
            }
        }
        Intent::MoveRightStop => {
            if body.direction == Direction::Right {
                body.moving = false;
            }
        }
        Intent::JumpRequest => world.player.jump(),
        Intent::AttackStart | Intent::AttackRelease | Intent::InteractRequest => return false,
    }
    true
}

/// Advance the world by one tick
///
/// Order: movement intents, physics and tile collision, combat and
/// interaction intents (in arrival order), collectible overlap, animation.
pub fn tick(world: &mut World, intents: &[Intent]) -> TickReport {
    let mut report = TickReport::default();
    let mut deferred = Vec::new();

    for &intent in intents {
        if !apply_control(world, intent) {
            deferred.push(intent);
        }
    }

    world.time_ticks += 1;

    report.step = physics::step_player(&mut world.player, world.settings.move_right_limit);
    if report.step.landed {
        log::trace!("Player landed at {}", world.player.pos());
    }

    for intent in deferred {
        match intent {
            Intent::AttackStart => {
                if combat::start_attack(&mut world.player) {
                    log::debug!("Player started attacking");
                }
            }
            Intent::AttackRelease => {
                report.hits +=
                    combat::release_attack(&mut world.player, &mut world.enemies, &world.settings);
            }
            // Resolves overlaps ahead of the per-tick pass below
            Intent::InteractRequest => {
                let hitbox = world.player.hitbox();
                report.interactions.extend(interact::collect_overlapping(
                    hitbox,
                    &mut world.collectibles,
                    &mut world.inventory,
                ));
            }
            _ => {}
        }
    }

    let hitbox = world.player.hitbox();
    report.interactions.extend(interact::collect_overlapping(
        hitbox,
        &mut world.collectibles,
        &mut world.inventory,
    ));

    animation::update_player(&mut world.player);
    animation::select_player_action(&mut world.player);
    for enemy in &mut world.enemies {
        animation::update_enemy(enemy);
        animation::select_enemy_action(enemy);
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::state::{Action, Collectible, CollectibleKind};
    use crate::stage::LevelSet;
    use glam::IVec2;
    use std::sync::Arc;

    fn demo_world() -> World {
        let settings = Arc::new(Settings::default());
        let levels = LevelSet::demo(&settings);
        World::build(0, &levels.levels[0], settings)
    }

    /// Let the player fall onto the floor of the demo level
    fn settle(world: &mut World) {
        for _ in 0..200 {
            tick(world, &[]);
        }
        assert!(!world.player.airborne);
    }

    #[test]
    fn test_tick_counts() {
        let mut world = demo_world();
        tick(&mut world, &[]);
        tick(&mut world, &[]);
        assert_eq!(world.time_ticks, 2);
    }

    #[test]
    fn test_move_intents() {
        let mut world = demo_world();
        settle(&mut world);
        let x = world.player.pos().x;

        tick(&mut world, &[Intent::MoveRightStart]);
        assert_eq!(world.player.pos().x, x + 3);
        assert_eq!(world.player.body.action, Action::Running);

        // Stopping the other direction does nothing
        tick(&mut world, &[Intent::MoveLeftStop]);
        assert_eq!(world.player.pos().x, x + 6);

        tick(&mut world, &[Intent::MoveRightStop]);
        assert_eq!(world.player.pos().x, x + 6);
        assert_eq!(world.player.body.action, Action::Idle);
    }

    #[test]
    fn test_jump_intent_while_airborne_is_ignored() {
        let mut world = demo_world();
        settle(&mut world);

        tick(&mut world, &[Intent::JumpRequest]);
        assert!(world.player.airborne);
        let speed = world.player.air_speed;

        tick(&mut world, &[Intent::JumpRequest]);
        assert!((world.player.air_speed - (speed + world.player.gravity)).abs() < 1e-6);
    }

    #[test]
    fn test_attack_kills_enemy_after_four_releases() {
        let mut world = demo_world();
        settle(&mut world);
        let settings = world.settings.clone();
        // Park an enemy inside the attack rectangle
        world.enemies[0].body.pos = world.player.pos() + settings.attack_offset;

        for round in 1..=4 {
            let report = tick(&mut world, &[Intent::AttackStart, Intent::AttackRelease]);
            assert_eq!(report.hits, 1);
            assert_eq!(world.enemies[0].is_dead(), round == 4);
            // Let the swing finish before the next one
            for _ in 0..300 {
                tick(&mut world, &[]);
            }
            assert!(!world.player.attacking);
        }
        assert_eq!(world.enemies[0].body.action, Action::Dying);
    }

    #[test]
    fn test_walking_over_shard_collects_it() {
        let mut world = demo_world();
        settle(&mut world);
        let shard = world.collectibles[0].pos;
        world.player.body.pos = IVec2::new(shard.x, world.player.pos().y);

        let report = tick(&mut world, &[]);
        assert!(world.collectibles[0].collected);
        assert_eq!(report.interactions.len(), 1);
        assert_eq!(world.inventory.blood_shards, 1);

        tick(&mut world, &[Intent::InteractRequest]);
        assert_eq!(world.inventory.blood_shards, 1);
    }

    #[test]
    fn test_standing_on_chest_opens_it() {
        let mut world = demo_world();
        settle(&mut world);
        let pos = world.player.pos();
        world.collectibles.push(Collectible::new(
            pos,
            IVec2::splat(48),
            CollectibleKind::Chest,
        ));
        let chest = world.collectibles.len() - 1;

        let report = tick(&mut world, &[]);
        assert!(world.collectibles[chest].collected);
        assert_eq!(report.interactions, vec![Interaction::ChestOpened]);

        let report = tick(&mut world, &[Intent::InteractRequest]);
        assert!(report.interactions.is_empty());
    }
}
