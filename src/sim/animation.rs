//! Animation cursors and per-entity action state machines
//!
//! The renderer only draws the frame index it is handed; deciding which
//! action an entity is in, and when an attack or hit reaction is over, is
//! gameplay and happens here.

use serde::{Deserialize, Serialize};

use super::state::{Action, Enemy, Player};

/// Number of sprite frames in each action's animation row
pub fn sprite_count(action: Action) -> u32 {
    match action {
        Action::Landing | Action::Dashing | Action::Hitting => 2,
        Action::Running => 12,
        Action::Attacking => 9,
        Action::Dying => 22,
        Action::Falling => 4,
        Action::Idle => 16,
        Action::Jump => 3,
    }
}

/// Frame cursor that advances one frame every `speed` ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Animator {
    pub tick: u32,
    pub index: u32,
    pub speed: u32,
}

impl Animator {
    pub fn new(speed: u32) -> Self {
        Self {
            tick: 0,
            index: 0,
            speed: speed.max(1),
        }
    }

    pub fn reset(&mut self) {
        self.tick = 0;
        self.index = 0;
    }

    /// Advance one tick. Returns true when the row for `action` just wrapped
    /// back to frame 0.
    pub fn advance(&mut self, action: Action) -> bool {
        self.tick += 1;
        if self.tick < self.speed {
            return false;
        }
        self.tick = 0;
        self.index += 1;
        if self.index >= sprite_count(action) {
            self.index = 0;
            return true;
        }
        false
    }
}

/// Advance the player's animation and end a finished attack
pub fn update_player(player: &mut Player) {
    let wrapped = player.anim.advance(player.body.action);
    if wrapped && player.body.action == Action::Attacking && !player.attack_finished {
        player.body.action = Action::Idle;
        player.attack_finished = true;
        player.attacking = false;
        log::trace!("attack animation finished");
    }
}

/// Pick the player's action from its movement/combat flags
pub fn select_player_action(player: &mut Player) {
    // Attacking is checked before moving. The swing only ends when the
    // Attacking row wraps, so a Running row here would leave it active forever.
    let action = if player.attacking {
        Action::Attacking
    } else if player.body.moving {
        Action::Running
    } else if player.airborne {
        // Jump row while rising, Falling row on the way down; Landing is unused
        if player.air_speed < 0.0 {
            Action::Jump
        } else {
            Action::Falling
        }
    } else {
        Action::Idle
    };

    if action != player.body.action {
        player.body.action = action;
        player.anim.reset();
    }
}

/// Advance an enemy's animation
///
/// Dying holds on its last frame. A finished hit reaction clears `hit` and
/// returns the enemy to idle.
pub fn update_enemy(enemy: &mut Enemy) {
    if enemy.body.action == Action::Dying {
        let last = sprite_count(Action::Dying) - 1;
        if enemy.anim.index < last {
            enemy.anim.advance(Action::Dying);
        }
        return;
    }

    let wrapped = enemy.anim.advance(enemy.body.action);
    if wrapped && enemy.body.action == Action::Hitting {
        enemy.hit = false;
        enemy.body.action = Action::Idle;
    }
}

/// Pick an enemy's action from its dead/hit flags
pub fn select_enemy_action(enemy: &mut Enemy) {
    if enemy.body.dead {
        if enemy.body.action != Action::Dying {
            enemy.body.action = Action::Dying;
            enemy.anim.reset();
        }
    } else if enemy.hit {
        if enemy.body.action != Action::Hitting {
            enemy.body.action = Action::Hitting;
            enemy.anim.reset();
        }
    } else {
        enemy.body.action = Action::Idle;
    }
}
