//! Player movement: gravity, landing and horizontal steps
//!
//! Integer pixel positions, float vertical speed. A move either lands whole
//! or is rejected whole; there is no sliding along walls and no snapping to
//! the surface on landing.

use super::collision::{can_move_to, is_on_floor};
use super::state::{Direction, Player};

/// Outcome of one movement step, mostly for logging and tests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepResult {
    /// The projected vertical move hit something this tick
    pub landed: bool,
    /// The player walked off an edge and started falling
    pub left_ground: bool,
    /// The combined move was rejected and the position kept
    pub blocked: bool,
}

/// Advance the player's position by one tick
///
/// `right_limit` caps rightward movement: the player only steps right while
/// its x is below it. Leftward movement is bounded by the grid alone.
pub fn step_player(player: &mut Player, right_limit: i32) -> StepResult {
    let grid = player.grid.clone();
    let pos = player.body.pos;
    let hitbox = player.body.hitbox;
    let mut result = StepResult::default();
    let mut target = pos;

    if player.airborne {
        player.air_speed += player.gravity;
        target.y = (pos.y as f32 + player.air_speed) as i32;

        // A landing tick commits nothing: x and y stay at the pre-step values
        // and the floor check waits for the next tick
        if !can_move_to(&grid, pos.x, target.y, hitbox.x, hitbox.y) {
            player.land();
            result.landed = true;
            return result;
        }
    }

    if player.body.moving {
        match player.body.direction {
            Direction::Right => {
                if pos.x < right_limit {
                    target.x = pos.x + player.body.speed;
                }
            }
            Direction::Left => target.x = pos.x - player.body.speed,
        }
    }

    if !player.airborne && !is_on_floor(&grid, &player.body) {
        player.airborne = true;
        result.left_ground = true;
    }

    if can_move_to(&grid, target.x, target.y, hitbox.x, hitbox.y) {
        player.body.pos = target;
    } else if target != pos {
        result.blocked = true;
    }

    result
}
