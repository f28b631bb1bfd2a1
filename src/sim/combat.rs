//! Player attacks against enemies
//!
//! An attack is a press/release pair. The press starts the swing animation,
//! the release lands the blow: the attack rectangle is tested once against
//! every live enemy and each overlapped enemy takes one hit.

use super::collision::Rect;
use super::state::{Action, Enemy, Player};
use crate::settings::Settings;

/// Rectangle swept by the player's sword, relative to its position
pub fn attack_rect(player: &Player, settings: &Settings) -> Rect {
    Rect::from_pos_size(player.pos() + settings.attack_offset, settings.attack_size)
}

/// Handle the attack press. Returns true if a new swing started.
///
/// The press is always remembered so the next release can pair with it, but
/// a swing only starts while standing still and not already swinging.
pub fn start_attack(player: &mut Player) -> bool {
    player.attack_held = true;
    if player.attacking || player.body.moving {
        return false;
    }
    player.attacking = true;
    player.attack_finished = false;
    player.body.action = Action::Attacking;
    player.anim.reset();
    true
}

/// Handle the attack release. Returns how many enemies were hit.
pub fn release_attack(player: &mut Player, enemies: &mut [Enemy], settings: &Settings) -> usize {
    if !player.attack_held {
        return 0;
    }
    player.attack_held = false;
    if !player.attacking {
        return 0;
    }

    let range = attack_rect(player, settings);
    let mut hits = 0;
    for enemy in enemies.iter_mut().filter(|e| !e.is_dead()) {
        if range.intersects(&enemy.hitbox()) {
            enemy.take_damage(player.attack_damage);
            hits += 1;
            if enemy.is_dead() {
                log::info!("Enemy at {} is dead", enemy.body.pos);
            } else {
                log::debug!("Enemy took damage, hp {}", enemy.body.hp);
            }
        }
    }
    hits
}
