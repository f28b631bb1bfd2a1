//! World state and core simulation types
//!
//! Everything the loop thread mutates lives here. A `World` is built from one
//! level's data and thrown away as a whole on restart or advance.

use std::sync::Arc;

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::animation::Animator;
use super::collision::Rect;
use super::grid::TileGrid;
use crate::settings::Settings;

/// What an entity is currently doing (drives the animation row)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Action {
    #[default]
    Idle,
    Running,
    Attacking,
    Jump,
    Landing,
    Falling,
    Hitting,
    Dying,
    Dashing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
}

/// Shared record for everything that moves and has health
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub pos: IVec2,
    pub size: IVec2,
    /// Collision box, anchored at `pos`
    pub hitbox: IVec2,
    pub hp: i32,
    pub dead: bool,
    pub action: Action,
    pub direction: Direction,
    pub moving: bool,
    pub speed: i32,
}

impl Body {
    pub fn new(pos: IVec2, size: IVec2, hp: i32, direction: Direction, speed: i32) -> Self {
        Self {
            pos,
            size,
            hitbox: IVec2::new((size.x as f64 * 0.9) as i32, size.y),
            hp,
            dead: false,
            action: Action::Idle,
            direction,
            moving: false,
            speed,
        }
    }

    pub fn hitbox_rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.hitbox)
    }
}

/// The player character
#[derive(Debug, Clone)]
pub struct Player {
    pub body: Body,
    pub attacking: bool,
    pub attack_finished: bool,
    /// Set by `attack_start`, consumed by `attack_release`
    pub attack_held: bool,
    pub attack_damage: i32,
    pub airborne: bool,
    /// Vertical velocity in px/tick, positive is down
    pub air_speed: f32,
    pub gravity: f32,
    pub jump_speed: f32,
    /// Grid of the level the player currently lives in
    pub grid: Arc<TileGrid>,
    pub anim: Animator,
}

impl Player {
    pub fn new(pos: IVec2, grid: Arc<TileGrid>, settings: &Settings) -> Self {
        Self {
            body: Body::new(
                pos,
                settings.entity_size(),
                settings.player_hp,
                Direction::Right,
                settings.move_speed,
            ),
            attacking: false,
            attack_finished: true,
            attack_held: false,
            attack_damage: settings.player_damage,
            airborne: false,
            air_speed: 0.0,
            gravity: settings.gravity(),
            jump_speed: settings.jump_speed(),
            grid,
            anim: Animator::new(settings.player_anim_speed),
        }
    }

    pub fn pos(&self) -> IVec2 {
        self.body.pos
    }

    pub fn hitbox(&self) -> Rect {
        self.body.hitbox_rect()
    }

    /// Begin a jump; ignored while already airborne
    pub fn jump(&mut self) {
        if self.airborne {
            return;
        }
        self.airborne = true;
        self.air_speed = self.jump_speed;
    }

    /// Floor contact: back on the ground with no vertical speed
    pub fn land(&mut self) {
        self.airborne = false;
        self.air_speed = 0.0;
    }
}

/// A hostile entity
#[derive(Debug, Clone)]
pub struct Enemy {
    pub body: Body,
    pub hit: bool,
    pub anim: Animator,
}

impl Enemy {
    pub fn new(pos: IVec2, hp: i32, settings: &Settings) -> Self {
        Self {
            body: Body::new(pos, settings.entity_size(), hp, Direction::Left, 0),
            hit: false,
            anim: Animator::new(settings.enemy_anim_speed),
        }
    }

    /// Enemies use their full scaled frame as the hitbox
    pub fn hitbox(&self) -> Rect {
        Rect::from_pos_size(self.body.pos, self.body.size)
    }

    pub fn is_dead(&self) -> bool {
        self.body.dead
    }

    /// Apply one hit; dead enemies ignore it
    pub fn take_damage(&mut self, damage: i32) {
        if self.body.dead {
            return;
        }
        self.body.hp -= damage;
        self.hit = true;
        if self.body.hp <= 0 {
            self.body.dead = true;
            self.hit = false;
        }
    }
}

/// Collectible variants and their payloads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CollectibleKind {
    Key,
    BloodShard {
        #[serde(default = "default_shard_value")]
        value: u32,
    },
    Chest,
    Npc {
        #[serde(default)]
        talking: bool,
    },
}

fn default_shard_value() -> u32 {
    1
}

impl CollectibleKind {
    /// Payload-free tag, for renderers
    pub fn tag(self) -> CollectibleTag {
        match self {
            CollectibleKind::Key => CollectibleTag::Key,
            CollectibleKind::BloodShard { .. } => CollectibleTag::BloodShard,
            CollectibleKind::Chest => CollectibleTag::Chest,
            CollectibleKind::Npc { .. } => CollectibleTag::Npc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollectibleTag {
    Key,
    BloodShard,
    Chest,
    Npc,
}

/// A world object the player can pick up or interact with
#[derive(Debug, Clone, PartialEq)]
pub struct Collectible {
    pub pos: IVec2,
    pub size: IVec2,
    pub kind: CollectibleKind,
    /// Collected (pickups) or interacted with (chests, NPCs). Never reset.
    pub collected: bool,
    pub has_collision: bool,
}

impl Collectible {
    pub fn new(pos: IVec2, size: IVec2, kind: CollectibleKind) -> Self {
        Self {
            pos,
            size,
            kind,
            collected: false,
            has_collision: true,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }
}

/// What the player picked up in the current level instance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    pub blood_shards: u32,
    pub keys: u32,
}

/// The complete mutable state of one level instance
#[derive(Debug, Clone)]
pub struct World {
    pub settings: Arc<Settings>,
    /// Index into the level source, 0-based
    pub level_index: usize,
    pub grid: Arc<TileGrid>,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub collectibles: Vec<Collectible>,
    pub inventory: Inventory,
    /// Where the player (re)appears
    pub spawn: IVec2,
    /// Reaching x >= exit.x and y >= exit.y advances the level
    pub exit: IVec2,
    /// Reaching y >= fall_limit restarts the level
    pub fall_limit: i32,
    /// Ticks run in this world
    pub time_ticks: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_hitbox_is_ninety_percent_wide() {
        let body = Body::new(IVec2::ZERO, IVec2::new(110, 115), 100, Direction::Right, 3);
        assert_eq!(body.hitbox, IVec2::new(99, 115));
    }

    #[test]
    fn test_jump_sets_air_speed_once() {
        let s = Settings::default();
        let grid = Arc::new(TileGrid::filled(4, 4, 4, &s));
        let mut player = Player::new(IVec2::new(10, 10), grid, &s);

        player.jump();
        assert!(player.airborne);
        assert_eq!(player.air_speed, s.jump_speed());

        player.air_speed = 1.5;
        player.jump();
        assert!(player.airborne);
        assert_eq!(player.air_speed, 1.5);
    }

    #[test]
    fn test_enemy_dies_on_fourth_hit() {
        let s = Settings::default();
        let mut enemy = Enemy::new(IVec2::ZERO, 100, &s);

        for _ in 0..3 {
            enemy.take_damage(25);
            assert!(!enemy.is_dead());
            assert!(enemy.hit);
        }
        enemy.take_damage(25);
        assert!(enemy.is_dead());
        assert!(!enemy.hit);
        assert_eq!(enemy.body.hp, 0);

        enemy.take_damage(25);
        assert_eq!(enemy.body.hp, 0);
        assert!(!enemy.hit);
    }

    #[test]
    fn test_collectible_kind_json() {
        let kind: CollectibleKind = serde_json::from_str(r#"{ "kind": "blood_shard" }"#).unwrap();
        assert_eq!(kind, CollectibleKind::BloodShard { value: 1 });

        let kind: CollectibleKind = serde_json::from_str(r#"{ "kind": "npc" }"#).unwrap();
        assert_eq!(kind.tag(), CollectibleTag::Npc);
    }
}
