//! Simulation settings
//!
//! Every geometry and tuning constant the core needs lives in one immutable
//! value. It is built once, wrapped in an `Arc` and handed to each component
//! at world-build time.

use std::path::Path;

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Simulation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Timing ===
    /// Logical ticks (and presentations) per second
    pub tick_rate: u32,

    // === Geometry ===
    /// Sprite scale factor applied to the 64x48 source frames
    pub scale: f32,
    /// Source tile size in pixels before `tiles_scale`
    pub tile_default_size: i32,
    pub tiles_scale: f32,
    /// The only tile code entities can stand inside
    pub walkable_tile: i32,
    /// Trimmed off the scaled sprite width/height to get the entity size
    pub sprite_offset: IVec2,
    /// Viewport used for the camera focal point
    pub viewport: IVec2,

    // === Movement ===
    /// Horizontal step per tick while moving
    pub move_speed: i32,
    /// Rightward movement stops once x reaches this value
    pub move_right_limit: i32,
    /// Gravity, in px/tick² before scaling
    pub base_gravity: f32,
    /// Jump impulse, in px/tick before scaling
    pub base_jump_speed: f32,

    // === Combat ===
    pub player_hp: i32,
    pub enemy_hp: i32,
    /// Damage dealt to an enemy by one released attack
    pub player_damage: i32,
    /// Attack rectangle offset from the player position
    pub attack_offset: IVec2,
    pub attack_size: IVec2,

    // === Animation ===
    /// Ticks per animation frame
    pub player_anim_speed: u32,
    pub enemy_anim_speed: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_rate: 120,

            scale: 2.5,
            tile_default_size: 32,
            tiles_scale: 1.5,
            walkable_tile: 4,
            sprite_offset: IVec2::new(50, 5),
            viewport: IVec2::new(1920, 970),

            move_speed: 3,
            move_right_limit: 4320,
            base_gravity: 0.04,
            base_jump_speed: -2.25,

            player_hp: 100,
            enemy_hp: 100,
            player_damage: 25,
            attack_offset: IVec2::new(40, 40),
            attack_size: IVec2::new(100, 80),

            player_anim_speed: 30,
            enemy_anim_speed: 50,
        }
    }
}

impl Settings {
    /// Parse settings from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Side length of one tile in world pixels
    pub fn tile_size(&self) -> i32 {
        (self.tile_default_size as f32 * self.tiles_scale) as i32
    }

    /// Size of players and enemies (the scaled 64x48 frame minus the offset)
    pub fn entity_size(&self) -> IVec2 {
        IVec2::new(
            (64.0 * self.scale) as i32 - self.sprite_offset.x,
            (48.0 * self.scale) as i32 - self.sprite_offset.y,
        )
    }

    /// Size of a blood shard pickup
    pub fn shard_size(&self) -> IVec2 {
        IVec2::splat((8.0 * self.scale) as i32)
    }

    pub fn gravity(&self) -> f32 {
        self.base_gravity * self.scale
    }

    pub fn jump_speed(&self) -> f32 {
        self.base_jump_speed * self.scale
    }

    /// Wall-clock interval between two presentations
    pub fn tick_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs_f64(1.0 / self.tick_rate.max(1) as f64)
    }
}
