//! Level data and stage transitions
//!
//! Levels come from an external loader as plain data. The controller decides
//! when the player has reached the exit or fallen out of the world, and
//! builds the replacement world from scratch.

use std::sync::Arc;

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::settings::Settings;
use crate::sim::{Collectible, CollectibleKind, Enemy, Inventory, Player, TileGrid, World};

/// Player spawn used when a level does not name one
pub const DEFAULT_SPAWN: IVec2 = IVec2::new(160, 455);
/// Exit zone corner used when a level does not name one
pub const DEFAULT_EXIT: IVec2 = IVec2::new(2000, 455);
/// Falling to this y restarts the level
pub const DEFAULT_FALL_LIMIT: i32 = 600;

fn default_spawn() -> IVec2 {
    DEFAULT_SPAWN
}

fn default_exit() -> IVec2 {
    DEFAULT_EXIT
}

fn default_fall_limit() -> i32 {
    DEFAULT_FALL_LIMIT
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemySpawn {
    pub pos: IVec2,
    /// Falls back to `Settings::enemy_hp`
    #[serde(default)]
    pub hp: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectibleSpawn {
    pub pos: IVec2,
    /// Falls back to a per-kind default size
    #[serde(default)]
    pub size: Option<IVec2>,
    #[serde(flatten)]
    pub kind: CollectibleKind,
}

/// Everything needed to build one level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelData {
    /// Tile codes, `tiles[y][x]`; must be rectangular
    pub tiles: Vec<Vec<i32>>,
    #[serde(default = "default_spawn")]
    pub spawn: IVec2,
    #[serde(default = "default_exit")]
    pub exit: IVec2,
    #[serde(default = "default_fall_limit")]
    pub fall_limit: i32,
    #[serde(default)]
    pub enemies: Vec<EnemySpawn>,
    #[serde(default)]
    pub collectibles: Vec<CollectibleSpawn>,
}

/// Supplier of parsed level data, indexed from 0
pub trait LevelSource: Send + 'static {
    fn level_count(&self) -> usize;

    /// Panics if `index >= level_count()`
    fn level(&self, index: usize) -> &LevelData;
}

/// An in-memory list of levels
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelSet {
    pub levels: Vec<LevelData>,
}

impl LevelSource for LevelSet {
    fn level_count(&self) -> usize {
        self.levels.len()
    }

    fn level(&self, index: usize) -> &LevelData {
        &self.levels[index]
    }
}

impl LevelSet {
    pub fn from_json(json: &str) -> Result<Self> {
        let set: LevelSet = serde_json::from_str(json)?;
        if set.levels.is_empty() {
            return Err(Error::NoLevels);
        }
        Ok(set)
    }

    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let path = path.as_ref();
        let set = Self::from_json(&std::fs::read_to_string(path)?)?;
        log::info!("Loaded {} levels from {}", set.levels.len(), path.display());
        Ok(set)
    }

    /// Two flat-floored levels with the stock enemy and pickup placements
    pub fn demo(settings: &Settings) -> Self {
        const WIDTH: usize = 90;
        const HEIGHT: usize = 14;

        let floor = |solid_from: usize| {
            let mut rows = vec![vec![settings.walkable_tile; WIDTH]; HEIGHT];
            for row in rows.iter_mut().skip(solid_from) {
                row.fill(1);
            }
            rows
        };

        let shard = |x: i32, y: i32| CollectibleSpawn {
            pos: IVec2::new(x, y),
            size: None,
            kind: CollectibleKind::BloodShard { value: 1 },
        };

        let first = LevelData {
            tiles: floor(12),
            spawn: DEFAULT_SPAWN,
            exit: DEFAULT_EXIT,
            fall_limit: DEFAULT_FALL_LIMIT,
            enemies: vec![
                EnemySpawn { pos: IVec2::new(400, 455), hp: None },
                EnemySpawn { pos: IVec2::new(1000, 455), hp: None },
            ],
            collectibles: vec![shard(400, 550), shard(500, 550)],
        };

        let mut second_tiles = floor(12);
        // A low wall to jump over
        second_tiles[11][20] = 1;
        let second = LevelData {
            tiles: second_tiles,
            spawn: DEFAULT_SPAWN,
            exit: DEFAULT_EXIT,
            fall_limit: DEFAULT_FALL_LIMIT,
            enemies: vec![EnemySpawn { pos: IVec2::new(1400, 455), hp: Some(150) }],
            collectibles: vec![
                shard(700, 550),
                CollectibleSpawn {
                    pos: IVec2::new(1200, 540),
                    size: None,
                    kind: CollectibleKind::Key,
                },
                CollectibleSpawn {
                    pos: IVec2::new(1700, 528),
                    size: None,
                    kind: CollectibleKind::Chest,
                },
                CollectibleSpawn {
                    pos: IVec2::new(1800, 460),
                    size: None,
                    kind: CollectibleKind::Npc { talking: false },
                },
            ],
        };

        Self {
            levels: vec![first, second],
        }
    }
}

fn default_collectible_size(kind: CollectibleKind, settings: &Settings) -> IVec2 {
    match kind {
        CollectibleKind::Key => IVec2::new(20, 32),
        CollectibleKind::BloodShard { .. } => settings.shard_size(),
        CollectibleKind::Chest => IVec2::splat(settings.tile_size()),
        CollectibleKind::Npc { .. } => settings.entity_size(),
    }
}

impl World {
    /// Build a fresh world for one level; nothing carries over
    pub fn build(level_index: usize, data: &LevelData, settings: Arc<Settings>) -> Self {
        let grid = Arc::new(TileGrid::new(data.tiles.clone(), &settings));
        let player = Player::new(data.spawn, grid.clone(), &settings);

        let enemies = data
            .enemies
            .iter()
            .map(|e| Enemy::new(e.pos, e.hp.unwrap_or(settings.enemy_hp), &settings))
            .collect();

        let collectibles = data
            .collectibles
            .iter()
            .map(|c| {
                let size = c
                    .size
                    .unwrap_or_else(|| default_collectible_size(c.kind, &settings));
                Collectible::new(c.pos, size, c.kind)
            })
            .collect();

        Self {
            level_index,
            grid,
            player,
            enemies,
            collectibles,
            inventory: Inventory::default(),
            spawn: data.spawn,
            exit: data.exit,
            fall_limit: data.fall_limit,
            time_ticks: 0,
            settings,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum StageState {
    #[default]
    Playing,
    Transitioning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Exit zone reached: go to `to`, wrapping after the last level
    Advance { from: usize, to: usize },
    /// Fell out of the world: rebuild the same level
    Restart { level: usize },
}

impl Transition {
    pub fn target(self) -> usize {
        match self {
            Transition::Advance { to, .. } => to,
            Transition::Restart { level } => level,
        }
    }
}

/// Owns the level source and decides which level the world holds
pub struct StageController {
    source: Box<dyn LevelSource>,
    settings: Arc<Settings>,
    current: usize,
    state: StageState,
}

impl std::fmt::Debug for StageController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StageController")
            .field("levels", &self.source.level_count())
            .field("current", &self.current)
            .field("state", &self.state)
            .finish()
    }
}

impl StageController {
    pub fn new(source: impl LevelSource, settings: Arc<Settings>) -> Result<Self> {
        if source.level_count() == 0 {
            return Err(Error::NoLevels);
        }
        Ok(Self {
            source: Box::new(source),
            settings,
            current: 0,
            state: StageState::Playing,
        })
    }

    pub fn current_level(&self) -> usize {
        self.current
    }

    pub fn level_count(&self) -> usize {
        self.source.level_count()
    }

    pub fn state(&self) -> StageState {
        self.state
    }

    pub fn settings(&self) -> &Arc<Settings> {
        &self.settings
    }

    /// Build the world for the current level
    pub fn build_world(&self) -> World {
        World::build(
            self.current,
            self.source.level(self.current),
            self.settings.clone(),
        )
    }

    /// Check the player against the exit zone and the fall-out line
    pub fn evaluate(&self, world: &World) -> Option<Transition> {
        let pos = world.player.pos();
        if pos.x >= world.exit.x && pos.y >= world.exit.y {
            let to = (self.current + 1) % self.source.level_count();
            return Some(Transition::Advance {
                from: self.current,
                to,
            });
        }
        if pos.y >= world.fall_limit {
            return Some(Transition::Restart {
                level: self.current,
            });
        }
        None
    }

    /// Enter the transitioning state; the old world stays as it is until
    /// `rebuild` replaces it
    pub fn begin(&mut self, transition: Transition) {
        self.state = StageState::Transitioning;
        match transition {
            Transition::Advance { from, to } => {
                log::info!("Advancing from level {} to level {}", from + 1, to + 1)
            }
            Transition::Restart { level } => log::info!("Restarting level {}", level + 1),
        }
    }

    /// Throw the old world away and build the transition's target level
    ///
    /// Must only be called while no tick is running.
    pub fn rebuild(&mut self, world: &mut World, transition: Transition) {
        if self.state != StageState::Transitioning {
            self.begin(transition);
        }
        self.current = transition.target();
        *world = self.build_world();
        self.state = StageState::Playing;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> StageController {
        let settings = Arc::new(Settings::default());
        StageController::new(LevelSet::demo(&settings), settings).unwrap()
    }

    #[test]
    fn test_empty_level_set_is_rejected() {
        let settings = Arc::new(Settings::default());
        let err = StageController::new(LevelSet::default(), settings).unwrap_err();
        assert!(matches!(err, Error::NoLevels));
    }

    #[test]
    fn test_build_world_places_spawns() {
        let stage = controller();
        let world = stage.build_world();
        assert_eq!(world.level_index, 0);
        assert_eq!(world.player.pos(), DEFAULT_SPAWN);
        assert_eq!(world.enemies.len(), 2);
        assert_eq!(world.enemies[0].body.hp, 100);
        assert_eq!(world.collectibles[0].size, IVec2::new(20, 20));
        assert_eq!(world.grid.world_size(), IVec2::new(4320, 672));
        assert!(Arc::ptr_eq(&world.grid, &world.player.grid));
    }

    #[test]
    fn test_no_transition_at_spawn() {
        let stage = controller();
        let world = stage.build_world();
        assert_eq!(stage.evaluate(&world), None);
    }

    #[test]
    fn test_exit_advances_and_wraps() {
        let mut stage = controller();
        let mut world = stage.build_world();

        world.player.body.pos = IVec2::new(2000, 455);
        let t = stage.evaluate(&world).unwrap();
        assert_eq!(t, Transition::Advance { from: 0, to: 1 });
        stage.begin(t);
        assert_eq!(stage.state(), StageState::Transitioning);
        assert_eq!(stage.current_level(), 0);
        assert_eq!(world.level_index, 0);
        stage.rebuild(&mut world, t);
        assert_eq!(stage.current_level(), 1);
        assert_eq!(world.level_index, 1);
        assert_eq!(world.player.pos(), DEFAULT_SPAWN);
        assert_eq!(stage.state(), StageState::Playing);

        world.player.body.pos = IVec2::new(2100, 470);
        let t = stage.evaluate(&world).unwrap();
        assert_eq!(t, Transition::Advance { from: 1, to: 0 });
        stage.rebuild(&mut world, t);
        assert_eq!(world.level_index, 0);
    }

    #[test]
    fn test_exit_needs_both_coordinates() {
        let stage = controller();
        let mut world = stage.build_world();
        world.player.body.pos = IVec2::new(2500, 454);
        assert_eq!(stage.evaluate(&world), None);
        world.player.body.pos = IVec2::new(1999, 500);
        assert_eq!(stage.evaluate(&world), None);
    }

    #[test]
    fn test_fall_restarts_same_level_at_spawn() {
        let mut stage = controller();
        let mut world = stage.build_world();
        world.enemies[0].take_damage(25);
        world.collectibles[0].collected = true;

        world.player.body.pos = IVec2::new(700, 600);
        let t = stage.evaluate(&world).unwrap();
        assert_eq!(t, Transition::Restart { level: 0 });
        stage.rebuild(&mut world, t);

        assert_eq!(world.level_index, 0);
        assert_eq!(world.player.pos(), DEFAULT_SPAWN);
        assert_eq!(world.enemies[0].body.hp, 100);
        assert!(!world.collectibles[0].collected);
    }

    #[test]
    fn test_level_json() {
        let json = r#"{
            "levels": [{
                "tiles": [[4, 4], [1, 1]],
                "exit": [90, 0],
                "enemies": [{ "pos": [10, 0] }],
                "collectibles": [
                    { "pos": [5, 5], "kind": "blood_shard", "value": 5 },
                    { "pos": [6, 6], "size": [8, 8], "kind": "key" }
                ]
            }]
        }"#;
        let set = LevelSet::from_json(json).unwrap();
        let level = &set.levels[0];
        assert_eq!(level.spawn, DEFAULT_SPAWN);
        assert_eq!(level.exit, IVec2::new(90, 0));
        assert_eq!(level.fall_limit, DEFAULT_FALL_LIMIT);
        assert_eq!(level.collectibles[0].kind, CollectibleKind::BloodShard { value: 5 });
        assert_eq!(level.collectibles[1].size, Some(IVec2::new(8, 8)));
    }

    #[test]
    fn test_empty_level_json_is_an_error() {
        assert!(matches!(
            LevelSet::from_json(r#"{ "levels": [] }"#),
            Err(Error::NoLevels)
        ));
    }
}
