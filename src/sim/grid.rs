//! Tile grid for one level
//!
//! The grid is immutable once a level is built. It is shared between the
//! world, the player and every render snapshot through an `Arc`.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::settings::Settings;

/// Rectangular grid of integer tile codes
///
/// Rows are indexed `[y][x]`. The loader is responsible for handing over a
/// rectangular grid; a jagged one faults on the first out-of-range lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileGrid {
    rows: Vec<Vec<i32>>,
    tile_size: i32,
    walkable: i32,
}

impl TileGrid {
    pub fn new(rows: Vec<Vec<i32>>, settings: &Settings) -> Self {
        Self {
            rows,
            tile_size: settings.tile_size(),
            walkable: settings.walkable_tile,
        }
    }

    /// A grid where every tile has the same code
    pub fn filled(width: usize, height: usize, code: i32, settings: &Settings) -> Self {
        Self::new(vec![vec![code; width]; height], settings)
    }

    /// Width in tiles
    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    /// Height in tiles
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn tile_size(&self) -> i32 {
        self.tile_size
    }

    /// World extent in pixels
    pub fn world_size(&self) -> IVec2 {
        IVec2::new(
            self.width() as i32 * self.tile_size,
            self.height() as i32 * self.tile_size,
        )
    }

    /// Tile code at a tile coordinate, `None` outside the grid
    pub fn tile(&self, tx: usize, ty: usize) -> Option<i32> {
        self.rows.get(ty).and_then(|row| row.get(tx)).copied()
    }

    /// Whether the pixel (x, y) blocks movement
    ///
    /// Everything outside the world is solid. Inside, only the walkable code
    /// lets entities through.
    pub fn is_collidable(&self, x: i32, y: i32) -> bool {
        let world = self.world_size();
        if x < 0 || x >= world.x || y < 0 || y >= world.y {
            return true;
        }

        let tx = (x / self.tile_size) as usize;
        let ty = (y / self.tile_size) as usize;

        self.rows[ty][tx] != self.walkable
    }
}
