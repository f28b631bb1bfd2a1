//! Collision queries against the tile grid
//!
//! All hit and movement tests are axis-aligned boxes in integer pixels.

use glam::IVec2;

use super::grid::TileGrid;
use super::state::Body;

/// Axis-aligned rectangle in world pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_pos_size(pos: IVec2, size: IVec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    /// Right edge (exclusive)
    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    /// Bottom edge (exclusive)
    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    pub fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    /// Overlap test; touching edges and empty rectangles never intersect
    pub fn intersects(&self, other: &Rect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        other.right() > self.x
            && other.bottom() > self.y
            && self.right() > other.x
            && self.bottom() > other.y
    }
}

/// Check whether a box of size (w, h) at (x, y) fits in walkable space
///
/// Only the four corners are sampled, so boxes wider than a tile can straddle
/// a one-tile obstacle.
pub fn can_move_to(grid: &TileGrid, x: i32, y: i32, w: i32, h: i32) -> bool {
    !grid.is_collidable(x, y)
        && !grid.is_collidable(x + w, y)
        && !grid.is_collidable(x, y + h)
        && !grid.is_collidable(x + w, y + h)
}

/// Whether there is something solid one pixel below the body's hitbox
pub fn is_on_floor(grid: &TileGrid, body: &Body) -> bool {
    let below = body.pos.y + body.hitbox.y + 1;
    grid.is_collidable(body.pos.x, below) || grid.is_collidable(body.pos.x + body.hitbox.x, below)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::state::Direction;
    use proptest::prelude::*;

    fn open_grid() -> TileGrid {
        TileGrid::filled(10, 10, 4, &Settings::default())
    }

    /// 10x10 walkable grid with a solid floor on the bottom row
    fn floor_grid() -> TileGrid {
        let mut rows = vec![vec![4; 10]; 10];
        rows[9] = vec![1; 10];
        TileGrid::new(rows, &Settings::default())
    }

    #[test]
    fn test_rect_intersects() {
        let a = Rect::new(0, 0, 10, 10);
        assert!(a.intersects(&Rect::new(5, 5, 10, 10)));
        assert!(a.intersects(&Rect::new(-5, -5, 10, 10)));
        // Touching edges
        assert!(!a.intersects(&Rect::new(10, 0, 10, 10)));
        assert!(!a.intersects(&Rect::new(0, 10, 10, 10)));
        // Empty
        assert!(!a.intersects(&Rect::new(2, 2, 0, 5)));
    }

    #[test]
    fn test_can_move_to_inside_and_outside() {
        let grid = open_grid();
        assert!(can_move_to(&grid, 50, 50, 10, 10));
        assert!(!can_move_to(&grid, -1, 50, 10, 10));
        assert!(!can_move_to(&grid, 470, 50, 10, 10));
    }

    #[test]
    fn test_can_move_to_blocked_by_any_solid_code() {
        // Every tile is code 0, which is solid
        let grid = TileGrid::filled(10, 10, 0, &Settings::default());
        assert!(!can_move_to(&grid, 50, 50, 10, 10));
    }

    #[test]
    fn test_is_on_floor() {
        let grid = floor_grid();
        let floor_top = 9 * 48;
        let mut body = Body::new(IVec2::ZERO, IVec2::new(20, 20), 1, Direction::Right, 0);

        body.pos = IVec2::new(50, floor_top - body.hitbox.y - 1);
        assert!(is_on_floor(&grid, &body));

        body.pos.y -= 1;
        assert!(!is_on_floor(&grid, &body));
    }

    proptest! {
        #[test]
        fn prop_can_move_to_matches_corners(
            codes in proptest::collection::vec(prop_oneof![Just(4), 0i32..15], 100),
            x in -20i32..500,
            y in -20i32..500,
            w in 0i32..120,
            h in 0i32..120,
        ) {
            let rows = codes.chunks(10).map(|c| c.to_vec()).collect();
            let grid = TileGrid::new(rows, &Settings::default());
            let corners = [(x, y), (x + w, y), (x, y + h), (x + w, y + h)];
            let expected = corners.iter().all(|&(cx, cy)| !grid.is_collidable(cx, cy));
            prop_assert_eq!(can_move_to(&grid, x, y, w, h), expected);
        }
    }
}
