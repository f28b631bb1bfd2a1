//! Copyable post-tick view of the world for renderers
//!
//! Built on the loop thread right after a tick settles, so a renderer never
//! sees an entity halfway through an update.

use std::sync::Arc;

use glam::IVec2;
use serde::Serialize;

use crate::sim::{Action, Body, CollectibleTag, Direction, Inventory, TileGrid, World};
use crate::stage::StageState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EntityKind {
    Player,
    Enemy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EntityView {
    pub kind: EntityKind,
    pub pos: IVec2,
    pub size: IVec2,
    pub action: Action,
    pub direction: Direction,
    pub dead: bool,
    pub hit: bool,
    /// Sprite column within the action's row
    pub frame: u32,
}

impl EntityView {
    fn new(kind: EntityKind, body: &Body, hit: bool, frame: u32) -> Self {
        Self {
            kind,
            pos: body.pos,
            size: body.size,
            action: body.action,
            direction: body.direction,
            dead: body.dead,
            hit,
            frame,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CollectibleView {
    pub kind: CollectibleTag,
    pub pos: IVec2,
    pub size: IVec2,
    pub collected: bool,
}

/// Everything a renderer may read for one presentation
#[derive(Debug, Clone)]
pub struct FrameSnapshot {
    /// Presentations since the loop started, counting from 1
    pub frame_id: u64,
    pub level_index: usize,
    /// `Transitioning` on the last frame of a level that is about to be rebuilt
    pub stage: StageState,
    pub grid: Arc<TileGrid>,
    /// Player first, then enemies in level order
    pub entities: Vec<EntityView>,
    pub collectibles: Vec<CollectibleView>,
    pub inventory: Inventory,
    /// Top-left corner of the viewport in world pixels
    pub camera: IVec2,
    /// Presentations counted over the last full second
    pub fps: u32,
}

impl FrameSnapshot {
    pub fn build(world: &World, stage: StageState, frame_id: u64, fps: u32) -> Self {
        let player = &world.player;
        let mut entities = Vec::with_capacity(1 + world.enemies.len());
        entities.push(EntityView::new(
            EntityKind::Player,
            &player.body,
            false,
            player.anim.index,
        ));
        entities.extend(
            world
                .enemies
                .iter()
                .map(|e| EntityView::new(EntityKind::Enemy, &e.body, e.hit, e.anim.index)),
        );

        let collectibles = world
            .collectibles
            .iter()
            .map(|c| CollectibleView {
                kind: c.kind.tag(),
                pos: c.pos,
                size: c.size,
                collected: c.collected,
            })
            .collect();

        Self {
            frame_id,
            level_index: world.level_index,
            stage,
            grid: world.grid.clone(),
            entities,
            collectibles,
            inventory: world.inventory,
            camera: camera_focus(player.pos(), world.settings.viewport),
            fps,
        }
    }

    pub fn player(&self) -> &EntityView {
        &self.entities[0]
    }
}

/// Player position minus half the viewport, never negative
pub fn camera_focus(player: IVec2, viewport: IVec2) -> IVec2 {
    (player - viewport / 2).max(IVec2::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::stage::LevelSet;

    fn world() -> World {
        let settings = Arc::new(Settings::default());
        let levels = LevelSet::demo(&settings);
        World::build(0, &levels.levels[0], settings)
    }

    #[test]
    fn test_camera_clamps_at_origin() {
        let viewport = IVec2::new(1920, 970);
        assert_eq!(camera_focus(IVec2::new(160, 455), viewport), IVec2::ZERO);
        assert_eq!(
            camera_focus(IVec2::new(2000, 600), viewport),
            IVec2::new(1040, 115)
        );
        assert_eq!(camera_focus(IVec2::new(1000, 600), viewport), IVec2::new(40, 115));
    }

    #[test]
    fn test_snapshot_lists_player_first() {
        let w = world();
        let frame = FrameSnapshot::build(&w, StageState::Playing, 7, 120);
        assert_eq!(frame.frame_id, 7);
        assert_eq!(frame.fps, 120);
        assert_eq!(frame.entities.len(), 3);
        assert_eq!(frame.player().kind, EntityKind::Player);
        assert_eq!(frame.player().pos, w.player.pos());
        assert_eq!(frame.entities[1].kind, EntityKind::Enemy);
        assert_eq!(frame.collectibles.len(), 2);
        assert_eq!(frame.collectibles[0].kind, CollectibleTag::BloodShard);
        assert!(Arc::ptr_eq(&frame.grid, &w.grid));
    }

    #[test]
    fn test_snapshot_is_detached_from_world() {
        let mut w = world();
        let frame = FrameSnapshot::build(&w, StageState::Playing, 1, 0);
        w.player.body.pos.x += 500;
        w.enemies[0].take_damage(25);
        assert_eq!(frame.player().pos.x, 160);
        assert!(!frame.entities[1].hit);
    }
}
