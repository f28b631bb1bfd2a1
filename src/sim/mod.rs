//! Deterministic simulation module
//!
//! All gameplay logic lives here. Nothing in this module knows about
//! threads, clocks or rendering:
//! - One call to `tick` is one fixed step
//! - Integer pixel positions, stable iteration order (level order)
//! - The loop thread is the only writer

pub mod animation;
pub mod collision;
pub mod combat;
pub mod grid;
pub mod interact;
pub mod physics;
pub mod state;
pub mod tick;

pub use animation::{Animator, sprite_count};
pub use collision::{Rect, can_move_to, is_on_floor};
pub use grid::TileGrid;
pub use interact::Interaction;
pub use physics::StepResult;
pub use state::{
    Action, Body, Collectible, CollectibleKind, CollectibleTag, Direction, Enemy, Inventory,
    Player, World,
};
pub use tick::{Intent, TickReport, tick};
