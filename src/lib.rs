//! Ronin - simulation core of a 2D side-scrolling action game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (tile collision, physics, combat, pickups)
//! - `stage`: Level data and advance/restart transitions
//! - `game_loop`: Fixed cadence loop thread with start/stop
//! - `snapshot`: Read-only frame handed to an external renderer
//! - `settings`: Data-driven geometry and tuning

pub mod error;
pub mod game_loop;
pub mod settings;
pub mod sim;
pub mod snapshot;
pub mod stage;

pub use error::{Error, Result};
pub use game_loop::{GameLoop, IntentSender, LatestFrame, Presenter};
pub use settings::Settings;
pub use sim::{Intent, World};
pub use snapshot::FrameSnapshot;
pub use stage::{LevelData, LevelSet, LevelSource, StageController, Transition};
