//! Ronin headless driver
//!
//! Runs the simulation loop without a window, feeding it a scripted run to
//! the right and logging a summary of each presented second.
//!
//! Usage: `ronin-core [settings.json] [levels.json]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Ronin (headless) starting...");

    if let Err(e) = headless::run(std::env::args().skip(1).collect()) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Threads are not available on wasm32; embed the library instead
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::thread;
    use std::time::Duration;

    use ronin_core::{FrameSnapshot, GameLoop, Intent, LevelSet, Result, Settings};

    /// Scripted input: wait this long, then send the intent
    const SCRIPT: &[(u64, Intent)] = &[
        (500, Intent::AttackStart),
        (300, Intent::AttackRelease),
        (800, Intent::MoveRightStart),
        (1000, Intent::JumpRequest),
        (1500, Intent::JumpRequest),
        (1500, Intent::JumpRequest),
        (1200, Intent::MoveRightStop),
        (300, Intent::InteractRequest),
    ];

    pub fn run(args: Vec<String>) -> Result<()> {
        let settings = match args.first() {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };
        let levels = match args.get(1) {
            Some(path) => LevelSet::load(path)?,
            None => LevelSet::demo(&settings),
        };

        let tick_rate = u64::from(settings.tick_rate.max(1));
        let presenter = move |frame: &FrameSnapshot| {
            if frame.frame_id % tick_rate == 0 {
                let player = frame.player();
                log::info!(
                    "frame {} level {} player {} {:?} camera {} shards {} fps {}",
                    frame.frame_id,
                    frame.level_index + 1,
                    player.pos,
                    player.action,
                    frame.camera,
                    frame.inventory.blood_shards,
                    frame.fps
                );
            }
        };

        let mut game = GameLoop::from_levels(levels, settings, presenter)?;
        let intents = game.intents();
        game.start()?;

        for &(delay_ms, intent) in SCRIPT {
            thread::sleep(Duration::from_millis(delay_ms));
            log::debug!("Sending {intent:?}");
            intents.send(intent);
        }
        thread::sleep(Duration::from_secs(1));
        game.stop();

        if let Some(world) = game.world() {
            log::info!(
                "Stopped on level {} after {} ticks, player at {}, {} of {} enemies dead",
                world.level_index + 1,
                world.time_ticks,
                world.player.pos(),
                world.enemies.iter().filter(|e| e.is_dead()).count(),
                world.enemies.len()
            );
        }
        Ok(())
    }
}
