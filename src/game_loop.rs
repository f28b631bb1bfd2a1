//! Fixed cadence simulation loop
//!
//! The loop runs on its own thread and owns the world while it runs. Each
//! presentation interval it drains queued intents, ticks once, checks the
//! stage predicates, rebuilds the world if one fired, and hands a settled
//! snapshot to the presenter. Stopping joins the thread and takes the world
//! back, so nothing can tick while the caller inspects or rebuilds it.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::error::{Error, Result};
use crate::settings::Settings;
use crate::sim::{self, Intent, World};
use crate::snapshot::FrameSnapshot;
use crate::stage::{LevelSource, StageController};

/// Receives every settled frame, on the loop thread
pub trait Presenter: Send + 'static {
    fn present(&mut self, frame: &FrameSnapshot);
}

impl<F> Presenter for F
where
    F: FnMut(&FrameSnapshot) + Send + 'static,
{
    fn present(&mut self, frame: &FrameSnapshot) {
        self(frame)
    }
}

/// Presenter that keeps the most recent frame for other threads to read
#[derive(Debug, Clone, Default)]
pub struct LatestFrame {
    slot: Arc<Mutex<Option<FrameSnapshot>>>,
}

impl LatestFrame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<FrameSnapshot> {
        self.slot.lock().clone()
    }
}

impl Presenter for LatestFrame {
    fn present(&mut self, frame: &FrameSnapshot) {
        *self.slot.lock() = Some(frame.clone());
    }
}

/// Cloneable handle for queueing intents from any thread
#[derive(Debug, Clone, Default)]
pub struct IntentSender {
    queue: Arc<Mutex<Vec<Intent>>>,
}

impl IntentSender {
    pub fn send(&self, intent: Intent) {
        self.queue.lock().push(intent);
    }

    fn drain(&self) -> Vec<Intent> {
        std::mem::take(&mut *self.queue.lock())
    }
}

/// Presentations per second over one-second windows
#[derive(Debug)]
struct FrameCounter {
    window_start: Instant,
    frames: u32,
    fps: u32,
}

impl FrameCounter {
    fn new(now: Instant) -> Self {
        Self {
            window_start: now,
            frames: 0,
            fps: 0,
        }
    }

    /// Count one presentation; returns the rate of the last full window
    fn record(&mut self, now: Instant) -> u32 {
        self.frames += 1;
        if now.duration_since(self.window_start) >= Duration::from_secs(1) {
            self.fps = self.frames;
            self.frames = 0;
            self.window_start = now;
            log::debug!("FPS: {}", self.fps);
        }
        self.fps
    }
}

/// Everything the loop thread owns while running
struct LoopState {
    stage: StageController,
    world: World,
    presenter: Box<dyn Presenter>,
    frame_id: u64,
}

impl LoopState {
    /// One presentation: tick, stage check, snapshot, then any rebuild
    fn step(&mut self, intents: &[Intent], counter: &mut FrameCounter) {
        let report = sim::tick(&mut self.world, intents);
        if report.hits > 0 {
            log::debug!("{} enemies hit on tick {}", report.hits, self.world.time_ticks);
        }

        let transition = self.stage.evaluate(&self.world);
        if let Some(transition) = transition {
            self.stage.begin(transition);
        }

        self.frame_id += 1;
        let fps = counter.record(Instant::now());
        let frame = FrameSnapshot::build(&self.world, self.stage.state(), self.frame_id, fps);
        self.presenter.present(&frame);

        // Rebuilt after the old level's last frame is out, before the next tick
        if let Some(transition) = transition {
            self.stage.rebuild(&mut self.world, transition);
        }
    }
}

fn run(mut state: LoopState, running: Arc<AtomicBool>, intents: IntentSender) -> LoopState {
    let interval = state.world.settings.tick_interval();
    let mut counter = FrameCounter::new(Instant::now());
    let mut next_present = Instant::now() + interval;
    log::info!(
        "Simulation loop started on level {} at {} ticks/s",
        state.stage.current_level() + 1,
        state.world.settings.tick_rate
    );

    while running.load(Ordering::SeqCst) {
        let now = Instant::now();
        if now < next_present {
            thread::sleep(next_present - now);
            continue;
        }
        // Missed intervals are dropped, not replayed
        next_present = now + interval;

        let batch = intents.drain();
        state.step(&batch, &mut counter);
    }

    log::info!("Simulation loop stopped after {} frames", state.frame_id);
    state
}

/// Handle to the simulation thread
pub struct GameLoop {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<LoopState>>,
    /// Held here while stopped, moved into the thread while running
    parked: Option<LoopState>,
    intents: IntentSender,
}

impl GameLoop {
    /// Build the first level and park it; call `start` to run
    pub fn new(stage: StageController, presenter: impl Presenter) -> Self {
        let world = stage.build_world();
        Self {
            running: Arc::new(AtomicBool::new(false)),
            handle: None,
            parked: Some(LoopState {
                stage,
                world,
                presenter: Box::new(presenter),
                frame_id: 0,
            }),
            intents: IntentSender::default(),
        }
    }

    pub fn from_levels(
        levels: impl LevelSource,
        settings: Settings,
        presenter: impl Presenter,
    ) -> Result<Self> {
        let stage = StageController::new(levels, Arc::new(settings))?;
        Ok(Self::new(stage, presenter))
    }

    pub fn intents(&self) -> IntentSender {
        self.intents.clone()
    }

    /// True while the loop thread is alive
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// The world as the loop left it. `None` while running.
    pub fn world(&self) -> Option<&World> {
        self.parked.as_ref().map(|s| &s.world)
    }

    /// Presentations since the loop was created. `None` while running.
    pub fn frames(&self) -> Option<u64> {
        self.parked.as_ref().map(|s| s.frame_id)
    }

    /// Spawn the loop thread. A no-op if already running.
    ///
    /// Fails with `Error::StateLost` once a loop thread has died, since the
    /// world went down with it.
    pub fn start(&mut self) -> Result<()> {
        if self.is_running() {
            return Ok(());
        }
        // Reap a thread that exited on its own
        self.stop();
        let Some(state) = self.parked.take() else {
            return Err(Error::StateLost);
        };

        self.running.store(true, Ordering::SeqCst);
        let running = self.running.clone();
        let intents = self.intents.clone();
        let handle = thread::Builder::new()
            .name("ronin-sim".into())
            .spawn(move || run(state, running, intents))
            .map_err(|e| {
                self.running.store(false, Ordering::SeqCst);
                Error::Spawn(e)
            })?;
        self.handle = Some(handle);
        Ok(())
    }

    /// Stop the loop and wait for the thread to exit. A no-op if stopped.
    pub fn stop(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        self.running.store(false, Ordering::SeqCst);
        match handle.join() {
            Ok(state) => self.parked = Some(state),
            Err(_) => log::error!("Simulation thread panicked"),
        }
    }
}

impl Drop for GameLoop {
    fn drop(&mut self) {
        self.stop();
    }
}
