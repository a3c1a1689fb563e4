//! Frame loop driver
//!
//! Turns host timestamps into clamped simulation steps, isolates a failing
//! tick from the loop, and publishes HUD snapshots at a throttled rate.
//!
//! Panic isolation only holds where unwinding does: `wasm32-unknown-unknown`
//! builds abort on panic, so there only returned errors are survivable.

use std::panic::{self, AssertUnwindSafe};

use crate::consts::{MAX_FRAME_DT_MS, UI_SYNC_INTERVAL_MS};
use crate::sim::{AudioCue, GameEvent, Simulation};
use crate::snapshot::HudSnapshot;

/// What one host frame produced
#[derive(Debug, Default)]
pub struct FrameOutput {
    pub events: Vec<GameEvent>,
    /// Present when the HUD is due for a refresh
    pub snapshot: Option<HudSnapshot>,
    /// Final score, reported on the frame the game ends and never again
    pub game_over: Option<u64>,
    /// Whether the host should schedule another frame
    pub running: bool,
}

/// Owns a simulation and steps it once per host frame
#[derive(Debug)]
pub struct GameLoop {
    sim: Simulation,
    running: bool,
    last_time: f64,
    last_ui_sync: Option<f64>,
    music_playing: bool,
    finished: bool,
}

impl GameLoop {
    pub fn new(sim: Simulation) -> Self {
        Self {
            sim,
            running: false,
            last_time: 0.0,
            last_ui_sync: None,
            music_playing: false,
            finished: false,
        }
    }

    pub fn sim(&self) -> &Simulation {
        &self.sim
    }

    /// Input and resize go through here between frames
    pub fn sim_mut(&mut self) -> &mut Simulation {
        &mut self.sim
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Begin the run at host time `now` (ms)
    pub fn start(&mut self, now: f64) -> Vec<GameEvent> {
        if self.running || self.finished {
            return Vec::new();
        }
        self.running = true;
        self.last_time = now;
        self.music_playing = true;
        log::info!("Run started (seed {})", self.sim.seed());
        vec![GameEvent::Sound(AudioCue::MusicStart)]
    }

    /// Step the simulation to host time `now` (ms)
    pub fn frame(&mut self, now: f64) -> FrameOutput {
        if !self.running {
            return FrameOutput::default();
        }

        let dt = (now - self.last_time).clamp(0.0, MAX_FRAME_DT_MS);
        if now.is_finite() {
            self.last_time = now;
        }

        let mut output = FrameOutput {
            running: true,
            ..Default::default()
        };

        let sim = &mut self.sim;
        match panic::catch_unwind(AssertUnwindSafe(|| sim.tick(dt as f32))) {
            Ok(Ok(report)) => {
                output.events = report.events;
                if report.game_over {
                    self.finish(&mut output);
                }
            }
            Ok(Err(e)) => log::error!("Tick abandoned: {e}"),
            Err(payload) => {
                let msg = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                log::error!("Tick panicked: {msg}");
            }
        }

        // A bad timestamp must never become the sync reference
        let due = now.is_finite()
            && self
                .last_ui_sync
                .is_none_or(|last| now - last > UI_SYNC_INTERVAL_MS);
        if due || output.game_over.is_some() {
            output.snapshot = Some(HudSnapshot::from_sim(&self.sim));
            if now.is_finite() {
                self.last_ui_sync = Some(now);
            }
        }
        output
    }

    /// Tear the loop down from outside (page hidden, component unmounted)
    pub fn stop(&mut self) -> Vec<GameEvent> {
        self.running = false;
        if !self.music_playing {
            return Vec::new();
        }
        self.music_playing = false;
        log::info!("Run stopped at score {}", self.sim.state.score);
        vec![GameEvent::Sound(AudioCue::MusicStop)]
    }

    /// Current HUD state regardless of throttling
    pub fn snapshot(&self) -> HudSnapshot {
        HudSnapshot::from_sim(&self.sim)
    }

    fn finish(&mut self, output: &mut FrameOutput) {
        let score = self.sim.state.score;
        log::debug!("Loop finished after {:.0}ms", self.sim.elapsed_ms());
        output.game_over = Some(score);
        output.running = false;
        self.running = false;
        self.finished = true;
        // The tick already queued the music stop
        self.music_playing = false;
    }
}
