//! Tea Rush headless runner
//!
//! Plays a seeded run without a renderer, stepping the frame loop with a
//! synthetic 60 Hz clock. Useful for balance checks and reproducing runs.
//! The browser build is driven from `platform::web` instead.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use anyhow::{Context, Result};
    use clap::Parser;

    use tea_rush::consts::{DEFAULT_HEIGHT, DEFAULT_WIDTH, FRAME_MS};
    use tea_rush::sim::{AudioCue, GameEvent, Simulation};
    use tea_rush::{GameLoop, RewardTier, Tuning};

    /// Play a headless Tea Rush run and report the score.
    #[derive(Debug, Parser)]
    #[command(name = "tea-rush", version, about)]
    struct Args {
        /// RNG seed; the same seed and settings replay the same run
        #[arg(short, long, default_value_t = 1)]
        seed: u64,

        /// Stop after this much simulated time if the run is still going
        #[arg(long, default_value_t = 120.0, value_name = "SECS")]
        seconds: f64,

        /// Logical playfield width
        #[arg(long, default_value_t = DEFAULT_WIDTH)]
        width: f32,

        /// Logical playfield height
        #[arg(long, default_value_t = DEFAULT_HEIGHT)]
        height: f32,

        /// JSON balance overrides
        #[arg(short, long, value_name = "FILE")]
        tuning: Option<PathBuf>,

        /// Leave the cup where it starts instead of steering it
        #[arg(long)]
        no_autopilot: bool,
    }

    #[derive(Debug, Default)]
    struct Tally {
        catches: u32,
        hazards: u32,
        rushes: u32,
    }

    impl Tally {
        fn record(&mut self, events: &[GameEvent]) {
            for event in events {
                match event {
                    GameEvent::Sound(AudioCue::Collect { .. }) => self.catches += 1,
                    GameEvent::Sound(AudioCue::HazardHit | AudioCue::Freeze) => self.hazards += 1,
                    GameEvent::Sound(AudioCue::RushOn) => self.rushes += 1,
                    _ => {}
                }
            }
        }
    }

    pub fn run() -> Result<()> {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
        let args = Args::parse();

        let tuning = match &args.tuning {
            Some(path) => Tuning::load(path).with_context(|| format!("loading tuning from {}", path.display()))?,
            None => Tuning::default(),
        };
        let mut sim = Simulation::new(args.seed, tuning, args.width, args.height).context("creating simulation")?;
        sim.autopilot = !args.no_autopilot;

        let mut game = GameLoop::new(sim);
        let mut tally = Tally::default();
        let limit_ms = args.seconds.max(0.0) * 1000.0;
        let mut now = 0.0;
        let mut final_score = None;

        tally.record(&game.start(now));
        while now < limit_ms {
            now += f64::from(FRAME_MS);
            let out = game.frame(now);
            tally.record(&out.events);
            if let Some(snapshot) = &out.snapshot {
                log::trace!("{snapshot:?}");
            }
            if let Some(score) = out.game_over {
                final_score = Some(score);
                break;
            }
            if !out.running {
                break;
            }
        }
        if final_score.is_none() {
            tally.record(&game.stop());
        }

        let hud = game.snapshot();
        let score = final_score.unwrap_or(hud.score);
        let reward = RewardTier::for_score(score).reward(score);
        log::info!(
            "Run finished after {:.1}s: {} catches, {} hazard hits, {} sugar rushes",
            game.sim().elapsed_ms() / 1000.0,
            tally.catches,
            tally.hazards,
            tally.rushes
        );
        println!(
            "score {score} | lives {} | {} {} ({})",
            hud.lives,
            reward.tier.name(),
            reward.discount,
            reward.code
        );
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::init, this is just to satisfy the compiler
}
