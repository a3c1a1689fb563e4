//! Simulation context and the per-frame update
//!
//! `Simulation` owns every piece of mutable game state. The host mutates it
//! only through `&mut self` (input, resize, tick) so there is exactly one
//! writer per frame; presentation reads published snapshots instead.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::autopilot;
use super::collision::{self, Resolution};
use super::events::{AudioCue, EventQueue, GameEvent};
use super::item::ItemStore;
use super::physics;
use super::rules;
use super::spawn::{spawn_interval, spawn_item};
use super::state::{GameState, Player, Playfield, PowerUp};
use crate::error::{Error, Result};
use crate::tuning::Tuning;

/// Everything one tick produced
#[derive(Debug, Default)]
pub struct TickReport {
    pub events: Vec<GameEvent>,
    pub resolution: Resolution,
    /// Id of the item spawned this tick
    pub spawned: Option<u32>,
    pub rush_ended: bool,
    /// The tick took the last life
    pub game_over: bool,
}

/// Owned simulation context for one run
#[derive(Debug)]
pub struct Simulation {
    pub tuning: Tuning,
    pub field: Playfield,
    pub player: Player,
    pub state: GameState,
    pub items: ItemStore,
    /// Let the built-in pilot steer (attract/demo mode)
    pub autopilot: bool,
    spawn_timer: f32,
    elapsed_ms: f64,
    seed: u64,
    rng: Pcg32,
    events: EventQueue,
}

impl Simulation {
    pub fn new(seed: u64, tuning: Tuning, width: f32, height: f32) -> Result<Self> {
        tuning.validate()?;
        let field = Playfield::new(width, height)?;
        let player = Player::new(&tuning.player, &field);
        Ok(Self {
            tuning,
            field,
            player,
            state: GameState::new(),
            items: ItemStore::new(),
            autopilot: false,
            spawn_timer: 0.0,
            elapsed_ms: 0.0,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            events: EventQueue::default(),
        })
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Simulated time since the run started (ms)
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    pub fn is_over(&self) -> bool {
        self.state.is_over()
    }

    /// Absolute pointer/touch x in logical pixels. Ignored while frozen.
    pub fn set_pointer_x(&mut self, x: f32) {
        if self.state.is_frozen() || self.state.is_over() || !x.is_finite() {
            return;
        }
        self.player.aim(x);
    }

    /// New logical playfield size; the cup is re-anchored and clamped
    pub fn resize(&mut self, width: f32, height: f32) -> Result<()> {
        self.field = Playfield::new(width, height)?;
        self.player.place(&self.tuning.player, &self.field);
        log::debug!("Playfield resized to {width}x{height}");
        Ok(())
    }

    /// Queue a cue produced outside the tick (music start/stop)
    pub fn push_sound(&mut self, cue: AudioCue) {
        self.events.sound(cue);
    }

    /// Take events queued outside a tick
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain()
    }

    /// Advance the simulation by `dt` ms
    pub fn tick(&mut self, dt: f32) -> Result<TickReport> {
        if !dt.is_finite() || dt < 0.0 {
            return Err(Error::NonFiniteDelta(dt));
        }
        if self.state.is_over() {
            return Ok(TickReport::default());
        }
        self.elapsed_ms += dt as f64;

        let mut report = TickReport::default();

        // Timers first: a collision this tick never sees a stale effect
        let expired = rules::decay_timers(&mut self.state, dt, &mut self.events);
        if expired.rush {
            self.items.clear();
            report.rush_ended = true;
        }
        self.player.bounce.tick(dt);

        if self.autopilot {
            if let Some(x) = autopilot::choose_target(self) {
                self.set_pointer_x(x);
            }
        }
        if !self.state.is_frozen() {
            self.player.follow(dt, self.tuning.player.follow, self.field.width);
        }

        let magnet = self
            .state
            .has_power_up(PowerUp::Magnet)
            .then(|| self.player.centre());
        physics::integrate(&mut self.items, dt, magnet, &self.tuning.magnet);

        self.spawn_timer += dt;
        let interval = spawn_interval(self.state.score, self.state.in_rush(), &self.tuning.spawn);
        if self.spawn_timer > interval {
            let spec = spawn_item(
                &mut self.rng,
                self.field.width,
                self.state.score,
                self.state.in_rush(),
                &self.tuning.spawn,
            );
            log::trace!("Spawn {:?} at x={:.0} speed={:.1}", spec.kind, spec.pos.x, spec.speed);
            report.spawned = Some(self.items.spawn(spec));
            self.spawn_timer = 0.0;
        }

        report.resolution = collision::resolve(
            &mut self.items,
            &mut self.player,
            &self.field,
            &mut self.state,
            &self.tuning,
            &mut self.events,
        );
        report.game_over = report.resolution.ended_game();
        report.events = self.events.drain();
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
    use crate::sim::events::Callout;
    use crate::sim::item::{ItemKind, ItemSpec};
    use crate::sim::state::GamePhase;
    use glam::Vec2;

    const DT: f32 = 16.0;

    fn sim() -> Simulation {
        Simulation::new(12345, Tuning::default(), DEFAULT_WIDTH, DEFAULT_HEIGHT).unwrap()
    }

    /// No spawns, so only hand-placed items reach the cup
    fn quiet_sim() -> Simulation {
        let mut tuning = Tuning::default();
        tuning.spawn.base_interval_ms = 1e9;
        tuning.spawn.min_interval_ms = 1e9;
        tuning.spawn.hardcore_interval_ms = 1e9;
        tuning.spawn.rush_interval_ms = 1e9;
        Simulation::new(12345, tuning, DEFAULT_WIDTH, DEFAULT_HEIGHT).unwrap()
    }

    /// Drop an item straight into the cup's hitbox
    fn drop_on_cup(sim: &mut Simulation, kind: ItemKind) {
        let centre = sim.player.centre();
        sim.items.spawn(ItemSpec {
            kind,
            pos: Vec2::new(centre.x, sim.player.y + 30.0),
            speed: 0.0,
            size: 40.0,
            rotation: 0.0,
            spin: 0.0,
        });
    }

    #[test]
    fn test_first_spawn_after_base_interval() {
        let mut sim = sim();
        for _ in 0..40 {
            let report = sim.tick(DT).unwrap();
            assert!(report.spawned.is_none());
        }
        let report = sim.tick(DT).unwrap();
        assert!(report.spawned.is_some());
        assert_eq!(sim.items.len(), 1);
        assert_eq!(sim.items.get(0).unwrap().pos.y, -70.0);
    }

    #[test]
    fn test_scenario_a_first_catch() {
        let mut sim = quiet_sim();
        drop_on_cup(&mut sim, ItemKind::Boba);
        let report = sim.tick(DT).unwrap();
        assert_eq!(report.resolution.hits.len(), 1);
        assert_eq!(sim.state.score, 10);
        assert_eq!(sim.state.combo, 1);
    }

    #[test]
    fn test_scenario_b_spike_takes_whole_score() {
        let mut sim = quiet_sim();
        sim.state.score = 500;
        drop_on_cup(&mut sim, ItemKind::Spike);
        sim.tick(DT).unwrap();
        assert_eq!(sim.state.score, 0);
        assert_eq!(sim.state.lives, 2);
    }

    #[test]
    fn test_scenario_c_rush_lifecycle() {
        let mut sim = quiet_sim();
        sim.state.lives = 2;
        // 9 gold = 90 charge, the 10th fills the meter
        for _ in 0..9 {
            drop_on_cup(&mut sim, ItemKind::Gold);
            sim.tick(DT).unwrap();
            assert!(!sim.state.in_rush());
        }
        drop_on_cup(&mut sim, ItemKind::Gold);
        let report = sim.tick(DT).unwrap();
        assert!(sim.state.in_rush());
        assert_eq!(sim.state.lives, 3);
        assert!(report.events.contains(&GameEvent::Sound(AudioCue::RushOn)));

        let before = sim.state.score;
        drop_on_cup(&mut sim, ItemKind::Boba);
        sim.tick(DT).unwrap();
        assert_eq!(sim.state.score - before, 30);

        // Hazards are harmless for the rest of the rush
        drop_on_cup(&mut sim, ItemKind::Spike);
        drop_on_cup(&mut sim, ItemKind::Ice);
        sim.tick(DT).unwrap();
        assert_eq!(sim.state.lives, 3);
        assert!(!sim.state.is_frozen());

        // Run the rush out
        let mut ended = false;
        for _ in 0..400 {
            if sim.tick(DT).unwrap().rush_ended {
                ended = true;
                break;
            }
        }
        assert!(ended);
        assert!(!sim.state.in_rush());
        assert_eq!(sim.state.rush_charge, 0);
        assert!(sim.items.is_empty());
    }

    #[test]
    fn test_scenario_d_game_over_once() {
        let mut sim = quiet_sim();
        sim.state.lives = 1;
        sim.state.score = 1300;
        drop_on_cup(&mut sim, ItemKind::Spike);
        let report = sim.tick(DT).unwrap();
        assert!(report.game_over);
        assert_eq!(sim.state.phase, GamePhase::GameOver);
        assert_eq!(sim.state.score, 800);

        drop_on_cup(&mut sim, ItemKind::Gold);
        let report = sim.tick(DT).unwrap();
        assert!(!report.game_over);
        assert!(report.events.is_empty());
        assert_eq!(sim.state.score, 800);
        assert_eq!(sim.items.len(), 1);
    }

    #[test]
    fn test_combo_decays_without_catches() {
        let mut sim = quiet_sim();
        drop_on_cup(&mut sim, ItemKind::Leaf);
        sim.tick(DT).unwrap();
        assert_eq!(sim.state.combo, 1);
        // 1500 ms window at 16 ms per tick
        for _ in 0..95 {
            sim.tick(DT).unwrap();
        }
        assert_eq!(sim.state.combo, 0);
    }

    #[test]
    fn test_frozen_cup_ignores_input() {
        let mut sim = quiet_sim();
        drop_on_cup(&mut sim, ItemKind::Ice);
        let report = sim.tick(DT).unwrap();
        assert!(report.events.iter().any(|e| matches!(
            e,
            GameEvent::Callout { callout: Callout::Frozen, .. }
        )));
        let x = sim.player.x;
        sim.set_pointer_x(10.0);
        for _ in 0..10 {
            sim.tick(DT).unwrap();
        }
        assert_eq!(sim.player.x, x);

        // Thaw out, then input works again
        for _ in 0..130 {
            sim.tick(DT).unwrap();
        }
        assert!(!sim.state.is_frozen());
        sim.set_pointer_x(10.0);
        sim.tick(DT).unwrap();
        assert!(sim.player.x < x);
    }

    #[test]
    fn test_power_up_expires() {
        let mut sim = quiet_sim();
        drop_on_cup(&mut sim, ItemKind::Magnet);
        sim.tick(DT).unwrap();
        assert_eq!(sim.state.power_up, PowerUp::Magnet);
        for _ in 0..320 {
            sim.tick(DT).unwrap();
        }
        assert_eq!(sim.state.power_up, PowerUp::None);
    }

    #[test]
    fn test_resize_reclamps_player() {
        let mut sim = quiet_sim();
        sim.player.x = 250.0;
        sim.player.target_x = 250.0;
        sim.resize(200.0, 600.0).unwrap();
        assert_eq!(sim.player.x, 100.0);
        assert_eq!(sim.player.y, 400.0);
        assert!(sim.resize(-1.0, 600.0).is_err());
        assert_eq!(sim.field.width, 200.0);
    }

    #[test]
    fn test_rejects_bad_delta() {
        let mut sim = quiet_sim();
        assert!(matches!(sim.tick(f32::NAN), Err(Error::NonFiniteDelta(_))));
        assert!(sim.tick(-1.0).is_err());
    }

    #[test]
    fn test_determinism() {
        let mut a = Simulation::new(99999, Tuning::default(), 360.0, 800.0).unwrap();
        let mut b = Simulation::new(99999, Tuning::default(), 360.0, 800.0).unwrap();
        a.autopilot = true;
        b.autopilot = true;

        for i in 0..2000 {
            let dt = if i % 7 == 0 { 33.0 } else { 16.0 };
            a.tick(dt).unwrap();
            b.tick(dt).unwrap();
        }

        assert_eq!(a.state.score, b.state.score);
        assert_eq!(a.state.lives, b.state.lives);
        assert_eq!(a.items.len(), b.items.len());
        assert_eq!(a.player.x, b.player.x);
    }
}
