//! Data-driven game balance
//!
//! Every gameplay constant lives here so a JSON file can override the
//! shipped table without touching the simulation code.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Spawn director knobs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnTuning {
    /// Interval at score 0 (ms)
    pub base_interval_ms: f32,
    /// Floor for the score-scaled interval (ms)
    pub min_interval_ms: f32,
    /// Interval reduction per point of score (ms)
    pub interval_per_point: f32,
    /// Fixed interval once the hardcore threshold is passed (ms)
    pub hardcore_interval_ms: f32,
    /// Fixed interval during sugar rush (ms)
    pub rush_interval_ms: f32,
    /// Score above which the hardcore regime starts
    pub hardcore_score: u64,
    /// Score per difficulty level
    pub level_step: u64,
    /// Speed multiplier added per difficulty level
    pub speed_per_level: f32,
    /// Extra speed multiplier in the hardcore regime
    pub hardcore_speed: f32,
    /// Base fall speed (px per 16 ms)
    pub gravity: f32,
    /// Hard cap on fall speed (px per 16 ms)
    pub max_speed: f32,
    /// Fall speed multiplier for rush items (relative to gravity)
    pub rush_speed: f32,
    /// Size of rush items
    pub rush_size: f32,
    /// Horizontal margin kept free on both sides of the playfield
    pub margin: f32,
    /// Spawn height (above the visible area)
    pub spawn_y: f32,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            base_interval_ms: 650.0,
            min_interval_ms: 180.0,
            interval_per_point: 0.05,
            hardcore_interval_ms: 120.0,
            rush_interval_ms: 60.0,
            hardcore_score: 9000,
            level_step: 2000,
            speed_per_level: 0.15,
            hardcore_speed: 1.3,
            gravity: 7.5,
            max_speed: 35.0,
            rush_speed: 2.5,
            rush_size: 55.0,
            margin: 30.0,
            spawn_y: -70.0,
        }
    }
}

/// Player cup geometry and movement
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub width: f32,
    pub height: f32,
    /// Gap between the cup bottom and the playfield bottom
    pub bottom_offset: f32,
    /// Horizontal hitbox inset on each side
    pub hitbox_inset_x: f32,
    /// Hitbox offset from the cup top
    pub hitbox_inset_y: f32,
    pub hitbox_height: f32,
    /// Fraction of the remaining distance covered per 16 ms
    pub follow: f32,
    /// Catch bounce length (ms)
    pub bounce_ms: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            width: 100.0,
            height: 120.0,
            bottom_offset: 80.0,
            hitbox_inset_x: 15.0,
            hitbox_inset_y: 10.0,
            hitbox_height: 60.0,
            follow: 0.2,
            bounce_ms: 150.0,
        }
    }
}

/// Scoring, timers and hazard outcomes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesTuning {
    pub combo_window_ms: f32,
    pub rush_duration_ms: f32,
    pub power_up_duration_ms: f32,
    pub freeze_duration_ms: f32,
    /// Score lost on a spike hit (capped at the current score)
    pub penalty: u64,
    /// Flat bonus for catching a magnet or shield
    pub power_up_bonus: u64,
    /// Flat bonus for a hazard passing close by
    pub near_miss_bonus: u64,
    /// Extra horizontal tolerance beyond the hitbox width for a near miss
    pub near_miss_distance: f32,
    /// Combo catches per multiplier step
    pub combo_step: u32,
    /// Multiplier gained per combo step
    pub combo_step_bonus: f32,
    /// Flat multiplier during sugar rush
    pub rush_multiplier: f32,
    /// How far below the playfield an item may fall before it is dropped
    pub despawn_margin: f32,
}

impl Default for RulesTuning {
    fn default() -> Self {
        Self {
            combo_window_ms: 1500.0,
            rush_duration_ms: 5000.0,
            power_up_duration_ms: 5000.0,
            freeze_duration_ms: 2000.0,
            penalty: 500,
            power_up_bonus: 100,
            near_miss_bonus: 50,
            near_miss_distance: 70.0,
            combo_step: 10,
            combo_step_bonus: 0.5,
            rush_multiplier: 3.0,
            despawn_margin: 50.0,
        }
    }
}

/// Magnet power-up attraction
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MagnetTuning {
    /// Items above this altitude are not attracted yet
    pub min_y: f32,
    /// Capture radius around the cup centre
    pub radius: f32,
    /// Pull speed inside the capture radius (px per 16 ms)
    pub pull: f32,
}

impl Default for MagnetTuning {
    fn default() -> Self {
        Self {
            min_y: 50.0,
            radius: 500.0,
            pull: 15.0,
        }
    }
}

/// Complete balance table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub spawn: SpawnTuning,
    pub player: PlayerTuning,
    pub rules: RulesTuning,
    pub magnet: MagnetTuning,
}

impl Tuning {
    /// Parse a (possibly partial) JSON table; missing keys keep their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load a JSON table from disk
    pub fn load(path: &std::path::Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Reject tables the simulation cannot run with
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("spawn.base_interval_ms", self.spawn.base_interval_ms),
            ("spawn.min_interval_ms", self.spawn.min_interval_ms),
            ("spawn.hardcore_interval_ms", self.spawn.hardcore_interval_ms),
            ("spawn.rush_interval_ms", self.spawn.rush_interval_ms),
            ("spawn.gravity", self.spawn.gravity),
            ("spawn.max_speed", self.spawn.max_speed),
            ("player.width", self.player.width),
            ("player.height", self.player.height),
            ("rules.combo_window_ms", self.rules.combo_window_ms),
            ("rules.rush_duration_ms", self.rules.rush_duration_ms),
            ("rules.power_up_duration_ms", self.rules.power_up_duration_ms),
            ("rules.freeze_duration_ms", self.rules.freeze_duration_ms),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::InvalidTuning(format!("{name} must be > 0, got {value}")));
            }
        }
        if !(0.0..=1.0).contains(&self.player.follow) {
            return Err(Error::InvalidTuning(format!(
                "player.follow must be within [0, 1], got {}",
                self.player.follow
            )));
        }
        if self.player.hitbox_inset_x * 2.0 >= self.player.width {
            return Err(Error::InvalidTuning("hitbox inset swallows the cup".into()));
        }
        if self.spawn.level_step == 0 || self.rules.combo_step == 0 {
            return Err(Error::InvalidTuning("step sizes must be non-zero".into()));
        }
        Ok(())
    }
}
