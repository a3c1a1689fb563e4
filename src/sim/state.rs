//! Player, playfield and game state records
//!
//! All timed effects are orthogonal `Countdown`s on one `GameState`; the
//! transitions between them live in `rules`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{MAX_LIVES, MAX_RUSH_CHARGE};
use crate::error::{Error, Result};
use crate::tuning::{PlayerTuning, RulesTuning};

/// Whether the run is still going
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Playing,
    /// Lives ran out; the state is frozen at the final score
    GameOver,
}

/// Active power-up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PowerUp {
    #[default]
    None,
    Magnet,
    Shield,
}

/// Milliseconds left on a timed effect
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Countdown {
    remaining_ms: f32,
}

impl Countdown {
    pub fn set(&mut self, ms: f32) {
        self.remaining_ms = ms.max(0.0);
    }

    pub fn clear(&mut self) {
        self.remaining_ms = 0.0;
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.remaining_ms > 0.0
    }

    #[inline]
    pub fn remaining(&self) -> f32 {
        self.remaining_ms
    }

    /// Advance by `dt` ms. Returns true only on the tick the countdown runs out.
    pub fn tick(&mut self, dt: f32) -> bool {
        if !self.is_active() {
            return false;
        }
        self.remaining_ms -= dt;
        if self.remaining_ms <= 0.0 {
            self.remaining_ms = 0.0;
            true
        } else {
            false
        }
    }
}

/// Logical playfield size (CSS pixels on the web)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Playfield {
    pub fn new(width: f32, height: f32) -> Result<Self> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(Error::InvalidPlayfield { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn centre(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Inset collision rectangle of the cup
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hitbox {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Hitbox {
    /// Strict overlap with an axis-aligned box given as (min, max)
    pub fn overlaps(&self, min: Vec2, max: Vec2) -> bool {
        max.x > self.x && min.x < self.x + self.w && max.y > self.y && min.y < self.y + self.h
    }

    /// Whether `y` lies strictly inside the vertical band
    pub fn spans_y(&self, y: f32) -> bool {
        y > self.y && y < self.y + self.h
    }
}

/// The player's cup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Left edge
    pub x: f32,
    /// Top edge (fixed for a given playfield)
    pub y: f32,
    /// Left edge requested by input
    pub target_x: f32,
    pub width: f32,
    pub height: f32,
    /// Catch bounce animation
    pub bounce: Countdown,
}

impl Player {
    /// Cup centred horizontally on the playfield
    pub fn new(tuning: &PlayerTuning, field: &Playfield) -> Self {
        let x = field.width / 2.0 - tuning.width / 2.0;
        let mut player = Self {
            x,
            y: 0.0,
            target_x: x,
            width: tuning.width,
            height: tuning.height,
            bounce: Countdown::default(),
        };
        player.place(tuning, field);
        player
    }

    /// Re-anchor to the bottom of a (resized) playfield and clamp horizontally
    pub fn place(&mut self, tuning: &PlayerTuning, field: &Playfield) {
        self.y = field.height - self.height - tuning.bottom_offset;
        let max_x = (field.width - self.width).max(0.0);
        self.x = self.x.clamp(0.0, max_x);
        self.target_x = self.target_x.clamp(0.0, max_x);
    }

    /// Steer toward an absolute pointer x (cup centred under the pointer)
    pub fn aim(&mut self, pointer_x: f32) {
        self.target_x = pointer_x - self.width / 2.0;
    }

    /// Exponential follow toward the target, frame-rate independent
    pub fn follow(&mut self, dt: f32, follow: f32, field_width: f32) {
        let keep = (1.0 - follow).powf(crate::frame_scale(dt));
        self.x += (self.target_x - self.x) * (1.0 - keep);
        self.x = self.x.clamp(0.0, (field_width - self.width).max(0.0));
    }

    pub fn centre(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn hitbox(&self, tuning: &PlayerTuning) -> Hitbox {
        Hitbox {
            x: self.x + tuning.hitbox_inset_x,
            y: self.y + tuning.hitbox_inset_y,
            w: self.width - tuning.hitbox_inset_x * 2.0,
            h: tuning.hitbox_height,
        }
    }
}

/// Score, lives and timed effects of one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub phase: GamePhase,
    pub score: u64,
    pub lives: u8,
    pub combo: u32,
    pub combo_timer: Countdown,
    pub power_up: PowerUp,
    pub power_up_timer: Countdown,
    pub frozen: Countdown,
    /// Sugar rush is on while this runs
    pub rush: Countdown,
    /// Sugar rush meter (0..=100)
    pub rush_charge: u32,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            phase: GamePhase::Playing,
            score: 0,
            lives: MAX_LIVES,
            combo: 0,
            combo_timer: Countdown::default(),
            power_up: PowerUp::None,
            power_up_timer: Countdown::default(),
            frozen: Countdown::default(),
            rush: Countdown::default(),
            rush_charge: 0,
        }
    }
}

impl GameState {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    #[inline]
    pub fn is_frozen(&self) -> bool {
        self.frozen.is_active()
    }

    #[inline]
    pub fn in_rush(&self) -> bool {
        self.rush.is_active()
    }

    #[inline]
    pub fn has_power_up(&self, power_up: PowerUp) -> bool {
        self.power_up == power_up
    }

    /// Current score multiplier for collectibles
    pub fn multiplier(&self, tuning: &RulesTuning) -> f32 {
        if self.in_rush() {
            tuning.rush_multiplier
        } else {
            1.0 + (self.combo / tuning.combo_step) as f32 * tuning.combo_step_bonus
        }
    }

    /// Add to the rush meter, clamped to its capacity
    pub fn add_charge(&mut self, charge: u32) {
        self.rush_charge = (self.rush_charge + charge).min(MAX_RUSH_CHARGE);
    }

    /// Restore one life, up to the cap
    pub fn gain_life(&mut self) {
        self.lives = (self.lives + 1).min(MAX_LIVES);
    }

    /// Deduct the penalty without going below zero; returns the amount taken
    pub fn apply_penalty(&mut self, penalty: u64) -> u64 {
        let taken = self.score.min(penalty);
        self.score -= taken;
        taken
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    #[test]
    fn test_countdown_reports_expiry_once() {
        let mut timer = Countdown::default();
        assert!(!timer.tick(16.0));
        timer.set(30.0);
        assert!(!timer.tick(16.0));
        assert!(timer.is_active());
        assert!(timer.tick(16.0));
        assert!(!timer.is_active());
        assert!(!timer.tick(16.0));
    }

    #[test]
    fn test_multiplier_steps_every_ten_catches() {
        let rules = Tuning::default().rules;
        let mut state = GameState::new();
        state.combo = 9;
        assert_eq!(state.multiplier(&rules), 1.0);
        state.combo = 10;
        assert_eq!(state.multiplier(&rules), 1.5);
        state.combo = 25;
        assert_eq!(state.multiplier(&rules), 2.0);
        state.rush.set(100.0);
        assert_eq!(state.multiplier(&rules), 3.0);
    }

    #[test]
    fn test_clamps() {
        let mut state = GameState::new();
        state.gain_life();
        assert_eq!(state.lives, MAX_LIVES);
        state.add_charge(250);
        assert_eq!(state.rush_charge, MAX_RUSH_CHARGE);
        state.score = 120;
        assert_eq!(state.apply_penalty(500), 120);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_player_layout() {
        let tuning = Tuning::default().player;
        let field = Playfield::new(360.0, 800.0).unwrap();
        let player = Player::new(&tuning, &field);
        assert_eq!(player.x, 130.0);
        assert_eq!(player.y, 600.0);

        let hitbox = player.hitbox(&tuning);
        assert_eq!(hitbox, Hitbox { x: 145.0, y: 610.0, w: 70.0, h: 60.0 });
        assert_eq!(player.centre(), Vec2::new(180.0, 660.0));
    }

    #[test]
    fn test_player_follow_matches_reference_frame() {
        let tuning = Tuning::default().player;
        let field = Playfield::new(360.0, 800.0).unwrap();
        let mut player = Player::new(&tuning, &field);
        player.x = 0.0;
        player.target_x = 100.0;
        player.follow(16.0, tuning.follow, field.width);
        assert!((player.x - 20.0).abs() < 1e-3);

        player.target_x = 1000.0;
        for _ in 0..200 {
            player.follow(16.0, tuning.follow, field.width);
        }
        assert_eq!(player.x, field.width - player.width);
    }

    #[test]
    fn test_playfield_rejects_degenerate() {
        assert!(Playfield::new(0.0, 800.0).is_err());
        assert!(Playfield::new(f32::NAN, 800.0).is_err());
    }
}
