//! Tea Rush - catch-the-falling-item arcade simulation
//!
//! Core modules:
//! - `sim`: Simulation (spawning, physics, collisions, game state machine)
//! - `driver`: Frame loop with clamped delta time and throttled HUD publish
//! - `snapshot`: Read-only HUD and render views for the presentation layer
//! - `rewards`: Score-to-reward tier table (collaborator contract)
//! - `tuning`: Data-driven game balance
//! - `platform`: Browser host (wasm32 only)

pub mod driver;
pub mod error;
pub mod platform;
pub mod rewards;
pub mod sim;
pub mod snapshot;
pub mod tuning;

pub use driver::{FrameOutput, GameLoop};
pub use error::{Error, Result};
pub use rewards::{Reward, RewardTier, TierProgress};
pub use snapshot::{HudSnapshot, RenderView};
pub use tuning::Tuning;

/// Game configuration constants that are structural rather than tunable
pub mod consts {
    /// Reference frame length all per-frame speeds are expressed in (ms)
    pub const FRAME_MS: f32 = 16.0;
    /// Largest physics step taken after a stall or tab suspension (ms)
    pub const MAX_FRAME_DT_MS: f64 = 60.0;
    /// Minimum spacing between HUD snapshots (ms)
    pub const UI_SYNC_INTERVAL_MS: f64 = 100.0;

    /// Lives at game start, also the cap for rush restores
    pub const MAX_LIVES: u8 = 3;
    /// Sugar rush charge meter capacity
    pub const MAX_RUSH_CHARGE: u32 = 100;

    /// Default logical playfield (portrait phone)
    pub const DEFAULT_WIDTH: f32 = 360.0;
    pub const DEFAULT_HEIGHT: f32 = 800.0;
}

/// Convert an elapsed time in ms to reference-frame units
#[inline]
pub fn frame_scale(dt_ms: f32) -> f32 {
    dt_ms / consts::FRAME_MS
}
