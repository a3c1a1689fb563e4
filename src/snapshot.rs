//! Read-only views handed to the presentation layer
//!
//! `HudSnapshot` is built at most every 100ms for the HUD. `RenderView` is
//! built per frame for whatever draws the playfield. Neither touches the
//! live simulation.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::rewards::{TierProgress, next_tier_progress};
use crate::sim::{Color, GameState, ItemKind, PowerUp, Simulation};

/// Everything the HUD shows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HudSnapshot {
    pub score: u64,
    pub lives: u8,
    pub combo: u32,
    pub power_up: PowerUp,
    /// Time left on the power-up (ms), 0 when none is active
    pub power_up_ms: f32,
    pub frozen: bool,
    pub sugar_rush: bool,
    /// Rush meter fill, 0..=100
    pub rush_charge: u32,
    pub next_tier: Option<TierProgress>,
}

impl HudSnapshot {
    pub fn from_state(state: &GameState) -> Self {
        Self {
            score: state.score,
            lives: state.lives,
            combo: state.combo,
            power_up: state.power_up,
            power_up_ms: state.power_up_timer.remaining(),
            frozen: state.is_frozen(),
            sugar_rush: state.in_rush(),
            rush_charge: state.rush_charge,
            next_tier: next_tier_progress(state.score),
        }
    }

    pub fn from_sim(sim: &Simulation) -> Self {
        Self::from_state(&sim.state)
    }

    /// JSON for the web host
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// The cup as the renderer sees it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CupView {
    /// Top-left corner
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// Time left on the catch bounce (ms)
    pub bounce_ms: f32,
    pub frozen: bool,
    pub shielded: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ItemView {
    pub id: u32,
    pub kind: ItemKind,
    pub color: Color,
    /// Centre
    pub pos: Vec2,
    pub size: f32,
    pub rotation: f32,
}

/// Everything needed to draw one frame of the playfield
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderView {
    pub width: f32,
    pub height: f32,
    pub cup: CupView,
    /// In spawn order
    pub items: Vec<ItemView>,
    pub sugar_rush: bool,
}

impl RenderView {
    pub fn from_sim(sim: &Simulation) -> Self {
        let player = &sim.player;
        Self {
            width: sim.field.width,
            height: sim.field.height,
            cup: CupView {
                pos: Vec2::new(player.x, player.y),
                width: player.width,
                height: player.height,
                bounce_ms: player.bounce.remaining(),
                frozen: sim.state.is_frozen(),
                shielded: sim.state.has_power_up(PowerUp::Shield),
            },
            items: sim
                .items
                .iter()
                .map(|item| ItemView {
                    id: item.id,
                    kind: item.kind,
                    color: item.kind.color(),
                    pos: item.pos,
                    size: item.size,
                    rotation: item.rotation,
                })
                .collect(),
            sugar_rush: sim.state.in_rush(),
        }
    }

    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
