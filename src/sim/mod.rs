//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied delta time only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod events;
pub mod item;
pub mod physics;
pub mod rules;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::Resolution;
pub use events::{AudioCue, Callout, Color, Emphasis, EventQueue, GameEvent};
pub use item::{FallingItem, FruitKind, ItemKind, ItemSpec, ItemStore};
pub use rules::HitOutcome;
pub use state::{Countdown, GamePhase, GameState, Hitbox, Player, Playfield, PowerUp};
pub use tick::{Simulation, TickReport};
