//! Error types for the simulation core

use thiserror::Error;

/// Errors surfaced by the simulation and its configuration layer.
///
/// None of these end a game session: the loop driver logs a failed tick and
/// carries on with the next frame.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid playfield {width}x{height}")]
    InvalidPlayfield { width: f32, height: f32 },

    #[error("non-finite frame delta: {0}")]
    NonFiniteDelta(f32),

    #[error("invalid tuning: {0}")]
    InvalidTuning(String),

    #[error("tuning parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
