//! Fire-and-forget requests for the audio and effects collaborators
//!
//! The simulation never tracks what happens to these after a tick: the
//! host drains them from the tick report and forwards them.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::PowerUp;

/// Packed 0xRRGGBB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color(pub u32);

/// Brand palette
pub mod palette {
    use super::Color;

    pub const BLACK: Color = Color(0x231f20);
    pub const WHITE: Color = Color(0xffffff);
    pub const GREEN: Color = Color(0x3a935e);
    pub const RED: Color = Color(0xef4444);
    pub const GOLD: Color = Color(0xffd700);
    pub const BLUE: Color = Color(0x3b82f6);
    pub const CYAN: Color = Color(0x06b6d4);
    pub const PURPLE: Color = Color(0xa020f0);
    pub const MAGENTA: Color = Color(0xff00ff);
    pub const ORANGE: Color = Color(0xffa500);
    pub const ALARM: Color = Color(0xff0000);
    pub const DEBRIS: Color = Color(0x555555);
}

/// Sound cues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AudioCue {
    /// Collectible caught; pitch rises with the combo
    Collect { combo: u32 },
    HazardHit,
    Freeze,
    PowerUp,
    RushOn,
    RushOff,
    MusicStart,
    MusicStop,
}

/// Floating status text, localized by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Callout {
    Points(u64),
    Penalty(u64),
    NearMiss,
    Ouch,
    Frozen,
    ShieldBroken,
    Blocked,
    PowerUp(PowerUp),
    SugarRush,
}

/// Floating text size tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Emphasis {
    Small,
    Medium,
    Large,
}

/// One request produced by a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Sound(AudioCue),
    Particles {
        pos: Vec2,
        color: Color,
        count: u32,
        /// Fast radial burst rather than a gentle puff
        burst: bool,
    },
    Callout {
        pos: Vec2,
        callout: Callout,
        color: Color,
        emphasis: Emphasis,
    },
    Shake {
        intensity: f32,
    },
}

/// Event sink for one tick
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    events: Vec<GameEvent>,
}

impl EventQueue {
    pub fn sound(&mut self, cue: AudioCue) {
        self.events.push(GameEvent::Sound(cue));
    }

    pub fn particles(&mut self, pos: Vec2, color: Color, count: u32, burst: bool) {
        self.events.push(GameEvent::Particles {
            pos,
            color,
            count,
            burst,
        });
    }

    pub fn callout(&mut self, pos: Vec2, callout: Callout, color: Color, emphasis: Emphasis) {
        self.events.push(GameEvent::Callout {
            pos,
            callout,
            color,
            emphasis,
        });
    }

    pub fn shake(&mut self, intensity: f32) {
        self.events.push(GameEvent::Shake { intensity });
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameEvent> {
        self.events.iter()
    }

    /// Take everything queued so far
    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn contains_sound(&self, cue: AudioCue) -> bool {
        self.events.contains(&GameEvent::Sound(cue))
    }

    pub fn contains_callout(&self, callout: Callout) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e, GameEvent::Callout { callout: c, .. } if *c == callout))
    }
}
