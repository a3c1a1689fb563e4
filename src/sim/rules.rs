//! Power-up / hazard / combo state machine
//!
//! Hazard resolution order is shield, then sugar rush, then normal damage.
//! Changing that order changes what the player sees, so every transition
//! goes through the functions below.

use glam::Vec2;

use super::events::{AudioCue, Callout, Emphasis, EventQueue, palette};
use super::item::ItemKind;
use super::state::{GamePhase, GameState, PowerUp};
use crate::tuning::Tuning;

/// Where the effects of a hit should appear
#[derive(Debug, Clone, Copy)]
pub struct Anchors {
    /// Centre of the item that was hit
    pub item: Vec2,
    /// Top-left of the cup
    pub cup: Vec2,
    /// Centre of the playfield
    pub field: Vec2,
}

/// What a hit did to the game state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Shield took the hazard
    Absorbed,
    /// Sugar rush made the hazard harmless
    Ignored,
    /// Lost a life and `penalty` points
    Damaged { penalty: u64 },
    /// Lost the last life
    GameOver,
    Frozen,
    PoweredUp(PowerUp),
    Caught { points: u64, rush_started: bool },
}

/// Timers that ran out during decay
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Expired {
    pub power_up: bool,
    pub rush: bool,
    pub combo: bool,
}

/// Decay every countdown by `dt`
pub fn decay_timers(state: &mut GameState, dt: f32, events: &mut EventQueue) -> Expired {
    let mut expired = Expired::default();

    if state.power_up != PowerUp::None {
        state.power_up_timer.tick(dt);
        if !state.power_up_timer.is_active() {
            log::debug!("{:?} expired", state.power_up);
            state.power_up = PowerUp::None;
            expired.power_up = true;
        }
    }

    state.frozen.tick(dt);

    if state.rush.tick(dt) {
        state.rush_charge = 0;
        events.sound(AudioCue::RushOff);
        log::info!("Sugar rush over (score {})", state.score);
        expired.rush = true;
    }

    state.combo_timer.tick(dt);
    if !state.combo_timer.is_active() && state.combo > 0 {
        state.combo = 0;
        expired.combo = true;
    }

    expired
}

/// Resolve a hit between the cup and an item of `kind`
pub fn apply_hit(
    state: &mut GameState,
    kind: ItemKind,
    at: Anchors,
    tuning: &Tuning,
    events: &mut EventQueue,
) -> HitOutcome {
    match kind {
        ItemKind::Spike => hit_spike(state, at, tuning, events),
        ItemKind::Ice => hit_ice(state, at, tuning, events),
        ItemKind::Magnet => pick_up(state, PowerUp::Magnet, at, tuning, events),
        ItemKind::Shield => pick_up(state, PowerUp::Shield, at, tuning, events),
        ItemKind::Boba | ItemKind::Fruit(_) | ItemKind::Leaf | ItemKind::Gold => {
            catch(state, kind, at, tuning, events)
        }
    }
}

fn hit_spike(state: &mut GameState, at: Anchors, tuning: &Tuning, events: &mut EventQueue) -> HitOutcome {
    if state.has_power_up(PowerUp::Shield) {
        state.power_up = PowerUp::None;
        state.power_up_timer.clear();
        events.sound(AudioCue::HazardHit);
        events.particles(at.item, palette::BLUE, 15, true);
        events.shake(15.0);
        events.callout(at.cup - Vec2::Y * 50.0, Callout::ShieldBroken, palette::BLUE, Emphasis::Large);
        return HitOutcome::Absorbed;
    }
    if state.in_rush() {
        return HitOutcome::Ignored;
    }

    state.lives = state.lives.saturating_sub(1);
    state.combo = 0;
    state.combo_timer.clear();
    state.rush_charge = 0;
    let penalty = state.apply_penalty(tuning.rules.penalty);

    events.sound(AudioCue::HazardHit);
    events.shake(40.0);
    events.particles(at.item, palette::DEBRIS, 20, true);
    events.callout(at.cup - Vec2::Y * 80.0, Callout::Ouch, palette::ALARM, Emphasis::Large);
    events.callout(at.cup - Vec2::Y * 40.0, Callout::Penalty(penalty), palette::ALARM, Emphasis::Large);

    if state.lives == 0 {
        state.phase = GamePhase::GameOver;
        events.sound(AudioCue::MusicStop);
        log::info!("Game over with score {}", state.score);
        return HitOutcome::GameOver;
    }
    log::debug!("Spike hit: {} lives left, -{penalty}", state.lives);
    HitOutcome::Damaged { penalty }
}

fn hit_ice(state: &mut GameState, at: Anchors, tuning: &Tuning, events: &mut EventQueue) -> HitOutcome {
    if state.has_power_up(PowerUp::Shield) {
        state.power_up = PowerUp::None;
        state.power_up_timer.clear();
        events.sound(AudioCue::HazardHit);
        events.callout(at.cup - Vec2::Y * 50.0, Callout::Blocked, palette::BLUE, Emphasis::Medium);
        return HitOutcome::Absorbed;
    }
    if state.in_rush() {
        return HitOutcome::Ignored;
    }

    state.frozen.set(tuning.rules.freeze_duration_ms);
    state.combo = 0;
    state.combo_timer.clear();

    events.sound(AudioCue::Freeze);
    events.particles(at.item, palette::CYAN, 20, true);
    events.callout(at.cup + Vec2::new(20.0, -50.0), Callout::Frozen, palette::CYAN, Emphasis::Large);
    HitOutcome::Frozen
}

fn pick_up(
    state: &mut GameState,
    power_up: PowerUp,
    at: Anchors,
    tuning: &Tuning,
    events: &mut EventQueue,
) -> HitOutcome {
    state.power_up = power_up;
    state.power_up_timer.set(tuning.rules.power_up_duration_ms);
    state.score += tuning.rules.power_up_bonus;

    events.sound(AudioCue::PowerUp);
    events.particles(at.item, palette::WHITE, 20, true);
    events.callout(
        at.cup + Vec2::new(20.0, -50.0),
        Callout::PowerUp(power_up),
        palette::PURPLE,
        Emphasis::Large,
    );
    HitOutcome::PoweredUp(power_up)
}

fn catch(state: &mut GameState, kind: ItemKind, at: Anchors, tuning: &Tuning, events: &mut EventQueue) -> HitOutcome {
    let Some((base, charge)) = kind.reward() else {
        return HitOutcome::Ignored;
    };

    state.combo += 1;
    state.combo_timer.set(tuning.rules.combo_window_ms);

    let mut rush_started = false;
    if !state.in_rush() {
        state.add_charge(charge);
        if state.rush_charge >= crate::consts::MAX_RUSH_CHARGE {
            state.rush.set(tuning.rules.rush_duration_ms);
            state.gain_life();
            rush_started = true;
            events.sound(AudioCue::RushOn);
            events.callout(at.field, Callout::SugarRush, palette::MAGENTA, Emphasis::Large);
            log::info!("Sugar rush! (score {}, lives {})", state.score, state.lives);
        }
    }

    let points = (base as f32 * state.multiplier(&tuning.rules)).floor() as u64;
    state.score += points;

    let color = kind.color();
    let emphasis = if state.combo > 10 {
        Emphasis::Large
    } else {
        Emphasis::Medium
    };
    events.sound(AudioCue::Collect { combo: state.combo });
    events.particles(at.item, color, 6, false);
    events.callout(at.item - Vec2::Y * 20.0, Callout::Points(points), color, emphasis);

    HitOutcome::Caught {
        points,
        rush_started,
    }
}

/// Award the near-miss bonus for a hazard passing close by
pub fn near_miss(state: &mut GameState, cup_centre_x: f32, cup_top: f32, tuning: &Tuning, events: &mut EventQueue) {
    state.score += tuning.rules.near_miss_bonus;
    events.callout(
        Vec2::new(cup_centre_x, cup_top - 80.0),
        Callout::NearMiss,
        palette::ORANGE,
        Emphasis::Small,
    );
}

/// A collectible fell past the cup. Breaks the combo unless rush, frost or
/// the magnet excuse the miss.
pub fn missed(state: &mut GameState, kind: ItemKind) {
    if !kind.is_collectible() {
        return;
    }
    if state.in_rush() || state.is_frozen() || state.has_power_up(PowerUp::Magnet) {
        return;
    }
    if state.combo > 0 {
        log::debug!("Combo of {} broken by a miss", state.combo);
        state.combo = 0;
    }
}
