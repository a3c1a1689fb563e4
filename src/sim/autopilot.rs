//! Demo pilot for attract mode and headless runs
//!
//! Chases the lowest catchable item and sidesteps hazards that are about to
//! reach the cup. Deliberately simple: it loses eventually, which is what an
//! attract loop wants.

use super::item::FallingItem;
use super::state::PowerUp;
use super::tick::Simulation;

/// How far above the hitbox a hazard starts to matter (px)
const DANGER_LOOKAHEAD: f32 = 160.0;
/// Extra clearance kept from hazards (px)
const DODGE_MARGIN: f32 = 12.0;

/// Pointer x the pilot wants this tick, or `None` to hold position
pub fn choose_target(sim: &Simulation) -> Option<f32> {
    let hitbox = sim.player.hitbox(&sim.tuning.player);
    let bottom = hitbox.y + hitbox.h;
    let shielded = sim.state.has_power_up(PowerUp::Shield) || sim.state.in_rush();

    let threats: Vec<&FallingItem> = if shielded {
        Vec::new()
    } else {
        sim.items
            .iter()
            .filter(|i| i.kind.is_hazard())
            .filter(|i| i.pos.y + i.size / 2.0 > hitbox.y - DANGER_LOOKAHEAD && i.pos.y - i.size / 2.0 < bottom)
            .collect()
    };

    let reach = |x: f32| hitbox.w / 2.0 + x;
    let is_safe = |x: f32| {
        threats
            .iter()
            .all(|t| (t.pos.x - x).abs() > reach(t.size / 2.0 + DODGE_MARGIN))
    };

    // Closest-to-landing collectible or pickup that is still above the cup bottom
    let goal = sim
        .items
        .iter()
        .filter(|i| !i.kind.is_hazard() && i.pos.y < bottom)
        .filter(|i| is_safe(i.pos.x))
        .max_by(|a, b| a.pos.y.partial_cmp(&b.pos.y).unwrap_or(std::cmp::Ordering::Equal));

    if let Some(item) = goal {
        return Some(item.pos.x);
    }

    let here = sim.player.centre().x;
    if is_safe(here) {
        return None;
    }

    // Step clear of the nearest threat, toward the roomier side
    let threat = threats
        .iter()
        .min_by(|a, b| {
            (a.pos.x - here)
                .abs()
                .partial_cmp(&(b.pos.x - here).abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })?;
    let clearance = reach(threat.size / 2.0 + DODGE_MARGIN) + 1.0;
    let left = threat.pos.x - clearance;
    let right = threat.pos.x + clearance;
    let half = sim.player.width / 2.0;
    let target = if left >= half && (right > sim.field.width - half || here <= threat.pos.x) {
        left
    } else {
        right
    };
    Some(target.clamp(half, sim.field.width - half))
}
