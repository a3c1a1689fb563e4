//! Spawn director
//!
//! Difficulty is driven entirely by score: every `level_step` points shifts
//! the hazard bands and speeds items up, and past the hardcore threshold a
//! harsher table takes over. Sugar rush replaces the table with a shower of
//! fruit and gold.

use glam::Vec2;
use rand::Rng;

use super::item::{FruitKind, ItemKind, ItemSpec};
use crate::tuning::SpawnTuning;

/// Time between spawns for the given score (ms)
pub fn spawn_interval(score: u64, rush: bool, tuning: &SpawnTuning) -> f32 {
    if rush {
        return tuning.rush_interval_ms;
    }
    if is_hardcore(score, tuning) {
        return tuning.hardcore_interval_ms;
    }
    (tuning.base_interval_ms - score as f32 * tuning.interval_per_point).max(tuning.min_interval_ms)
}

#[inline]
pub fn is_hardcore(score: u64, tuning: &SpawnTuning) -> bool {
    score > tuning.hardcore_score
}

#[inline]
pub fn difficulty_level(score: u64, tuning: &SpawnTuning) -> u32 {
    (score / tuning.level_step) as u32
}

/// One row of the distribution: items whose roll is above `above` get this kind
struct Band {
    above: f32,
    kind: BandKind,
    /// Speed factor relative to gravity
    speed: f32,
    /// Hazards also scale with the difficulty multiplier here
    scaled: bool,
    size: f32,
}

#[derive(Clone, Copy)]
enum BandKind {
    PowerUp,
    Gold,
    Ice,
    Spike,
    Fruit,
    Leaf,
}

fn bands(level: u32, hardcore: bool) -> [Band; 6] {
    let level = level as f32;
    if hardcore {
        [
            Band { above: 0.99, kind: BandKind::PowerUp, speed: 0.9, scaled: false, size: 55.0 },
            Band { above: 0.97, kind: BandKind::Gold, speed: 1.8, scaled: false, size: 50.0 },
            Band { above: 0.85, kind: BandKind::Ice, speed: 1.3, scaled: true, size: 50.0 },
            Band { above: 0.65, kind: BandKind::Spike, speed: 1.2, scaled: true, size: 55.0 },
            Band { above: 0.50, kind: BandKind::Fruit, speed: 1.4, scaled: false, size: 50.0 },
            Band { above: 0.40, kind: BandKind::Leaf, speed: 1.1, scaled: false, size: 40.0 },
        ]
    } else {
        [
            Band { above: 0.99, kind: BandKind::PowerUp, speed: 0.9, scaled: false, size: 55.0 },
            Band { above: 0.97, kind: BandKind::Gold, speed: 1.8, scaled: false, size: 50.0 },
            Band { above: 0.92 - level * 0.02, kind: BandKind::Ice, speed: 1.2, scaled: true, size: 50.0 },
            Band { above: 0.80 - level * 0.03, kind: BandKind::Spike, speed: 1.1, scaled: true, size: 55.0 },
            Band { above: 0.65, kind: BandKind::Fruit, speed: 1.3, scaled: false, size: 50.0 },
            Band { above: 0.50, kind: BandKind::Leaf, speed: 1.0, scaled: false, size: 40.0 },
        ]
    }
}

const DEFAULT_SIZE: f32 = 45.0;

/// Decide the next item. `rng` must be the simulation's seeded generator.
pub fn spawn_item(
    rng: &mut impl Rng,
    field_width: f32,
    score: u64,
    rush: bool,
    tuning: &SpawnTuning,
) -> ItemSpec {
    let span = field_width - tuning.margin * 2.0;
    let across: f32 = rng.random();
    // Fields narrower than both margins drop everything down the middle
    let x = if span > 0.0 {
        across * span + tuning.margin
    } else {
        field_width / 2.0
    };
    let pos = Vec2::new(x, tuning.spawn_y);
    let rotation = rng.random::<f32>() * std::f32::consts::PI;
    let spin = (rng.random::<f32>() - 0.5) * 0.2;
    let fruit = FruitKind::ALL[rng.random_range(0..FruitKind::ALL.len())];

    if rush {
        let kind = if rng.random::<f32>() > 0.8 {
            ItemKind::Fruit(fruit)
        } else {
            ItemKind::Gold
        };
        return ItemSpec {
            kind,
            pos,
            speed: tuning.gravity * tuning.rush_speed,
            size: tuning.rush_size,
            rotation,
            spin,
        };
    }

    let level = difficulty_level(score, tuning);
    let hardcore = is_hardcore(score, tuning);
    let multiplier = 1.0 + level as f32 * tuning.speed_per_level;

    let roll: f32 = rng.random();
    let (kind, mut speed, size) = match bands(level, hardcore).iter().find(|b| roll > b.above) {
        Some(band) => {
            let kind = match band.kind {
                BandKind::PowerUp => {
                    if rng.random::<f32>() > 0.5 {
                        ItemKind::Magnet
                    } else {
                        ItemKind::Shield
                    }
                }
                BandKind::Gold => ItemKind::Gold,
                BandKind::Ice => ItemKind::Ice,
                BandKind::Spike => ItemKind::Spike,
                BandKind::Fruit => ItemKind::Fruit(fruit),
                BandKind::Leaf => ItemKind::Leaf,
            };
            let factor = if band.scaled { band.speed * multiplier } else { band.speed };
            (kind, tuning.gravity * factor, band.size)
        }
        None => (ItemKind::Boba, tuning.gravity, DEFAULT_SIZE),
    };

    speed *= multiplier;
    if hardcore {
        speed *= tuning.hardcore_speed;
    }
    speed = speed.min(tuning.max_speed);

    ItemSpec {
        kind,
        pos,
        speed,
        size,
        rotation,
        spin,
    }
}
