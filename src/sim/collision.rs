//! Collision resolution between the cup and falling items
//!
//! Items are square boxes centred on their position; the cup is an inset
//! hitbox. The store is walked back to front so removal by index is safe.

use glam::Vec2;

use super::events::EventQueue;
use super::item::{ItemKind, ItemStore};
use super::rules::{self, Anchors, HitOutcome};
use super::state::{GameState, Player, Playfield};
use crate::tuning::Tuning;

/// What happened during one resolution pass
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    /// Items the cup touched, with their outcome, in resolution order
    pub hits: Vec<(ItemKind, HitOutcome)>,
    pub near_misses: u32,
    /// Items that left the bottom of the playfield
    pub despawned: u32,
}

impl Resolution {
    pub fn ended_game(&self) -> bool {
        self.hits.iter().any(|(_, o)| *o == HitOutcome::GameOver)
    }
}

/// Resolve every item against the cup. Stops early if the game ends.
pub fn resolve(
    items: &mut ItemStore,
    player: &mut Player,
    field: &Playfield,
    state: &mut GameState,
    tuning: &Tuning,
    events: &mut EventQueue,
) -> Resolution {
    let mut resolution = Resolution::default();
    let hitbox = player.hitbox(&tuning.player);
    let centre_x = player.centre().x;
    let floor = field.height + tuning.rules.despawn_margin;

    for i in (0..items.len()).rev() {
        let Some(item) = items.get_mut(i) else {
            continue;
        };
        let (min, max) = item.bounds();
        let hit = hitbox.overlaps(min, max);

        if !hit
            && item.kind.is_hazard()
            && !item.passed
            && hitbox.spans_y(item.pos.y)
            && (item.pos.x - centre_x).abs() < hitbox.w + tuning.rules.near_miss_distance
        {
            item.passed = true;
            resolution.near_misses += 1;
            rules::near_miss(state, centre_x, player.y, tuning, events);
        }

        if hit {
            let item = items.remove(i);
            player.bounce.set(tuning.player.bounce_ms);
            let anchors = Anchors {
                item: item.pos,
                cup: Vec2::new(player.x, player.y),
                field: field.centre(),
            };
            let outcome = rules::apply_hit(state, item.kind, anchors, tuning, events);
            log::debug!("Hit {:?} #{} -> {:?}", item.kind, item.id, outcome);
            resolution.hits.push((item.kind, outcome));
            if outcome == HitOutcome::GameOver {
                break;
            }
        } else if item.pos.y > floor {
            let item = items.remove(i);
            rules::missed(state, item.kind);
            resolution.despawned += 1;
        }
    }

    resolution
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::item::ItemSpec;
    use crate::sim::state::PowerUp;

    struct Fixture {
        items: ItemStore,
        player: Player,
        field: Playfield,
        state: GameState,
        tuning: Tuning,
        events: EventQueue,
    }

    impl Fixture {
        // Cup at x=130..230, y=600; hitbox x=145..215, y=610..670, centre x=180
        fn new() -> Self {
            let tuning = Tuning::default();
            let field = Playfield::new(360.0, 800.0).unwrap();
            Self {
                items: ItemStore::new(),
                player: Player::new(&tuning.player, &field),
                field,
                state: GameState::new(),
                tuning,
                events: EventQueue::default(),
            }
        }

        fn add(&mut self, kind: ItemKind, x: f32, y: f32) {
            self.items.spawn(ItemSpec {
                kind,
                pos: Vec2::new(x, y),
                speed: 7.5,
                size: 40.0,
                rotation: 0.0,
                spin: 0.0,
            });
        }

        fn resolve(&mut self) -> Resolution {
            resolve(
                &mut self.items,
                &mut self.player,
                &self.field,
                &mut self.state,
                &self.tuning,
                &mut self.events,
            )
        }
    }

    #[test]
    fn test_catch_removes_item() {
        let mut f = Fixture::new();
        f.add(ItemKind::Boba, 180.0, 640.0);
        let res = f.resolve();
        assert!(f.items.is_empty());
        assert_eq!(res.hits.len(), 1);
        assert_eq!(f.state.score, 10);
        assert_eq!(f.state.combo, 1);
        assert!(f.player.bounce.is_active());
    }

    #[test]
    fn test_edges_do_not_touch() {
        let mut f = Fixture::new();
        // Right edge of the item exactly on the hitbox left edge
        f.add(ItemKind::Boba, 125.0, 640.0);
        let res = f.resolve();
        assert!(res.hits.is_empty());
        assert_eq!(f.items.len(), 1);
    }

    #[test]
    fn test_near_miss_awarded_once() {
        let mut f = Fixture::new();
        // Beside the hitbox, inside the vertical band, within tolerance
        f.add(ItemKind::Spike, 290.0, 640.0);
        let res = f.resolve();
        assert_eq!(res.near_misses, 1);
        assert_eq!(f.state.score, 50);
        assert!(f.items.get(0).unwrap().passed);
        assert_eq!(f.state.lives, 3);

        let res = f.resolve();
        assert_eq!(res.near_misses, 0);
        assert_eq!(f.state.score, 50);
    }

    #[test]
    fn test_near_miss_only_for_hazards() {
        let mut f = Fixture::new();
        f.add(ItemKind::Gold, 290.0, 640.0);
        let res = f.resolve();
        assert_eq!(res.near_misses, 0);
        assert_eq!(f.state.score, 0);
    }

    #[test]
    fn test_near_miss_outside_tolerance() {
        let mut f = Fixture::new();
        // |x - 180| = 145 > 70 + 70
        f.add(ItemKind::Ice, 325.0, 640.0);
        assert_eq!(f.resolve().near_misses, 0);
    }

    #[test]
    fn test_fallen_collectible_breaks_combo() {
        let mut f = Fixture::new();
        f.state.combo = 6;
        f.state.combo_timer.set(1000.0);
        f.add(ItemKind::Leaf, 40.0, 851.0);
        let res = f.resolve();
        assert_eq!(res.despawned, 1);
        assert_eq!(f.state.combo, 0);
    }

    #[test]
    fn test_fallen_hazard_keeps_combo() {
        let mut f = Fixture::new();
        f.state.combo = 6;
        f.add(ItemKind::Spike, 40.0, 851.0);
        f.add(ItemKind::Shield, 60.0, 900.0);
        let res = f.resolve();
        assert_eq!(res.despawned, 2);
        assert_eq!(f.state.combo, 6);
    }

    #[test]
    fn test_magnet_excuses_miss() {
        let mut f = Fixture::new();
        f.state.combo = 3;
        f.state.power_up = PowerUp::Magnet;
        f.state.power_up_timer.set(1000.0);
        f.add(ItemKind::Boba, 40.0, 851.0);
        f.resolve();
        assert_eq!(f.state.combo, 3);
    }

    #[test]
    fn test_game_over_stops_resolution() {
        let mut f = Fixture::new();
        f.state.lives = 1;
        f.add(ItemKind::Boba, 170.0, 640.0);
        f.add(ItemKind::Spike, 180.0, 640.0);
        let res = f.resolve();
        assert!(res.ended_game());
        // The boba (spawned first) is visited after the spike and never resolved
        assert_eq!(f.items.len(), 1);
        assert_eq!(f.state.score, 0);
    }
}
