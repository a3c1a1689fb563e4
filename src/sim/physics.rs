//! Item integration and magnet attraction

use glam::Vec2;

use super::item::ItemStore;
use crate::frame_scale;
use crate::tuning::MagnetTuning;

/// Advance every item by `dt` ms.
///
/// With `magnet` set to the cup centre, non-hazard items below the magnet's
/// minimum altitude and inside its capture radius are pulled straight at the
/// cup instead of falling. Returns the number of items dropped because their
/// position stopped being finite.
pub fn integrate(items: &mut ItemStore, dt: f32, magnet: Option<Vec2>, tuning: &MagnetTuning) -> usize {
    let scale = frame_scale(dt);

    for item in items.iter_mut() {
        let pull = magnet.and_then(|centre| {
            if item.kind.is_hazard() || item.pos.y <= tuning.min_y {
                return None;
            }
            let to_centre = centre - item.pos;
            let dist = to_centre.length();
            (dist < tuning.radius && dist > f32::EPSILON).then(|| to_centre / dist)
        });

        match pull {
            Some(dir) => item.pos += dir * tuning.pull * scale,
            None => item.pos.y += item.speed * scale,
        }
        item.rotation += item.spin;
    }

    let before = items.len();
    items.retain(|item| {
        let finite = item.pos.is_finite();
        if !finite {
            log::warn!("Dropping item {} with non-finite position", item.id);
        }
        finite
    });
    before - items.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::item::{ItemKind, ItemSpec};

    fn store_with(kind: ItemKind, pos: Vec2) -> ItemStore {
        let mut store = ItemStore::new();
        store.spawn(ItemSpec {
            kind,
            pos,
            speed: 10.0,
            size: 45.0,
            rotation: 0.0,
            spin: 0.05,
        });
        store
    }

    #[test]
    fn test_fall_scales_with_dt() {
        let mut store = store_with(ItemKind::Boba, Vec2::new(100.0, 0.0));
        integrate(&mut store, 32.0, None, &MagnetTuning::default());
        let item = store.get(0).unwrap();
        assert_eq!(item.pos, Vec2::new(100.0, 20.0));
        assert!((item.rotation - 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_magnet_pulls_collectibles() {
        let centre = Vec2::new(100.0, 400.0);
        let mut store = store_with(ItemKind::Gold, Vec2::new(100.0, 100.0));
        integrate(&mut store, 16.0, Some(centre), &MagnetTuning::default());
        let item = store.get(0).unwrap();
        assert!((item.pos.y - 115.0).abs() < 1e-4);
        assert!((item.pos.x - 100.0).abs() < 1e-4);
    }

    #[test]
    fn test_magnet_ignores_hazards_and_high_items() {
        let centre = Vec2::new(100.0, 400.0);
        let tuning = MagnetTuning::default();

        let mut spikes = store_with(ItemKind::Spike, Vec2::new(150.0, 300.0));
        integrate(&mut spikes, 16.0, Some(centre), &tuning);
        assert_eq!(spikes.get(0).unwrap().pos, Vec2::new(150.0, 310.0));

        let mut high = store_with(ItemKind::Leaf, Vec2::new(150.0, 40.0));
        integrate(&mut high, 16.0, Some(centre), &tuning);
        assert_eq!(high.get(0).unwrap().pos, Vec2::new(150.0, 50.0));
    }

    #[test]
    fn test_magnet_outside_radius_falls() {
        let centre = Vec2::new(0.0, 700.0);
        let mut store = store_with(ItemKind::Boba, Vec2::new(600.0, 60.0));
        integrate(&mut store, 16.0, Some(centre), &MagnetTuning::default());
        assert_eq!(store.get(0).unwrap().pos, Vec2::new(600.0, 70.0));
    }

    #[test]
    fn test_non_finite_items_dropped() {
        let mut store = store_with(ItemKind::Boba, Vec2::new(f32::NAN, 0.0));
        assert_eq!(integrate(&mut store, 16.0, None, &MagnetTuning::default()), 1);
        assert!(store.is_empty());
    }
}
