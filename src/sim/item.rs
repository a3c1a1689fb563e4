//! Falling items and the store that owns them

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::events::{Color, palette};

/// Fruit subtypes (visual only, all score the same)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FruitKind {
    Strawberry,
    Lemon,
    Orange,
    Kiwi,
    Peach,
    Blueberry,
}

impl FruitKind {
    pub const ALL: [Self; 6] = [
        Self::Strawberry,
        Self::Lemon,
        Self::Orange,
        Self::Kiwi,
        Self::Peach,
        Self::Blueberry,
    ];
}

/// Item categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    /// Tapioca pearl, the default currency item
    Boba,
    Fruit(FruitKind),
    Leaf,
    Gold,
    /// Hazard: costs a life
    Spike,
    /// Hazard: freezes the cup
    Ice,
    /// Pickup: attracts collectibles
    Magnet,
    /// Pickup: absorbs one hazard hit
    Shield,
}

impl ItemKind {
    #[inline]
    pub fn is_hazard(&self) -> bool {
        matches!(self, Self::Spike | Self::Ice)
    }

    #[inline]
    pub fn is_pickup(&self) -> bool {
        matches!(self, Self::Magnet | Self::Shield)
    }

    /// Catching it scores points and feeds the combo
    #[inline]
    pub fn is_collectible(&self) -> bool {
        !self.is_hazard() && !self.is_pickup()
    }

    /// Base points and rush charge for collectibles
    pub fn reward(&self) -> Option<(u64, u32)> {
        match self {
            Self::Boba => Some((10, 2)),
            Self::Leaf => Some((20, 3)),
            Self::Fruit(_) => Some((50, 5)),
            Self::Gold => Some((100, 10)),
            _ => None,
        }
    }

    /// Tint used for particles, callouts and the renderer
    pub fn color(&self) -> Color {
        match self {
            Self::Boba => palette::BLACK,
            Self::Fruit(_) => palette::RED,
            Self::Leaf => palette::GREEN,
            Self::Gold => palette::GOLD,
            Self::Spike => palette::DEBRIS,
            Self::Ice => palette::CYAN,
            Self::Magnet => palette::PURPLE,
            Self::Shield => palette::BLUE,
        }
    }
}

/// Everything the spawn director decides about a new item
#[derive(Debug, Clone, PartialEq)]
pub struct ItemSpec {
    pub kind: ItemKind,
    pub pos: Vec2,
    pub speed: f32,
    pub size: f32,
    pub rotation: f32,
    pub spin: f32,
}

/// A falling item entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallingItem {
    pub id: u32,
    pub kind: ItemKind,
    /// Centre position in logical pixels
    pub pos: Vec2,
    /// Fall speed (px per 16 ms)
    pub speed: f32,
    /// Side of the bounding square
    pub size: f32,
    pub rotation: f32,
    /// Rotation added every tick (radians)
    pub spin: f32,
    /// Near-miss bonus already awarded
    pub passed: bool,
}

impl FallingItem {
    /// Axis-aligned bounds as (min, max)
    pub fn bounds(&self) -> (Vec2, Vec2) {
        let half = Vec2::splat(self.size / 2.0);
        (self.pos - half, self.pos + half)
    }
}

/// Active falling items, in spawn order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemStore {
    items: Vec<FallingItem>,
    next_id: u32,
}

impl Default for ItemStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ItemStore {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            next_id: 1,
        }
    }

    /// Insert a new item, returning its id
    pub fn spawn(&mut self, spec: ItemSpec) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        self.items.push(FallingItem {
            id,
            kind: spec.kind,
            pos: spec.pos,
            speed: spec.speed,
            size: spec.size,
            rotation: spec.rotation,
            spin: spec.spin,
            passed: false,
        });
        id
    }

    /// Remove by index (callers iterate in reverse)
    pub fn remove(&mut self, index: usize) -> FallingItem {
        self.items.remove(index)
    }

    pub fn retain(&mut self, f: impl FnMut(&FallingItem) -> bool) {
        self.items.retain(f);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&FallingItem> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut FallingItem> {
        self.items.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FallingItem> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut FallingItem> {
        self.items.iter_mut()
    }
}
