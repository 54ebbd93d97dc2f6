//! World geometry, entity identity, and the store of live entities.

use crate::enemy::Enemy;
use crate::pickup::XpPickup;
use crate::player::Player;
use crate::weapon::WeaponInstance;
use bevy::prelude::*;

/// Axis-aligned playable area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldBounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl WorldBounds {
    /// Bounds of the given size centred on the origin.
    pub fn centered(width: f32, height: f32) -> Self {
        let half = Vec2::new(width.abs() * 0.5, height.abs() * 0.5);
        Self {
            min: -half,
            max: half,
        }
    }

    #[inline]
    pub fn contains(&self, pos: Vec2) -> bool {
        pos.x >= self.min.x && pos.x <= self.max.x && pos.y >= self.min.y && pos.y <= self.max.y
    }

    #[inline]
    pub fn clamp(&self, pos: Vec2) -> Vec2 {
        pos.clamp(self.min, self.max)
    }
}

/// Stable identifier for a simulated entity.
///
/// Ids are never reused within a run, so a reference to a removed entity can
/// be detected simply by failing to find it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);

/// Monotonic id source owned by a simulation instance.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub fn allocate(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next += 1;
        id
    }
}

/// Every live entity of one run, plus the id source and kill counter.
///
/// Each list is only filtered (never spliced) at the end of the pass that
/// marked entries for removal.
#[derive(Debug, Clone)]
pub struct Arena {
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub weapons: Vec<WeaponInstance>,
    pub pickups: Vec<XpPickup>,
    pub ids: IdAllocator,
    pub kills: u32,
}

impl Arena {
    /// Anchor lookup for orbit weapons: resolves to the player's position
    /// while the player is active. The player is the only anchor.
    pub fn anchor_lookup(&self) -> impl Fn(EntityId) -> Option<Vec2> {
        let (id, active, position) = (self.player.id, self.player.active, self.player.position);
        move |anchor| (anchor == id && active).then_some(position)
    }
}
