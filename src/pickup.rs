//! XP pickups: dropped where an enemy dies, absorbed by the player on contact.
//!
//! ## Flow
//!
//! 1. [`XpPickup::drop_at`] is called by the collision pass when an enemy's
//!    health reaches zero. The gem starts with a small random scatter velocity.
//! 2. Every tick, [`XpPickup::attract`] pulls gems inside the magnet radius
//!    toward the player; gems outside it slow down with drag.
//! 3. The collision pass absorbs gems overlapping the player.
//! 4. Gems older than `xp_pickup_lifetime_secs` expire and are removed.

use crate::config::SimConfig;
use crate::rng::SimRng;
use crate::simulation::Updatable;
use crate::world::EntityId;
use bevy::prelude::*;

#[derive(Debug, Clone)]
pub struct XpPickup {
    pub id: EntityId,
    pub position: Vec2,
    pub velocity: Vec2,
    pub radius: f32,
    pub value: u32,
    /// Seconds until the gem disappears uncollected.
    pub lifetime_remaining: f32,
    pub collected: bool,
}

impl XpPickup {
    /// A motionless gem at `position`.
    pub fn new(id: EntityId, position: Vec2, value: u32, config: &SimConfig) -> Self {
        Self {
            id,
            position,
            velocity: Vec2::ZERO,
            radius: config.xp_pickup_radius,
            value,
            lifetime_remaining: config.xp_pickup_lifetime_secs,
            collected: false,
        }
    }

    /// A gem dropped by a dead enemy, scattered in a random direction.
    pub fn drop_at(id: EntityId, position: Vec2, config: &SimConfig, rng: &mut dyn SimRng) -> Self {
        let mut gem = Self::new(id, position, config.xp_pickup_value, config);
        let angle = rng.next_angle();
        gem.velocity = Vec2::from_angle(angle) * config.xp_pickup_scatter_speed;
        gem
    }

    #[inline]
    pub fn is_expired(&self) -> bool {
        self.lifetime_remaining <= 0.0
    }

    /// Steer toward `player_pos` when inside the magnet radius, otherwise
    /// bleed off velocity. The pull lerps velocity by `4 × dt` per tick.
    pub fn attract(&mut self, player_pos: Vec2, config: &SimConfig, dt: f32) {
        let delta = player_pos - self.position;
        let radius_sq = config.xp_pickup_magnet_radius * config.xp_pickup_magnet_radius;
        if delta.length_squared() <= radius_sq {
            let alpha = (dt * 4.0).min(1.0);
            let target = delta.normalize_or_zero() * config.xp_pickup_magnet_strength;
            self.velocity = self.velocity.lerp(target, alpha);
        } else {
            self.velocity *= config.xp_pickup_drag.clamp(0.0, 1.0).powf(dt);
        }
    }
}

impl Updatable for XpPickup {
    fn update(&mut self, dt: f32) {
        self.position += self.velocity * dt;
        self.lifetime_remaining -= dt;
    }
}
