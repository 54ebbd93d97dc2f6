//! Live weapon instances and their motion.
//!
//! An instance is created either **Flying** (straight line, lifespan) or
//! **Orbiting** (positioned relative to an anchor) and never switches. Both end
//! in **Destroyed**, after which the instance is dropped from the registry.
//!
//! Orbit angles are written by the fire controller's ring rotation; this
//! module only turns the current angle into a position.

use super::table::{WeaponKind, WeaponStats};
use crate::simulation::Updatable;
use crate::world::{EntityId, WorldBounds};
use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Motion {
    Flying {
        velocity: Vec2,
        lifespan_remaining_ms: f32,
    },
    Orbiting {
        anchor: EntityId,
        orbit_distance: f32,
        orbit_angle: f32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionState {
    Flying,
    Orbiting,
    Destroyed,
}

#[derive(Debug, Clone)]
pub struct WeaponInstance {
    pub id: EntityId,
    pub kind: WeaponKind,
    /// Damage resolved from the slot level at creation.
    pub damage: f32,
    pub radius: f32,
    pub knockback: f32,
    pub destroy_on_hit: bool,
    pub position: Vec2,
    pub motion: Motion,
    destroyed: bool,
}

impl WeaponInstance {
    /// A projectile leaving `origin` at `angle`.
    pub fn flying(id: EntityId, stats: &WeaponStats, origin: Vec2, angle: f32) -> Self {
        Self {
            id,
            kind: stats.kind,
            damage: stats.damage,
            radius: stats.radius,
            knockback: stats.knockback,
            destroy_on_hit: stats.destroy_on_hit,
            position: origin,
            motion: Motion::Flying {
                velocity: Vec2::from_angle(angle) * stats.speed,
                lifespan_remaining_ms: stats.lifespan_ms,
            },
            destroyed: false,
        }
    }

    /// An orbiter around `anchor`, placed at `angle` immediately.
    pub fn orbiting(
        id: EntityId,
        stats: &WeaponStats,
        anchor: EntityId,
        anchor_pos: Vec2,
        angle: f32,
    ) -> Self {
        Self {
            id,
            kind: stats.kind,
            damage: stats.damage,
            radius: stats.radius,
            knockback: stats.knockback,
            destroy_on_hit: stats.destroy_on_hit,
            position: anchor_pos + Vec2::from_angle(angle) * stats.orbit_distance,
            motion: Motion::Orbiting {
                anchor,
                orbit_distance: stats.orbit_distance,
                orbit_angle: angle,
            },
            destroyed: false,
        }
    }

    pub fn state(&self) -> MotionState {
        if self.destroyed {
            return MotionState::Destroyed;
        }
        match self.motion {
            Motion::Flying { .. } => MotionState::Flying,
            Motion::Orbiting { .. } => MotionState::Orbiting,
        }
    }

    #[inline]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    #[inline]
    pub fn destroy(&mut self) {
        self.destroyed = true;
    }

    pub fn anchor(&self) -> Option<EntityId> {
        match self.motion {
            Motion::Orbiting { anchor, .. } => Some(anchor),
            Motion::Flying { .. } => None,
        }
    }

    pub fn orbit_angle(&self) -> Option<f32> {
        match self.motion {
            Motion::Orbiting { orbit_angle, .. } => Some(orbit_angle),
            Motion::Flying { .. } => None,
        }
    }

    pub fn set_orbit_angle(&mut self, angle: f32) {
        if let Motion::Orbiting { orbit_angle, .. } = &mut self.motion {
            *orbit_angle = angle;
        }
    }
}

impl Updatable for WeaponInstance {
    /// Integrates flying instances. Orbiters need their anchor and are placed
    /// by [`ProjectileMotion::advance`].
    fn update(&mut self, dt: f32) {
        if self.destroyed {
            return;
        }
        if let Motion::Flying {
            velocity,
            lifespan_remaining_ms,
        } = &mut self.motion
        {
            self.position += *velocity * dt;
            *lifespan_remaining_ms -= dt * 1000.0;
            if *lifespan_remaining_ms <= 0.0 {
                self.destroyed = true;
            }
        }
    }
}

pub struct ProjectileMotion;

impl ProjectileMotion {
    /// Advance every instance by `dt` seconds and drop the destroyed ones.
    ///
    /// `anchor_position` returns the position of an active anchor, or `None`
    /// if the anchor is gone or inactive; its orbiters are destroyed.
    pub fn advance(
        instances: &mut Vec<WeaponInstance>,
        anchor_position: impl Fn(EntityId) -> Option<Vec2>,
        bounds: &WorldBounds,
        dt: f32,
    ) {
        for instance in instances.iter_mut() {
            match instance.motion {
                Motion::Flying { .. } => {
                    instance.update(dt);
                    if !bounds.contains(instance.position) {
                        instance.destroy();
                    }
                }
                Motion::Orbiting {
                    anchor,
                    orbit_distance,
                    orbit_angle,
                    ..
                } => match anchor_position(anchor) {
                    Some(center) => {
                        instance.position = center + Vec2::from_angle(orbit_angle) * orbit_distance;
                    }
                    None => instance.destroy(),
                },
            }
        }
        instances.retain(|w| !w.is_destroyed());
    }
}
