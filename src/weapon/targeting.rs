//! Firing-angle policies.
//!
//! | mode | angle |
//! |------|-------|
//! | `Nearest` | toward the closest live enemy; else last movement; else 0 |
//! | `Facing` | 0 facing right, π facing left |
//! | `Movement` | last nonzero movement direction; facing angle if the player never moved |
//! | `Random` | uniform in `[0, 2π)` |

use super::table::TargetingMode;
use crate::enemy::Enemy;
use crate::player::{Facing, Player};
use crate::rng::SimRng;
use crate::world::EntityId;
use bevy::prelude::*;

/// The slice of player state targeting needs, copied out so slots can be
/// mutated while angles are resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AimContext {
    pub origin: Vec2,
    pub facing: Facing,
    pub last_move: Option<Vec2>,
}

impl From<&Player> for AimContext {
    fn from(player: &Player) -> Self {
        Self {
            origin: player.position,
            facing: player.facing,
            last_move: player.last_move,
        }
    }
}

/// Result of resolving a targeting mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AimSolution {
    /// Firing angle (radians).
    pub angle: f32,
    /// Enemy aimed at, for `Nearest` with at least one live enemy.
    pub target: Option<EntityId>,
}

pub struct TargetingResolver;

impl TargetingResolver {
    pub fn resolve(
        mode: TargetingMode,
        aim: &AimContext,
        enemies: &[Enemy],
        rng: &mut dyn SimRng,
    ) -> AimSolution {
        match mode {
            TargetingMode::Nearest => match Self::nearest(aim.origin, enemies) {
                Some(enemy) => {
                    let delta = enemy.position - aim.origin;
                    AimSolution {
                        angle: delta.y.atan2(delta.x),
                        target: Some(enemy.id),
                    }
                }
                None => AimSolution {
                    angle: aim.last_move.map(angle_of).unwrap_or(0.0),
                    target: None,
                },
            },
            TargetingMode::Facing => untargeted(aim.facing.angle()),
            TargetingMode::Movement => {
                untargeted(aim.last_move.map(angle_of).unwrap_or(aim.facing.angle()))
            }
            TargetingMode::Random => untargeted(rng.next_angle()),
        }
    }

    /// Closest live enemy to `origin`; ties go to the earlier enemy.
    pub fn nearest(origin: Vec2, enemies: &[Enemy]) -> Option<&Enemy> {
        enemies
            .iter()
            .filter(|e| !e.is_dead())
            .min_by(|a, b| {
                a.position
                    .distance_squared(origin)
                    .total_cmp(&b.position.distance_squared(origin))
            })
    }
}

#[inline]
fn angle_of(dir: Vec2) -> f32 {
    dir.y.atan2(dir.x)
}

#[inline]
fn untargeted(angle: f32) -> AimSolution {
    AimSolution {
        angle,
        target: None,
    }
}
