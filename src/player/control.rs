//! Player input and movement.
//!
//! Input is an abstraction ([`MoveInput`]) so the movement logic stays fully
//! testable: hosts and tests set it directly, the simulation converts it to a
//! velocity at the start of every tick.

use super::state::{Facing, Player};
use crate::simulation::Updatable;
use bevy::prelude::*;

/// Desired movement direction for the current tick.
///
/// Components are clamped to `[-1, 1]`; diagonal input is normalised so it is
/// never faster than axis-aligned input.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MoveInput {
    x: f32,
    y: f32,
}

impl MoveInput {
    pub fn new(x: f32, y: f32) -> Self {
        let clean = |v: f32| if v.is_finite() { v.clamp(-1.0, 1.0) } else { 0.0 };
        let dir = Vec2::new(clean(x), clean(y));
        let dir = if dir.length_squared() > 1.0 {
            dir.normalize()
        } else {
            dir
        };
        Self { x: dir.x, y: dir.y }
    }

    #[inline]
    pub fn direction(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    #[inline]
    pub fn is_idle(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

impl Player {
    /// Convert the stored input into velocity, facing and last movement.
    pub fn apply_input(&mut self) {
        let dir = self.input.direction();
        self.velocity = dir * self.speed;
        if dir.x < 0.0 {
            self.facing = Facing::Left;
        } else if dir.x > 0.0 {
            self.facing = Facing::Right;
        }
        if let Some(unit) = dir.try_normalize() {
            self.last_move = Some(unit);
        }
    }
}

impl Updatable for Player {
    fn update(&mut self, dt: f32) {
        if !self.active {
            self.velocity = Vec2::ZERO;
            return;
        }
        self.position += self.velocity * dt;
        self.invincibility_remaining = (self.invincibility_remaining - dt).max(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::player::CharacterKind;
    use crate::world::EntityId;

    fn player() -> Player {
        Player::new(EntityId(0), CharacterKind::Archer, &SimConfig::default())
    }

    #[test]
    fn diagonal_input_is_normalised() {
        let input = MoveInput::new(1.0, 1.0);
        assert!((input.direction().length() - 1.0).abs() < 1e-6);
        let clamped = MoveInput::new(5.0, 0.0);
        assert_eq!(clamped.direction(), Vec2::X);
    }

    #[test]
    fn facing_only_changes_with_horizontal_input() {
        let mut p = player();
        p.input = MoveInput::new(-1.0, 0.0);
        p.apply_input();
        assert_eq!(p.facing, Facing::Left);

        p.input = MoveInput::new(0.0, 1.0);
        p.apply_input();
        assert_eq!(p.facing, Facing::Left);
        assert_eq!(p.last_move, Some(Vec2::Y));
    }

    #[test]
    fn idle_input_keeps_last_move() {
        let mut p = player();
        p.input = MoveInput::new(1.0, 0.0);
        p.apply_input();
        p.input = MoveInput::default();
        p.apply_input();
        assert_eq!(p.velocity, Vec2::ZERO);
        assert_eq!(p.last_move, Some(Vec2::X));
    }

    #[test]
    fn update_moves_and_counts_down_invincibility() {
        let mut p = player();
        p.input = MoveInput::new(1.0, 0.0);
        p.apply_input();
        p.invincibility_remaining = 1.0;
        p.update(0.5);
        assert_eq!(p.position, Vec2::new(100.0, 0.0));
        assert_eq!(p.invincibility_remaining, 0.5);
    }
}
