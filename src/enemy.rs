//! Enemies: kinds, difficulty-scaled stats, seek movement and knockback.

use crate::config::SimConfig;
use crate::simulation::Updatable;
use crate::world::EntityId;
use bevy::prelude::*;

/// Enemy tiers, weakest first. Spawning picks a tier by index into [`EnemyKind::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnemyKind {
    Ghost,
    Skeleton,
    Demon,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 3] = [EnemyKind::Ghost, EnemyKind::Skeleton, EnemyKind::Demon];

    /// Seek speed (u/s).
    pub fn base_speed(self) -> f32 {
        match self {
            EnemyKind::Ghost => 100.0,
            EnemyKind::Skeleton => 80.0,
            EnemyKind::Demon => 60.0,
        }
    }

    /// Contact damage at difficulty 1.
    pub fn base_damage(self) -> f32 {
        match self {
            EnemyKind::Ghost => 10.0,
            EnemyKind::Skeleton => 15.0,
            EnemyKind::Demon => 20.0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            EnemyKind::Ghost => "ghost",
            EnemyKind::Skeleton => "skeleton",
            EnemyKind::Demon => "demon",
        }
    }
}

/// Knockback state. While active the seek behaviour does not touch velocity.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Knockback {
    pub active: bool,
    pub remaining_secs: f32,
    /// Simulation time of the last application, for the re-apply cooldown.
    pub last_applied_at: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: EntityId,
    pub kind: EnemyKind,
    pub position: Vec2,
    pub velocity: Vec2,
    pub radius: f32,
    pub health: f32,
    pub max_health: f32,
    pub damage: f32,
    pub speed: f32,
    pub knockback: Knockback,
}

impl Enemy {
    /// Build an enemy with stats scaled to `difficulty`:
    /// health `base + per_difficulty * d`, damage `kind + per_difficulty * (d - 1)`.
    pub fn new(
        id: EntityId,
        kind: EnemyKind,
        position: Vec2,
        difficulty: u32,
        config: &SimConfig,
    ) -> Self {
        let d = difficulty.max(1) as f32;
        let health = config.enemy_base_health + config.enemy_health_per_difficulty * d;
        Self {
            id,
            kind,
            position,
            velocity: Vec2::ZERO,
            radius: config.enemy_radius,
            health,
            max_health: health,
            damage: kind.base_damage() + config.enemy_damage_per_difficulty * (d - 1.0),
            speed: kind.base_speed(),
            knockback: Knockback::default(),
        }
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    /// Point velocity straight at `target` unless knocked back.
    pub fn seek(&mut self, target: Vec2) {
        if self.knockback.active {
            return;
        }
        let to_target = target - self.position;
        if to_target.length_squared() <= 1e-6 {
            self.velocity = Vec2::ZERO;
            return;
        }
        self.velocity = to_target.normalize() * self.speed;
    }

    /// Subtract `amount` from health, clamped at zero. Returns remaining health.
    pub fn take_damage(&mut self, amount: f32) -> f32 {
        self.health = (self.health - amount.max(0.0)).max(0.0);
        self.health
    }

    /// Push the enemy away from `source` at `force` u/s for
    /// `knockback_duration`. Ignored inside the re-apply cooldown.
    ///
    /// Returns `true` if the knockback was applied.
    pub fn try_knockback(&mut self, source: Vec2, force: f32, now: f64, config: &SimConfig) -> bool {
        if force <= 0.0 {
            return false;
        }
        if let Some(last) = self.knockback.last_applied_at {
            if now - last < config.knockback_cooldown as f64 {
                return false;
            }
        }
        let away = (self.position - source).try_normalize().unwrap_or(Vec2::X);
        self.velocity = away * force;
        self.knockback = Knockback {
            active: true,
            remaining_secs: config.knockback_duration,
            last_applied_at: Some(now),
        };
        true
    }
}

impl Updatable for Enemy {
    fn update(&mut self, dt: f32) {
        self.position += self.velocity * dt;
        if self.knockback.active {
            self.knockback.remaining_secs = (self.knockback.remaining_secs - dt).max(0.0);
            if self.knockback.remaining_secs <= 0.0 {
                self.knockback.active = false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enemy(kind: EnemyKind, difficulty: u32) -> Enemy {
        Enemy::new(EntityId(1), kind, Vec2::ZERO, difficulty, &SimConfig::default())
    }

    #[test]
    fn stats_scale_with_difficulty() {
        let e = enemy(EnemyKind::Skeleton, 3);
        assert_eq!(e.health, 80.0);
        assert_eq!(e.max_health, 80.0);
        assert_eq!(e.damage, 17.0);
        assert_eq!(e.speed, 80.0);
        assert_eq!(enemy(EnemyKind::Ghost, 1).damage, 10.0);
    }

    #[test]
    fn seek_points_at_target() {
        let mut e = enemy(EnemyKind::Ghost, 1);
        e.seek(Vec2::new(10.0, 0.0));
        assert_eq!(e.velocity, Vec2::new(100.0, 0.0));
    }

    #[test]
    fn knockback_overrides_seek_until_it_expires() {
        let cfg = SimConfig::default();
        let mut e = enemy(EnemyKind::Ghost, 1);
        assert!(e.try_knockback(Vec2::new(-10.0, 0.0), 200.0, 0.0, &cfg));
        e.seek(Vec2::new(-100.0, 0.0));
        assert_eq!(e.velocity, Vec2::new(200.0, 0.0));

        e.update(0.25);
        assert!(e.knockback.active);
        e.update(0.25);
        assert!(!e.knockback.active);
        e.seek(Vec2::new(-100.0, 50.0));
        assert!(e.velocity.x < 0.0);
    }

    #[test]
    fn knockback_respects_cooldown() {
        let cfg = SimConfig::default();
        let mut e = enemy(EnemyKind::Demon, 1);
        assert!(e.try_knockback(Vec2::ZERO, 200.0, 1.0, &cfg));
        assert!(!e.try_knockback(Vec2::ZERO, 200.0, 1.25, &cfg));
        assert!(e.try_knockback(Vec2::ZERO, 200.0, 1.5, &cfg));
    }

    #[test]
    fn damage_clamps_at_zero() {
        let mut e = enemy(EnemyKind::Ghost, 1);
        assert_eq!(e.take_damage(1000.0), 0.0);
        assert!(e.is_dead());
    }
}
