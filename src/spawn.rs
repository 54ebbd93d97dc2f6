//! Enemy waves.
//!
//! Every `spawn_interval_secs` a wave of `max(1, floor(base + d · per_difficulty))`
//! enemies appears on a circle of `spawn_radius` around the player, each at a
//! random angle and clamped into the world. The tier is
//! `min(floor(rand · d), tiers - 1)`, so later tiers only become possible as
//! difficulty rises.

use crate::config::SimConfig;
use crate::difficulty::whole_intervals;
use crate::enemy::{Enemy, EnemyKind};
use crate::rng::SimRng;
use crate::world::{IdAllocator, WorldBounds};
use bevy::prelude::*;

#[derive(Debug, Clone)]
pub struct SpawnController {
    interval_secs: f64,
    elapsed_secs: f64,
    waves_due: u64,
    radius: f32,
    base_count: f32,
    count_per_difficulty: f32,
}

impl SpawnController {
    pub fn new(config: &SimConfig) -> Self {
        Self {
            interval_secs: if config.spawn_interval_secs > 0.0 {
                config.spawn_interval_secs as f64
            } else {
                f64::INFINITY
            },
            elapsed_secs: 0.0,
            waves_due: 0,
            radius: config.spawn_radius,
            base_count: config.spawn_base_count,
            count_per_difficulty: config.spawn_count_per_difficulty,
        }
    }

    /// Advance by `dt` seconds. Returns how many waves are due.
    pub fn tick(&mut self, dt: f32) -> u32 {
        self.elapsed_secs += dt.max(0.0) as f64;
        let total = whole_intervals(self.elapsed_secs, self.interval_secs);
        let waves = total.saturating_sub(self.waves_due);
        self.waves_due = total;
        waves.min(u32::MAX as u64) as u32
    }

    pub fn wave_size(&self, difficulty: u32) -> u32 {
        let raw = self.base_count + difficulty as f32 * self.count_per_difficulty;
        (raw.floor().max(0.0) as u32).max(1)
    }

    /// Tier index for `difficulty`; consumes one random sample.
    pub fn pick_kind(difficulty: u32, rng: &mut dyn SimRng) -> EnemyKind {
        let roll = (rng.next_f32() * difficulty as f32).floor() as usize;
        EnemyKind::ALL[roll.min(EnemyKind::ALL.len() - 1)]
    }

    /// Create one enemy around `center`; consumes an angle sample and a tier sample.
    pub fn spawn_one(
        &self,
        center: Vec2,
        difficulty: u32,
        bounds: &WorldBounds,
        config: &SimConfig,
        rng: &mut dyn SimRng,
        ids: &mut IdAllocator,
    ) -> Enemy {
        let angle = rng.next_angle();
        let position = bounds.clamp(center + Vec2::from_angle(angle) * self.radius);
        let kind = Self::pick_kind(difficulty, rng);
        Enemy::new(ids.allocate(), kind, position, difficulty, config)
    }

    /// Create `count` enemies around `center`.
    #[allow(clippy::too_many_arguments)]
    pub fn spawn_wave(
        &self,
        count: u32,
        center: Vec2,
        difficulty: u32,
        bounds: &WorldBounds,
        config: &SimConfig,
        rng: &mut dyn SimRng,
        ids: &mut IdAllocator,
    ) -> Vec<Enemy> {
        let mut wave = Vec::with_capacity(count as usize);
        for _ in 0..count {
            wave.push(self.spawn_one(center, difficulty, bounds, config, rng, ids));
        }
        wave
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SequenceRng;

    #[test]
    fn waves_follow_interval() {
        let mut spawner = SpawnController::new(&SimConfig::default());
        assert_eq!(spawner.tick(1.5), 0);
        assert_eq!(spawner.tick(0.5), 1);
        assert_eq!(spawner.tick(4.0), 2);
    }

    #[test]
    fn sixty_hertz_steps_spawn_on_the_interval_tick() {
        let mut spawner = SpawnController::new(&SimConfig::default());
        let mut waves = 0;
        for _ in 0..119 {
            waves += spawner.tick(1.0 / 60.0);
        }
        assert_eq!(waves, 0);
        assert_eq!(spawner.tick(1.0 / 60.0), 1);

        for _ in 0..120 * 29 {
            waves += spawner.tick(1.0 / 60.0);
        }
        assert_eq!(waves, 29);
    }

    #[test]
    fn wave_size_grows_with_difficulty() {
        let spawner = SpawnController::new(&SimConfig::default());
        assert_eq!(spawner.wave_size(0), 1);
        assert_eq!(spawner.wave_size(1), 1);
        assert_eq!(spawner.wave_size(2), 2);
        assert_eq!(spawner.wave_size(5), 3);
    }

    #[test]
    fn tier_is_capped_to_known_kinds() {
        let mut rng = SequenceRng::constant(0.99);
        assert_eq!(SpawnController::pick_kind(1, &mut rng), EnemyKind::Ghost);
        assert_eq!(SpawnController::pick_kind(2, &mut rng), EnemyKind::Skeleton);
        assert_eq!(SpawnController::pick_kind(10, &mut rng), EnemyKind::Demon);
    }

    #[test]
    fn spawns_on_radius_clamped_to_world() {
        let cfg = SimConfig::default();
        let spawner = SpawnController::new(&cfg);
        let bounds = cfg.world_bounds();
        let mut ids = IdAllocator::default();

        let mut rng = SequenceRng::new(vec![0.0, 0.0]);
        let e = spawner.spawn_one(Vec2::ZERO, 1, &bounds, &cfg, &mut rng, &mut ids);
        assert!((e.position - Vec2::new(600.0, 0.0)).length() < 1e-3);

        let mut rng = SequenceRng::new(vec![0.0, 0.0]);
        let edge = spawner.spawn_one(Vec2::new(1900.0, 0.0), 1, &bounds, &cfg, &mut rng, &mut ids);
        assert_eq!(edge.position.x, bounds.max.x);
    }
}
