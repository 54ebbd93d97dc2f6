//! Runtime simulation configuration loaded from `assets/survival.toml`.
//!
//! [`SimConfig`] is a Bevy [`Resource`] that mirrors the tuneable constants in
//! [`crate::constants`]. [`load_sim_config`] reads the TOML file and overwrites
//! the defaults with any values present in the file. Missing keys fall back to
//! the compile-time defaults, so a minimal TOML can override just the values
//! you care about.
//!
//! Weapon stats are **not** part of this file; they live in the separate
//! weapon table (see [`crate::weapon::table`]).
//!
//! ## Tuning workflow
//!
//! 1. Edit `assets/survival.toml`.
//! 2. Restart the run; no recompilation required.
//! 3. Run `cargo test` to confirm scenario tests still hold.

use crate::constants::*;
use crate::world::WorldBounds;
use bevy::prelude::*;
use serde::Deserialize;
use std::path::Path;

/// Default location of the simulation config file.
pub const SIM_CONFIG_PATH: &str = "assets/survival.toml";

/// Runtime-tunable simulation configuration.
///
/// All fields default to the corresponding compile-time constant from
/// `src/constants.rs`.
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // ── World Bounds ─────────────────────────────────────────────────────────
    pub world_width: f32,
    pub world_height: f32,

    // ── Player ───────────────────────────────────────────────────────────────
    pub player_radius: f32,
    pub invincibility_duration: f32,
    pub player_start_xp_to_next: u32,
    pub level_up_max_health_bonus: f32,
    pub level_up_speed_bonus: f32,

    // ── Weapons ──────────────────────────────────────────────────────────────
    pub min_weapon_cooldown_ms: f32,

    // ── Enemies ──────────────────────────────────────────────────────────────
    pub enemy_radius: f32,
    pub knockback_duration: f32,
    pub knockback_cooldown: f32,
    pub enemy_base_health: f32,
    pub enemy_health_per_difficulty: f32,
    pub enemy_damage_per_difficulty: f32,

    // ── Spawning & Difficulty ────────────────────────────────────────────────
    pub spawn_interval_secs: f32,
    pub spawn_radius: f32,
    pub spawn_base_count: f32,
    pub spawn_count_per_difficulty: f32,
    pub initial_enemy_count: u32,
    pub difficulty_interval_secs: f32,

    // ── Pickups ──────────────────────────────────────────────────────────────
    pub xp_pickup_value: u32,
    pub xp_pickup_radius: f32,
    pub xp_pickup_lifetime_secs: f32,
    pub xp_pickup_magnet_radius: f32,
    pub xp_pickup_magnet_strength: f32,
    pub xp_pickup_scatter_speed: f32,
    pub xp_pickup_drag: f32,

    // ── Broad phase ──────────────────────────────────────────────────────────
    pub grid_cell_size: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            // World Bounds
            world_width: WORLD_WIDTH,
            world_height: WORLD_HEIGHT,
            // Player
            player_radius: PLAYER_RADIUS,
            invincibility_duration: INVINCIBILITY_DURATION,
            player_start_xp_to_next: PLAYER_START_XP_TO_NEXT,
            level_up_max_health_bonus: LEVEL_UP_MAX_HEALTH_BONUS,
            level_up_speed_bonus: LEVEL_UP_SPEED_BONUS,
            // Weapons
            min_weapon_cooldown_ms: MIN_WEAPON_COOLDOWN_MS,
            // Enemies
            enemy_radius: ENEMY_RADIUS,
            knockback_duration: KNOCKBACK_DURATION,
            knockback_cooldown: KNOCKBACK_COOLDOWN,
            enemy_base_health: ENEMY_BASE_HEALTH,
            enemy_health_per_difficulty: ENEMY_HEALTH_PER_DIFFICULTY,
            enemy_damage_per_difficulty: ENEMY_DAMAGE_PER_DIFFICULTY,
            // Spawning & Difficulty
            spawn_interval_secs: SPAWN_INTERVAL_SECS,
            spawn_radius: SPAWN_RADIUS,
            spawn_base_count: SPAWN_BASE_COUNT,
            spawn_count_per_difficulty: SPAWN_COUNT_PER_DIFFICULTY,
            initial_enemy_count: INITIAL_ENEMY_COUNT,
            difficulty_interval_secs: DIFFICULTY_INTERVAL_SECS,
            // Pickups
            xp_pickup_value: XP_PICKUP_VALUE,
            xp_pickup_radius: XP_PICKUP_RADIUS,
            xp_pickup_lifetime_secs: XP_PICKUP_LIFETIME_SECS,
            xp_pickup_magnet_radius: XP_PICKUP_MAGNET_RADIUS,
            xp_pickup_magnet_strength: XP_PICKUP_MAGNET_STRENGTH,
            xp_pickup_scatter_speed: XP_PICKUP_SCATTER_SPEED,
            xp_pickup_drag: XP_PICKUP_DRAG,
            // Broad phase
            grid_cell_size: GRID_CELL_SIZE,
        }
    }
}

impl SimConfig {
    pub fn world_bounds(&self) -> WorldBounds {
        WorldBounds::centered(self.world_width, self.world_height)
    }

    /// Parse a config from TOML text. Missing keys keep their defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<SimConfig>(contents)
    }
}

/// Load `path`, falling back to defaults when it is missing or malformed.
///
/// A missing file is not an error (defaults are the intended baseline); a
/// parse error is logged and ignored so the run still starts.
pub fn load_sim_config(path: impl AsRef<Path>) -> SimConfig {
    let path = path.as_ref();
    match std::fs::read_to_string(path) {
        Ok(contents) => match SimConfig::from_toml_str(&contents) {
            Ok(loaded) => {
                info!("Loaded simulation config from {}", path.display());
                loaded
            }
            Err(e) => {
                warn!("Failed to parse {}: {e}; using defaults", path.display());
                SimConfig::default()
            }
        },
        Err(_) => {
            info!("No {} found; using compiled defaults", path.display());
            SimConfig::default()
        }
    }
}

/// Startup system: replace the `SimConfig` resource with the on-disk values.
pub fn load_sim_config_system(mut config: ResMut<SimConfig>) {
    *config = load_sim_config(SIM_CONFIG_PATH);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let cfg = SimConfig::from_toml_str("spawn_radius = 900.0\ninitial_enemy_count = 0\n")
            .expect("valid toml");
        assert_eq!(cfg.spawn_radius, 900.0);
        assert_eq!(cfg.initial_enemy_count, 0);
        assert_eq!(cfg.difficulty_interval_secs, DIFFICULTY_INTERVAL_SECS);
        assert_eq!(cfg.player_radius, PLAYER_RADIUS);
    }

    #[test]
    fn malformed_toml_is_rejected() {
        assert!(SimConfig::from_toml_str("spawn_radius = \"far\"").is_err());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let cfg = load_sim_config("definitely/not/here/survival.toml");
        assert_eq!(cfg.world_width, WORLD_WIDTH);
    }

    #[test]
    fn world_bounds_follow_dimensions() {
        let cfg = SimConfig {
            world_width: 100.0,
            world_height: 60.0,
            ..Default::default()
        };
        let bounds = cfg.world_bounds();
        assert_eq!(bounds.max, Vec2::new(50.0, 30.0));
        assert_eq!(bounds.min, Vec2::new(-50.0, -30.0));
    }

    #[test]
    fn shipped_config_matches_defaults() {
        let cfg = SimConfig::from_toml_str(include_str!("../assets/survival.toml"))
            .expect("shipped config parses");
        let defaults = SimConfig::default();
        assert_eq!(cfg.initial_enemy_count, defaults.initial_enemy_count);
        assert_eq!(cfg.spawn_radius, defaults.spawn_radius);
        assert_eq!(cfg.difficulty_interval_secs, defaults.difficulty_interval_secs);
        assert_eq!(cfg.xp_pickup_value, defaults.xp_pickup_value);
        assert_eq!(cfg.grid_cell_size, defaults.grid_cell_size);
    }
}
