//! Centralised simulation and gameplay constants.
//!
//! All tuneable values live here so they can be found, reasoned-about, and
//! modified in one place without source-diving across multiple modules.
//! [`crate::config::SimConfig`] mirrors most of them as runtime-overridable
//! fields; the values below remain the **authoritative defaults**.
//!
//! ## Units
//!
//! Distances are world units (1 u ≈ 1 px in the reference presentation).
//! Weapon timings are milliseconds, every other timer is seconds.

use crate::weapon::WeaponKind;

// ── World Bounds ──────────────────────────────────────────────────────────────

/// Width of the playable world, centred on the origin (world units).
///
/// Flying weapon instances that leave the world are destroyed; the player and
/// spawn positions are clamped inside it.
pub const WORLD_WIDTH: f32 = 4000.0;

/// Height of the playable world, centred on the origin (world units).
pub const WORLD_HEIGHT: f32 = 4000.0;

// ── Player ────────────────────────────────────────────────────────────────────

/// Collision radius of the player body.
pub const PLAYER_RADIUS: f32 = 16.0;

/// Seconds of contact-damage immunity after the player is hit.
///
/// A single sustained overlap with an enemy therefore costs at most one hit
/// per second instead of one hit per frame.
pub const INVINCIBILITY_DURATION: f32 = 1.0;

/// XP required for the first level-up.
pub const PLAYER_START_XP_TO_NEXT: u32 = 100;

/// `xp_to_next_level` grows by `1 / XP_GROWTH_DIVISOR` of itself (floored) on
/// every level-up, i.e. `floor(n × 1.5)`.
pub const XP_GROWTH_DIVISOR: u32 = 2;

/// Max-health gained per level-up; health is refilled to the new maximum.
pub const LEVEL_UP_MAX_HEALTH_BONUS: f32 = 10.0;

/// Movement speed gained per level-up (u/s).
pub const LEVEL_UP_SPEED_BONUS: f32 = 5.0;

/// A new weapon kind is unlocked every `WEAPON_UNLOCK_LEVEL_INTERVAL` levels.
pub const WEAPON_UNLOCK_LEVEL_INTERVAL: u32 = 3;

/// Order in which missing weapon kinds are granted on unlock levels after
/// the first (which grants the character's signature weapon).
pub const WEAPON_PRIORITY: [WeaponKind; 6] = [
    WeaponKind::Knife,
    WeaponKind::Axe,
    WeaponKind::Magic,
    WeaponKind::Shield,
    WeaponKind::Whip,
    WeaponKind::Arrow,
];

// ── Weapons ───────────────────────────────────────────────────────────────────

/// Lower bound for any weapon slot cooldown after upgrades (ms).
///
/// Prevents runaway fire rates once a slot has been upgraded many times.
pub const MIN_WEAPON_COOLDOWN_MS: f32 = 100.0;

/// Default collision radius for weapon instances that do not configure one.
pub const WEAPON_DEFAULT_RADIUS: f32 = 12.0;

// ── Enemies ───────────────────────────────────────────────────────────────────

/// Collision radius of every enemy body.
pub const ENEMY_RADIUS: f32 = 14.0;

/// Seconds an enemy's seek AI is suspended after a knockback.
pub const KNOCKBACK_DURATION: f32 = 0.3;

/// Minimum seconds between two knockbacks on the same enemy.
///
/// Orbiting weapons overlap an enemy for many consecutive ticks; without this
/// window the enemy would be re-launched every frame.
pub const KNOCKBACK_COOLDOWN: f32 = 0.5;

/// Base enemy health before difficulty scaling.
pub const ENEMY_BASE_HEALTH: f32 = 50.0;

/// Extra enemy health per difficulty tier.
pub const ENEMY_HEALTH_PER_DIFFICULTY: f32 = 10.0;

/// Extra contact damage per difficulty tier above the first.
pub const ENEMY_DAMAGE_PER_DIFFICULTY: f32 = 1.0;

// ── Spawning & Difficulty ─────────────────────────────────────────────────────

/// Seconds between spawn waves.
pub const SPAWN_INTERVAL_SECS: f32 = 2.0;

/// Distance from the player at which new enemies appear.
///
/// Chosen to sit just outside the reference viewport so enemies walk in from
/// off-screen.
pub const SPAWN_RADIUS: f32 = 600.0;

/// Enemies per wave at difficulty 0 (before the floor/`max(1, …)` clamp).
pub const SPAWN_BASE_COUNT: f32 = 1.0;

/// Additional enemies per wave for each difficulty tier.
pub const SPAWN_COUNT_PER_DIFFICULTY: f32 = 0.5;

/// Enemies spawned immediately when a run starts.
pub const INITIAL_ENEMY_COUNT: u32 = 5;

/// Simulated seconds between difficulty increments.
pub const DIFFICULTY_INTERVAL_SECS: f32 = 30.0;

// ── Pickups ───────────────────────────────────────────────────────────────────

/// XP granted by a single pickup.
pub const XP_PICKUP_VALUE: u32 = 10;

/// Collection radius of an XP pickup.
pub const XP_PICKUP_RADIUS: f32 = 10.0;

/// Seconds an uncollected pickup lingers before despawning.
pub const XP_PICKUP_LIFETIME_SECS: f32 = 10.0;

/// Pickups closer than this to the player drift toward it.
///
/// Set to `0.0` in `assets/survival.toml` to disable attraction entirely.
pub const XP_PICKUP_MAGNET_RADIUS: f32 = 120.0;

/// Target drift speed of an attracted pickup (u/s).
pub const XP_PICKUP_MAGNET_STRENGTH: f32 = 180.0;

/// Initial scatter speed given to a freshly dropped pickup (u/s).
pub const XP_PICKUP_SCATTER_SPEED: f32 = 20.0;

/// Per-second velocity retention of a drifting pickup that is not attracted.
pub const XP_PICKUP_DRAG: f32 = 0.05;

// ── Broad phase ───────────────────────────────────────────────────────────────

/// Cell size of the enemy spatial grid used by the collision broad phase.
///
/// With 64 u cells a typical overlap query (weapon radius + enemy radius,
/// ≈ 30 u) scans a 3×3 block; the whole viewport holds a few hundred cells.
pub const GRID_CELL_SIZE: f32 = 64.0;
