//! Static weapon configuration and per-level stat resolution.
//!
//! The table is keyed by [`WeaponKind`]; [`WeaponConfigTable::resolve`] turns a
//! `{kind, level}` pair into the concrete [`WeaponStats`] used when a weapon
//! instance is created. Data can be supplied as TOML (`assets/weapons.toml`):
//!
//! ```toml
//! [knife]
//! type = "projectile"
//! damage = 20.0
//! damage_per_level = 5.0
//! cooldown_ms = 500.0
//! speed = 300.0
//! destroy_on_hit = true
//! lifespan_ms = 2000.0
//! targeting = "movement"
//! ```
//!
//! A missing or malformed file never blocks a run: callers use
//! [`WeaponConfigTable::load_or_default`], which falls back to the built-in
//! table covering every [`WeaponKind`].

use crate::constants::WEAPON_DEFAULT_RADIUS;
use crate::error::{require_non_negative, require_positive, SimError, SimResult};
use bevy::prelude::*;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Default location of the weapon data file.
pub const WEAPON_TABLE_PATH: &str = "assets/weapons.toml";

/// Lifespan used by projectile entries that do not configure one (ms).
const DEFAULT_LIFESPAN_MS: f32 = 5000.0;

/// Every weapon the simulation knows how to fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WeaponKind {
    Knife,
    Axe,
    Magic,
    Shield,
    Whip,
    Arrow,
}

impl WeaponKind {
    pub const ALL: [WeaponKind; 6] = [
        WeaponKind::Knife,
        WeaponKind::Axe,
        WeaponKind::Magic,
        WeaponKind::Shield,
        WeaponKind::Whip,
        WeaponKind::Arrow,
    ];

    #[inline]
    pub fn name(self) -> &'static str {
        match self {
            WeaponKind::Knife => "knife",
            WeaponKind::Axe => "axe",
            WeaponKind::Magic => "magic",
            WeaponKind::Shield => "shield",
            WeaponKind::Whip => "whip",
            WeaponKind::Arrow => "arrow",
        }
    }
}

impl fmt::Display for WeaponKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WeaponKind {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        WeaponKind::ALL
            .into_iter()
            .find(|kind| kind.name() == lowered)
            .ok_or(SimError::UnknownWeaponKind { name: s.to_string() })
    }
}

/// How a weapon picks the angle it fires at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetingMode {
    /// Toward the closest live enemy.
    #[default]
    Nearest,
    /// Horizontally, toward the side the player faces.
    Facing,
    /// Along the last nonzero movement direction.
    Movement,
    /// Uniformly random.
    Random,
}

/// Motion model of the instances a weapon creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MotionKind {
    /// Straight-line flight with a lifespan.
    #[default]
    Projectile,
    /// Circles the player at a fixed distance.
    Orbit,
}

/// Immutable per-kind weapon data, as authored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WeaponConfig {
    #[serde(rename = "type")]
    pub motion: MotionKind,
    pub damage: f32,
    pub damage_per_level: f32,
    #[serde(alias = "cooldown")]
    pub cooldown_ms: f32,
    /// Fraction removed from a slot's cooldown on every upgrade of this weapon.
    pub cooldown_reduction_per_level: f32,
    pub speed: f32,
    pub destroy_on_hit: bool,
    #[serde(alias = "lifespan")]
    pub lifespan_ms: f32,
    pub targeting: TargetingMode,
    pub radius: f32,
    /// Knockback impulse speed (u/s); zero disables knockback.
    pub knockback: f32,
    pub orbit_distance: f32,
    /// Ring rotation speed at level 0 (rad/s).
    pub orbit_speed: f32,
    pub orbit_speed_per_level: f32,
    pub base_count: f32,
    pub count_per_level: f32,
}

impl Default for WeaponConfig {
    fn default() -> Self {
        Self {
            motion: MotionKind::Projectile,
            damage: 10.0,
            damage_per_level: 0.0,
            cooldown_ms: 1000.0,
            cooldown_reduction_per_level: 0.1,
            speed: 200.0,
            destroy_on_hit: true,
            lifespan_ms: DEFAULT_LIFESPAN_MS,
            targeting: TargetingMode::Nearest,
            radius: WEAPON_DEFAULT_RADIUS,
            knockback: 0.0,
            orbit_distance: 100.0,
            orbit_speed: 3.0,
            orbit_speed_per_level: 0.0,
            base_count: 1.0,
            count_per_level: 0.0,
        }
    }
}

impl WeaponConfig {
    /// `damage + (level - 1) * damage_per_level`, never below zero.
    pub fn damage_at(&self, level: u32) -> f32 {
        let steps = level.saturating_sub(1) as f32;
        (self.damage + steps * self.damage_per_level).max(0.0)
    }

    /// Orbit instance cap: `floor(base_count + floor(level / 2) * count_per_level)`.
    pub fn orbit_count_at(&self, level: u32) -> usize {
        let pairs = (level / 2) as f32;
        (self.base_count + pairs * self.count_per_level).floor().max(0.0) as usize
    }

    /// Ring angular speed at `level` (rad/s).
    pub fn orbit_speed_at(&self, level: u32) -> f32 {
        self.orbit_speed + level as f32 * self.orbit_speed_per_level
    }

    /// Multiplier applied to a slot's cooldown when it is upgraded.
    pub fn upgrade_cooldown_factor(&self) -> f32 {
        (1.0 - self.cooldown_reduction_per_level).clamp(0.0, 1.0)
    }

    /// Reject entries that would break the simulation's invariants.
    pub fn validate(&self, kind: &str) -> SimResult<()> {
        require_non_negative(kind, "damage", self.damage)?;
        require_positive(kind, "cooldown_ms", self.cooldown_ms)?;
        require_positive(kind, "radius", self.radius)?;
        require_non_negative(kind, "knockback", self.knockback)?;
        if !(0.0..1.0).contains(&self.cooldown_reduction_per_level) {
            return Err(SimError::InvalidWeaponConfig {
                kind: kind.to_string(),
                reason: format!(
                    "cooldown_reduction_per_level must be in [0, 1) (got {})",
                    self.cooldown_reduction_per_level
                ),
            });
        }
        match self.motion {
            MotionKind::Projectile => {
                require_positive(kind, "speed", self.speed)?;
                require_positive(kind, "lifespan_ms", self.lifespan_ms)?;
            }
            MotionKind::Orbit => {
                require_positive(kind, "orbit_distance", self.orbit_distance)?;
                require_positive(kind, "base_count", self.base_count)?;
                require_non_negative(kind, "count_per_level", self.count_per_level)?;
            }
        }
        Ok(())
    }
}

/// Concrete stats of a weapon at a given level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponStats {
    pub kind: WeaponKind,
    pub level: u32,
    pub motion: MotionKind,
    pub damage: f32,
    pub speed: f32,
    pub targeting: TargetingMode,
    pub destroy_on_hit: bool,
    pub lifespan_ms: f32,
    pub radius: f32,
    pub knockback: f32,
    pub orbit_distance: f32,
    pub orbit_speed: f32,
    pub orbit_count: usize,
}

/// Weapon data for every configured kind.
#[derive(Resource, Debug, Clone)]
pub struct WeaponConfigTable {
    entries: HashMap<WeaponKind, WeaponConfig>,
}

impl WeaponConfigTable {
    /// A table with no entries; every fire request will be skipped.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn get(&self, kind: WeaponKind) -> Option<&WeaponConfig> {
        self.entries.get(&kind)
    }

    pub fn contains(&self, kind: WeaponKind) -> bool {
        self.entries.contains_key(&kind)
    }

    pub fn insert(&mut self, kind: WeaponKind, config: WeaponConfig) {
        self.entries.insert(kind, config);
    }

    pub fn remove(&mut self, kind: WeaponKind) -> Option<WeaponConfig> {
        self.entries.remove(&kind)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve `{kind, level}` into concrete stats. `None` when `kind` is not
    /// configured.
    pub fn resolve(&self, kind: WeaponKind, level: u32) -> Option<WeaponStats> {
        let cfg = self.entries.get(&kind)?;
        let level = level.max(1);
        Some(WeaponStats {
            kind,
            level,
            motion: cfg.motion,
            damage: cfg.damage_at(level),
            speed: cfg.speed,
            targeting: cfg.targeting,
            destroy_on_hit: cfg.destroy_on_hit,
            lifespan_ms: cfg.lifespan_ms,
            radius: cfg.radius,
            knockback: cfg.knockback,
            orbit_distance: cfg.orbit_distance,
            orbit_speed: cfg.orbit_speed_at(level),
            orbit_count: cfg.orbit_count_at(level),
        })
    }

    /// Parse TOML weapon data. Unknown kinds and invalid entries are logged
    /// and skipped; a file with no usable entry is an error.
    pub fn from_toml_str(contents: &str, origin: &str) -> SimResult<Self> {
        let raw: HashMap<String, WeaponConfig> =
            toml::from_str(contents).map_err(|e| SimError::DataFileMalformed {
                path: origin.to_string(),
                reason: e.to_string(),
            })?;

        let mut table = Self::empty();
        for (name, config) in raw {
            let kind = match name.parse::<WeaponKind>() {
                Ok(kind) => kind,
                Err(err) => {
                    warn!("{origin}: {err}; entry ignored");
                    continue;
                }
            };
            if let Err(err) = config.validate(kind.name()) {
                warn!("{origin}: {err}; entry ignored");
                continue;
            }
            table.insert(kind, config);
        }

        if table.is_empty() {
            return Err(SimError::EmptyWeaponTable {
                path: origin.to_string(),
            });
        }

        for kind in WeaponKind::ALL {
            if !table.contains(kind) {
                warn!("{origin}: no entry for '{kind}'; slots of that kind will not fire");
            }
        }
        Ok(table)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> SimResult<Self> {
        let path = path.as_ref();
        let origin = path.display().to_string();
        let contents =
            std::fs::read_to_string(path).map_err(|e| SimError::DataFileUnreadable {
                path: origin.clone(),
                reason: e.to_string(),
            })?;
        Self::from_toml_str(&contents, &origin)
    }

    /// Load `path`, substituting the built-in table on any failure.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load_from_path(path) {
            Ok(table) => {
                info!("Weapon data loaded: {} kinds", table.len());
                table
            }
            Err(err) => {
                warn!("{err}; using built-in weapon table");
                Self::default()
            }
        }
    }
}

impl Default for WeaponConfigTable {
    /// Built-in table covering every [`WeaponKind`].
    fn default() -> Self {
        let mut table = Self::empty();
        table.insert(
            WeaponKind::Knife,
            WeaponConfig {
                damage: 20.0,
                damage_per_level: 5.0,
                cooldown_ms: 500.0,
                speed: 300.0,
                lifespan_ms: 2000.0,
                targeting: TargetingMode::Movement,
                radius: 8.0,
                ..Default::default()
            },
        );
        table.insert(
            WeaponKind::Axe,
            WeaponConfig {
                motion: MotionKind::Orbit,
                damage: 30.0,
                damage_per_level: 8.0,
                cooldown_ms: 1000.0,
                speed: 0.0,
                destroy_on_hit: false,
                radius: 16.0,
                orbit_distance: 100.0,
                orbit_speed: 3.0,
                orbit_speed_per_level: 0.6,
                base_count: 1.0,
                count_per_level: 1.0,
                ..Default::default()
            },
        );
        table.insert(
            WeaponKind::Magic,
            WeaponConfig {
                damage: 25.0,
                damage_per_level: 7.0,
                cooldown_ms: 1500.0,
                speed: 200.0,
                targeting: TargetingMode::Nearest,
                radius: 10.0,
                ..Default::default()
            },
        );
        table.insert(
            WeaponKind::Shield,
            WeaponConfig {
                motion: MotionKind::Orbit,
                damage: 30.0,
                damage_per_level: 8.0,
                cooldown_ms: 1000.0,
                speed: 0.0,
                destroy_on_hit: false,
                radius: 20.0,
                knockback: 200.0,
                orbit_distance: 80.0,
                orbit_speed: 3.0,
                orbit_speed_per_level: 1.2,
                base_count: 1.0,
                count_per_level: 0.5,
                ..Default::default()
            },
        );
        table.insert(
            WeaponKind::Whip,
            WeaponConfig {
                damage: 25.0,
                damage_per_level: 7.0,
                cooldown_ms: 1000.0,
                speed: 200.0,
                targeting: TargetingMode::Facing,
                radius: 14.0,
                ..Default::default()
            },
        );
        table.insert(
            WeaponKind::Arrow,
            WeaponConfig {
                damage: 15.0,
                damage_per_level: 5.0,
                cooldown_ms: 1000.0,
                speed: 350.0,
                lifespan_ms: 2000.0,
                targeting: TargetingMode::Nearest,
                radius: 6.0,
                ..Default::default()
            },
        );
        table
    }
}
