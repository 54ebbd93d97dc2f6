//! Weapons: static data, targeting, firing and instance motion.
//!
//! ## Sub-module layout
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`table`] | `WeaponKind`, `WeaponConfig`, `WeaponConfigTable` loading and per-level resolution |
//! | [`targeting`] | `TargetingResolver`: firing angle per targeting mode |
//! | [`fire`] | `WeaponFireController`: slot cooldowns, instance creation, orbit rings |
//! | [`motion`] | `WeaponInstance` and `ProjectileMotion`: Flying / Orbiting / Destroyed |

pub mod fire;
pub mod motion;
pub mod table;
pub mod targeting;

pub use fire::{OrbitRing, WeaponFireController};
pub use motion::{Motion, MotionState, ProjectileMotion, WeaponInstance};
pub use table::{
    MotionKind, TargetingMode, WeaponConfig, WeaponConfigTable, WeaponKind, WeaponStats,
    WEAPON_TABLE_PATH,
};
pub use targeting::{AimContext, AimSolution, TargetingResolver};
