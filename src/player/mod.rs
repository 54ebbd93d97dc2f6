//! Player module: character data, weapon slots and movement.
//!
//! ## Sub-module layout
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`state`] | `Player`, `WeaponSlot`, `CharacterKind` profiles, `Facing` |
//! | [`control`] | `MoveInput`, input → velocity/facing, per-tick movement |
//!
//! All public items are re-exported at this level so the rest of the crate
//! can use flat `crate::player::*` imports.

pub mod control;
pub mod state;

pub use control::MoveInput;
pub use state::{
    CharacterKind, CharacterProfile, Facing, Player, WeaponGrant, WeaponSlot,
};
