//! Survival-combat simulation core
//!
//! A tick-driven top-down arena: the player moves, weapons fire on their own
//! cooldowns, enemies chase and hit back, kills drop XP, and levels grow the
//! arsenal. The core is plain Rust driven through [`Simulation::update`];
//! [`plugin::SurvivalPlugin`] hosts it inside a headless Bevy app.

pub mod campaign;
pub mod collision;
pub mod config;
pub mod constants;
pub mod difficulty;
pub mod enemy;
pub mod error;
pub mod events;
pub mod pickup;
pub mod player;
pub mod plugin;
pub mod progression;
pub mod rng;
pub mod simulation;
pub mod spatial_partition;
pub mod spawn;
pub mod test_mode;
pub mod weapon;
pub mod world;

pub use error::{SimError, SimResult};
pub use events::{EventBus, GameEvent};
pub use simulation::{SimPhase, Simulation, Updatable};
