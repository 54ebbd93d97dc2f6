//! Bevy host for the simulation core.
//!
//! The core is plain Rust; this plugin owns one [`Simulation`] as a resource,
//! ticks it from [`Time`] while [`GameState::Playing`], and republishes every
//! [`GameEvent`] it emits as a [`SimEventMessage`] so other systems (a UI, the
//! headless test harness) can react without touching the core.
//!
//! ## Schedule
//!
//! | Schedule | Systems |
//! |----------|---------|
//! | `Startup` | [`load_sim_config_system`] (file-backed runs only) → [`setup_simulation_system`] |
//! | `Update` (Playing) | [`apply_move_input_system`] → [`tick_simulation_system`] |
//! | `Update` (always) | [`publish_sim_events_system`] → [`log_sim_events_system`] |
//! | `OnEnter(Paused)` / `OnExit(Paused)` | pause / resume the core |
//!
//! A `game-over` event moves the state machine to [`GameState::GameOver`].

use crate::campaign::RunSettings;
use crate::config::{load_sim_config_system, SimConfig};
use crate::events::{EventBus, GameEvent};
use crate::player::MoveInput;
use crate::rng::SeededRng;
use crate::simulation::Simulation;
use crate::weapon::{WeaponConfigTable, WEAPON_TABLE_PATH};
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;

/// Top-level run state.
#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GameState {
    #[default]
    Playing,
    Paused,
    GameOver,
}

/// The running simulation.
#[derive(Resource, Debug)]
pub struct ActiveSimulation(pub Simulation);

/// Event bus shared by the simulation and any in-process observers.
#[derive(Resource, Debug, Default)]
pub struct SimEventBus(pub EventBus);

/// Movement input for the next tick; written by input or autopilot systems.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct PlayerMoveInput(pub MoveInput);

/// A core event, republished into the ECS.
#[derive(Message, Debug, Clone, PartialEq)]
pub struct SimEventMessage(pub GameEvent);

/// Whether config and weapon data come from `assets/` or compiled defaults.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataSource {
    pub load_files: bool,
}

pub struct SurvivalPlugin {
    pub settings: RunSettings,
    /// Read `assets/survival.toml` and `assets/weapons.toml` at startup.
    pub load_files: bool,
}

impl SurvivalPlugin {
    pub fn new(settings: RunSettings) -> Self {
        Self {
            settings,
            load_files: true,
        }
    }

    /// Compiled defaults only; no file access. Used by tests.
    pub fn headless(settings: RunSettings) -> Self {
        Self {
            settings,
            load_files: false,
        }
    }
}

impl Plugin for SurvivalPlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<StatesPlugin>() {
            app.add_plugins(StatesPlugin);
        }

        app.init_state::<GameState>()
            .init_resource::<SimConfig>()
            .init_resource::<SimEventBus>()
            .init_resource::<PlayerMoveInput>()
            .insert_resource(self.settings)
            .insert_resource(DataSource {
                load_files: self.load_files,
            })
            .add_message::<SimEventMessage>();

        if self.load_files {
            app.add_systems(
                Startup,
                (load_sim_config_system, setup_simulation_system).chain(),
            );
        } else {
            app.add_systems(Startup, setup_simulation_system);
        }

        app.add_systems(
            Update,
            (apply_move_input_system, tick_simulation_system)
                .chain()
                .run_if(in_state(GameState::Playing)),
        )
        .add_systems(
            Update,
            (publish_sim_events_system, log_sim_events_system)
                .chain()
                .after(tick_simulation_system),
        )
        .add_systems(OnEnter(GameState::Paused), pause_simulation_system)
        .add_systems(OnExit(GameState::Paused), resume_simulation_system);
    }
}

/// Build the simulation from the final config and insert it.
pub fn setup_simulation_system(
    mut commands: Commands,
    settings: Res<RunSettings>,
    config: Res<SimConfig>,
    source: Res<DataSource>,
) {
    let table = if source.load_files {
        WeaponConfigTable::load_or_default(WEAPON_TABLE_PATH)
    } else {
        WeaponConfigTable::default()
    };
    let rng = Box::new(SeededRng::new(settings.seed));
    let sim = Simulation::new(*settings, config.clone(), table, rng);
    info!("Simulation ready (seed {})", settings.seed);
    commands.insert_resource(ActiveSimulation(sim));
}

pub fn apply_move_input_system(
    input: Res<PlayerMoveInput>,
    sim: Option<ResMut<ActiveSimulation>>,
) {
    let Some(mut sim) = sim else {
        return;
    };
    sim.0.set_input(input.0);
}

pub fn tick_simulation_system(
    time: Res<Time>,
    sim: Option<ResMut<ActiveSimulation>>,
    mut bus: ResMut<SimEventBus>,
) {
    let Some(mut sim) = sim else {
        return;
    };
    sim.0.update(time.delta_secs(), &mut bus.0);
}

/// Drain the core bus into ECS messages; follow `game-over` into the
/// [`GameState::GameOver`] state.
pub fn publish_sim_events_system(
    mut bus: ResMut<SimEventBus>,
    mut writer: MessageWriter<SimEventMessage>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    for event in bus.0.drain() {
        if event == GameEvent::GameOver {
            next_state.set(GameState::GameOver);
        }
        writer.write(SimEventMessage(event));
    }
}

pub fn log_sim_events_system(mut reader: MessageReader<SimEventMessage>) {
    for SimEventMessage(event) in reader.read() {
        match event {
            GameEvent::LevelChanged(level) => info!("Level {level}"),
            GameEvent::GameOver => info!("Game over"),
            GameEvent::SceneChanged(scene) => info!("Scene: {scene}"),
            GameEvent::EnemyKilled { kind, position } => {
                debug!("{} killed at ({:.0}, {:.0})", kind.name(), position.x, position.y)
            }
            _ => {}
        }
    }
}

fn pause_simulation_system(sim: Option<ResMut<ActiveSimulation>>, mut bus: ResMut<SimEventBus>) {
    if let Some(mut sim) = sim {
        sim.0.pause(&mut bus.0);
    }
}

fn resume_simulation_system(sim: Option<ResMut<ActiveSimulation>>, mut bus: ResMut<SimEventBus>) {
    if let Some(mut sim) = sim {
        sim.0.resume(&mut bus.0);
    }
}
