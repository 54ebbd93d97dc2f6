//! Headless scripted runs, selected with `SURVIVAL_TEST=<scenario>`.
//!
//! | Scenario | Setup |
//! |----------|-------|
//! | `autopilot` | default run; the player kites away from the nearest enemy |
//! | `idle` | default run; the player never moves |
//! | `arsenal` | the player starts with every weapon kind |
//! | `crowd` | a ring of 40 enemies closes in at start |
//!
//! Runs use a fixed 1/60 s step and stop after `SURVIVAL_RUN_SECS` simulated
//! seconds (default 60) or at game over, printing a summary.
//! `SURVIVAL_SEED`, `SURVIVAL_CHARACTER` and `SURVIVAL_CHAPTER` pick the run.

use crate::campaign::{Chapter, RunSettings};
use crate::enemy::EnemyKind;
use crate::player::{MoveInput, WeaponSlot};
use crate::plugin::{
    apply_move_input_system, setup_simulation_system, ActiveSimulation, GameState,
    PlayerMoveInput,
};
use crate::simulation::Simulation;
use crate::weapon::{TargetingResolver, WeaponKind};
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use std::env;
use std::time::Duration;

pub const TEST_ENV: &str = "SURVIVAL_TEST";
const DEFAULT_RUN_SECS: f64 = 60.0;
/// Enemies closer than this make the autopilot flee instead of circle.
const AUTOPILOT_FLEE_RADIUS: f32 = 200.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestScenario {
    Autopilot,
    Idle,
    Arsenal,
    Crowd,
}

impl TestScenario {
    pub fn from_name(name: &str) -> Self {
        match name {
            "idle" => TestScenario::Idle,
            "arsenal" => TestScenario::Arsenal,
            "crowd" => TestScenario::Crowd,
            "autopilot" => TestScenario::Autopilot,
            other => {
                warn!("Unknown test scenario '{other}'; running autopilot");
                TestScenario::Autopilot
            }
        }
    }
}

/// Test harness settings.
#[derive(Resource, Debug, Clone)]
pub struct TestConfig {
    pub scenario: TestScenario,
    /// Simulated seconds before the run is stopped.
    pub run_secs: f64,
    pub finished: bool,
}

/// Run settings from `SURVIVAL_SEED`, `SURVIVAL_CHARACTER` and
/// `SURVIVAL_CHAPTER`. Invalid values are reported and replaced by defaults.
pub fn settings_from_env() -> RunSettings {
    let mut settings = RunSettings::default();
    if let Ok(raw) = env::var("SURVIVAL_SEED") {
        match raw.parse::<u64>() {
            Ok(seed) => settings.seed = seed,
            Err(e) => warn!("SURVIVAL_SEED='{raw}' ignored: {e}"),
        }
    }
    if let Ok(raw) = env::var("SURVIVAL_CHARACTER") {
        match raw.parse() {
            Ok(character) => settings.character = character,
            Err(e) => warn!("{e}; keeping {}", settings.character),
        }
    }
    if let Ok(raw) = env::var("SURVIVAL_CHAPTER") {
        match raw.parse::<u32>().map(Chapter::from_number) {
            Ok(Ok(chapter)) => settings.chapter = chapter,
            Ok(Err(e)) => warn!("{e}; keeping chapter 1"),
            Err(e) => warn!("SURVIVAL_CHAPTER='{raw}' ignored: {e}"),
        }
    }
    settings
}

fn run_secs_from_env() -> f64 {
    env::var("SURVIVAL_RUN_SECS")
        .ok()
        .and_then(|raw| raw.parse::<f64>().ok())
        .filter(|secs| *secs > 0.0)
        .unwrap_or(DEFAULT_RUN_SECS)
}

pub fn configure_test_mode(app: &mut App, test_name: &str) {
    let scenario = TestScenario::from_name(test_name);
    app.insert_resource(TestConfig {
        scenario,
        run_secs: run_secs_from_env(),
        finished: false,
    })
    .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
        1.0 / 60.0,
    )))
    .add_systems(
        Startup,
        prepare_scenario_system.after(setup_simulation_system),
    )
    .add_systems(
        Update,
        autopilot_system
            .before(apply_move_input_system)
            .run_if(in_state(GameState::Playing)),
    )
    .add_systems(PostUpdate, test_verification_system);

    println!("Running test: {}", test_name);
}

fn prepare_scenario_system(config: Res<TestConfig>, sim: Option<ResMut<ActiveSimulation>>) {
    let Some(mut sim) = sim else {
        return;
    };
    match config.scenario {
        TestScenario::Arsenal => {
            let grants = arsenal_grants(&sim.0);
            sim.0.player_mut().weapons.extend(grants);
        }
        TestScenario::Crowd => {
            let center = sim.0.player().position;
            for i in 0..40 {
                let angle = i as f32 / 40.0 * std::f32::consts::TAU;
                let kind = EnemyKind::ALL[i % EnemyKind::ALL.len()];
                sim.0
                    .spawn_enemy_at(kind, center + Vec2::from_angle(angle) * 350.0);
            }
        }
        TestScenario::Autopilot | TestScenario::Idle => {}
    }
}

/// A slot for every configured weapon kind the player does not own yet, at
/// the table's base cooldown.
fn arsenal_grants(sim: &Simulation) -> Vec<WeaponSlot> {
    WeaponKind::ALL
        .into_iter()
        .filter(|kind| !sim.player().has_weapon(*kind))
        .filter_map(|kind| {
            let cfg = sim.weapon_table().get(kind)?;
            Some(WeaponSlot::new(kind, cfg.cooldown_ms))
        })
        .collect()
}

/// Flee the nearest enemy when it is close, otherwise circle slowly.
fn autopilot_system(
    config: Res<TestConfig>,
    sim: Option<Res<ActiveSimulation>>,
    mut input: ResMut<PlayerMoveInput>,
) {
    let Some(sim) = sim else {
        return;
    };
    if config.scenario == TestScenario::Idle {
        input.0 = MoveInput::default();
        return;
    }
    let player = sim.0.player();
    let dir = match TargetingResolver::nearest(player.position, sim.0.enemies()) {
        Some(enemy) if enemy.position.distance(player.position) < AUTOPILOT_FLEE_RADIUS => {
            (player.position - enemy.position).normalize_or_zero()
        }
        _ => Vec2::from_angle(sim.0.elapsed_secs() as f32 * 0.5),
    };
    input.0 = MoveInput::new(dir.x, dir.y);
}

/// Stop after the configured duration or at game over and print a summary.
fn test_verification_system(
    mut config: ResMut<TestConfig>,
    sim: Option<Res<ActiveSimulation>>,
    state: Res<State<GameState>>,
    mut exit: MessageWriter<AppExit>,
) {
    let Some(sim) = sim else {
        return;
    };
    if config.finished {
        return;
    }
    let sim = &sim.0;
    let game_over = *state.get() == GameState::GameOver;
    if !game_over && sim.elapsed_secs() < config.run_secs {
        return;
    }
    config.finished = true;

    let player = sim.player();
    println!("\n╔════════════════════════════════════════════╗");
    println!("║           TEST COMPLETE                    ║");
    println!("╚════════════════════════════════════════════╝");
    println!("Scenario:   {:?}", config.scenario);
    println!("Run:        {:?}", sim.settings());
    println!("Simulated:  {:.1}s", sim.elapsed_secs());
    println!("Outcome:    {}", if game_over { "game over" } else { "survived" });
    println!("Difficulty: {}", sim.difficulty());
    println!("Kills:      {}", sim.kills());
    println!(
        "Player:     level {} | hp {:.0}/{:.0} | xp {}/{}",
        player.level, player.health, player.max_health, player.xp, player.xp_to_next_level
    );
    for slot in &player.weapons {
        println!(
            "  {:<7} level {:>2} cooldown {:>6.1} ms",
            slot.kind.name(),
            slot.level,
            slot.cooldown_ms
        );
    }
    println!(
        "Live: {} enemies, {} weapon instances, {} pickups",
        sim.enemies().len(),
        sim.weapons().len(),
        sim.pickups().len()
    );

    exit.write(AppExit::Success);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_names_resolve() {
        assert_eq!(TestScenario::from_name("crowd"), TestScenario::Crowd);
        assert_eq!(TestScenario::from_name("idle"), TestScenario::Idle);
        assert_eq!(TestScenario::from_name("nope"), TestScenario::Autopilot);
    }

    #[test]
    fn arsenal_adds_missing_kinds_at_table_cooldowns() {
        let sim = Simulation::with_defaults(RunSettings::default());
        let grants = arsenal_grants(&sim);
        assert_eq!(grants.len(), WeaponKind::ALL.len() - 1);
        assert!(grants.iter().all(|slot| slot.kind != WeaponKind::Knife));
        let magic = grants
            .iter()
            .find(|slot| slot.kind == WeaponKind::Magic)
            .unwrap();
        assert_eq!(magic.cooldown_ms, 1500.0);
        assert!(magic.is_ready());
    }
}
