//! Headless tests for [`SurvivalPlugin`] and its [`GameState`] machine.
//!
//! These tests use [`MinimalPlugins`] with a manual 1/60 s clock, so they run
//! fast and deterministically in CI.
//!
//! Covered scenarios:
//! 1. Default initial state is `Playing` and the simulation is inserted at startup.
//! 2. The first frame republishes the opening events as `SimEventMessage`s.
//! 3. `Playing` → `Paused` freezes the core; `Paused` → `Playing` resumes it.
//! 4. A lethal hit moves the state machine to `GameOver`.

use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use bevy::time::TimeUpdateStrategy;
use std::time::Duration;
use survivors::campaign::RunSettings;
use survivors::enemy::EnemyKind;
use survivors::events::{SCENE_MAIN, SCENE_PAUSE};
use survivors::plugin::{
    publish_sim_events_system, ActiveSimulation, GameState, SimEventMessage, SurvivalPlugin,
};
use survivors::{GameEvent, SimPhase};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Every event republished so far, in order.
#[derive(Resource, Default)]
struct SeenEvents(Vec<GameEvent>);

fn collect_events(mut reader: MessageReader<SimEventMessage>, mut seen: ResMut<SeenEvents>) {
    for SimEventMessage(event) in reader.read() {
        seen.0.push(event.clone());
    }
}

/// Build a minimal headless app hosting one simulation with compiled defaults.
fn headless_app() -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, StatesPlugin))
        .add_plugins(SurvivalPlugin::headless(RunSettings::default()))
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
            1.0 / 60.0,
        )))
        .init_resource::<SeenEvents>()
        .add_systems(Update, collect_events.after(publish_sim_events_system));
    app
}

fn state(app: &App) -> GameState {
    *app.world().resource::<State<GameState>>().get()
}

fn sim(app: &App) -> &survivors::Simulation {
    &app.world().resource::<ActiveSimulation>().0
}

fn seen(app: &App) -> &[GameEvent] {
    &app.world().resource::<SeenEvents>().0
}

fn request(app: &mut App, next: GameState) {
    app.world_mut()
        .resource_mut::<NextState<GameState>>()
        .set(next);
}

// ── Tests ─────────────────────────────────────────────────────────────────────

/// The default variant of `GameState` is `Playing`, and startup builds the run.
#[test]
fn default_state_is_playing() {
    let mut app = headless_app();
    app.update();
    assert_eq!(state(&app), GameState::Playing);
    assert!(app.world().contains_resource::<ActiveSimulation>());
    assert_eq!(sim(&app).phase(), SimPhase::Running);
}

#[test]
fn opening_events_are_republished() {
    let mut app = headless_app();
    app.update();
    let events = seen(&app);
    assert_eq!(
        events.first(),
        Some(&GameEvent::SceneChanged(SCENE_MAIN.to_string()))
    );
    assert!(events.contains(&GameEvent::LevelChanged(1)));
    assert!(events.contains(&GameEvent::KillsChanged(0)));
}

#[test]
fn playing_advances_the_clock() {
    let mut app = headless_app();
    for _ in 0..10 {
        app.update();
    }
    assert!(sim(&app).elapsed_secs() > 0.0);
}

/// Pausing stops the core; resuming picks up from the same clock.
#[test]
fn pause_and_resume_round_trip() {
    let mut app = headless_app();
    for _ in 0..5 {
        app.update();
    }

    request(&mut app, GameState::Paused);
    app.update();
    assert_eq!(state(&app), GameState::Paused);
    assert_eq!(sim(&app).phase(), SimPhase::Paused);
    assert!(seen(&app).contains(&GameEvent::SceneChanged(SCENE_PAUSE.to_string())));

    let frozen_at = sim(&app).elapsed_secs();
    for _ in 0..5 {
        app.update();
    }
    assert_eq!(sim(&app).elapsed_secs(), frozen_at, "paused run must not tick");

    request(&mut app, GameState::Playing);
    app.update();
    assert_eq!(state(&app), GameState::Playing);
    assert_eq!(sim(&app).phase(), SimPhase::Running);
    let mains = seen(&app)
        .iter()
        .filter(|e| **e == GameEvent::SceneChanged(SCENE_MAIN.to_string()))
        .count();
    assert_eq!(mains, 2, "opening scene plus the resume");
}

/// A `game-over` event is followed into `GameState::GameOver` on the next frame.
#[test]
fn player_death_enters_game_over() {
    let mut app = headless_app();
    app.update();

    {
        let mut active = app.world_mut().resource_mut::<ActiveSimulation>();
        let position = active.0.player().position;
        active.0.player_mut().health = 1.0;
        active.0.spawn_enemy_at(EnemyKind::Demon, position);
    }

    app.update();
    assert!(sim(&app).is_game_over());
    assert!(seen(&app).contains(&GameEvent::GameOver));

    app.update();
    assert_eq!(state(&app), GameState::GameOver);
}
