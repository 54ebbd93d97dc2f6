use bevy::app::ScheduleRunnerPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use std::env;
use std::time::Duration;
use survivors::plugin::SurvivalPlugin;
use survivors::test_mode::{self, TEST_ENV};

fn main() {
    let test_mode = env::var(TEST_ENV).ok();

    // Scripted runs step time manually, so they can run as fast as possible.
    let frame_wait = if test_mode.is_some() {
        Duration::ZERO
    } else {
        Duration::from_secs_f64(1.0 / 60.0)
    };

    let mut app = App::new();

    // No window: the core is simulation-only and any presentation layer
    // consumes `SimEventMessage`s.
    app.add_plugins((
        MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(frame_wait)),
        LogPlugin::default(),
    ));

    // Logging is up from here on, so bad env values get reported.
    let settings = test_mode::settings_from_env();
    app.add_plugins(SurvivalPlugin::new(settings));

    if let Some(test_name) = test_mode {
        test_mode::configure_test_mode(&mut app, &test_name);
    } else {
        info!("Set {TEST_ENV}=autopilot for a scripted headless run");
    }

    app.run();
}
