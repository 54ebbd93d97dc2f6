//! Outbound notifications and the per-simulation event bus.
//!
//! The core never talks to the presentation layer directly. It emits
//! [`GameEvent`]s on an [`EventBus`] that the host constructs once per
//! simulation instance; observers subscribe to the bus, and everything emitted
//! is also queued so a host can drain it after a tick (the Bevy plugin does
//! this to republish events as messages).

use crate::enemy::EnemyKind;
use bevy::prelude::*;

/// Scene name reported when the run is active.
pub const SCENE_MAIN: &str = "MainScene";
/// Scene name reported while paused.
pub const SCENE_PAUSE: &str = "PauseScene";
/// Scene name reported once the run has ended.
pub const SCENE_GAME_OVER: &str = "GameOverScene";

/// A state change the presentation layer may want to reflect.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    HealthChanged(f32),
    LevelChanged(u32),
    XpChanged { current: u32, max: u32 },
    KillsChanged(u32),
    /// Whole seconds of simulated time elapsed in the run.
    TimeChanged(u32),
    GameOver,
    SceneChanged(String),
    EnemyKilled { kind: EnemyKind, position: Vec2 },
}

/// Receives every event emitted on the bus it is subscribed to.
pub trait SimObserver {
    fn notify(&mut self, event: &GameEvent);
}

impl<F: FnMut(&GameEvent)> SimObserver for F {
    fn notify(&mut self, event: &GameEvent) {
        self(event)
    }
}

/// Fire-and-forget dispatcher. Observers are called synchronously in
/// subscription order; nothing is acknowledged.
#[derive(Default)]
pub struct EventBus {
    observers: Vec<Box<dyn SimObserver + Send + Sync>>,
    pending: Vec<GameEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, observer: impl SimObserver + Send + Sync + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn emit(&mut self, event: GameEvent) {
        for observer in self.observers.iter_mut() {
            observer.notify(&event);
        }
        self.pending.push(event);
    }

    /// Events emitted since the last drain, oldest first.
    pub fn pending(&self) -> &[GameEvent] {
        &self.pending
    }

    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending)
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("observers", &self.observers.len())
            .field("pending", &self.pending.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn observers_see_events_in_emit_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut bus = EventBus::new();
        bus.subscribe(move |event: &GameEvent| {
            if let Ok(mut log) = sink.lock() {
                log.push(event.clone());
            }
        });

        bus.emit(GameEvent::LevelChanged(2));
        bus.emit(GameEvent::KillsChanged(1));

        let log = seen.lock().unwrap();
        assert_eq!(
            *log,
            vec![GameEvent::LevelChanged(2), GameEvent::KillsChanged(1)]
        );
    }

    #[test]
    fn drain_empties_the_queue() {
        let mut bus = EventBus::new();
        bus.emit(GameEvent::GameOver);
        assert_eq!(bus.pending().len(), 1);
        assert_eq!(bus.drain(), vec![GameEvent::GameOver]);
        assert!(bus.pending().is_empty());
    }

    #[test]
    fn separate_buses_are_independent() {
        let mut a = EventBus::new();
        let b = EventBus::new();
        a.emit(GameEvent::TimeChanged(1));
        assert!(b.pending().is_empty());
    }
}
