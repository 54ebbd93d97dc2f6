//! The tick loop.
//!
//! [`Simulation::update`] advances one run by `dt` seconds in a fixed order:
//!
//! 1. difficulty timer
//! 2. enemy waves (so new enemies take part in this tick's AI pass)
//! 3. player input → velocity / facing, then movement
//! 4. enemy seek AI and movement (knockback respected)
//! 5. weapon slots fire
//! 6. weapon instances move; pickups drift and expire
//! 7. collisions (damage, knockback, kills, drops, XP, level-ups)
//! 8. time notification
//!
//! Nothing here blocks or schedules callbacks; every timer is a field
//! decremented (or accumulated) by `dt`. Pausing simply stops `update` from
//! advancing anything.

use crate::campaign::RunSettings;
use crate::collision::CollisionResolver;
use crate::config::SimConfig;
use crate::difficulty::DifficultyScheduler;
use crate::enemy::{Enemy, EnemyKind};
use crate::events::{EventBus, GameEvent, SCENE_GAME_OVER, SCENE_MAIN, SCENE_PAUSE};
use crate::pickup::XpPickup;
use crate::player::{MoveInput, Player};
use crate::progression::ProgressionTracker;
use crate::rng::{SeededRng, SimRng};
use crate::spawn::SpawnController;
use crate::weapon::{ProjectileMotion, WeaponConfigTable, WeaponFireController, WeaponInstance};
use crate::world::{Arena, EntityId, IdAllocator, WorldBounds};
use bevy::prelude::*;

/// Anything advanced by elapsed time.
pub trait Updatable {
    fn update(&mut self, dt: f32);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimPhase {
    Running,
    Paused,
    GameOver,
}

/// One run of the survival simulation.
pub struct Simulation {
    settings: RunSettings,
    config: SimConfig,
    table: WeaponConfigTable,
    rng: Box<dyn SimRng + Send + Sync>,
    bounds: WorldBounds,
    arena: Arena,
    fire: WeaponFireController,
    collision: CollisionResolver,
    progression: ProgressionTracker,
    difficulty: DifficultyScheduler,
    spawner: SpawnController,
    phase: SimPhase,
    started: bool,
    elapsed_secs: f64,
    reported_secs: u32,
}

impl Simulation {
    pub fn new(
        settings: RunSettings,
        config: SimConfig,
        table: WeaponConfigTable,
        rng: Box<dyn SimRng + Send + Sync>,
    ) -> Self {
        let mut ids = IdAllocator::default();
        let player = Player::new(ids.allocate(), settings.character, &config);
        let bounds = config.world_bounds();
        Self {
            fire: WeaponFireController::new(),
            collision: CollisionResolver::new(config.grid_cell_size),
            progression: ProgressionTracker::new(&config),
            difficulty: DifficultyScheduler::new(
                settings.chapter.base_difficulty(),
                config.difficulty_interval_secs,
            ),
            spawner: SpawnController::new(&config),
            arena: Arena {
                player,
                enemies: Vec::new(),
                weapons: Vec::new(),
                pickups: Vec::new(),
                ids,
                kills: 0,
            },
            bounds,
            settings,
            config,
            table,
            rng,
            phase: SimPhase::Running,
            started: false,
            elapsed_secs: 0.0,
            reported_secs: 0,
        }
    }

    /// Default config and weapon table, seeded from `settings.seed`.
    pub fn with_defaults(settings: RunSettings) -> Self {
        let rng = Box::new(SeededRng::new(settings.seed));
        Self::new(settings, SimConfig::default(), WeaponConfigTable::default(), rng)
    }

    // ── Lifecycle ────────────────────────────────────────────────────────────

    /// Spawn the opening wave and publish the initial state.
    ///
    /// Called automatically by the first [`Simulation::update`]; calling it
    /// again does nothing.
    pub fn start(&mut self, bus: &mut EventBus) {
        if self.started {
            return;
        }
        self.started = true;

        let opening = self.config.initial_enemy_count;
        self.spawn_enemies(opening);
        info!(
            "Run started: {} as {}, difficulty {}, {} enemies",
            self.settings.chapter.label(),
            self.settings.character,
            self.difficulty.difficulty(),
            opening
        );

        let player = &self.arena.player;
        bus.emit(GameEvent::SceneChanged(SCENE_MAIN.to_string()));
        bus.emit(GameEvent::HealthChanged(player.health));
        bus.emit(GameEvent::LevelChanged(player.level));
        bus.emit(GameEvent::XpChanged {
            current: player.xp,
            max: player.xp_to_next_level,
        });
        bus.emit(GameEvent::KillsChanged(self.arena.kills));
        bus.emit(GameEvent::TimeChanged(0));
    }

    pub fn pause(&mut self, bus: &mut EventBus) {
        if self.phase == SimPhase::Running {
            self.phase = SimPhase::Paused;
            bus.emit(GameEvent::SceneChanged(SCENE_PAUSE.to_string()));
        }
    }

    pub fn resume(&mut self, bus: &mut EventBus) {
        if self.phase == SimPhase::Paused {
            self.phase = SimPhase::Running;
            bus.emit(GameEvent::SceneChanged(SCENE_MAIN.to_string()));
        }
    }

    /// Movement input applied from the next tick on.
    pub fn set_input(&mut self, input: MoveInput) {
        self.arena.player.input = input;
    }

    // ── Tick ─────────────────────────────────────────────────────────────────

    /// Advance the run by `dt` seconds. No-op unless running.
    pub fn update(&mut self, dt: f32, bus: &mut EventBus) {
        self.start(bus);
        if self.phase != SimPhase::Running {
            return;
        }
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.elapsed_secs += dt as f64;

        self.difficulty.tick(dt);

        let waves = self.spawner.tick(dt);
        for _ in 0..waves {
            let count = self.spawner.wave_size(self.difficulty.difficulty());
            self.spawn_enemies(count);
        }

        let player = &mut self.arena.player;
        player.apply_input();
        player.update(dt);
        player.position = self.bounds.clamp(player.position);

        let target = self.arena.player.position;
        let chase = self.arena.player.active;
        for enemy in self.arena.enemies.iter_mut() {
            if chase {
                enemy.seek(target);
            }
            enemy.update(dt);
        }

        self.fire.tick(
            dt,
            &mut self.arena.player,
            &self.arena.enemies,
            &self.table,
            self.rng.as_mut(),
            &mut self.arena.ids,
            &mut self.arena.weapons,
        );

        let anchors = self.arena.anchor_lookup();
        ProjectileMotion::advance(&mut self.arena.weapons, anchors, &self.bounds, dt);

        for pickup in self.arena.pickups.iter_mut() {
            if chase {
                pickup.attract(target, &self.config, dt);
            }
            pickup.update(dt);
        }
        self.arena.pickups.retain(|p| !p.is_expired());

        let report = self.collision.resolve(
            &mut self.arena,
            &self.config,
            &self.table,
            &self.progression,
            self.rng.as_mut(),
            bus,
            self.elapsed_secs,
        );

        let whole = self.elapsed_secs.floor() as u32;
        while self.reported_secs < whole {
            self.reported_secs += 1;
            bus.emit(GameEvent::TimeChanged(self.reported_secs));
        }

        if report.player_died {
            self.end_run(bus);
        }
    }

    fn end_run(&mut self, bus: &mut EventBus) {
        self.phase = SimPhase::GameOver;
        // orbiters lose their anchor with the player
        let anchors = self.arena.anchor_lookup();
        ProjectileMotion::advance(&mut self.arena.weapons, anchors, &self.bounds, 0.0);
        info!(
            "Game over at {:.1}s: level {}, {} kills",
            self.elapsed_secs, self.arena.player.level, self.arena.kills
        );
        bus.emit(GameEvent::GameOver);
        bus.emit(GameEvent::SceneChanged(SCENE_GAME_OVER.to_string()));
    }

    fn spawn_enemies(&mut self, count: u32) {
        let wave = self.spawner.spawn_wave(
            count,
            self.arena.player.position,
            self.difficulty.difficulty(),
            &self.bounds,
            &self.config,
            self.rng.as_mut(),
            &mut self.arena.ids,
        );
        self.arena.enemies.extend(wave);
    }

    // ── Scripted placement ───────────────────────────────────────────────────

    /// Place an enemy of `kind` at `position`, scaled to the current difficulty.
    pub fn spawn_enemy_at(&mut self, kind: EnemyKind, position: Vec2) -> EntityId {
        let id = self.arena.ids.allocate();
        let enemy = Enemy::new(
            id,
            kind,
            self.bounds.clamp(position),
            self.difficulty.difficulty(),
            &self.config,
        );
        self.arena.enemies.push(enemy);
        id
    }

    /// Place an XP pickup worth `value` at `position`.
    pub fn spawn_pickup_at(&mut self, position: Vec2, value: u32) -> EntityId {
        let id = self.arena.ids.allocate();
        self.arena
            .pickups
            .push(XpPickup::new(id, position, value, &self.config));
        id
    }

    // ── Queries ──────────────────────────────────────────────────────────────

    pub fn phase(&self) -> SimPhase {
        self.phase
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == SimPhase::GameOver
    }

    pub fn settings(&self) -> &RunSettings {
        &self.settings
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn weapon_table(&self) -> &WeaponConfigTable {
        &self.table
    }

    pub fn bounds(&self) -> WorldBounds {
        self.bounds
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed_secs
    }

    pub fn difficulty(&self) -> u32 {
        self.difficulty.difficulty()
    }

    pub fn kills(&self) -> u32 {
        self.arena.kills
    }

    pub fn player(&self) -> &Player {
        &self.arena.player
    }

    /// Direct access for hosts that script a run (loadouts, positions, stats).
    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.arena.player
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.arena.enemies
    }

    pub fn enemies_mut(&mut self) -> &mut Vec<Enemy> {
        &mut self.arena.enemies
    }

    pub fn weapons(&self) -> &[WeaponInstance] {
        &self.arena.weapons
    }

    pub fn pickups(&self) -> &[XpPickup] {
        &self.arena.pickups
    }

}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("settings", &self.settings)
            .field("phase", &self.phase)
            .field("elapsed_secs", &self.elapsed_secs)
            .field("difficulty", &self.difficulty.difficulty())
            .field("enemies", &self.arena.enemies.len())
            .field("weapons", &self.arena.weapons.len())
            .field("pickups", &self.arena.pickups.len())
            .field("kills", &self.arena.kills)
            .finish()
    }
}
