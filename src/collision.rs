//! Per-tick overlap resolution.
//!
//! ## Passes (in order)
//!
//! 1. **Player × Enemy**: contact damage, gated by the invincibility window.
//!    A lethal hit ends resolution for the tick; the caller moves to game over.
//! 2. **Weapon × Enemy**: damage, optional knockback away from the source,
//!    kill bookkeeping and XP drop. `destroy_on_hit` instances hit once.
//! 3. **Player × XpPickup**: absorb XP and run the level-up check.
//!
//! Enemies are bucketed in a [`SpatialGrid`] rebuilt at the start of every
//! resolve; dead enemies, spent weapons and collected pickups are filtered out
//! at the end of the pass that marked them.

use crate::config::SimConfig;
use crate::events::{EventBus, GameEvent};
use crate::pickup::XpPickup;
use crate::progression::ProgressionTracker;
use crate::rng::SimRng;
use crate::spatial_partition::SpatialGrid;
use crate::weapon::WeaponConfigTable;
use crate::world::Arena;
use bevy::prelude::*;

/// What one resolve did; used by the simulation loop and by tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionReport {
    pub player_damaged: bool,
    pub player_died: bool,
    pub kills: u32,
    pub pickups_absorbed: u32,
    pub levels_gained: u32,
}

#[inline]
fn overlaps(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let reach = ra + rb;
    a.distance_squared(b) <= reach * reach
}

#[derive(Debug, Clone, Default)]
pub struct CollisionResolver {
    grid: SpatialGrid,
}

impl CollisionResolver {
    pub fn new(cell_size: f32) -> Self {
        Self {
            grid: SpatialGrid::new(cell_size),
        }
    }

    /// Run all three passes. `now` is the simulation clock (seconds), used
    /// for knockback cooldowns.
    #[allow(clippy::too_many_arguments)]
    pub fn resolve(
        &mut self,
        arena: &mut Arena,
        config: &SimConfig,
        table: &WeaponConfigTable,
        progression: &ProgressionTracker,
        rng: &mut dyn SimRng,
        bus: &mut EventBus,
        now: f64,
    ) -> CollisionReport {
        let mut report = CollisionReport::default();
        self.grid.rebuild(arena.enemies.iter().map(|e| e.position));

        self.player_vs_enemies(arena, config, bus, &mut report);
        if report.player_died {
            return report;
        }
        self.weapons_vs_enemies(arena, config, rng, bus, now, &mut report);
        Self::player_vs_pickups(arena, table, progression, rng, bus, &mut report);
        report
    }

    fn player_vs_enemies(
        &self,
        arena: &mut Arena,
        config: &SimConfig,
        bus: &mut EventBus,
        report: &mut CollisionReport,
    ) {
        let player = &mut arena.player;
        if !player.active {
            return;
        }
        let reach = player.radius + config.enemy_radius;
        for index in self.grid.candidates(player.position, reach) {
            let enemy = &arena.enemies[index];
            if enemy.is_dead()
                || !overlaps(player.position, player.radius, enemy.position, enemy.radius)
            {
                continue;
            }
            if player.take_damage(enemy.damage, config.invincibility_duration) {
                report.player_damaged = true;
                bus.emit(GameEvent::HealthChanged(player.health));
                if !player.active {
                    info!("Player killed by {}", enemy.kind.name());
                    report.player_died = true;
                    return;
                }
            }
        }
    }

    fn weapons_vs_enemies(
        &self,
        arena: &mut Arena,
        config: &SimConfig,
        rng: &mut dyn SimRng,
        bus: &mut EventBus,
        now: f64,
        report: &mut CollisionReport,
    ) {
        let player_id = arena.player.id;
        let player_pos = arena.player.position;

        for weapon in arena.weapons.iter_mut() {
            if weapon.is_destroyed() {
                continue;
            }
            let reach = weapon.radius + config.enemy_radius;
            for index in self.grid.candidates(weapon.position, reach) {
                let enemy = &mut arena.enemies[index];
                if enemy.is_dead()
                    || !overlaps(weapon.position, weapon.radius, enemy.position, enemy.radius)
                {
                    continue;
                }

                enemy.take_damage(weapon.damage);
                if weapon.knockback > 0.0 {
                    let source = match weapon.anchor() {
                        Some(anchor) if anchor == player_id => player_pos,
                        _ => weapon.position,
                    };
                    enemy.try_knockback(source, weapon.knockback, now, config);
                }

                if enemy.is_dead() {
                    arena.kills += 1;
                    report.kills += 1;
                    let drop_id = arena.ids.allocate();
                    arena
                        .pickups
                        .push(XpPickup::drop_at(drop_id, enemy.position, config, rng));
                    bus.emit(GameEvent::EnemyKilled {
                        kind: enemy.kind,
                        position: enemy.position,
                    });
                    bus.emit(GameEvent::KillsChanged(arena.kills));
                }

                if weapon.destroy_on_hit {
                    weapon.destroy();
                    break;
                }
            }
        }

        arena.enemies.retain(|e| !e.is_dead());
        arena.weapons.retain(|w| !w.is_destroyed());
    }

    fn player_vs_pickups(
        arena: &mut Arena,
        table: &WeaponConfigTable,
        progression: &ProgressionTracker,
        rng: &mut dyn SimRng,
        bus: &mut EventBus,
        report: &mut CollisionReport,
    ) {
        let player = &mut arena.player;
        if !player.active {
            return;
        }
        for pickup in arena.pickups.iter_mut() {
            if pickup.collected
                || !overlaps(player.position, player.radius, pickup.position, pickup.radius)
            {
                continue;
            }
            pickup.collected = true;
            report.pickups_absorbed += 1;
            progression.add_xp(player, pickup.value, bus);
            report.levels_gained += progression.check_level_up(player, table, rng, bus);
        }
        arena.pickups.retain(|p| !p.collected);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enemy::{Enemy, EnemyKind};
    use crate::player::{CharacterKind, Player};
    use crate::rng::SequenceRng;
    use crate::weapon::{MotionKind, WeaponInstance, WeaponKind};
    use crate::world::{EntityId, IdAllocator};

    struct Rig {
        arena: Arena,
        config: SimConfig,
        table: WeaponConfigTable,
        progression: ProgressionTracker,
        resolver: CollisionResolver,
        rng: SequenceRng,
        bus: EventBus,
    }

    impl Rig {
        fn new() -> Self {
            let config = SimConfig::default();
            let mut ids = IdAllocator::default();
            let player = Player::new(ids.allocate(), CharacterKind::Archer, &config);
            Self {
                arena: Arena {
                    player,
                    enemies: Vec::new(),
                    weapons: Vec::new(),
                    pickups: Vec::new(),
                    ids,
                    kills: 0,
                },
                table: WeaponConfigTable::default(),
                progression: ProgressionTracker::new(&config),
                resolver: CollisionResolver::new(config.grid_cell_size),
                rng: SequenceRng::constant(0.0),
                bus: EventBus::new(),
                config,
            }
        }

        fn enemy_at(&mut self, pos: Vec2) -> EntityId {
            let id = self.arena.ids.allocate();
            self.arena
                .enemies
                .push(Enemy::new(id, EnemyKind::Ghost, pos, 1, &self.config));
            id
        }

        fn weapon_at(&mut self, kind: WeaponKind, pos: Vec2) {
            let stats = self.table.resolve(kind, 1).unwrap();
            let id = self.arena.ids.allocate();
            let w = match stats.motion {
                MotionKind::Orbit => {
                    let mut w =
                        WeaponInstance::orbiting(id, &stats, self.arena.player.id, Vec2::ZERO, 0.0);
                    w.position = pos;
                    w
                }
                MotionKind::Projectile => WeaponInstance::flying(id, &stats, pos, 0.0),
            };
            self.arena.weapons.push(w);
        }

        fn resolve(&mut self, now: f64) -> CollisionReport {
            self.resolver.resolve(
                &mut self.arena,
                &self.config,
                &self.table,
                &self.progression,
                &mut self.rng,
                &mut self.bus,
                now,
            )
        }
    }

    #[test]
    fn contact_damage_is_gated_by_invincibility() {
        let mut rig = Rig::new();
        rig.enemy_at(Vec2::new(5.0, 0.0));
        rig.enemy_at(Vec2::new(-5.0, 0.0));

        let report = rig.resolve(0.0);
        assert!(report.player_damaged);
        assert_eq!(rig.arena.player.health, 90.0);

        rig.resolve(0.1);
        assert_eq!(rig.arena.player.health, 90.0);
    }

    #[test]
    fn lethal_contact_reports_death() {
        let mut rig = Rig::new();
        rig.arena.player.health = 5.0;
        rig.enemy_at(Vec2::ZERO);
        let report = rig.resolve(0.0);
        assert!(report.player_died);
        assert_eq!(rig.arena.player.health, 0.0);
        assert!(!rig.arena.player.active);
    }

    #[test]
    fn kill_drops_one_pickup_and_counts() {
        let mut rig = Rig::new();
        let pos = Vec2::new(300.0, 0.0);
        rig.enemy_at(pos);
        rig.arena.enemies[0].health = 5.0;
        rig.weapon_at(WeaponKind::Knife, pos);

        let report = rig.resolve(0.0);
        assert_eq!(report.kills, 1);
        assert_eq!(rig.arena.kills, 1);
        assert!(rig.arena.enemies.is_empty());
        assert!(rig.arena.weapons.is_empty());
        assert_eq!(rig.arena.pickups.len(), 1);
        assert_eq!(rig.arena.pickups[0].position, pos);
        assert!(rig.bus.pending().contains(&GameEvent::KillsChanged(1)));
    }

    #[test]
    fn destroy_on_hit_weapon_hits_only_one_enemy() {
        let mut rig = Rig::new();
        let pos = Vec2::new(300.0, 0.0);
        rig.enemy_at(pos);
        rig.enemy_at(pos + Vec2::new(2.0, 0.0));
        rig.weapon_at(WeaponKind::Knife, pos);

        rig.resolve(0.0);
        let damaged = rig
            .arena
            .enemies
            .iter()
            .filter(|e| e.health < e.max_health)
            .count();
        assert_eq!(damaged, 1);
    }

    #[test]
    fn persistent_weapon_knocks_back_away_from_player() {
        let mut rig = Rig::new();
        let pos = Vec2::new(80.0, 0.0);
        rig.enemy_at(pos);
        rig.weapon_at(WeaponKind::Shield, pos);

        rig.resolve(0.0);
        assert_eq!(rig.arena.weapons.len(), 1);
        let enemy = &rig.arena.enemies[0];
        assert!(enemy.knockback.active);
        assert!(enemy.velocity.x > 0.0);
    }

    #[test]
    fn persistent_weapon_knockback_waits_for_cooldown() {
        let mut rig = Rig::new();
        let pos = Vec2::new(80.0, 0.0);
        rig.enemy_at(pos);
        rig.arena.enemies[0].max_health = 1000.0;
        rig.arena.enemies[0].health = 1000.0;
        rig.weapon_at(WeaponKind::Shield, pos);

        rig.resolve(0.0);
        assert_eq!(rig.arena.enemies[0].knockback.last_applied_at, Some(0.0));
        let pushed = rig.arena.enemies[0].velocity;
        let health_after_first = rig.arena.enemies[0].health;

        // still overlapping inside the cooldown: damage lands, knockback does not
        rig.resolve(0.1);
        let enemy = &rig.arena.enemies[0];
        assert_eq!(enemy.knockback.last_applied_at, Some(0.0));
        assert_eq!(enemy.velocity, pushed);
        assert!(enemy.health < health_after_first);

        rig.resolve(0.6);
        assert_eq!(rig.arena.enemies[0].knockback.last_applied_at, Some(0.6));
    }

    #[test]
    fn absorbing_pickup_levels_up_once() {
        let mut rig = Rig::new();
        rig.arena.player.xp = 95;
        let id = rig.arena.ids.allocate();
        rig.arena
            .pickups
            .push(XpPickup::new(id, Vec2::new(3.0, 0.0), 10, &rig.config));

        let report = rig.resolve(0.0);
        assert_eq!(report.pickups_absorbed, 1);
        assert_eq!(report.levels_gained, 1);
        assert_eq!(rig.arena.player.level, 2);
        assert_eq!(rig.arena.player.xp, 5);
        assert_eq!(rig.arena.player.xp_to_next_level, 150);
        assert!(rig.arena.pickups.is_empty());
    }
}
