//! Weapon firing: slot cooldowns, projectile creation and orbit rings.
//!
//! ## Orbit rings
//!
//! Every orbit weapon kind owns one [`OrbitRing`]: a shared base angle plus the
//! ordered ids of its live instances. Member `i` of `n` sits at
//! `base_angle + i · 2π / n`. The base angle advances every tick, and the whole
//! ring is re-spaced whenever members are added or lost, so orbiters stay
//! evenly spread instead of drifting apart.
//!
//! A ready orbit slot only tops the ring up to its level-derived cap; a full
//! ring creates nothing, but the slot timer still resets.

use super::motion::WeaponInstance;
use super::table::{MotionKind, WeaponConfigTable, WeaponKind, WeaponStats};
use super::targeting::{AimContext, TargetingResolver};
use crate::enemy::Enemy;
use crate::player::Player;
use crate::rng::SimRng;
use crate::world::{EntityId, IdAllocator};
use bevy::prelude::*;
use std::collections::{HashMap, HashSet};
use std::f32::consts::TAU;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrbitRing {
    pub base_angle: f32,
    pub members: Vec<EntityId>,
}

impl OrbitRing {
    /// Forget members that are no longer live in `registry`.
    fn prune(&mut self, registry: &[WeaponInstance]) {
        self.members
            .retain(|id| registry.iter().any(|w| w.id == *id && !w.is_destroyed()));
    }

    /// Write evenly spaced angles to every member.
    fn respace(&self, registry: &mut [WeaponInstance]) {
        if self.members.is_empty() {
            return;
        }
        let step = TAU / self.members.len() as f32;
        for (index, id) in self.members.iter().enumerate() {
            if let Some(instance) = registry.iter_mut().find(|w| w.id == *id) {
                instance.set_orbit_angle(self.base_angle + index as f32 * step);
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct WeaponFireController {
    rings: HashMap<WeaponKind, OrbitRing>,
    /// Kinds already reported as missing from the table.
    warned: HashSet<WeaponKind>,
}

impl WeaponFireController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ring(&self, kind: WeaponKind) -> Option<&OrbitRing> {
        self.rings.get(&kind)
    }

    /// Advance every slot timer by `dt` seconds, fire the ready ones, then
    /// rotate the orbit rings. Returns the number of instances created.
    #[allow(clippy::too_many_arguments)]
    pub fn tick(
        &mut self,
        dt: f32,
        player: &mut Player,
        enemies: &[Enemy],
        table: &WeaponConfigTable,
        rng: &mut dyn SimRng,
        ids: &mut IdAllocator,
        registry: &mut Vec<WeaponInstance>,
    ) -> usize {
        if !player.active {
            return 0;
        }
        let aim = AimContext::from(&*player);
        let anchor = player.id;
        let dt_ms = dt * 1000.0;
        let mut created = 0;

        for slot in player.weapons.iter_mut() {
            slot.advance(dt_ms);
            if !slot.is_ready() {
                continue;
            }
            let Some(stats) = table.resolve(slot.kind, slot.level) else {
                if self.warned.insert(slot.kind) {
                    warn!("No weapon data for '{}'; slot skipped", slot.kind);
                }
                continue;
            };
            match stats.motion {
                MotionKind::Projectile => {
                    let solution = TargetingResolver::resolve(stats.targeting, &aim, enemies, rng);
                    registry.push(WeaponInstance::flying(
                        ids.allocate(),
                        &stats,
                        aim.origin,
                        solution.angle,
                    ));
                    created += 1;
                }
                MotionKind::Orbit => {
                    created += self.replenish_ring(&stats, anchor, aim.origin, ids, registry);
                }
            }
            slot.mark_fired();
        }

        self.rotate_rings(dt, player, table, registry);
        created
    }

    fn replenish_ring(
        &mut self,
        stats: &WeaponStats,
        anchor: EntityId,
        anchor_pos: Vec2,
        ids: &mut IdAllocator,
        registry: &mut Vec<WeaponInstance>,
    ) -> usize {
        let ring = self.rings.entry(stats.kind).or_default();
        ring.prune(registry);
        if ring.members.len() >= stats.orbit_count {
            return 0;
        }
        let missing = stats.orbit_count - ring.members.len();
        for _ in 0..missing {
            let id = ids.allocate();
            registry.push(WeaponInstance::orbiting(
                id,
                stats,
                anchor,
                anchor_pos,
                ring.base_angle,
            ));
            ring.members.push(id);
        }
        ring.respace(registry);
        debug!(
            "{} ring topped up to {} (level {})",
            stats.kind,
            ring.members.len(),
            stats.level
        );
        missing
    }

    fn rotate_rings(
        &mut self,
        dt: f32,
        player: &Player,
        table: &WeaponConfigTable,
        registry: &mut [WeaponInstance],
    ) {
        for (kind, ring) in self.rings.iter_mut() {
            ring.prune(registry);
            if ring.members.is_empty() {
                continue;
            }
            let level = player.weapon_level(*kind).unwrap_or(1);
            let speed = table
                .get(*kind)
                .map(|cfg| cfg.orbit_speed_at(level))
                .unwrap_or(0.0);
            ring.base_angle = (ring.base_angle + speed * dt).rem_euclid(TAU);
            ring.respace(registry);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::enemy::EnemyKind;
    use crate::player::{CharacterKind, WeaponSlot};
    use crate::rng::SequenceRng;
    use crate::weapon::motion::Motion;

    struct Rig {
        controller: WeaponFireController,
        player: Player,
        table: WeaponConfigTable,
        rng: SequenceRng,
        ids: IdAllocator,
        registry: Vec<WeaponInstance>,
    }

    impl Rig {
        fn with_slot(slot: WeaponSlot) -> Self {
            let mut ids = IdAllocator::default();
            let mut player = Player::new(ids.allocate(), CharacterKind::Archer, &SimConfig::default());
            player.weapons = vec![slot];
            Self {
                controller: WeaponFireController::new(),
                player,
                table: WeaponConfigTable::default(),
                rng: SequenceRng::constant(0.5),
                ids,
                registry: Vec::new(),
            }
        }

        fn tick(&mut self, dt: f32, enemies: &[Enemy]) -> usize {
            self.controller.tick(
                dt,
                &mut self.player,
                enemies,
                &self.table,
                &mut self.rng,
                &mut self.ids,
                &mut self.registry,
            )
        }
    }

    #[test]
    fn slot_fires_immediately_then_waits_for_cooldown() {
        let mut rig = Rig::with_slot(WeaponSlot::new(WeaponKind::Knife, 500.0));
        assert_eq!(rig.tick(0.25, &[]), 1);
        assert_eq!(rig.tick(0.25, &[]), 0);
        assert_eq!(rig.tick(0.25, &[]), 1);
        assert_eq!(rig.registry.len(), 2);
    }

    #[test]
    fn projectile_aims_at_nearest_enemy() {
        let mut rig = Rig::with_slot(WeaponSlot::new(WeaponKind::Arrow, 1000.0));
        let enemy = Enemy::new(
            EntityId(99),
            EnemyKind::Ghost,
            Vec2::new(0.0, 100.0),
            1,
            &SimConfig::default(),
        );
        rig.tick(0.25, &[enemy]);
        match rig.registry[0].motion {
            Motion::Flying { velocity, .. } => {
                assert!(velocity.x.abs() < 1e-3);
                assert!(velocity.y > 0.0);
            }
            _ => panic!("arrow should fly"),
        }
    }

    #[test]
    fn orbit_ring_is_capped_and_evenly_spaced() {
        let mut slot = WeaponSlot::new(WeaponKind::Shield, 1000.0);
        slot.level = 4;
        let mut rig = Rig::with_slot(slot);

        assert_eq!(rig.tick(0.0, &[]), 2);
        let angles: Vec<f32> = rig.registry.iter().filter_map(|w| w.orbit_angle()).collect();
        assert_eq!(angles.len(), 2);
        let gap = (angles[1] - angles[0]).rem_euclid(TAU);
        assert!((gap - std::f32::consts::PI).abs() < 1e-4);

        // full ring: the next ready fire creates nothing
        assert_eq!(rig.tick(1.0, &[]), 0);
        assert_eq!(rig.registry.len(), 2);
        assert!(!rig.player.weapons[0].is_ready());
    }

    #[test]
    fn three_member_ring_is_spaced_by_a_third_turn() {
        let mut slot = WeaponSlot::new(WeaponKind::Axe, 1000.0);
        slot.level = 4;
        let mut rig = Rig::with_slot(slot);

        assert_eq!(rig.tick(0.0, &[]), 3);
        let angles: Vec<f32> = rig.registry.iter().filter_map(|w| w.orbit_angle()).collect();
        assert_eq!(angles.len(), 3);
        for i in 0..3 {
            let gap = (angles[(i + 1) % 3] - angles[i]).rem_euclid(TAU);
            assert!((gap - TAU / 3.0).abs() < 1e-4, "gap {i} was {gap}");
        }

        // losing a member respaces the rest before any refill
        rig.registry.remove(1);
        assert_eq!(rig.tick(0.1, &[]), 0);
        let angles: Vec<f32> = rig.registry.iter().filter_map(|w| w.orbit_angle()).collect();
        assert_eq!(angles.len(), 2);
        let gap = (angles[1] - angles[0]).rem_euclid(TAU);
        assert!((gap - std::f32::consts::PI).abs() < 1e-4);
    }

    #[test]
    fn ring_rotates_and_refills_lost_members() {
        let mut slot = WeaponSlot::new(WeaponKind::Axe, 1000.0);
        slot.level = 2;
        let mut rig = Rig::with_slot(slot);
        rig.tick(0.0, &[]);
        assert_eq!(rig.registry.len(), 2);
        let before = rig.controller.ring(WeaponKind::Axe).unwrap().base_angle;

        rig.tick(0.25, &[]);
        let after = rig.controller.ring(WeaponKind::Axe).unwrap().base_angle;
        assert!(after > before);

        rig.registry.pop();
        rig.tick(0.75, &[]);
        assert_eq!(rig.registry.len(), 2);
        assert_eq!(rig.controller.ring(WeaponKind::Axe).unwrap().members.len(), 2);
    }

    #[test]
    fn unknown_kind_is_skipped_without_resetting_timer() {
        let mut rig = Rig::with_slot(WeaponSlot::new(WeaponKind::Whip, 1000.0));
        rig.table.remove(WeaponKind::Whip);
        assert_eq!(rig.tick(0.25, &[]), 0);
        assert!(rig.player.weapons[0].is_ready());
        assert!(rig.registry.is_empty());
    }

    #[test]
    fn inactive_player_does_not_fire() {
        let mut rig = Rig::with_slot(WeaponSlot::new(WeaponKind::Knife, 500.0));
        rig.player.active = false;
        assert_eq!(rig.tick(0.5, &[]), 0);
    }
}
