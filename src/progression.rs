//! XP, level-ups and weapon growth.
//!
//! Level-up loop: while `xp >= xp_to_next_level` the player gains a level,
//! keeps the XP overflow, and the threshold grows to `floor(n × 1.5)` in
//! integer arithmetic. Each level raises max health (and refills it), raises move
//! speed, and grows the arsenal through [`ProgressionTracker::upgrade_weapons`].

use crate::config::SimConfig;
use crate::constants::{WEAPON_PRIORITY, WEAPON_UNLOCK_LEVEL_INTERVAL, XP_GROWTH_DIVISOR};
use crate::events::{EventBus, GameEvent};
use crate::player::{Player, WeaponSlot};
use crate::rng::SimRng;
use crate::weapon::{WeaponConfigTable, WeaponKind};
use bevy::prelude::*;

/// What a single call to [`ProgressionTracker::upgrade_weapons`] did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WeaponGrowth {
    Unlocked(WeaponKind),
    Upgraded { kind: WeaponKind, level: u32 },
    /// The player owns no weapons to upgrade.
    Nothing,
}

#[derive(Debug, Clone)]
pub struct ProgressionTracker {
    max_health_bonus: f32,
    speed_bonus: f32,
    unlock_interval: u32,
    min_cooldown_ms: f32,
}

impl ProgressionTracker {
    pub fn new(config: &SimConfig) -> Self {
        Self {
            max_health_bonus: config.level_up_max_health_bonus,
            speed_bonus: config.level_up_speed_bonus,
            unlock_interval: WEAPON_UNLOCK_LEVEL_INTERVAL.max(1),
            min_cooldown_ms: config.min_weapon_cooldown_ms,
        }
    }

    pub fn add_xp(&self, player: &mut Player, amount: u32, bus: &mut EventBus) {
        player.xp = player.xp.saturating_add(amount);
        player.total_xp = player.total_xp.saturating_add(amount);
        bus.emit(GameEvent::XpChanged {
            current: player.xp,
            max: player.xp_to_next_level,
        });
    }

    /// Apply every level-up the current XP pays for. Returns levels gained.
    pub fn check_level_up(
        &self,
        player: &mut Player,
        table: &WeaponConfigTable,
        rng: &mut dyn SimRng,
        bus: &mut EventBus,
    ) -> u32 {
        let mut gained = 0;
        while player.xp >= player.xp_to_next_level {
            player.xp -= player.xp_to_next_level;
            player.xp_to_next_level = next_threshold(player.xp_to_next_level);
            player.level += 1;
            player.max_health += self.max_health_bonus;
            player.health = player.max_health;
            player.speed += self.speed_bonus;
            gained += 1;

            let growth = self.upgrade_weapons(player, table, rng);
            info!("Level {} reached: {:?}", player.level, growth);
            bus.emit(GameEvent::LevelChanged(player.level));
            bus.emit(GameEvent::HealthChanged(player.health));
        }
        if gained > 0 {
            bus.emit(GameEvent::XpChanged {
                current: player.xp,
                max: player.xp_to_next_level,
            });
        }
        gained
    }

    /// Grow the arsenal after a level-up.
    ///
    /// On unlock levels (every third level) a missing weapon is added: the
    /// character's signature weapon on the first unlock, otherwise the first
    /// configured kind from the priority list. When nothing can be added, or on
    /// any other level, a random owned slot is upgraded.
    pub fn upgrade_weapons(
        &self,
        player: &mut Player,
        table: &WeaponConfigTable,
        rng: &mut dyn SimRng,
    ) -> WeaponGrowth {
        if player.level % self.unlock_interval == 0 {
            if let Some(slot) = self.next_unlock(player, table) {
                let kind = slot.kind;
                player.weapons.push(slot);
                return WeaponGrowth::Unlocked(kind);
            }
        }

        if player.weapons.is_empty() {
            return WeaponGrowth::Nothing;
        }
        let index = rng.next_index(player.weapons.len());
        let slot = &mut player.weapons[index];
        let factor = table
            .get(slot.kind)
            .map(|cfg| cfg.upgrade_cooldown_factor())
            .unwrap_or(1.0);
        slot.upgrade(factor, self.min_cooldown_ms);
        WeaponGrowth::Upgraded {
            kind: slot.kind,
            level: slot.level,
        }
    }

    fn next_unlock(&self, player: &Player, table: &WeaponConfigTable) -> Option<WeaponSlot> {
        if player.level == self.unlock_interval {
            let signature = player.character.profile().signature_weapon;
            if !player.has_weapon(signature.kind) && table.contains(signature.kind) {
                return Some(WeaponSlot::new(signature.kind, signature.cooldown_ms));
            }
        }
        WEAPON_PRIORITY
            .iter()
            .copied()
            .filter(|kind| !player.has_weapon(*kind))
            .find_map(|kind| {
                table
                    .get(kind)
                    .map(|cfg| WeaponSlot::new(kind, cfg.cooldown_ms))
            })
    }
}

/// `floor(n × 1.5)`, strictly above `n` until it saturates at `u32::MAX`.
fn next_threshold(current: u32) -> u32 {
    current
        .saturating_add(current / XP_GROWTH_DIVISOR)
        .max(current.saturating_add(1))
}
