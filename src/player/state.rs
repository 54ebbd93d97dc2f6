//! Player data: vitals, progression counters, and weapon slots.
//!
//! Behaviour that mutates this state lives in sibling modules:
//! - [`super::control`]: input + movement
//! - [`crate::progression`]: XP, level-ups and weapon upgrades
//! - [`crate::collision`]: contact damage

use super::control::MoveInput;
use crate::config::SimConfig;
use crate::error::SimError;
use crate::weapon::WeaponKind;
use crate::world::EntityId;
use bevy::prelude::*;
use std::fmt;
use std::str::FromStr;

// ── Characters ─────────────────────────────────────────────────────────────────

/// Playable character archetypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CharacterKind {
    Warrior,
    Mage,
    Priest,
    Ghost,
    #[default]
    Archer,
}

/// A weapon grant: which kind and the slot's starting cooldown.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponGrant {
    pub kind: WeaponKind,
    pub cooldown_ms: f32,
}

/// Starting stats and weapon grants for a character.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharacterProfile {
    pub max_health: f32,
    pub speed: f32,
    /// Weapon the run starts with.
    pub starting_weapon: WeaponGrant,
    /// Weapon granted on the first unlock level if still missing.
    pub signature_weapon: WeaponGrant,
}

const fn grant(kind: WeaponKind, cooldown_ms: f32) -> WeaponGrant {
    WeaponGrant { kind, cooldown_ms }
}

impl CharacterKind {
    pub const ALL: [CharacterKind; 5] = [
        CharacterKind::Warrior,
        CharacterKind::Mage,
        CharacterKind::Priest,
        CharacterKind::Ghost,
        CharacterKind::Archer,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CharacterKind::Warrior => "warrior",
            CharacterKind::Mage => "mage",
            CharacterKind::Priest => "priest",
            CharacterKind::Ghost => "ghost",
            CharacterKind::Archer => "archer",
        }
    }

    pub fn profile(self) -> CharacterProfile {
        match self {
            CharacterKind::Warrior => CharacterProfile {
                max_health: 120.0,
                speed: 200.0,
                starting_weapon: grant(WeaponKind::Axe, 1000.0),
                signature_weapon: grant(WeaponKind::Knife, 500.0),
            },
            CharacterKind::Mage => CharacterProfile {
                max_health: 80.0,
                speed: 200.0,
                starting_weapon: grant(WeaponKind::Magic, 1200.0),
                signature_weapon: grant(WeaponKind::Axe, 1200.0),
            },
            CharacterKind::Priest => CharacterProfile {
                max_health: 100.0,
                speed: 180.0,
                starting_weapon: grant(WeaponKind::Magic, 1500.0),
                signature_weapon: grant(WeaponKind::Knife, 600.0),
            },
            CharacterKind::Ghost => CharacterProfile {
                max_health: 70.0,
                speed: 250.0,
                starting_weapon: grant(WeaponKind::Knife, 400.0),
                signature_weapon: grant(WeaponKind::Magic, 1500.0),
            },
            CharacterKind::Archer => CharacterProfile {
                max_health: 100.0,
                speed: 200.0,
                starting_weapon: grant(WeaponKind::Knife, 500.0),
                signature_weapon: grant(WeaponKind::Axe, 1000.0),
            },
        }
    }
}

impl fmt::Display for CharacterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CharacterKind {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        CharacterKind::ALL
            .into_iter()
            .find(|c| c.name() == lowered)
            .ok_or(SimError::UnknownCharacter { name: s.to_string() })
    }
}

// ── Weapon slots ───────────────────────────────────────────────────────────────

/// One owned weapon: its kind, level and firing timer.
///
/// Timers are in milliseconds. A fresh slot is ready to fire on the first
/// tick it is processed.
#[derive(Debug, Clone, PartialEq)]
pub struct WeaponSlot {
    pub kind: WeaponKind,
    pub level: u32,
    pub cooldown_ms: f32,
    pub ms_since_last_fired: f32,
}

impl WeaponSlot {
    pub fn new(kind: WeaponKind, cooldown_ms: f32) -> Self {
        Self {
            kind,
            level: 1,
            cooldown_ms,
            ms_since_last_fired: cooldown_ms,
        }
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        self.ms_since_last_fired >= self.cooldown_ms
    }

    #[inline]
    pub fn advance(&mut self, dt_ms: f32) {
        self.ms_since_last_fired += dt_ms;
    }

    #[inline]
    pub fn mark_fired(&mut self) {
        self.ms_since_last_fired = 0.0;
    }

    /// Raise the level by one and shorten the cooldown by `factor`, never
    /// below `min_cooldown_ms`.
    pub fn upgrade(&mut self, factor: f32, min_cooldown_ms: f32) {
        self.level += 1;
        self.cooldown_ms = (self.cooldown_ms * factor).max(min_cooldown_ms);
    }
}

// ── Player ─────────────────────────────────────────────────────────────────────

/// Horizontal facing; only horizontal input changes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// Firing angle for facing-targeted weapons (radians).
    pub fn angle(self) -> f32 {
        match self {
            Facing::Left => std::f32::consts::PI,
            Facing::Right => 0.0,
        }
    }
}

/// The player character.
#[derive(Debug, Clone)]
pub struct Player {
    pub id: EntityId,
    pub character: CharacterKind,
    pub position: Vec2,
    pub velocity: Vec2,
    pub radius: f32,
    pub health: f32,
    pub max_health: f32,
    pub speed: f32,
    pub level: u32,
    /// XP towards the next level; reduced on level-up.
    pub xp: u32,
    pub xp_to_next_level: u32,
    /// XP absorbed over the whole run.
    pub total_xp: u32,
    pub facing: Facing,
    /// Last nonzero movement direction (unit length).
    pub last_move: Option<Vec2>,
    pub input: MoveInput,
    /// Seconds of invincibility remaining after a hit.
    pub invincibility_remaining: f32,
    pub weapons: Vec<WeaponSlot>,
    /// Cleared when health reaches zero.
    pub active: bool,
}

impl Player {
    pub fn new(id: EntityId, character: CharacterKind, config: &SimConfig) -> Self {
        let profile = character.profile();
        Self {
            id,
            character,
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            radius: config.player_radius,
            health: profile.max_health,
            max_health: profile.max_health,
            speed: profile.speed,
            level: 1,
            xp: 0,
            xp_to_next_level: config.player_start_xp_to_next.max(1),
            total_xp: 0,
            facing: Facing::Right,
            last_move: None,
            input: MoveInput::default(),
            invincibility_remaining: 0.0,
            weapons: vec![WeaponSlot::new(
                profile.starting_weapon.kind,
                profile.starting_weapon.cooldown_ms,
            )],
            active: true,
        }
    }

    #[inline]
    pub fn is_invincible(&self) -> bool {
        self.invincibility_remaining > 0.0
    }

    pub fn has_weapon(&self, kind: WeaponKind) -> bool {
        self.weapons.iter().any(|slot| slot.kind == kind)
    }

    pub fn weapon_level(&self, kind: WeaponKind) -> Option<u32> {
        self.weapons
            .iter()
            .find(|slot| slot.kind == kind)
            .map(|slot| slot.level)
    }

    /// Apply contact damage unless invincible or inactive.
    ///
    /// Returns `true` if health changed. Starts the invincibility window.
    pub fn take_damage(&mut self, amount: f32, invincibility_secs: f32) -> bool {
        if !self.active || self.is_invincible() {
            return false;
        }
        self.health = (self.health - amount.max(0.0)).max(0.0);
        self.invincibility_remaining = invincibility_secs;
        if self.health <= 0.0 {
            self.active = false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(character: CharacterKind) -> Player {
        Player::new(EntityId(0), character, &SimConfig::default())
    }

    #[test]
    fn new_player_uses_character_profile() {
        let p = player(CharacterKind::Warrior);
        assert_eq!(p.max_health, 120.0);
        assert_eq!(p.health, 120.0);
        assert_eq!(p.weapons.len(), 1);
        assert_eq!(p.weapons[0].kind, WeaponKind::Axe);
        assert_eq!(p.weapons[0].cooldown_ms, 1000.0);
        assert_eq!(p.level, 1);
        assert_eq!(p.xp_to_next_level, 100);
    }

    #[test]
    fn fresh_slot_is_ready() {
        let slot = WeaponSlot::new(WeaponKind::Knife, 500.0);
        assert!(slot.is_ready());
    }

    #[test]
    fn upgrade_respects_cooldown_floor() {
        let mut slot = WeaponSlot::new(WeaponKind::Knife, 110.0);
        slot.upgrade(0.5, 100.0);
        assert_eq!(slot.level, 2);
        assert_eq!(slot.cooldown_ms, 100.0);
    }

    #[test]
    fn invincibility_blocks_follow_up_damage() {
        let mut p = player(CharacterKind::Archer);
        assert!(p.take_damage(10.0, 1.0));
        assert!(!p.take_damage(10.0, 1.0));
        assert_eq!(p.health, 90.0);
    }

    #[test]
    fn lethal_damage_clamps_and_deactivates() {
        let mut p = player(CharacterKind::Ghost);
        p.take_damage(500.0, 1.0);
        assert_eq!(p.health, 0.0);
        assert!(!p.active);
    }

    #[test]
    fn character_names_parse() {
        assert_eq!("Mage".parse::<CharacterKind>().unwrap(), CharacterKind::Mage);
        assert!("bard".parse::<CharacterKind>().is_err());
    }
}
