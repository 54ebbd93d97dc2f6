//! Chapters and per-run setup.
//!
//! A chapter only decides the difficulty a run starts at; everything else
//! about a run comes from the chosen character and the data tables.

use crate::error::{SimError, SimResult};
use crate::player::CharacterKind;
use bevy::prelude::*;

/// Selectable chapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Chapter {
    #[default]
    One,
    Two,
    Three,
}

impl Chapter {
    pub const ALL: [Chapter; 3] = [Chapter::One, Chapter::Two, Chapter::Three];

    /// 1-indexed chapter number.
    pub fn number(self) -> u32 {
        match self {
            Chapter::One => 1,
            Chapter::Two => 2,
            Chapter::Three => 3,
        }
    }

    /// Difficulty the scheduler starts from.
    pub fn base_difficulty(self) -> u32 {
        self.number()
    }

    pub fn label(self) -> &'static str {
        match self {
            Chapter::One => "Chapter 1: The Graveyard",
            Chapter::Two => "Chapter 2: The Crypt",
            Chapter::Three => "Chapter 3: The Abyss",
        }
    }

    pub fn from_number(number: u32) -> SimResult<Self> {
        Chapter::ALL
            .into_iter()
            .find(|c| c.number() == number)
            .ok_or(SimError::UnknownChapter { number })
    }
}

impl TryFrom<u32> for Chapter {
    type Error = SimError;

    fn try_from(number: u32) -> Result<Self, Self::Error> {
        Chapter::from_number(number)
    }
}

/// Everything chosen before a run starts.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSettings {
    pub character: CharacterKind,
    pub chapter: Chapter,
    /// Seed for the run's random source.
    pub seed: u64,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            character: CharacterKind::default(),
            chapter: Chapter::One,
            seed: 0,
        }
    }
}
