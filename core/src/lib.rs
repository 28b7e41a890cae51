//! Rendering-free engine for a tile-matching ("match three") puzzle.
//!
//! A [`Game`] owns a fixed grid of [`Icon`]s. Players swap two adjacent icons
//! with [`Game::select`]; a swap is only kept when it lines up three or more
//! icons of the same type. [`Game::settle`] then removes every run, lets the
//! remaining icons fall, refills the holes from an [`IconGenerator`] and
//! repeats until the board is stable, reporting each step as a [`Cascade`] so
//! a front end can animate it.

#![no_std]

extern crate alloc;

use serde::{Deserialize, Serialize};

pub use cell::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use icon::*;
pub use types::*;

mod cell;
mod engine;
mod error;
mod generator;
mod icon;
mod types;

/// Points for a run of three; every extra icon doubles it.
pub const BASE_SCORE: Score = 10;

/// Default bound on settle passes before the engine gives up.
pub const CASCADE_LIMIT: u32 = 1000;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub width: Coord,
    pub height: Coord,
    pub base_score: Score,
    pub cascade_limit: u32,
}

impl GameConfig {
    pub const fn new_unchecked((width, height): Coord2) -> Self {
        Self {
            width,
            height,
            base_score: BASE_SCORE,
            cascade_limit: CASCADE_LIMIT,
        }
    }

    pub fn new((width, height): Coord2) -> Self {
        let width = width.clamp(1, Coord::MAX);
        let height = height.clamp(1, Coord::MAX);
        Self::new_unchecked((width, height))
    }

    pub const fn with_base_score(mut self, base_score: Score) -> Self {
        self.base_score = base_score;
        self
    }

    pub const fn with_cascade_limit(mut self, cascade_limit: u32) -> Self {
        self.cascade_limit = cascade_limit;
        self
    }

    pub const fn total_cells(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(GameError::InvalidConfig("board must have at least one row and column"));
        }
        if self.cascade_limit == 0 {
            return Err(GameError::InvalidConfig("cascade limit must be positive"));
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new_unchecked((8, 8))
    }
}

/// Outcome of a swap request
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SelectOutcome {
    /// Icons swapped and at least one run formed, the board must be settled
    Swapped,
    WrongCellCount,
    NotAdjacent,
    SameIcon,
    OutOfBounds,
    /// The swap would not form any run and was undone
    NoRun,
}

impl SelectOutcome {
    /// Whether this outcome changed the board
    pub const fn has_update(self) -> bool {
        use SelectOutcome::*;
        match self {
            Swapped => true,
            WrongCellCount => false,
            NotAdjacent => false,
            SameIcon => false,
            OutOfBounds => false,
            NoRun => false,
        }
    }
}
