use core::fmt;
use serde::{Deserialize, Serialize};

use crate::*;

/// Detached snapshot of a grid position and the icon seen there.
///
/// The engine hands these out to describe what changed. `previous_row` equals
/// `row` unless the icon fell during a collapse (old row) or was spawned by a
/// refill (negative, above the board).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    row: Coord,
    col: Coord,
    icon: Option<Icon>,
    previous_row: RowOffset,
}

impl Cell {
    pub const fn new(row: Coord, col: Coord, icon: Option<Icon>) -> Self {
        Self {
            row,
            col,
            icon,
            previous_row: row as RowOffset,
        }
    }

    pub const fn with_previous_row(mut self, previous_row: RowOffset) -> Self {
        self.previous_row = previous_row;
        self
    }

    pub const fn row(&self) -> Coord {
        self.row
    }

    pub const fn col(&self) -> Coord {
        self.col
    }

    pub const fn coords(&self) -> Coord2 {
        (self.row, self.col)
    }

    pub const fn icon(&self) -> Option<Icon> {
        self.icon
    }

    pub const fn previous_row(&self) -> RowOffset {
        self.previous_row
    }

    /// Orthogonal neighbors only.
    pub const fn is_adjacent(&self, other: &Cell) -> bool {
        (self.col == other.col && self.row.abs_diff(other.row) == 1)
            || (self.row == other.row && self.col.abs_diff(other.col) == 1)
    }

    pub const fn in_grid(&self, width: Coord, height: Coord) -> bool {
        self.row < height && self.col < width
    }

    /// The icon slid down from another board row.
    pub const fn has_moved(&self) -> bool {
        self.previous_row >= 0 && self.previous_row != self.row as RowOffset
    }

    /// The icon did not come from the board at all; it appeared during a refill.
    pub const fn is_new(&self, height: Coord) -> bool {
        self.previous_row < 0 || self.previous_row >= height as RowOffset
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[({},{}) ", self.row, self.col)?;
        match self.icon {
            Some(icon) => write!(f, "{icon}")?,
            None => f.write_str("*")?,
        }
        if self.previous_row != self.row as RowOffset {
            write!(f, "({})", self.previous_row)?;
        }
        f.write_str("]")
    }
}
