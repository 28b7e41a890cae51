use alloc::vec::Vec;

use super::*;

#[derive(Copy, Clone, Debug, PartialEq)]
enum Layout {
    /// Fill the board in row-major order from the sequence.
    Sequential,
    /// Alternate two types like a chessboard, the sequence only feeds refills.
    Checkerboard(Icon, Icon),
}

/// Deterministic generator cycling through a fixed list of icon types.
///
/// Meant for tests, demos and replays where the board must not depend on a
/// random source.
#[derive(Clone, Debug, PartialEq)]
pub struct SequenceIconGenerator {
    sequence: Vec<Icon>,
    next: usize,
    layout: Layout,
}

impl SequenceIconGenerator {
    /// An empty list behaves like `[0]`.
    pub fn new(types: impl IntoIterator<Item = u8>) -> Self {
        let mut sequence: Vec<Icon> = types.into_iter().map(Icon::new).collect();
        if sequence.is_empty() {
            sequence.push(Icon::new(0));
        }
        Self {
            sequence,
            next: 0,
            layout: Layout::Sequential,
        }
    }

    /// Two alternating types on the initial board, which never contains a run.
    /// Refills alternate between the same two types.
    pub fn checkerboard(a: u8, b: u8) -> Self {
        Self {
            layout: Layout::Checkerboard(Icon::new(a), Icon::new(b)),
            ..Self::new([a, b])
        }
    }

    /// How many icons have been handed out so far.
    pub fn position(&self) -> usize {
        self.next
    }
}

impl IconGenerator for SequenceIconGenerator {
    fn icon_types(&self) -> u8 {
        self.sequence
            .iter()
            .map(|icon| icon.kind())
            .max()
            .map_or(1, |kind| kind.saturating_add(1))
    }

    fn generate(&mut self) -> Icon {
        let icon = self.sequence[self.next % self.sequence.len()];
        self.next += 1;
        icon
    }

    fn initialize(&mut self, grid: &mut Array2<Option<Icon>>) {
        match self.layout {
            Layout::Sequential => {
                for slot in grid.iter_mut() {
                    *slot = Some(self.generate());
                }
            }
            Layout::Checkerboard(a, b) => {
                for ((row, col), slot) in grid.indexed_iter_mut() {
                    *slot = Some(if (row + col) % 2 == 0 { a } else { b });
                }
            }
        }
    }
}
