use ndarray::Array2;

use crate::*;
pub use random::*;
pub use sequence::*;

mod random;
mod sequence;

/// Source of new icons for the board.
///
/// The engine never looks at how icons are picked. It only requires that the
/// generator eventually lets the board reach a state without runs.
pub trait IconGenerator {
    /// Number of distinct icon types this generator can produce.
    fn icon_types(&self) -> u8;

    fn generate(&mut self) -> Icon;

    /// Overwrites every slot of `grid`, row by row.
    fn initialize(&mut self, grid: &mut Array2<Option<Icon>>) {
        for slot in grid.iter_mut() {
            *slot = Some(self.generate());
        }
    }
}

impl<G: IconGenerator + ?Sized> IconGenerator for &mut G {
    fn icon_types(&self) -> u8 {
        (**self).icon_types()
    }

    fn generate(&mut self) -> Icon {
        (**self).generate()
    }

    fn initialize(&mut self, grid: &mut Array2<Option<Icon>>) {
        (**self).initialize(grid)
    }
}
