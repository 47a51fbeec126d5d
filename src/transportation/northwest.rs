use nalgebra::DMatrix;

use super::{CellSelectionStrategy, Selection};
use crate::active::ActiveSet;
use crate::problem::Cost;

/// Fills the top-left active cell, ignoring costs entirely.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NorthwestCornerStrategy;

impl<T: Cost> CellSelectionStrategy<T> for NorthwestCornerStrategy {
    fn select(&self, _costs: &DMatrix<T>, active: &ActiveSet) -> Option<Selection<T>> {
        let row = active.active_rows().next()?;
        let col = active.active_cols().next()?;
        Some(Selection::plain((row, col)))
    }
}
