use nalgebra::DMatrix;

use super::{CellSelectionStrategy, Selection};
use crate::active::ActiveSet;
use crate::problem::Cost;

/// Greedily fills the cheapest active cell. Ties go to the first cell in
/// row-major order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MinimumCostStrategy;

impl<T: Cost> CellSelectionStrategy<T> for MinimumCostStrategy {
    fn select(&self, costs: &DMatrix<T>, active: &ActiveSet) -> Option<Selection<T>> {
        let mut best: Option<(usize, usize)> = None;
        for cell in active.cells() {
            match best {
                Some(b) if costs[b] <= costs[cell] => {}
                _ => best = Some(cell),
            }
        }
        best.map(Selection::plain)
    }
}
