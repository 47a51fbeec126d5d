use nalgebra::DMatrix;

use super::{CellSelectionStrategy, Selection};
use crate::active::ActiveSet;
use crate::problem::Cost;
use crate::trace::{Diagnostics, Line, VogelPenalties};

/// Vogel's approximation method.
///
/// Every round each active row and column gets a penalty, the gap between
/// its two cheapest active cells. The line with the largest penalty is
/// chosen (rows before columns, then lowest index on ties) and its cheapest
/// active cell is filled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VogelStrategy;

/// Difference between the two smallest values, zero with fewer than two.
fn gap<T: Cost>(values: impl Iterator<Item = T>) -> T {
    let mut lowest: Option<T> = None;
    let mut second: Option<T> = None;
    for v in values {
        match lowest {
            Some(l) if v < l => {
                second = lowest;
                lowest = Some(v);
            }
            Some(_) => {
                if second.map_or(true, |s| v < s) {
                    second = Some(v);
                }
            }
            None => lowest = Some(v),
        }
    }
    match (lowest, second) {
        (Some(l), Some(s)) => s - l,
        _ => T::zero(),
    }
}

/// Row and column penalties for the current active set. Inactive lines
/// get `None`.
pub fn penalties<T: Cost>(costs: &DMatrix<T>, active: &ActiveSet) -> (Vec<Option<T>>, Vec<Option<T>>) {
    let rows = (0..costs.nrows())
        .map(|i| {
            active
                .is_row_active(i)
                .then(|| gap(active.active_cols().map(|j| costs[(i, j)])))
        })
        .collect();
    let cols = (0..costs.ncols())
        .map(|j| {
            active
                .is_col_active(j)
                .then(|| gap(active.active_rows().map(|i| costs[(i, j)])))
        })
        .collect();
    (rows, cols)
}

impl<T: Cost> CellSelectionStrategy<T> for VogelStrategy {
    fn select(&self, costs: &DMatrix<T>, active: &ActiveSet) -> Option<Selection<T>> {
        let (rows, cols) = penalties(costs, active);

        let mut best: Option<(Line, T)> = None;
        let candidates = rows
            .iter()
            .enumerate()
            .map(|(i, p)| (Line::Row(i), *p))
            .chain(cols.iter().enumerate().map(|(j, p)| (Line::Column(j), *p)));
        for (line, penalty) in candidates {
            let Some(penalty) = penalty else { continue };
            match best {
                Some((_, b)) if b >= penalty => {}
                _ => best = Some((line, penalty)),
            }
        }
        let (selected, _) = best?;

        let cell = match selected {
            Line::Row(i) => cheapest(active.active_cols().map(|j| (i, j)), costs)?,
            Line::Column(j) => cheapest(active.active_rows().map(|i| (i, j)), costs)?,
        };
        Some(Selection {
            cell,
            diagnostics: Diagnostics::Vogel(VogelPenalties { rows, cols, selected }),
        })
    }
}

fn cheapest<T: Cost>(cells: impl Iterator<Item = (usize, usize)>, costs: &DMatrix<T>) -> Option<(usize, usize)> {
    let mut best: Option<(usize, usize)> = None;
    for cell in cells {
        match best {
            Some(b) if costs[b] <= costs[cell] => {}
            _ => best = Some(cell),
        }
    }
    best
}
