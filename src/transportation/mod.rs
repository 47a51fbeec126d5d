//! Initial basic feasible solutions for balanced transportation problems.
//!
//! [`TransportationSolver`] owns the allocation loop; which cell gets filled
//! next is decided by a [`CellSelectionStrategy`].

mod minimum_cost;
mod northwest;
mod vogel;

use std::fmt;
use std::str::FromStr;

use log::{debug, trace};
use nalgebra::{DMatrix, Scalar};

pub use minimum_cost::MinimumCostStrategy;
pub use northwest::NorthwestCornerStrategy;
pub use vogel::{penalties, VogelStrategy};

use crate::active::ActiveSet;
use crate::error::{ParseMethodError, Partial, SolveError};
use crate::problem::{Cost, Objective, TransportationProblem};
use crate::trace::{AllocationStep, Diagnostics, StepTrace};

/// Cell chosen by a strategy, with whatever it wants recorded in the trace.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection<T> {
    pub cell: (usize, usize),
    pub diagnostics: Diagnostics<T>,
}

impl<T> Selection<T> {
    pub fn plain(cell: (usize, usize)) -> Self {
        Self {
            cell,
            diagnostics: Diagnostics::None,
        }
    }
}

/// Picks the next cell to fill.
///
/// `costs` is already oriented for minimization (profits have been turned
/// into `max - profit`). Implementations must only return active cells and
/// return `None` only when nothing is selectable.
pub trait CellSelectionStrategy<T: Cost> {
    fn select(&self, costs: &DMatrix<T>, active: &ActiveSet) -> Option<Selection<T>>;
}

impl<T: Cost, S: CellSelectionStrategy<T> + ?Sized> CellSelectionStrategy<T> for &S {
    fn select(&self, costs: &DMatrix<T>, active: &ActiveSet) -> Option<Selection<T>> {
        (**self).select(costs, active)
    }
}

/// Quantities shipped from each source (row) to each destination (column).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct AllocationPlan {
    allocation: DMatrix<u64>,
}

impl AllocationPlan {
    fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            allocation: DMatrix::zeros(rows, cols),
        }
    }

    pub fn matrix(&self) -> &DMatrix<u64> {
        &self.allocation
    }

    pub fn get(&self, row: usize, col: usize) -> Option<u64> {
        self.allocation.get((row, col)).copied()
    }

    pub fn row_total(&self, row: usize) -> u64 {
        self.allocation.row(row).iter().sum()
    }

    pub fn col_total(&self, col: usize) -> u64 {
        self.allocation.column(col).iter().sum()
    }

    pub fn total(&self) -> u64 {
        self.allocation.iter().sum()
    }

    /// Cells carrying a nonzero quantity, row-major.
    pub fn occupied(&self) -> impl Iterator<Item = ((usize, usize), u64)> + '_ {
        let cols = self.allocation.ncols();
        (0..self.allocation.nrows())
            .flat_map(move |i| (0..cols).map(move |j| (i, j)))
            .map(|cell| (cell, self.allocation[cell]))
            .filter(|&(_, q)| q > 0)
    }

    /// Every row ships exactly its supply and every column receives exactly its demand.
    pub fn is_feasible_for<T: Cost>(&self, problem: &TransportationProblem<T>) -> bool {
        self.allocation.shape() == (problem.supply().len(), problem.demand().len())
            && problem
                .supply()
                .iter()
                .enumerate()
                .all(|(i, &s)| self.row_total(i) == s)
            && problem
                .demand()
                .iter()
                .enumerate()
                .all(|(j, &d)| self.col_total(j) == d)
    }

    /// Sum of `quantity * cost` over the given matrix.
    pub fn cost_under<T: Cost>(&self, cost: &DMatrix<T>) -> Result<T, SolveError<T>> {
        self.occupied().try_fold(T::zero(), |acc, (cell, q)| {
            Ok(acc + quantity::<T>(q)? * cost[cell])
        })
    }
}

/// Result of a transportation solve.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransportationSolution<T: Scalar> {
    pub plan: AllocationPlan,
    /// Total cost (or profit) over the original matrix.
    pub total: T,
    pub objective: Objective,
    pub trace: StepTrace<AllocationStep<T>>,
}

impl<T: Scalar + fmt::Display> fmt::Display for TransportationSolution<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = self.objective.value_label();
        write!(f, "total {label} {} in {} steps", self.total, self.trace.len())
    }
}

fn quantity<T: Cost>(q: u64) -> Result<T, SolveError<T>> {
    T::from_u64(q).ok_or(SolveError::UnrepresentableQuantity(q))
}

/// Allocation loop shared by every [`CellSelectionStrategy`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TransportationSolver<S> {
    strategy: S,
}

impl<S> TransportationSolver<S> {
    pub fn new(strategy: S) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    pub fn solve<T>(&self, problem: &TransportationProblem<T>) -> Result<TransportationSolution<T>, SolveError<T>>
    where
        T: Cost,
        S: CellSelectionStrategy<T>,
    {
        problem.validate()?;

        let (rows, cols) = (problem.supply().len(), problem.demand().len());
        let cost = problem.cost();
        let (working, _) = problem.objective().selection_matrix(cost);
        debug!(
            "transportation solve: {rows}x{cols}, {}, total supply {}",
            problem.objective(),
            problem.total_supply()
        );

        let mut supply = problem.supply().to_vec();
        let mut demand = problem.demand().to_vec();
        let mut active = ActiveSet::new(&supply, &demand);
        let mut plan = AllocationPlan::zeros(rows, cols);
        let mut total = T::zero();
        let mut steps = StepTrace::new();

        while active.has_capacity() {
            let selection = self
                .strategy
                .select(&working, &active)
                .filter(|s| active.is_cell_active(s.cell));
            let Some(Selection { cell, diagnostics }) = selection else {
                let iterations = steps.len();
                return Err(SolveError::NonConvergence {
                    iterations,
                    partial: Box::new(Partial::Allocation(TransportationSolution {
                        plan,
                        total,
                        objective: problem.objective(),
                        trace: steps,
                    })),
                });
            };
            let (row, col) = cell;

            let amount = supply[row].min(demand[col]);
            plan.allocation[cell] = amount;
            total += quantity::<T>(amount)? * cost[cell];

            supply[row] -= amount;
            demand[col] -= amount;
            if supply[row] == 0 {
                active.deactivate_row(row);
            }
            if demand[col] == 0 {
                active.deactivate_col(col);
            }

            trace!("step {}: allocate {amount} to {cell:?}, total {total:?}", steps.len());
            steps.push(AllocationStep {
                index: steps.len(),
                cell,
                amount,
                remaining_supply: supply.clone(),
                remaining_demand: demand.clone(),
                allocation: plan.allocation.clone(),
                active: active.clone(),
                total,
                diagnostics,
            });
        }

        debug!("transportation solved in {} steps, total {total:?}", steps.len());
        Ok(TransportationSolution {
            plan,
            total,
            objective: problem.objective(),
            trace: steps,
        })
    }
}

/// Solves `problem` with `strategy`.
pub fn solve<T, S>(problem: &TransportationProblem<T>, strategy: S) -> Result<TransportationSolution<T>, SolveError<T>>
where
    T: Cost,
    S: CellSelectionStrategy<T>,
{
    TransportationSolver::new(strategy).solve(problem)
}

/// The built-in strategies, selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Method {
    NorthwestCorner,
    MinimumCost,
    Vogel,
}

impl Method {
    pub const ALL: [Method; 3] = [Method::NorthwestCorner, Method::MinimumCost, Method::Vogel];

    pub fn solve<T: Cost>(self, problem: &TransportationProblem<T>) -> Result<TransportationSolution<T>, SolveError<T>> {
        match self {
            Method::NorthwestCorner => solve(problem, NorthwestCornerStrategy),
            Method::MinimumCost => solve(problem, MinimumCostStrategy),
            Method::Vogel => solve(problem, VogelStrategy),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::NorthwestCorner => write!(f, "northwest"),
            Method::MinimumCost => write!(f, "minimum-cost"),
            Method::Vogel => write!(f, "vogel"),
        }
    }
}

impl FromStr for Method {
    type Err = ParseMethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['_', ' '], "-").as_str() {
            "northwest" | "northwest-corner" | "nw" => Ok(Method::NorthwestCorner),
            "minimum-cost" | "min-cost" | "least-cost" => Ok(Method::MinimumCost),
            "vogel" | "vam" => Ok(Method::Vogel),
            _ => Err(ParseMethodError(s.to_string())),
        }
    }
}
