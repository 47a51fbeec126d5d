use nalgebra::{DMatrix, Scalar};
use num_traits::{FromPrimitive, Num, NumAssign};

use crate::error::SolveError;

/// Numeric type usable as a cost (or profit) entry.
///
/// Blanket-implemented for every copyable, ordered scalar with the usual
/// arithmetic, so `i32`, `i64`, `u32`, `f32` and `f64` all qualify.
pub trait Cost: Scalar + Copy + PartialOrd + Num + NumAssign + FromPrimitive {}

impl<T> Cost for T where T: Scalar + Copy + PartialOrd + Num + NumAssign + FromPrimitive {}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Objective {
    #[default]
    Minimize,
    Maximize,
}

impl Objective {
    /// What the matrix entries (and totals) mean under this objective.
    pub fn value_label(self) -> &'static str {
        match self {
            Objective::Minimize => "cost",
            Objective::Maximize => "profit",
        }
    }

    /// Matrix the solvers select on: the costs themselves when minimizing,
    /// `max(cost) - cost` when maximizing. The second element is the
    /// maximum used for the transform, if one was applied.
    pub(crate) fn selection_matrix<T: Cost>(self, cost: &DMatrix<T>) -> (DMatrix<T>, Option<T>) {
        match self {
            Objective::Minimize => (cost.clone(), None),
            Objective::Maximize => match max_entry(cost) {
                Some(max) => (cost.map(|c| max - c), Some(max)),
                None => (cost.clone(), None),
            },
        }
    }
}

impl std::fmt::Display for Objective {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Objective::Minimize => write!(f, "minimize"),
            Objective::Maximize => write!(f, "maximize"),
        }
    }
}

/// Largest entry of a matrix, `None` when it is empty.
pub(crate) fn max_entry<T: Cost>(m: &DMatrix<T>) -> Option<T> {
    m.iter()
        .copied()
        .fold(None, |acc, v| match acc {
            Some(best) if best >= v => Some(best),
            _ => Some(v),
        })
}

/// Balanced transportation instance: `supply.len()` sources shipping to
/// `demand.len()` destinations over `cost`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransportationProblem<T: Scalar> {
    supply: Vec<u64>,
    demand: Vec<u64>,
    cost: DMatrix<T>,
    objective: Objective,
}

impl<T: Cost> TransportationProblem<T> {
    pub fn new(supply: Vec<u64>, demand: Vec<u64>, cost: DMatrix<T>, objective: Objective) -> Self {
        Self {
            supply,
            demand,
            cost,
            objective,
        }
    }

    /// Builds the cost matrix from a row-major slice of `supply.len() * demand.len()` entries.
    pub fn from_row_slice(
        supply: Vec<u64>,
        demand: Vec<u64>,
        cost: &[T],
        objective: Objective,
    ) -> Result<Self, SolveError<T>> {
        let (rows, cols) = (supply.len(), demand.len());
        if cost.len() != rows * cols {
            return Err(SolveError::InvalidDimensions {
                context: "cost entries for supply x demand",
                expected: (rows, cols),
                found: (cost.len(), 1),
            });
        }
        let cost = DMatrix::from_row_slice(rows, cols, cost);
        Ok(Self::new(supply, demand, cost, objective))
    }

    pub fn supply(&self) -> &[u64] {
        &self.supply
    }

    pub fn demand(&self) -> &[u64] {
        &self.demand
    }

    pub fn cost(&self) -> &DMatrix<T> {
        &self.cost
    }

    pub fn objective(&self) -> Objective {
        self.objective
    }

    pub fn total_supply(&self) -> u64 {
        self.supply.iter().sum()
    }

    pub fn total_demand(&self) -> u64 {
        self.demand.iter().sum()
    }

    pub fn is_balanced(&self) -> bool {
        self.total_supply() == self.total_demand()
    }

    /// Checks shape first, then balance.
    pub fn validate(&self) -> Result<(), SolveError<T>> {
        let expected = (self.supply.len(), self.demand.len());
        if self.cost.shape() != expected {
            return Err(SolveError::InvalidDimensions {
                context: "cost matrix against supply and demand",
                expected,
                found: self.cost.shape(),
            });
        }
        if !self.is_balanced() {
            return Err(SolveError::ImbalancedProblem {
                supply: self.total_supply(),
                demand: self.total_demand(),
            });
        }
        Ok(())
    }
}

/// Square assignment instance: row `i` is an agent, column `j` a task.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AssignmentProblem<T: Scalar> {
    cost: DMatrix<T>,
    objective: Objective,
}

impl<T: Cost> AssignmentProblem<T> {
    pub fn new(cost: DMatrix<T>, objective: Objective) -> Self {
        Self { cost, objective }
    }

    pub fn from_row_slice(n: usize, cost: &[T], objective: Objective) -> Result<Self, SolveError<T>> {
        if cost.len() != n * n {
            return Err(SolveError::InvalidDimensions {
                context: "square cost entries",
                expected: (n, n),
                found: (cost.len(), 1),
            });
        }
        Ok(Self::new(DMatrix::from_row_slice(n, n, cost), objective))
    }

    pub fn cost(&self) -> &DMatrix<T> {
        &self.cost
    }

    pub fn objective(&self) -> Objective {
        self.objective
    }

    pub fn size(&self) -> usize {
        self.cost.nrows()
    }

    pub fn validate(&self) -> Result<(), SolveError<T>> {
        let (rows, cols) = self.cost.shape();
        if rows != cols {
            return Err(SolveError::InvalidDimensions {
                context: "assignment cost matrix must be square",
                expected: (rows, rows),
                found: (rows, cols),
            });
        }
        Ok(())
    }
}
