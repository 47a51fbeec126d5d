use nalgebra::Scalar;
use thiserror::Error;

use crate::hungarian::AssignmentSolution;
use crate::transportation::TransportationSolution;

/// Errors reported by the solvers. `T` is the cost type of the instance.
#[derive(Error, Debug)]
pub enum SolveError<T: Scalar> {
    /// Total supply differs from total demand. Raised before any allocation.
    #[error("problem is not balanced: total supply {supply} != total demand {demand}")]
    ImbalancedProblem { supply: u64, demand: u64 },

    /// A matrix does not have the shape the instance requires.
    #[error("invalid dimensions ({context}): expected {expected:?}, found {found:?}")]
    InvalidDimensions {
        context: &'static str,
        expected: (usize, usize),
        found: (usize, usize),
    },

    /// The solver stopped without a complete result. `partial` holds the
    /// best result reached, which is not optimal and may be incomplete.
    #[error("no complete solution after {iterations} iterations")]
    NonConvergence {
        iterations: usize,
        partial: Box<Partial<T>>,
    },

    /// A shipped quantity has no representation in the cost type.
    #[error("quantity {0} cannot be represented in the cost type")]
    UnrepresentableQuantity(u64),
}

/// Incomplete result attached to [`SolveError::NonConvergence`].
#[derive(Debug, Clone, PartialEq)]
pub enum Partial<T: Scalar> {
    Allocation(TransportationSolution<T>),
    Assignment(AssignmentSolution<T>),
}

/// Unknown name passed to `Method::from_str`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown transportation method `{0}`, expected one of: northwest, minimum-cost, vogel")]
pub struct ParseMethodError(pub String);
