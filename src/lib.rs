//! Solvers for the transportation and assignment problems.
//!
//! Transportation problems get an initial feasible plan from one of three
//! heuristics (northwest corner, minimum cost, Vogel's approximation), all
//! driven by the same allocation loop. Square assignment problems are solved
//! with the Hungarian method. Every solve returns, next to its result, a
//! [`StepTrace`] with a snapshot of each intermediate state.
//!
//! ```
//! use transport::{Method, Objective, TransportationProblem};
//!
//! let problem = TransportationProblem::from_row_slice(
//!     vec![20, 30, 25],
//!     vec![15, 25, 35],
//!     &[8, 6, 10, 9, 12, 13, 14, 9, 16],
//!     Objective::Minimize,
//! )?;
//! let solution = Method::MinimumCost.solve(&problem)?;
//! assert_eq!(solution.plan.total(), 75);
//! # Ok::<(), transport::SolveError<i32>>(())
//! ```

pub mod active;
pub mod error;
pub mod hungarian;
pub mod problem;
pub mod trace;
pub mod transportation;

pub use active::ActiveSet;
pub use error::{ParseMethodError, Partial, SolveError};
pub use hungarian::{Assignment, AssignmentSolution, CoverRule, HungarianConfig, HungarianSolver};
pub use problem::{AssignmentProblem, Cost, Objective, TransportationProblem};
pub use trace::{AllocationStep, AssignmentStep, Diagnostics, Line, StepTrace, VogelPenalties};
pub use transportation::{
    AllocationPlan, CellSelectionStrategy, Method, MinimumCostStrategy, NorthwestCornerStrategy, Selection,
    TransportationSolution, TransportationSolver, VogelStrategy,
};
