//! Ordered record of the intermediate states a solver went through.
//!
//! Records are appended in the order the algorithm produced them and each one
//! owns a snapshot of the state it describes, so a trace can be replayed long
//! after the solve that produced it has returned.

use nalgebra::{DMatrix, Scalar};

use crate::active::ActiveSet;
use crate::hungarian::Assignment;

/// Append-only list of step records.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct StepTrace<S> {
    steps: Vec<S>,
}

impl<S> Default for StepTrace<S> {
    fn default() -> Self {
        Self { steps: Vec::new() }
    }
}

impl<S> StepTrace<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, step: S) {
        self.steps.push(step);
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&S> {
        self.steps.get(index)
    }

    pub fn first(&self) -> Option<&S> {
        self.steps.first()
    }

    pub fn last(&self) -> Option<&S> {
        self.steps.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, S> {
        self.steps.iter()
    }

    pub fn as_slice(&self) -> &[S] {
        &self.steps
    }

    pub fn into_vec(self) -> Vec<S> {
        self.steps
    }
}

impl<'a, S> IntoIterator for &'a StepTrace<S> {
    type Item = &'a S;
    type IntoIter = std::slice::Iter<'a, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

impl<S> IntoIterator for StepTrace<S> {
    type Item = S;
    type IntoIter = std::vec::IntoIter<S>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.into_iter()
    }
}

/// A full row or column of a matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Line {
    Row(usize),
    Column(usize),
}

/// One allocation made by the transportation solver.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AllocationStep<T: Scalar> {
    /// Zero-based position in the trace.
    pub index: usize,
    pub cell: (usize, usize),
    pub amount: u64,
    pub remaining_supply: Vec<u64>,
    pub remaining_demand: Vec<u64>,
    /// Allocation plan after this step.
    pub allocation: DMatrix<u64>,
    /// Active rows/columns after this step.
    pub active: ActiveSet,
    /// Running total over the original (untransformed) matrix.
    pub total: T,
    pub diagnostics: Diagnostics<T>,
}

/// Strategy specific information about why a cell was chosen.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Diagnostics<T> {
    None,
    Vogel(VogelPenalties<T>),
}

/// Penalties computed by Vogel's method for one round.
///
/// `None` marks a row or column that was already inactive.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VogelPenalties<T> {
    pub rows: Vec<Option<T>>,
    pub cols: Vec<Option<T>>,
    /// The row or column with the largest penalty.
    pub selected: Line,
}

/// One phase of the Hungarian method.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "phase", rename_all = "kebab-case"))]
pub enum AssignmentStep<T: Scalar> {
    Initial {
        matrix: DMatrix<T>,
    },
    /// Profits turned into costs as `max - value`.
    Transformed {
        max: T,
        matrix: DMatrix<T>,
    },
    RowReduction {
        minima: Vec<T>,
        matrix: DMatrix<T>,
    },
    ColumnReduction {
        minima: Vec<T>,
        matrix: DMatrix<T>,
    },
    LineCover {
        iteration: usize,
        lines: Vec<Line>,
        /// Number of lines that signals an optimal assignment exists.
        required: usize,
        matrix: DMatrix<T>,
    },
    Adjustment {
        iteration: usize,
        min_uncovered: T,
        matrix: DMatrix<T>,
    },
    SelectedZeros {
        matrix: DMatrix<T>,
        assignment: Assignment,
    },
    Solution {
        matrix: DMatrix<T>,
        assignment: Assignment,
        total: T,
    },
}

impl<T: Scalar> AssignmentStep<T> {
    /// Matrix snapshot carried by every phase.
    pub fn matrix(&self) -> &DMatrix<T> {
        match self {
            AssignmentStep::Initial { matrix }
            | AssignmentStep::Transformed { matrix, .. }
            | AssignmentStep::RowReduction { matrix, .. }
            | AssignmentStep::ColumnReduction { matrix, .. }
            | AssignmentStep::LineCover { matrix, .. }
            | AssignmentStep::Adjustment { matrix, .. }
            | AssignmentStep::SelectedZeros { matrix, .. }
            | AssignmentStep::Solution { matrix, .. } => matrix,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AssignmentStep::Initial { .. } => "initial",
            AssignmentStep::Transformed { .. } => "transformed",
            AssignmentStep::RowReduction { .. } => "row-reduction",
            AssignmentStep::ColumnReduction { .. } => "column-reduction",
            AssignmentStep::LineCover { .. } => "line-cover",
            AssignmentStep::Adjustment { .. } => "adjustment",
            AssignmentStep::SelectedZeros { .. } => "selected-zeros",
            AssignmentStep::Solution { .. } => "solution",
        }
    }
}
