//! Hungarian method for square assignment problems.
//!
//! The solver reduces rows and columns, then cycles through
//! assign-zeros / cover-zeros / adjust until every row can be paired with a
//! distinct zero. How zeros are paired and covered is chosen by [`CoverRule`].

mod cover;
mod matching;

use std::fmt;

use log::{debug, trace, warn};
use nalgebra::{DMatrix, Scalar};

use crate::error::{Partial, SolveError};
use crate::problem::{AssignmentProblem, Cost, Objective};
use crate::trace::{AssignmentStep, Line, StepTrace};
use cover::Cover;
use matching::ZeroMatching;

/// Fewest reduce/cover/adjust passes the automatic limit allows.
pub const MIN_ITERATIONS: usize = 10;

/// How zeros are paired and covered with lines on each pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum CoverRule {
    /// Maximum matching by augmenting paths and a minimum cover derived from
    /// it. Always reaches an optimal assignment.
    #[default]
    Exact,
    /// Unique-zero elimination with a first-fit fallback, and a cover built by
    /// repeatedly taking the line with the most uncovered zeros. This is the
    /// procedure usually taught by hand; it can stop with `n` lines and no
    /// complete assignment, which is reported as
    /// [`SolveError::NonConvergence`].
    Greedy,
}

impl CoverRule {
    fn pair_zeros(self, zeros: &DMatrix<bool>) -> ZeroMatching {
        let mut matching = ZeroMatching::unique_zeros(zeros);
        if self == CoverRule::Exact {
            matching.augment(zeros);
        }
        matching
    }

    fn cover(self, zeros: &DMatrix<bool>, matching: &ZeroMatching) -> Vec<Line> {
        match self {
            CoverRule::Exact => cover::konig(zeros, matching),
            CoverRule::Greedy => cover::greedy(zeros),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HungarianConfig {
    /// Cap on assign/cover/adjust passes. `None` picks
    /// `max(MIN_ITERATIONS, (n + 1)^2)`, which the exact rule never exceeds.
    pub max_iterations: Option<usize>,
    pub rule: CoverRule,
}

impl HungarianConfig {
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = Some(max_iterations);
        self
    }

    pub fn with_rule(mut self, rule: CoverRule) -> Self {
        self.rule = rule;
        self
    }

    pub fn iteration_limit(&self, n: usize) -> usize {
        self.max_iterations
            .unwrap_or_else(|| MIN_ITERATIONS.max((n + 1) * (n + 1)))
    }
}

/// Row/column pairs of an assignment, sorted by row.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Assignment {
    size: usize,
    pairs: Vec<(usize, usize)>,
}

impl Assignment {
    pub fn new(size: usize, mut pairs: Vec<(usize, usize)>) -> Self {
        pairs.sort_unstable();
        Self { size, pairs }
    }

    pub fn pairs(&self) -> &[(usize, usize)] {
        &self.pairs
    }

    /// Dimension of the matrix this assignment belongs to.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn col_for_row(&self, row: usize) -> Option<usize> {
        self.pairs.iter().find(|&&(r, _)| r == row).map(|&(_, c)| c)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.pairs.iter().copied()
    }

    /// Each row and each column is used exactly once.
    pub fn is_permutation(&self) -> bool {
        let mut rows = vec![false; self.size];
        let mut cols = vec![false; self.size];
        self.pairs.len() == self.size
            && self.pairs.iter().all(|&(r, c)| {
                r < self.size
                    && c < self.size
                    && !std::mem::replace(&mut rows[r], true)
                    && !std::mem::replace(&mut cols[c], true)
            })
    }

    pub fn cost_under<T: Cost>(&self, cost: &DMatrix<T>) -> T {
        self.iter().fold(T::zero(), |acc, cell| acc + cost[cell])
    }
}

/// Result of a Hungarian solve.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AssignmentSolution<T: Scalar> {
    pub assignment: Assignment,
    /// Sum of the original matrix entries at the assigned cells.
    pub total: T,
    pub objective: Objective,
    /// Assign/cover/adjust passes performed.
    pub iterations: usize,
    pub trace: StepTrace<AssignmentStep<T>>,
}

impl<T: Scalar + fmt::Display> fmt::Display for AssignmentSolution<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "total {} {}:", self.objective.value_label(), self.total)?;
        for (row, col) in self.assignment.iter() {
            write!(f, " {row}->{col}")?;
        }
        Ok(())
    }
}

fn min_of<T: Cost>(values: impl Iterator<Item = T>) -> Option<T> {
    values.fold(None, |acc, v| match acc {
        Some(m) if m <= v => Some(m),
        _ => Some(v),
    })
}

/// Subtracts each row's minimum from that row, returning the minima.
fn reduce_rows<T: Cost>(m: &mut DMatrix<T>) -> Vec<T> {
    m.row_iter_mut()
        .map(|mut r| {
            let min = min_of(r.iter().copied()).unwrap_or_else(T::zero);
            r.apply(|v| *v -= min);
            min
        })
        .collect()
}

/// Subtracts each column's minimum from that column, returning the minima.
fn reduce_cols<T: Cost>(m: &mut DMatrix<T>) -> Vec<T> {
    m.column_iter_mut()
        .map(|mut c| {
            let min = min_of(c.iter().copied()).unwrap_or_else(T::zero);
            c.apply(|v| *v -= min);
            min
        })
        .collect()
}

/// Takes the smallest uncovered value off every uncovered cell and adds it
/// to every cell covered twice. Returns `None` when nothing is uncovered.
fn adjust<T: Cost>(m: &mut DMatrix<T>, cover: &Cover) -> Option<T> {
    let (rows, cols) = m.shape();
    let cells = move || (0..rows).flat_map(move |i| (0..cols).map(move |j| (i, j)));
    let min = min_of(cells().filter(|&cell| cover.count(cell) == 0).map(|cell| m[cell]))?;
    for cell in cells() {
        match cover.count(cell) {
            0 => m[cell] -= min,
            2 => m[cell] += min,
            _ => {}
        }
    }
    Some(min)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HungarianSolver {
    config: HungarianConfig,
}

impl HungarianSolver {
    pub fn new(config: HungarianConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &HungarianConfig {
        &self.config
    }

    pub fn solve<T: Cost>(&self, problem: &AssignmentProblem<T>) -> Result<AssignmentSolution<T>, SolveError<T>> {
        problem.validate()?;

        let n = problem.size();
        let cost = problem.cost();
        let rule = self.config.rule;
        let limit = self.config.iteration_limit(n);
        debug!(
            "hungarian solve: {n}x{n}, {}, {rule:?} rule, at most {limit} passes",
            problem.objective()
        );

        let mut steps = StepTrace::new();
        steps.push(AssignmentStep::Initial { matrix: cost.clone() });

        let (mut working, max) = problem.objective().selection_matrix(cost);
        if let Some(max) = max {
            steps.push(AssignmentStep::Transformed {
                max,
                matrix: working.clone(),
            });
        }

        let minima = reduce_rows(&mut working);
        steps.push(AssignmentStep::RowReduction {
            minima,
            matrix: working.clone(),
        });
        let minima = reduce_cols(&mut working);
        steps.push(AssignmentStep::ColumnReduction {
            minima,
            matrix: working.clone(),
        });

        let mut best = ZeroMatching::empty(n);
        let mut iterations = 0;
        while iterations < limit {
            iterations += 1;

            let zeros = working.map(|v| v.is_zero());
            let matching = rule.pair_zeros(&zeros);
            trace!("pass {iterations}: {} of {n} rows paired", matching.len());

            if matching.is_perfect() {
                let assignment = matching.to_assignment();
                let total = assignment.cost_under(cost);
                steps.push(AssignmentStep::SelectedZeros {
                    matrix: working.clone(),
                    assignment: assignment.clone(),
                });
                steps.push(AssignmentStep::Solution {
                    matrix: cost.clone(),
                    assignment: assignment.clone(),
                    total,
                });
                debug!("hungarian solved after {iterations} passes, total {total:?}");
                return Ok(AssignmentSolution {
                    assignment,
                    total,
                    objective: problem.objective(),
                    iterations,
                    trace: steps,
                });
            }
            if matching.len() >= best.len() {
                best = matching.clone();
            }

            let lines = rule.cover(&zeros, &matching);
            let covered = lines.len();
            steps.push(AssignmentStep::LineCover {
                iteration: iterations,
                lines: lines.clone(),
                required: n,
                matrix: working.clone(),
            });
            if covered >= n {
                debug!("pass {iterations}: {covered} lines cover the zeros but no complete assignment");
                break;
            }

            let Some(min_uncovered) = adjust(&mut working, &Cover::from_lines(n, &lines)) else {
                break;
            };
            trace!("pass {iterations}: adjusted by {min_uncovered:?}");
            steps.push(AssignmentStep::Adjustment {
                iteration: iterations,
                min_uncovered,
                matrix: working.clone(),
            });
        }

        let assignment = best.to_assignment();
        let total = assignment.cost_under(cost);
        warn!(
            "hungarian stopped after {iterations} passes with {} of {n} rows assigned",
            assignment.len()
        );
        Err(SolveError::NonConvergence {
            iterations,
            partial: Box::new(Partial::Assignment(AssignmentSolution {
                assignment,
                total,
                objective: problem.objective(),
                iterations,
                trace: steps,
            })),
        })
    }
}

/// Solves `problem` with the default configuration.
pub fn solve<T: Cost>(problem: &AssignmentProblem<T>) -> Result<AssignmentSolution<T>, SolveError<T>> {
    HungarianSolver::default().solve(problem)
}
