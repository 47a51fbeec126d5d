use std::collections::VecDeque;

use nalgebra::DMatrix;

use super::Assignment;

/// Pairing of rows to columns over the zero entries of a reduced matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ZeroMatching {
    row_to_col: Vec<Option<usize>>,
    col_to_row: Vec<Option<usize>>,
}

/// Rows and columns reachable from unmatched rows along alternating paths.
#[derive(Debug)]
pub(crate) struct Reach {
    pub rows: Vec<bool>,
    pub cols: Vec<bool>,
    /// Row each visited column was reached from.
    parent: Vec<Option<usize>>,
    /// Unmatched column ending an augmenting path, if one was found.
    open: Option<usize>,
}

impl ZeroMatching {
    pub fn empty(n: usize) -> Self {
        Self {
            row_to_col: vec![None; n],
            col_to_row: vec![None; n],
        }
    }

    fn size(&self) -> usize {
        self.row_to_col.len()
    }

    fn pair(&mut self, row: usize, col: usize) {
        self.row_to_col[row] = Some(col);
        self.col_to_row[col] = Some(row);
    }

    pub fn len(&self) -> usize {
        self.row_to_col.iter().flatten().count()
    }

    pub fn is_perfect(&self) -> bool {
        self.len() == self.size()
    }

    pub fn to_assignment(&self) -> Assignment {
        let pairs = self
            .row_to_col
            .iter()
            .enumerate()
            .filter_map(|(row, col)| col.map(|c| (row, c)))
            .collect();
        Assignment::new(self.size(), pairs)
    }

    /// Unique-zero elimination followed by a first-fit pass.
    ///
    /// Rows, then columns, holding exactly one zero on a free line are paired
    /// until nothing changes; remaining rows take their first free zero in
    /// row order. The result is not necessarily maximum.
    pub fn unique_zeros(zeros: &DMatrix<bool>) -> Self {
        let n = zeros.nrows();
        let mut matching = Self::empty(n);

        let mut changed = true;
        while changed {
            changed = false;

            for row in 0..n {
                if matching.row_to_col[row].is_some() {
                    continue;
                }
                let mut free = (0..n).filter(|&c| zeros[(row, c)] && matching.col_to_row[c].is_none());
                if let (Some(col), None) = (free.next(), free.next()) {
                    matching.pair(row, col);
                    changed = true;
                }
            }

            for col in 0..n {
                if matching.col_to_row[col].is_some() {
                    continue;
                }
                let mut free = (0..n).filter(|&r| zeros[(r, col)] && matching.row_to_col[r].is_none());
                if let (Some(row), None) = (free.next(), free.next()) {
                    matching.pair(row, col);
                    changed = true;
                }
            }
        }

        for row in 0..n {
            if matching.row_to_col[row].is_some() {
                continue;
            }
            if let Some(col) = (0..n).find(|&c| zeros[(row, c)] && matching.col_to_row[c].is_none()) {
                matching.pair(row, col);
            }
        }

        matching
    }

    /// Breadth-first search over alternating paths starting at every
    /// unmatched row. Stops at the first unmatched column it reaches.
    pub fn reach(&self, zeros: &DMatrix<bool>) -> Reach {
        let n = self.size();
        let mut reach = Reach {
            rows: vec![false; n],
            cols: vec![false; n],
            parent: vec![None; n],
            open: None,
        };

        let mut queue: VecDeque<usize> = (0..n).filter(|&r| self.row_to_col[r].is_none()).collect();
        for &r in &queue {
            reach.rows[r] = true;
        }

        while let Some(row) = queue.pop_front() {
            for col in 0..n {
                if !zeros[(row, col)] || reach.cols[col] {
                    continue;
                }
                reach.cols[col] = true;
                reach.parent[col] = Some(row);
                match self.col_to_row[col] {
                    Some(next) => {
                        if !reach.rows[next] {
                            reach.rows[next] = true;
                            queue.push_back(next);
                        }
                    }
                    None => {
                        reach.open = Some(col);
                        return reach;
                    }
                }
            }
        }

        reach
    }

    /// Grows the matching along augmenting paths until none is left, so the
    /// result is a maximum matching over the zeros.
    pub fn augment(&mut self, zeros: &DMatrix<bool>) {
        loop {
            let reach = self.reach(zeros);
            let Some(mut col) = reach.open else {
                return;
            };
            // flip the path back to its unmatched root row
            while let Some(row) = reach.parent[col] {
                let previous = self.row_to_col[row];
                self.pair(row, col);
                match previous {
                    Some(c) => col = c,
                    None => break,
                }
            }
        }
    }
}
