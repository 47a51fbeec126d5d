use nalgebra::DMatrix;

use super::matching::ZeroMatching;
use crate::trace::Line;

/// Rows and columns struck through by a set of lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Cover {
    rows: Vec<bool>,
    cols: Vec<bool>,
}

impl Cover {
    pub fn from_lines(n: usize, lines: &[Line]) -> Self {
        let mut cover = Self {
            rows: vec![false; n],
            cols: vec![false; n],
        };
        for line in lines {
            match *line {
                Line::Row(i) => cover.rows[i] = true,
                Line::Column(j) => cover.cols[j] = true,
            }
        }
        cover
    }

    /// How many lines pass through `(row, col)`: 0, 1 or 2.
    pub fn count(&self, (row, col): (usize, usize)) -> u8 {
        u8::from(self.rows[row]) + u8::from(self.cols[col])
    }
}

/// Repeatedly takes the line with the most zeros not yet covered, rows
/// before columns and lowest index first on ties. Not guaranteed minimal.
pub(crate) fn greedy(zeros: &DMatrix<bool>) -> Vec<Line> {
    let n = zeros.nrows();
    let mut covered = DMatrix::from_element(n, n, false);
    let mut lines = Vec::new();

    loop {
        let open = |cell: (usize, usize)| zeros[cell] && !covered[cell];
        let mut best: Option<(Line, usize)> = None;
        let candidates = (0..n)
            .map(|i| (Line::Row(i), (0..n).filter(|&j| open((i, j))).count()))
            .chain((0..n).map(|j| (Line::Column(j), (0..n).filter(|&i| open((i, j))).count())));
        for (line, count) in candidates {
            if count > best.map_or(0, |(_, c)| c) {
                best = Some((line, count));
            }
        }

        let Some((line, _)) = best else {
            return lines;
        };
        match line {
            Line::Row(i) => covered.row_mut(i).fill(true),
            Line::Column(j) => covered.column_mut(j).fill(true),
        }
        lines.push(line);
    }
}

/// Minimum cover read off a maximum matching (König's theorem): rows not
/// reachable from an unmatched row, plus columns that are.
pub(crate) fn konig(zeros: &DMatrix<bool>, matching: &ZeroMatching) -> Vec<Line> {
    let reach = matching.reach(zeros);
    let rows = reach
        .rows
        .iter()
        .enumerate()
        .filter(|&(_, &seen)| !seen)
        .map(|(i, _)| Line::Row(i));
    let cols = reach
        .cols
        .iter()
        .enumerate()
        .filter(|&(_, &seen)| seen)
        .map(|(j, _)| Line::Column(j));
    rows.chain(cols).collect()
}

#[cfg(test)]
mod test {
    use super::*;

    fn mask(n: usize, zeros: &[(usize, usize)]) -> DMatrix<bool> {
        let mut m = DMatrix::from_element(n, n, false);
        for &z in zeros {
            m[z] = true;
        }
        m
    }

    fn covers_every_zero(zeros: &DMatrix<bool>, lines: &[Line]) -> bool {
        let cover = Cover::from_lines(zeros.nrows(), lines);
        (0..zeros.nrows())
            .flat_map(|i| (0..zeros.ncols()).map(move |j| (i, j)))
            .all(|cell| !zeros[cell] || cover.count(cell) > 0)
    }

    #[test]
    fn greedy_takes_densest_line_first() {
        let zeros = mask(
            4,
            &[(0, 0), (1, 0), (1, 1), (1, 2), (1, 3), (2, 0), (2, 2), (3, 0)],
        );
        let lines = greedy(&zeros);
        assert_eq!(lines, vec![Line::Row(1), Line::Column(0), Line::Row(2)]);
        assert!(covers_every_zero(&zeros, &lines));
    }

    #[test]
    fn greedy_on_a_cycle_of_zeros() {
        // needs all three lines although first-fit pairing finds only two zeros
        let zeros = mask(3, &[(0, 0), (0, 2), (1, 1), (1, 2), (2, 0), (2, 1)]);
        let lines = greedy(&zeros);
        assert_eq!(lines, vec![Line::Row(0), Line::Row(1), Line::Row(2)]);
    }

    #[test]
    fn konig_cover_matches_matching_size() {
        let zeros = mask(
            4,
            &[(0, 0), (1, 0), (1, 1), (1, 2), (1, 3), (2, 0), (2, 2), (3, 0)],
        );
        let mut matching = ZeroMatching::unique_zeros(&zeros);
        matching.augment(&zeros);
        let lines = konig(&zeros, &matching);
        assert_eq!(lines.len(), matching.len());
        assert_eq!(lines, vec![Line::Row(1), Line::Row(2), Line::Column(0)]);
        assert!(covers_every_zero(&zeros, &lines));
    }

    #[test]
    fn doubly_covered_cells() {
        let cover = Cover::from_lines(2, &[Line::Row(0), Line::Column(1)]);
        assert_eq!(cover.count((0, 1)), 2);
        assert_eq!(cover.count((0, 0)), 1);
        assert_eq!(cover.count((1, 0)), 0);
    }
}
