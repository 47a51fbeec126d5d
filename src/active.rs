/// Rows and columns that still carry unexhausted supply or demand.
///
/// Deactivation is one-way: once a row or column is switched off it is
/// never switched back on.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActiveSet {
    rows: Vec<bool>,
    cols: Vec<bool>,
}

impl ActiveSet {
    /// Rows/columns with a nonzero quantity start active.
    pub fn new(supply: &[u64], demand: &[u64]) -> Self {
        Self {
            rows: supply.iter().map(|&s| s > 0).collect(),
            cols: demand.iter().map(|&d| d > 0).collect(),
        }
    }

    pub fn rows(&self) -> &[bool] {
        &self.rows
    }

    pub fn cols(&self) -> &[bool] {
        &self.cols
    }

    pub fn is_row_active(&self, row: usize) -> bool {
        self.rows.get(row).copied().unwrap_or(false)
    }

    pub fn is_col_active(&self, col: usize) -> bool {
        self.cols.get(col).copied().unwrap_or(false)
    }

    pub fn is_cell_active(&self, (row, col): (usize, usize)) -> bool {
        self.is_row_active(row) && self.is_col_active(col)
    }

    pub fn deactivate_row(&mut self, row: usize) {
        self.rows[row] = false;
    }

    pub fn deactivate_col(&mut self, col: usize) {
        self.cols[col] = false;
    }

    pub fn active_rows(&self) -> impl Iterator<Item = usize> + '_ {
        self.rows.iter().enumerate().filter(|&(_, &a)| a).map(|(i, _)| i)
    }

    pub fn active_cols(&self) -> impl Iterator<Item = usize> + '_ {
        self.cols.iter().enumerate().filter(|&(_, &a)| a).map(|(j, _)| j)
    }

    /// Active cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.active_rows()
            .flat_map(move |i| self.active_cols().map(move |j| (i, j)))
    }

    /// True while at least one row and one column remain active.
    pub fn has_capacity(&self) -> bool {
        self.rows.contains(&true) && self.cols.contains(&true)
    }
}
