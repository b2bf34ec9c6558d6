//! Extraction strategies - where to look for a name relative to a label
//!
//! Each strategy is a plain function over a `CellGrid` (or a sibling list),
//! so it can be exercised against synthetic tables without a browser.

use serde::{Deserialize, Serialize};

/// Generic containers look at most this many following siblings.
pub const MAX_SIBLING_PROBES: usize = 3;

/// Row/column coordinate of a cell inside its table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellPos {
    pub row: usize,
    pub col: usize,
}

impl CellPos {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Minimal table capability the strategies need.
pub trait CellGrid {
    type Cell;

    fn row_count(&self) -> usize;

    /// Cell at `pos`, or `None` when the row is shorter or missing.
    fn cell_at(&self, pos: CellPos) -> Option<Self::Cell>;
}

/// How a label element participates in its surrounding structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LabelRole {
    /// `<th>` or `role="columnheader"`
    Header,
    /// Label rendered as an ordinary value cell
    DataCell,
    /// Anything else (div-based layouts)
    Container,
}

/// Header label: every row of the table, same column.
///
/// The header row itself is included; its own text is rejected later by the
/// validator's noise vocabulary.
pub fn header_column_positions(row_count: usize, label: CellPos) -> Vec<CellPos> {
    (0..row_count).map(|row| CellPos::new(row, label.col)).collect()
}

/// Data-cell label: the next cell on the same row, then the label's column
/// in every subsequent row (repeated per-row labels).
pub fn data_cell_positions(row_count: usize, label: CellPos) -> Vec<CellPos> {
    let mut positions = vec![CellPos::new(label.row, label.col + 1)];
    positions.extend((label.row + 1..row_count).map(|row| CellPos::new(row, label.col)));
    positions
}

/// Resolve the strategy for `role` into concrete cells, skipping holes.
pub fn table_candidates<G: CellGrid>(grid: &G, role: LabelRole, label: CellPos) -> Vec<G::Cell> {
    let positions = match role {
        LabelRole::Header => header_column_positions(grid.row_count(), label),
        LabelRole::DataCell => data_cell_positions(grid.row_count(), label),
        LabelRole::Container => Vec::new(),
    };
    positions.into_iter().filter_map(|pos| grid.cell_at(pos)).collect()
}

/// Generic container: the first few following siblings.
pub fn sibling_candidates<N, I>(following: I) -> Vec<N>
where
    I: IntoIterator<Item = N>,
{
    following.into_iter().take(MAX_SIBLING_PROBES).collect()
}

/// Dense row-major grid, handy for tests and static snapshots.
#[derive(Debug, Clone, Default)]
pub struct VecGrid<T> {
    pub rows: Vec<Vec<T>>,
}

impl<T: Clone> CellGrid for VecGrid<T> {
    type Cell = T;

    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn cell_at(&self, pos: CellPos) -> Option<T> {
        self.rows.get(pos.row)?.get(pos.col).cloned()
    }
}
