use serde::Serialize;

use super::{Axis, CellPos};

/// Kind of selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SelectionMode {
    /// Single cell (degenerate 1x1 bounds at the focus)
    #[default]
    Cell,
    /// Entire row(s), always spanning every column
    Row,
    /// Entire column(s), always spanning every row
    Column,
    /// Rectangular range between anchor and focus
    Range,
}

/// Normalized rectangular region (inclusive on both ends).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    pub min_row: u32,
    pub max_row: u32,
    pub min_col: u32,
    pub max_col: u32,
}

impl Bounds {
    /// Bounds spanning two corners, in any order.
    pub fn spanning(a: CellPos, b: CellPos) -> Self {
        Self {
            min_row: a.row.min(b.row),
            max_row: a.row.max(b.row),
            min_col: a.col.min(b.col),
            max_col: a.col.max(b.col),
        }
    }

    pub fn single(pos: CellPos) -> Self {
        Self::spanning(pos, pos)
    }

    pub fn top_left(&self) -> CellPos {
        CellPos::new(self.min_row, self.min_col)
    }

    pub fn contains(&self, pos: CellPos) -> bool {
        pos.row >= self.min_row
            && pos.row <= self.max_row
            && pos.col >= self.min_col
            && pos.col <= self.max_col
    }

    /// Inclusive index range along an axis.
    pub fn span(&self, axis: Axis) -> (u32, u32) {
        match axis {
            Axis::Row => (self.min_row, self.max_row),
            Axis::Column => (self.min_col, self.max_col),
        }
    }

    pub fn row_count(&self) -> u32 {
        self.max_row - self.min_row + 1
    }

    pub fn col_count(&self) -> u32 {
        self.max_col - self.min_col + 1
    }
}

/// Selection bounds as handed to the rendering shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionBounds {
    pub min_row: u32,
    pub max_row: u32,
    pub min_col: u32,
    pub max_col: u32,
    pub mode: SelectionMode,
}

impl SelectionBounds {
    pub fn new(bounds: Bounds, mode: SelectionMode) -> Self {
        Self {
            min_row: bounds.min_row,
            max_row: bounds.max_row,
            min_col: bounds.min_col,
            max_col: bounds.max_col,
            mode,
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds {
            min_row: self.min_row,
            max_row: self.max_row,
            min_col: self.min_col,
            max_col: self.max_col,
        }
    }
}
