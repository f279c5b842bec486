//! Mutable document state that history commands operate on.

use crate::config::GridConfig;
use crate::layout::SizeIndex;
use crate::store::CellStore;
use crate::types::{Axis, CellPos};

/// Cell contents plus row/column sizes for one grid.
#[derive(Debug, Clone)]
pub struct Sheet {
    pub(crate) cells: CellStore,
    pub(crate) sizes: SizeIndex,
    total_rows: u32,
    total_cols: u32,
}

impl Sheet {
    pub fn new(config: &GridConfig) -> Self {
        Self {
            cells: CellStore::new(),
            sizes: SizeIndex::new(config),
            total_rows: config.total_rows,
            total_cols: config.total_cols,
        }
    }

    pub fn cells(&self) -> &CellStore {
        &self.cells
    }

    pub fn sizes(&self) -> &SizeIndex {
        &self.sizes
    }

    pub fn total_rows(&self) -> u32 {
        self.total_rows
    }

    pub fn total_cols(&self) -> u32 {
        self.total_cols
    }

    pub fn count(&self, axis: Axis) -> u32 {
        match axis {
            Axis::Row => self.total_rows,
            Axis::Column => self.total_cols,
        }
    }

    pub fn in_bounds(&self, pos: CellPos) -> bool {
        pos.row < self.total_rows && pos.col < self.total_cols
    }

    /// Clamp a position into the grid.
    pub fn clamp(&self, pos: CellPos) -> CellPos {
        CellPos::new(
            pos.row.min(self.total_rows.saturating_sub(1)),
            pos.col.min(self.total_cols.saturating_sub(1)),
        )
    }
}
