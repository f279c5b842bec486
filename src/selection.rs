//! Selection state machine.
//!
//! A selection is an anchor, a focus and a mode. Bounds are re-derived and
//! stored normalized after every transition so readers never re-sort them.
//! Row selections always span every column and column selections every row.

use crate::types::{Axis, Bounds, CellPos, SelectionBounds, SelectionMode};

/// What the pointer is currently dragging, if anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    DraggingCell,
    DraggingRowHeader,
    DraggingColHeader,
}

/// Current selection plus drag state.
#[derive(Debug, Clone)]
pub struct SelectionModel {
    mode: SelectionMode,
    anchor: CellPos,
    focus: CellPos,
    bounds: Bounds,
    drag: DragState,
    total_rows: u32,
    total_cols: u32,
}

impl SelectionModel {
    pub fn new(total_rows: u32, total_cols: u32) -> Self {
        let origin = CellPos::new(0, 0);
        Self {
            mode: SelectionMode::Cell,
            anchor: origin,
            focus: origin,
            bounds: Bounds::single(origin),
            drag: DragState::Idle,
            total_rows: total_rows.max(1),
            total_cols: total_cols.max(1),
        }
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    pub fn anchor(&self) -> CellPos {
        self.anchor
    }

    pub fn focus(&self) -> CellPos {
        self.focus
    }

    pub fn drag(&self) -> DragState {
        self.drag
    }

    pub fn is_dragging(&self) -> bool {
        self.drag != DragState::Idle
    }

    /// Normalized bounds of the selection.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn selection_bounds(&self) -> SelectionBounds {
        SelectionBounds::new(self.bounds, self.mode)
    }

    /// Pointer-down on a data cell. With `extend`, the anchor is kept and the
    /// focus moves to `pos`.
    pub fn begin_cell(&mut self, pos: CellPos, extend: bool) {
        let pos = self.clamp(pos);
        if extend {
            self.focus = pos;
            self.mode = self.cell_or_range();
        } else {
            self.anchor = pos;
            self.focus = pos;
            self.mode = SelectionMode::Cell;
        }
        self.drag = DragState::DraggingCell;
        self.normalize();
    }

    /// Pointer-down on a row header.
    pub fn begin_row_header(&mut self, row: u32, extend: bool) {
        let row = row.min(self.total_rows - 1);
        if !extend || self.mode != SelectionMode::Row {
            self.anchor = CellPos::new(row, 0);
        }
        self.focus = CellPos::new(row, 0);
        self.mode = SelectionMode::Row;
        self.drag = DragState::DraggingRowHeader;
        self.normalize();
    }

    /// Pointer-down on a column header.
    pub fn begin_col_header(&mut self, col: u32, extend: bool) {
        let col = col.min(self.total_cols - 1);
        if !extend || self.mode != SelectionMode::Column {
            self.anchor = CellPos::new(0, col);
        }
        self.focus = CellPos::new(0, col);
        self.mode = SelectionMode::Column;
        self.drag = DragState::DraggingColHeader;
        self.normalize();
    }

    /// Pointer moved to `pos` while dragging. Header drags only follow the
    /// pointer along their own axis. Returns true if the bounds changed.
    pub fn drag_to(&mut self, pos: CellPos) -> bool {
        let pos = self.clamp(pos);
        let before = (self.bounds, self.mode);
        match self.drag {
            DragState::Idle => return false,
            DragState::DraggingCell => {
                self.focus = pos;
                self.mode = self.cell_or_range();
            }
            DragState::DraggingRowHeader => self.focus = CellPos::new(pos.row, 0),
            DragState::DraggingColHeader => self.focus = CellPos::new(0, pos.col),
        }
        self.normalize();
        (self.bounds, self.mode) != before
    }

    /// Pointer released. The selection persists.
    pub fn end_drag(&mut self) -> bool {
        let was_dragging = self.is_dragging();
        self.drag = DragState::Idle;
        was_dragging
    }

    /// Collapse to a single cell next to the focus, clamped to the grid.
    pub fn move_focus(&mut self, d_row: i64, d_col: i64) -> CellPos {
        let target = self.offset(self.focus, d_row, d_col);
        self.select_cell(target);
        target
    }

    /// Move the focus while keeping the anchor (shift+arrow).
    pub fn extend_focus(&mut self, d_row: i64, d_col: i64) -> CellPos {
        let target = self.offset(self.focus, d_row, d_col);
        self.extend_to(target);
        target
    }

    /// Keep the anchor and put the focus at `pos`.
    pub fn extend_to(&mut self, pos: CellPos) {
        self.focus = self.clamp(pos);
        self.mode = self.cell_or_range();
        self.drag = DragState::Idle;
        self.normalize();
    }

    pub fn select_cell(&mut self, pos: CellPos) {
        let pos = self.clamp(pos);
        self.anchor = pos;
        self.focus = pos;
        self.mode = SelectionMode::Cell;
        self.drag = DragState::Idle;
        self.normalize();
    }

    /// Rectangular selection from `anchor` to `focus`.
    pub fn select_range(&mut self, anchor: CellPos, focus: CellPos) {
        self.anchor = self.clamp(anchor);
        self.focus = self.clamp(focus);
        self.mode = self.cell_or_range();
        self.drag = DragState::Idle;
        self.normalize();
    }

    /// Range over the entire grid.
    pub fn select_all(&mut self) {
        self.anchor = CellPos::new(0, 0);
        self.focus = CellPos::new(self.total_rows - 1, self.total_cols - 1);
        self.mode = SelectionMode::Range;
        self.drag = DragState::Idle;
        self.normalize();
    }

    /// Whether a header should be drawn highlighted: its index lies inside
    /// the selection bounds along `axis`.
    pub fn header_highlighted(&self, axis: Axis, index: u32) -> bool {
        let (lo, hi) = self.bounds.span(axis);
        index >= lo && index <= hi
    }

    /// Whether the whole line at `index` is selected, which is when the
    /// bounds contain it and span every index of the other axis.
    pub fn line_fully_selected(&self, axis: Axis, index: u32) -> bool {
        let (lo, hi) = self.bounds.span(axis.other());
        let last = match axis.other() {
            Axis::Row => self.total_rows - 1,
            Axis::Column => self.total_cols - 1,
        };
        self.header_highlighted(axis, index) && lo == 0 && hi == last
    }

    fn cell_or_range(&self) -> SelectionMode {
        if self.anchor == self.focus {
            SelectionMode::Cell
        } else {
            SelectionMode::Range
        }
    }

    fn normalize(&mut self) {
        let last_row = self.total_rows - 1;
        let last_col = self.total_cols - 1;
        let spanned = Bounds::spanning(self.anchor, self.focus);
        self.bounds = match self.mode {
            SelectionMode::Cell => Bounds::single(self.focus),
            SelectionMode::Range => spanned,
            SelectionMode::Row => Bounds {
                min_col: 0,
                max_col: last_col,
                ..spanned
            },
            SelectionMode::Column => Bounds {
                min_row: 0,
                max_row: last_row,
                ..spanned
            },
        };
    }

    fn clamp(&self, pos: CellPos) -> CellPos {
        CellPos::new(
            pos.row.min(self.total_rows - 1),
            pos.col.min(self.total_cols - 1),
        )
    }

    fn offset(&self, pos: CellPos, d_row: i64, d_col: i64) -> CellPos {
        CellPos::new(
            step(pos.row, d_row, self.total_rows),
            step(pos.col, d_col, self.total_cols),
        )
    }
}

/// `index + delta` clamped to `[0, len)`.
fn step(index: u32, delta: i64, len: u32) -> u32 {
    let last = i64::from(len.saturating_sub(1));
    let target = (i64::from(index) + delta).clamp(0, last);
    u32::try_from(target).unwrap_or(0)
}
