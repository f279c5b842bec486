//! Viewport state and pixel ↔ cell mapping.
//!
//! Screen coordinates are relative to the grid canvas: the row header band
//! occupies `[0, row_header_width)` horizontally and the column header band
//! `[0, col_header_height)` vertically. Everything else is the data area,
//! offset by the scroll position.

use std::ops::Range;

use serde::Serialize;

use super::{AxisSizes, SizeIndex};
use crate::config::GridConfig;
use crate::types::{Axis, CellPos};

/// Target of a hit test (what is under a screen point)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    /// A regular cell
    Cell(CellPos),
    /// A row header at the given row index
    RowHeader(u32),
    /// A column header at the given column index
    ColumnHeader(u32),
    /// The corner header (select all)
    CornerHeader,
    /// Nothing (outside the canvas or past the last row/column)
    None,
}

/// Screen-space point
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Coordinate along `axis` (`y` for rows, `x` for columns).
    pub fn along(self, axis: Axis) -> f64 {
        match axis {
            Axis::Row => self.y,
            Axis::Column => self.x,
        }
    }
}

/// Screen-space rectangle of a cell
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CellRect {
    /// X position (left edge)
    pub x: f64,
    /// Y position (top edge)
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Visible half-open index range `[start, end)` for one axis.
///
/// Starts at the index straddling `scroll_offset`, runs through the index
/// straddling `scroll_offset + viewport_extent`, plus one index of slack so a
/// partially visible trailing cell is always painted.
pub fn visible_range(sizes: &AxisSizes, scroll_offset: f64, viewport_extent: f64) -> Range<u32> {
    let Some(start) = sizes.index_at(scroll_offset) else {
        return 0..0;
    };
    let last = sizes
        .index_at(scroll_offset + viewport_extent.max(0.0))
        .unwrap_or(start);
    start..last.saturating_add(2).min(sizes.len())
}

/// Viewport state - the visible window onto the grid
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    /// Horizontal scroll position in sheet coordinates
    pub scroll_x: f64,
    /// Vertical scroll position in sheet coordinates
    pub scroll_y: f64,
    /// Canvas width in pixels (headers included)
    pub width: f64,
    /// Canvas height in pixels (headers included)
    pub height: f64,
    /// Width of the row header band
    pub row_header_width: f64,
    /// Height of the column header band
    pub col_header_height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64, row_header_width: f64, col_header_height: f64) -> Self {
        Self {
            scroll_x: 0.0,
            scroll_y: 0.0,
            width,
            height,
            row_header_width,
            col_header_height,
        }
    }

    pub fn from_config(config: &GridConfig, width: f64, height: f64) -> Self {
        Self::new(
            width,
            height,
            config.row_header_width,
            config.col_header_height,
        )
    }

    pub fn scroll(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Row => self.scroll_y,
            Axis::Column => self.scroll_x,
        }
    }

    /// Size of the header band that precedes the data area along `axis`.
    pub fn header(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Row => self.col_header_height,
            Axis::Column => self.row_header_width,
        }
    }

    /// Canvas extent along `axis`, headers included.
    pub fn extent(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Row => self.height,
            Axis::Column => self.width,
        }
    }

    /// Extent of the scrollable data area along `axis`.
    pub fn data_extent(&self, axis: Axis) -> f64 {
        (self.extent(axis) - self.header(axis)).max(0.0)
    }

    /// Convert a screen coordinate along `axis` to sheet coordinates.
    pub fn to_sheet(&self, axis: Axis, screen: f64) -> f64 {
        screen - self.header(axis) + self.scroll(axis)
    }

    /// Convert a sheet coordinate along `axis` to screen coordinates.
    pub fn to_screen(&self, axis: Axis, sheet: f64) -> f64 {
        sheet - self.scroll(axis) + self.header(axis)
    }

    pub fn visible_range(&self, axis: Axis, sizes: &SizeIndex) -> Range<u32> {
        visible_range(
            sizes.axis(axis),
            self.scroll(axis),
            self.data_extent(axis),
        )
    }

    /// Determine what is under the given screen point
    pub fn hit_test(&self, x: f64, y: f64, sizes: &SizeIndex) -> HitTarget {
        if x < 0.0 || y < 0.0 || x >= self.width || y >= self.height {
            return HitTarget::None;
        }
        let in_row_band = x < self.row_header_width;
        let in_col_band = y < self.col_header_height;

        if in_row_band && in_col_band {
            return HitTarget::CornerHeader;
        }

        let col = self.index_under(Axis::Column, x, sizes);
        let row = self.index_under(Axis::Row, y, sizes);

        if in_col_band {
            return col.map_or(HitTarget::None, HitTarget::ColumnHeader);
        }
        if in_row_band {
            return row.map_or(HitTarget::None, HitTarget::RowHeader);
        }
        match (row, col) {
            (Some(row), Some(col)) => HitTarget::Cell(CellPos::new(row, col)),
            _ => HitTarget::None,
        }
    }

    /// Cell under a screen point; `None` inside a header band or outside the grid.
    pub fn resolve_cell(&self, x: f64, y: f64, sizes: &SizeIndex) -> Option<CellPos> {
        match self.hit_test(x, y, sizes) {
            HitTarget::Cell(pos) => Some(pos),
            _ => None,
        }
    }

    /// Exact screen position of a cell's top-left corner.
    pub fn pixel_origin(&self, pos: CellPos, sizes: &SizeIndex) -> Point {
        Point {
            x: self.to_screen(Axis::Column, sizes.cumulative_offset(Axis::Column, pos.col)),
            y: self.to_screen(Axis::Row, sizes.cumulative_offset(Axis::Row, pos.row)),
        }
    }

    pub fn cell_rect(&self, pos: CellPos, sizes: &SizeIndex) -> CellRect {
        let origin = self.pixel_origin(pos, sizes);
        CellRect {
            x: origin.x,
            y: origin.y,
            width: sizes.get(Axis::Column, pos.col),
            height: sizes.get(Axis::Row, pos.row),
        }
    }

    /// Index under a screen coordinate, with the coordinate first clamped to
    /// the data area. Used while dragging, where the pointer may be over a
    /// header band or outside the canvas.
    pub fn index_at_clamped(&self, axis: Axis, screen: f64, sizes: &SizeIndex) -> u32 {
        let max = (self.data_extent(axis) - 1.0).max(0.0);
        let content = (screen - self.header(axis)).clamp(0.0, max);
        sizes
            .index_at(axis, content + self.scroll(axis))
            .unwrap_or(0)
    }

    /// Largest valid scroll offset along `axis`.
    pub fn max_scroll(&self, axis: Axis, sizes: &SizeIndex) -> f64 {
        (sizes.total_extent(axis) - self.data_extent(axis)).max(0.0)
    }

    /// Clamp scroll position to `[0, total_extent - data_extent]`.
    pub fn clamp_scroll(&mut self, sizes: &SizeIndex) {
        self.scroll_x = self.scroll_x.clamp(0.0, self.max_scroll(Axis::Column, sizes));
        self.scroll_y = self.scroll_y.clamp(0.0, self.max_scroll(Axis::Row, sizes));
    }

    /// Set absolute scroll position. Returns true if it changed.
    pub fn set_scroll(&mut self, x: f64, y: f64, sizes: &SizeIndex) -> bool {
        let (old_x, old_y) = (self.scroll_x, self.scroll_y);
        self.scroll_x = if x.is_finite() { x } else { old_x };
        self.scroll_y = if y.is_finite() { y } else { old_y };
        self.clamp_scroll(sizes);
        (self.scroll_x - old_x).abs() > f64::EPSILON || (self.scroll_y - old_y).abs() > f64::EPSILON
    }

    /// Scroll by delta amounts. Returns true if the position changed.
    pub fn scroll_by(&mut self, delta_x: f64, delta_y: f64, sizes: &SizeIndex) -> bool {
        self.set_scroll(self.scroll_x + delta_x, self.scroll_y + delta_y, sizes)
    }

    /// Scroll the minimum amount that brings `pos` fully into the data area.
    /// Returns true if the position changed.
    pub fn scroll_into_view(&mut self, pos: CellPos, sizes: &SizeIndex) -> bool {
        let x = Self::reveal(
            self.scroll_x,
            self.data_extent(Axis::Column),
            sizes.cumulative_offset(Axis::Column, pos.col),
            sizes.cumulative_offset(Axis::Column, pos.col + 1),
        );
        let y = Self::reveal(
            self.scroll_y,
            self.data_extent(Axis::Row),
            sizes.cumulative_offset(Axis::Row, pos.row),
            sizes.cumulative_offset(Axis::Row, pos.row + 1),
        );
        self.set_scroll(x, y, sizes)
    }

    fn reveal(scroll: f64, view: f64, start: f64, end: f64) -> f64 {
        if start < scroll {
            start
        } else if end > scroll + view {
            (end - view).min(start)
        } else {
            scroll
        }
    }

    /// Resize the canvas; the scroll position is re-clamped.
    pub fn resize(&mut self, width: f64, height: f64, sizes: &SizeIndex) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
        self.clamp_scroll(sizes);
    }

    fn index_under(&self, axis: Axis, screen: f64, sizes: &SizeIndex) -> Option<u32> {
        let sheet = self.to_sheet(axis, screen);
        if sheet < 0.0 || sheet >= sizes.total_extent(axis) {
            return None;
        }
        sizes.index_at(axis, sheet)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    fn small_grid() -> (Viewport, SizeIndex) {
        let config = GridConfig {
            total_rows: 100,
            total_cols: 20,
            ..GridConfig::default()
        };
        (
            Viewport::from_config(&config, 850.0, 624.0),
            SizeIndex::new(&config),
        )
    }

    #[test]
    fn test_visible_range_at_origin() {
        let (viewport, sizes) = small_grid();
        // 600px of data at 24px rows: rows 0..25 fill it exactly, row 25 sits on
        // the bottom edge and one more is slack
        let rows = viewport.visible_range(Axis::Row, &sizes);
        assert_eq!(rows.start, 0);
        assert_eq!(rows.end, 27);
        let cols = viewport.visible_range(Axis::Column, &sizes);
        assert_eq!(cols, 0..12);
    }

    #[test]
    fn test_visible_range_clamped_to_grid() {
        let (mut viewport, sizes) = small_grid();
        viewport.set_scroll(0.0, 1_000_000.0, &sizes);
        let rows = viewport.visible_range(Axis::Row, &sizes);
        assert_eq!(rows.end, 100);
        assert_eq!(viewport.scroll_y, 100.0 * 24.0 - 600.0);
    }

    #[test]
    fn test_hit_test_regions() {
        let (viewport, sizes) = small_grid();
        assert_eq!(viewport.hit_test(10.0, 10.0, &sizes), HitTarget::CornerHeader);
        assert_eq!(viewport.hit_test(60.0, 10.0, &sizes), HitTarget::ColumnHeader(0));
        assert_eq!(viewport.hit_test(10.0, 30.0, &sizes), HitTarget::RowHeader(0));
        assert_eq!(
            viewport.hit_test(50.0 + 80.0 * 2.0 + 5.0, 24.0 + 24.0 * 3.0 + 5.0, &sizes),
            HitTarget::Cell(CellPos::new(3, 2))
        );
        assert_eq!(viewport.hit_test(-1.0, 30.0, &sizes), HitTarget::None);
        assert_eq!(viewport.hit_test(900.0, 30.0, &sizes), HitTarget::None);
    }

    #[test]
    fn test_past_last_column_is_none() {
        let config = GridConfig {
            total_rows: 5,
            total_cols: 2,
            ..GridConfig::default()
        };
        let viewport = Viewport::from_config(&config, 800.0, 600.0);
        let sizes = SizeIndex::new(&config);
        assert_eq!(viewport.resolve_cell(50.0 + 170.0, 30.0, &sizes), None);
        assert_eq!(viewport.resolve_cell(60.0, 24.0 + 5.0 * 24.0 + 1.0, &sizes), None);
    }

    #[test]
    fn test_pixel_origin_accounts_for_scroll() {
        let (mut viewport, sizes) = small_grid();
        viewport.set_scroll(80.0, 48.0, &sizes);
        let origin = viewport.pixel_origin(CellPos::new(2, 1), &sizes);
        assert_eq!(origin, Point { x: 50.0, y: 24.0 });
    }

    #[test]
    fn test_scroll_into_view_down_and_back() {
        let (mut viewport, sizes) = small_grid();
        assert!(viewport.scroll_into_view(CellPos::new(30, 0), &sizes));
        // bottom edge of row 30 aligned with the bottom of the data area
        assert_eq!(viewport.scroll_y, 31.0 * 24.0 - 600.0);
        assert!(viewport.scroll_into_view(CellPos::new(2, 0), &sizes));
        assert_eq!(viewport.scroll_y, 48.0);
        assert!(!viewport.scroll_into_view(CellPos::new(3, 0), &sizes));
    }

    #[test]
    fn test_index_at_clamped_outside_canvas() {
        let (viewport, sizes) = small_grid();
        assert_eq!(viewport.index_at_clamped(Axis::Row, -100.0, &sizes), 0);
        assert_eq!(viewport.index_at_clamped(Axis::Row, 10_000.0, &sizes), 24);
    }
}
