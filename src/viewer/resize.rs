//! Drag-to-resize for rows and columns.
//!
//! A handle is the trailing boundary of a header cell. Hit testing looks up
//! the index under the pointer through the size index and compares the
//! pointer with that index's two boundaries, so it costs O(log n) regardless
//! of how far the sheet is scrolled.

use crate::editor::Command;
use crate::layout::{Point, SizeIndex, Viewport};
use crate::types::Axis;

/// A boundary that can be dragged: the trailing edge of `index` on `axis`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeHandle {
    pub axis: Axis,
    pub index: u32,
}

impl ResizeHandle {
    /// CSS cursor for hovering this handle.
    pub fn cursor(self) -> &'static str {
        match self.axis {
            Axis::Row => "row-resize",
            Axis::Column => "col-resize",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ActiveResize {
    handle: ResizeHandle,
    start_pointer: f64,
    start_size: f64,
    /// Override in place before the drag (`None` = default size).
    before: Option<f64>,
}

/// Resize drag state machine: idle or dragging one handle.
#[derive(Debug, Clone, Default)]
pub struct ResizeController {
    active: Option<ActiveResize>,
}

impl ResizeController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Find the handle within `tolerance` pixels of a screen point. Only
    /// points inside a header band can grab a handle.
    pub fn hit_test(
        point: Point,
        viewport: &Viewport,
        sizes: &SizeIndex,
        tolerance: f64,
    ) -> Option<ResizeHandle> {
        [Axis::Column, Axis::Row]
            .into_iter()
            .find_map(|axis| Self::hit_axis(axis, point, viewport, sizes, tolerance))
    }

    fn hit_axis(
        axis: Axis,
        point: Point,
        viewport: &Viewport,
        sizes: &SizeIndex,
        tolerance: f64,
    ) -> Option<ResizeHandle> {
        // column handles live in the top band, row handles in the left band
        let across = point.along(axis.other());
        let along = point.along(axis);
        if across < 0.0 || across >= viewport.header(axis.other()) {
            return None;
        }
        if along < viewport.header(axis) || along >= viewport.extent(axis) {
            return None;
        }
        let sheet = viewport.to_sheet(axis, along);
        let index = sizes.index_at(axis, sheet)?;
        let trailing = sizes.cumulative_offset(axis, index + 1);
        if (sheet - trailing).abs() <= tolerance {
            return Some(ResizeHandle { axis, index });
        }
        let leading = sizes.cumulative_offset(axis, index);
        match index.checked_sub(1) {
            Some(prev) if (sheet - leading).abs() <= tolerance => Some(ResizeHandle {
                axis,
                index: prev,
            }),
            _ => None,
        }
    }

    /// Cursor to show at a screen point.
    pub fn hover_cursor(
        point: Point,
        viewport: &Viewport,
        sizes: &SizeIndex,
        tolerance: f64,
    ) -> &'static str {
        Self::hit_test(point, viewport, sizes, tolerance).map_or("default", ResizeHandle::cursor)
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_handle(&self) -> Option<ResizeHandle> {
        self.active.map(|a| a.handle)
    }

    /// Capture the start pointer position and start size.
    pub fn begin(&mut self, handle: ResizeHandle, pointer: Point, sizes: &SizeIndex) {
        let axis_sizes = sizes.axis(handle.axis);
        self.active = Some(ActiveResize {
            handle,
            start_pointer: pointer.along(handle.axis),
            start_size: axis_sizes.get(handle.index),
            before: axis_sizes.override_of(handle.index),
        });
    }

    /// Follow the pointer: `size = max(floor, start_size + delta)`. Returns
    /// true if the stored size changed.
    pub fn update(&mut self, pointer: Point, sizes: &mut SizeIndex) -> bool {
        let Some(active) = self.active else {
            return false;
        };
        let ResizeHandle { axis, index } = active.handle;
        let delta = pointer.along(axis) - active.start_pointer;
        let old = sizes.get(axis, index);
        let new = sizes.set(axis, index, active.start_size + delta);
        (new - old).abs() > f64::EPSILON
    }

    /// Finish the drag. Returns the command to record, or `None` if the size
    /// ended where it started.
    pub fn end(&mut self, sizes: &mut SizeIndex) -> Option<Command> {
        let active = self.active.take()?;
        let ResizeHandle { axis, index } = active.handle;
        let after = sizes.get(axis, index);
        if (after - active.start_size).abs() < f64::EPSILON {
            sizes.axis_mut(axis).restore(index, active.before);
            return None;
        }
        tracing::debug!(?axis, index, after, "resize committed");
        Some(Command::resize(axis, index, active.before, after))
    }

    /// Abort the drag and put the start size back. Returns true if a drag
    /// was in progress.
    pub fn cancel(&mut self, sizes: &mut SizeIndex) -> bool {
        let Some(active) = self.active.take() else {
            return false;
        };
        let ResizeHandle { axis, index } = active.handle;
        sizes.axis_mut(axis).restore(index, active.before);
        true
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::config::GridConfig;

    fn setup() -> (Viewport, SizeIndex) {
        let config = GridConfig {
            total_rows: 1000,
            total_cols: 50,
            ..GridConfig::default()
        };
        (
            Viewport::from_config(&config, 800.0, 600.0),
            SizeIndex::new(&config),
        )
    }

    #[test]
    fn test_hit_column_boundary_within_tolerance() {
        let (viewport, sizes) = setup();
        // right edge of column 1 is at 50 + 160
        for x in [208.0, 210.0, 212.0] {
            assert_eq!(
                ResizeController::hit_test(Point::new(x, 10.0), &viewport, &sizes, 2.0),
                Some(ResizeHandle {
                    axis: Axis::Column,
                    index: 1
                })
            );
        }
        assert_eq!(
            ResizeController::hit_test(Point::new(214.0, 10.0), &viewport, &sizes, 2.0),
            None
        );
    }

    #[test]
    fn test_hit_row_boundary_when_scrolled() {
        let (mut viewport, sizes) = setup();
        viewport.set_scroll(0.0, 24.0 * 500.0, &sizes);
        // bottom edge of row 500 is one row below the header band
        let hit = ResizeController::hit_test(Point::new(10.0, 48.0), &viewport, &sizes, 2.0);
        assert_eq!(
            hit,
            Some(ResizeHandle {
                axis: Axis::Row,
                index: 500
            })
        );
    }

    #[test]
    fn test_data_area_is_not_a_handle() {
        let (viewport, sizes) = setup();
        assert_eq!(
            ResizeController::hit_test(Point::new(210.0, 100.0), &viewport, &sizes, 2.0),
            None
        );
        assert_eq!(
            ResizeController::hover_cursor(Point::new(210.0, 100.0), &viewport, &sizes, 2.0),
            "default"
        );
        assert_eq!(
            ResizeController::hover_cursor(Point::new(210.0, 10.0), &viewport, &sizes, 2.0),
            "col-resize"
        );
    }

    #[test]
    fn test_drag_clamps_to_floor() {
        let (_, mut sizes) = setup();
        let mut resize = ResizeController::new();
        let handle = ResizeHandle {
            axis: Axis::Row,
            index: 2,
        };
        resize.begin(handle, Point::new(10.0, 96.0), &sizes);
        resize.update(Point::new(10.0, 40.0), &mut sizes);
        assert_eq!(sizes.get(Axis::Row, 2), 16.0);

        let Some(Command::Resize { before, after, .. }) = resize.end(&mut sizes) else {
            panic!("expected a resize command");
        };
        assert_eq!(before, None);
        assert_eq!(after, 16.0);
        assert!(!resize.is_active());
    }

    #[test]
    fn test_cancel_restores_start_size() {
        let (_, mut sizes) = setup();
        sizes.set(Axis::Column, 4, 120.0);
        let mut resize = ResizeController::new();
        let handle = ResizeHandle {
            axis: Axis::Column,
            index: 4,
        };
        resize.begin(handle, Point::new(500.0, 10.0), &sizes);
        assert!(resize.update(Point::new(560.0, 10.0), &mut sizes));
        assert_eq!(sizes.get(Axis::Column, 4), 180.0);
        assert!(resize.cancel(&mut sizes));
        assert_eq!(sizes.get(Axis::Column, 4), 120.0);
        assert!(!resize.cancel(&mut sizes));
    }

    #[test]
    fn test_drag_back_to_start_records_nothing() {
        let (_, mut sizes) = setup();
        let mut resize = ResizeController::new();
        let handle = ResizeHandle {
            axis: Axis::Column,
            index: 0,
        };
        resize.begin(handle, Point::new(130.0, 10.0), &sizes);
        resize.update(Point::new(170.0, 10.0), &mut sizes);
        resize.update(Point::new(130.0, 10.0), &mut sizes);
        assert!(resize.end(&mut sizes).is_none());
        assert_eq!(sizes.axis(Axis::Column).override_of(0), None);
    }
}
