//! Edge-triggered autoscroll while dragging.
//!
//! The controller only decides *whether* and *which way* to scroll. The tick
//! itself is driven from outside (the wasm handle owns an interval timer) so
//! the engine stays deterministic under test.

use crate::config::GridConfig;
use crate::layout::{Point, SizeIndex, Viewport};
use crate::selection::DragState;
use crate::types::Axis;

/// Per-axis scroll direction: -1, 0 or 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollDirection {
    pub x: i8,
    pub y: i8,
}

impl ScrollDirection {
    pub fn is_zero(self) -> bool {
        self.x == 0 && self.y == 0
    }
}

/// Autoscroll state: active while a drag holds the pointer in an edge band.
#[derive(Debug, Clone)]
pub struct AutoScroller {
    edge: f64,
    step: f64,
    interval_ms: u32,
    direction: Option<ScrollDirection>,
}

impl AutoScroller {
    pub fn new(config: &GridConfig) -> Self {
        Self {
            edge: config.autoscroll_edge,
            step: config.autoscroll_step,
            interval_ms: config.autoscroll_interval_ms,
            direction: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.direction.is_some()
    }

    pub fn direction(&self) -> Option<ScrollDirection> {
        self.direction
    }

    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    /// Re-evaluate after a pointer move. Row-header drags only scroll
    /// vertically and column-header drags only horizontally. Returns whether
    /// autoscroll is active afterwards.
    pub fn update(&mut self, pointer: Point, viewport: &Viewport, drag: DragState) -> bool {
        let mut direction = ScrollDirection {
            x: self.edge_direction(pointer.x, viewport.extent(Axis::Column)),
            y: self.edge_direction(pointer.y, viewport.extent(Axis::Row)),
        };
        match drag {
            DragState::Idle => direction = ScrollDirection::default(),
            DragState::DraggingCell => {}
            DragState::DraggingRowHeader => direction.x = 0,
            DragState::DraggingColHeader => direction.y = 0,
        }
        let was_active = self.is_active();
        self.direction = (!direction.is_zero()).then_some(direction);
        if was_active != self.is_active() {
            tracing::debug!(active = self.is_active(), "autoscroll");
        }
        self.is_active()
    }

    /// Stop scrolling. Returns true if autoscroll was active.
    pub fn cancel(&mut self) -> bool {
        self.direction.take().is_some()
    }

    /// Advance the scroll position by one step. Returns true if it moved.
    pub fn tick(&self, viewport: &mut Viewport, sizes: &SizeIndex) -> bool {
        let Some(direction) = self.direction else {
            return false;
        };
        let moved = viewport.scroll_by(
            f64::from(direction.x) * self.step,
            f64::from(direction.y) * self.step,
            sizes,
        );
        tracing::trace!(
            moved,
            scroll_x = viewport.scroll_x,
            scroll_y = viewport.scroll_y,
            "autoscroll tick"
        );
        moved
    }

    fn edge_direction(&self, pos: f64, extent: f64) -> i8 {
        if pos < self.edge {
            -1
        } else if pos > extent - self.edge {
            1
        } else {
            0
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;

    fn setup() -> (AutoScroller, Viewport, SizeIndex) {
        let config = GridConfig::default();
        (
            AutoScroller::new(&config),
            Viewport::from_config(&config, 800.0, 600.0),
            SizeIndex::new(&config),
        )
    }

    #[test]
    fn test_inside_viewport_is_inactive() {
        let (mut auto, viewport, _) = setup();
        assert!(!auto.update(Point::new(400.0, 300.0), &viewport, DragState::DraggingCell));
    }

    #[test]
    fn test_bottom_edge_scrolls_down() {
        let (mut auto, mut viewport, sizes) = setup();
        assert!(auto.update(Point::new(400.0, 590.0), &viewport, DragState::DraggingCell));
        assert_eq!(auto.direction(), Some(ScrollDirection { x: 0, y: 1 }));
        assert!(auto.tick(&mut viewport, &sizes));
        assert_eq!(viewport.scroll_y, 20.0);
    }

    #[test]
    fn test_top_edge_at_origin_does_not_move() {
        let (mut auto, mut viewport, sizes) = setup();
        assert!(auto.update(Point::new(400.0, 5.0), &viewport, DragState::DraggingCell));
        assert!(!auto.tick(&mut viewport, &sizes));
        assert_eq!(viewport.scroll_y, 0.0);
    }

    #[test]
    fn test_header_drags_are_single_axis() {
        let (mut auto, viewport, _) = setup();
        let corner = Point::new(795.0, 595.0);
        auto.update(corner, &viewport, DragState::DraggingRowHeader);
        assert_eq!(auto.direction(), Some(ScrollDirection { x: 0, y: 1 }));
        auto.update(corner, &viewport, DragState::DraggingColHeader);
        assert_eq!(auto.direction(), Some(ScrollDirection { x: 1, y: 0 }));
        assert!(!auto.update(corner, &viewport, DragState::Idle));
    }

    #[test]
    fn test_leaving_band_cancels() {
        let (mut auto, viewport, _) = setup();
        auto.update(Point::new(790.0, 300.0), &viewport, DragState::DraggingCell);
        assert!(auto.is_active());
        auto.update(Point::new(400.0, 300.0), &viewport, DragState::DraggingCell);
        assert!(!auto.is_active());
        assert!(!auto.cancel());
    }
}
