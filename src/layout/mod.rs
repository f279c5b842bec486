//! Layout engine for cell positions and viewport management.
//!
//! This module handles:
//! - Per-axis sizes with a Fenwick tree for O(log n) cumulative offsets
//! - Viewport state (scroll position, canvas size, header bands)
//! - Pixel ↔ cell mapping and visible range queries

mod size_index;
mod viewport;

pub use size_index::{AxisSizes, SizeIndex};
pub use viewport::{visible_range, CellRect, HitTarget, Point, Viewport};
