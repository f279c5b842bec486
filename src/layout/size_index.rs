//! Per-axis sizes with O(log n) cumulative offsets.
//!
//! Sizes are sparse overrides on top of a default. A Fenwick tree over the
//! effective sizes gives prefix sums and "which index holds pixel P" in
//! O(log n), and a `set` is a single point update, so a resize is visible to
//! the very next query without rebuilding anything.

use std::collections::BTreeMap;

use crate::config::GridConfig;
use crate::types::Axis;

/// Sizes along one axis.
#[derive(Debug, Clone)]
pub struct AxisSizes {
    default_size: f64,
    min_size: f64,
    len: u32,
    overrides: BTreeMap<u32, f64>,
    /// 1-based Fenwick tree; `tree[0]` is unused.
    tree: Vec<f64>,
    /// Bumped on every mutation; consumers compare it to detect stale caches.
    version: u64,
}

impl AxisSizes {
    /// Create `len` entries of `default_size` (clamped to `min_size`).
    pub fn new(len: u32, default_size: f64, min_size: f64) -> Self {
        let mut sizes = Self {
            default_size: default_size.max(min_size),
            min_size,
            len,
            overrides: BTreeMap::new(),
            tree: Vec::new(),
            version: 0,
        };
        sizes.rebuild();
        sizes
    }

    pub fn len(&self) -> u32 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn default_size(&self) -> f64 {
        self.default_size
    }

    pub fn min_size(&self) -> f64 {
        self.min_size
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Size of `index`, or the default if it was never set.
    pub fn get(&self, index: u32) -> f64 {
        self.overrides
            .get(&index)
            .copied()
            .unwrap_or(self.default_size)
    }

    /// Explicit override for `index`, if any.
    pub fn override_of(&self, index: u32) -> Option<f64> {
        self.overrides.get(&index).copied()
    }

    /// Set the size of `index`, rounded to whole pixels and clamped to the
    /// floor. Returns the size actually stored. Out-of-range indices are ignored.
    pub fn set(&mut self, index: u32, size: f64) -> f64 {
        let size = self.clamp(size);
        if index >= self.len {
            return size;
        }
        let old = self.get(index);
        self.overrides.insert(index, size);
        self.add(index, size - old);
        self.version += 1;
        size
    }

    /// Put back a previously captured override (`None` = back to default).
    pub fn restore(&mut self, index: u32, value: Option<f64>) {
        match value {
            Some(size) => {
                self.set(index, size);
            }
            None => {
                if index >= self.len {
                    return;
                }
                let old = self.get(index);
                self.overrides.remove(&index);
                self.add(index, self.default_size - old);
                self.version += 1;
            }
        }
    }

    /// Pixel offset of the leading edge of `index`. `offset(len)` is the
    /// total extent.
    pub fn offset(&self, index: u32) -> f64 {
        let mut i = index.min(self.len) as usize;
        let mut sum = 0.0;
        while i > 0 {
            sum += self.tree.get(i).copied().unwrap_or(0.0);
            i -= lowbit(i);
        }
        sum
    }

    /// Sum of every size on the axis.
    pub fn total(&self) -> f64 {
        self.offset(self.len)
    }

    /// Index whose span `[offset(i), offset(i+1))` contains `pixel`,
    /// clamped to `[0, len)`. Returns `None` only for an empty axis.
    pub fn index_at(&self, pixel: f64) -> Option<u32> {
        if self.len == 0 {
            return None;
        }
        if pixel <= 0.0 {
            return Some(0);
        }
        let n = self.len as usize;
        let mut pos = 0usize;
        let mut remaining = pixel;
        let mut step = 1usize << (usize::BITS - 1 - n.leading_zeros());
        while step > 0 {
            let next = pos + step;
            if next <= n {
                let span = self.tree.get(next).copied().unwrap_or(0.0);
                if span <= remaining {
                    pos = next;
                    remaining -= span;
                }
            }
            step >>= 1;
        }
        // `pos` items end at or before `pixel`, so `pixel` lies in item `pos`.
        let last = self.len - 1;
        Some(u32::try_from(pos).map_or(last, |p| p.min(last)))
    }

    /// Shift overrides at or after `at` one index forward. The override that
    /// falls off the end (if any) is returned.
    pub fn insert_line(&mut self, at: u32) -> Option<f64> {
        let tail = self.overrides.split_off(&at);
        let mut dropped = None;
        for (index, size) in tail {
            if index + 1 >= self.len {
                dropped = Some(size);
            } else {
                self.overrides.insert(index + 1, size);
            }
        }
        self.rebuild();
        dropped
    }

    /// Inverse of [`AxisSizes::insert_line`].
    pub fn remove_line(&mut self, at: u32, dropped: Option<f64>) {
        let tail = self.overrides.split_off(&at);
        for (index, size) in tail {
            if index > at {
                self.overrides.insert(index - 1, size);
            }
        }
        if let (Some(size), Some(last)) = (dropped, self.len.checked_sub(1)) {
            self.overrides.insert(last, size);
        }
        self.rebuild();
    }

    fn clamp(&self, size: f64) -> f64 {
        if size.is_finite() {
            size.round().max(self.min_size)
        } else {
            self.default_size
        }
    }

    fn add(&mut self, index: u32, delta: f64) {
        if delta.abs() < f64::EPSILON {
            return;
        }
        let n = self.len as usize;
        let mut i = index as usize + 1;
        while i <= n {
            if let Some(slot) = self.tree.get_mut(i) {
                *slot += delta;
            }
            i += lowbit(i);
        }
    }

    /// O(n) construction of the Fenwick tree from the effective sizes.
    fn rebuild(&mut self) {
        let n = self.len as usize;
        let mut tree = vec![0.0; n + 1];
        for index in 0..self.len {
            let i = index as usize + 1;
            let size = self.get(index);
            let Some(slot) = tree.get_mut(i) else {
                continue;
            };
            *slot += size;
            let carried = *slot;
            let parent = i + lowbit(i);
            if let Some(up) = tree.get_mut(parent) {
                *up += carried;
            }
        }
        self.tree = tree;
        self.version += 1;
    }
}

fn lowbit(i: usize) -> usize {
    i & i.wrapping_neg()
}

/// Row and column sizes for one sheet.
#[derive(Debug, Clone)]
pub struct SizeIndex {
    rows: AxisSizes,
    cols: AxisSizes,
}

impl SizeIndex {
    pub fn new(config: &GridConfig) -> Self {
        Self {
            rows: AxisSizes::new(
                config.total_rows,
                config.default_row_height,
                config.min_row_height,
            ),
            cols: AxisSizes::new(
                config.total_cols,
                config.default_col_width,
                config.min_col_width,
            ),
        }
    }

    pub fn axis(&self, axis: Axis) -> &AxisSizes {
        match axis {
            Axis::Row => &self.rows,
            Axis::Column => &self.cols,
        }
    }

    pub fn axis_mut(&mut self, axis: Axis) -> &mut AxisSizes {
        match axis {
            Axis::Row => &mut self.rows,
            Axis::Column => &mut self.cols,
        }
    }

    pub fn rows(&self) -> &AxisSizes {
        &self.rows
    }

    pub fn cols(&self) -> &AxisSizes {
        &self.cols
    }

    pub fn get(&self, axis: Axis, index: u32) -> f64 {
        self.axis(axis).get(index)
    }

    /// Set a size (clamped to the axis floor); returns the stored size.
    pub fn set(&mut self, axis: Axis, index: u32, size: f64) -> f64 {
        self.axis_mut(axis).set(index, size)
    }

    pub fn cumulative_offset(&self, axis: Axis, index: u32) -> f64 {
        self.axis(axis).offset(index)
    }

    pub fn total_extent(&self, axis: Axis) -> f64 {
        self.axis(axis).total()
    }

    pub fn index_at(&self, axis: Axis, pixel: f64) -> Option<u32> {
        self.axis(axis).index_at(pixel)
    }

    /// Combined change counter for both axes.
    pub fn version(&self) -> u64 {
        self.rows.version() + self.cols.version()
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

    #[test]
    fn test_defaults() {
        let sizes = AxisSizes::new(10, 24.0, 16.0);
        assert_eq!(sizes.get(3), 24.0);
        assert_eq!(sizes.offset(0), 0.0);
        assert_eq!(sizes.offset(4), 96.0);
        assert_eq!(sizes.total(), 240.0);
    }

    #[test]
    fn test_set_updates_offsets_immediately() {
        let mut sizes = AxisSizes::new(10, 24.0, 16.0);
        sizes.set(2, 40.0);
        assert_eq!(sizes.offset(2), 48.0);
        assert_eq!(sizes.offset(3), 88.0);
        assert_eq!(sizes.total(), 256.0);
    }

    #[test]
    fn test_set_clamps_to_floor() {
        let mut sizes = AxisSizes::new(10, 24.0, 16.0);
        assert_eq!(sizes.set(2, 3.0), 16.0);
        assert_eq!(sizes.get(2), 16.0);
        assert_eq!(sizes.set(2, -50.0), 16.0);
    }

    #[test]
    fn test_offset_differences_equal_sizes() {
        let mut sizes = AxisSizes::new(1000, 24.0, 16.0);
        for (i, s) in [(0, 30.0), (7, 100.0), (8, 17.0), (500, 64.0), (999, 200.0)] {
            sizes.set(i, s);
        }
        for i in 0..1000 {
            assert_eq!(sizes.offset(i + 1) - sizes.offset(i), sizes.get(i), "index {i}");
        }
    }

    #[test]
    fn test_index_at_boundaries() {
        let mut sizes = AxisSizes::new(100, 20.0, 16.0);
        sizes.set(1, 50.0);
        assert_eq!(sizes.index_at(-5.0), Some(0));
        assert_eq!(sizes.index_at(0.0), Some(0));
        assert_eq!(sizes.index_at(19.9), Some(0));
        assert_eq!(sizes.index_at(20.0), Some(1));
        assert_eq!(sizes.index_at(69.0), Some(1));
        assert_eq!(sizes.index_at(70.0), Some(2));
        assert_eq!(sizes.index_at(1_000_000.0), Some(99));
    }

    #[test]
    fn test_index_at_matches_offsets() {
        let mut sizes = AxisSizes::new(777, 24.0, 16.0);
        sizes.set(10, 90.0);
        sizes.set(400, 16.0);
        for i in 0..777 {
            assert_eq!(sizes.index_at(sizes.offset(i)), Some(i));
            assert_eq!(sizes.index_at(sizes.offset(i) + 1.0), Some(i));
        }
    }

    #[test]
    fn test_restore_default() {
        let mut sizes = AxisSizes::new(10, 24.0, 16.0);
        sizes.set(4, 60.0);
        sizes.restore(4, None);
        assert_eq!(sizes.override_of(4), None);
        assert_eq!(sizes.total(), 240.0);
    }

    #[test]
    fn test_version_bumps_on_set() {
        let mut sizes = AxisSizes::new(10, 24.0, 16.0);
        let before = sizes.version();
        sizes.set(1, 30.0);
        assert!(sizes.version() > before);
    }

    #[test]
    fn test_insert_line_shifts_overrides() {
        let mut sizes = AxisSizes::new(5, 24.0, 16.0);
        sizes.set(1, 40.0);
        sizes.set(4, 50.0);
        let dropped = sizes.insert_line(1);
        assert_eq!(dropped, Some(50.0));
        assert_eq!(sizes.get(1), 24.0);
        assert_eq!(sizes.get(2), 40.0);
        assert_eq!(sizes.total(), 24.0 * 4.0 + 40.0);

        sizes.remove_line(1, dropped);
        assert_eq!(sizes.get(1), 40.0);
        assert_eq!(sizes.get(4), 50.0);
        assert_eq!(sizes.total(), 24.0 * 3.0 + 90.0);
    }

    #[test]
    fn test_grid_scale_extent() {
        let sizes = SizeIndex::new(&GridConfig::default());
        assert_eq!(sizes.total_extent(Axis::Row), 100_000.0 * 24.0);
        assert_eq!(sizes.total_extent(Axis::Column), 500.0 * 80.0);
        assert_eq!(sizes.index_at(Axis::Row, 2_399_999.0), Some(99_999));
    }
}
