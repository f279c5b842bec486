//! Integration tests for size indexing, viewport mapping and header resize.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::float_cmp,
    clippy::cast_lossless,
    clippy::cast_precision_loss
)]

mod common;

use common::{grid, grid_sized, HEIGHT, WIDTH};
use test_case::test_case;
use vastgrid::{Axis, CellPos, GridConfig, HitTarget, Modifiers, SizeIndex};

const NONE: Modifiers = Modifiers::NONE;

#[test]
fn offsets_differ_by_exactly_the_size() {
    let config = GridConfig::default();
    let mut sizes = SizeIndex::new(&config);
    for (i, row) in [0u32, 3, 17, 999, 50_000, 99_999].into_iter().enumerate() {
        sizes.set(Axis::Row, row, 30.0 + 7.0 * i as f64);
    }
    sizes.set(Axis::Column, 4, 200.0);

    for axis in [Axis::Row, Axis::Column] {
        let count = config.count(axis);
        for index in [0, 1, 3, 4, 17, 499] {
            let diff =
                sizes.cumulative_offset(axis, index + 1) - sizes.cumulative_offset(axis, index);
            assert_eq!(diff, sizes.get(axis, index), "{axis:?} {index}");
        }
        assert_eq!(
            sizes.cumulative_offset(axis, count),
            sizes.total_extent(axis)
        );
    }
}

#[test]
fn total_extent_tracks_overrides() {
    let config = GridConfig::default();
    let mut sizes = SizeIndex::new(&config);
    assert_eq!(sizes.total_extent(Axis::Row), 100_000.0 * 24.0);
    sizes.set(Axis::Row, 10, 100.0);
    assert_eq!(sizes.total_extent(Axis::Row), 100_000.0 * 24.0 + 76.0);
    assert_eq!(sizes.total_extent(Axis::Column), 500.0 * 80.0);
}

#[test]
fn index_at_finds_the_containing_line() {
    let config = GridConfig::default();
    let mut sizes = SizeIndex::new(&config);
    sizes.set(Axis::Row, 1, 100.0);
    assert_eq!(sizes.index_at(Axis::Row, 0.0), Some(0));
    assert_eq!(sizes.index_at(Axis::Row, 23.9), Some(0));
    assert_eq!(sizes.index_at(Axis::Row, 24.0), Some(1));
    assert_eq!(sizes.index_at(Axis::Row, 123.0), Some(1));
    assert_eq!(sizes.index_at(Axis::Row, 124.0), Some(2));
    // past the end clamps to the last row
    assert_eq!(
        sizes.index_at(Axis::Row, sizes.total_extent(Axis::Row) + 10.0),
        Some(99_999)
    );
}

#[test_case(0.0, 0.0; "unscrolled")]
#[test_case(1_000.0, 37.0; "mid sheet")]
#[test_case(2_399_400.0, 39_400.0; "far corner")]
fn origin_and_resolve_agree(scroll_top: f64, scroll_left: f64) {
    let mut g = grid();
    g.on_scroll(scroll_top, scroll_left);
    let rows = g.visible_row_range();
    let cols = g.visible_col_range();
    for row in [rows.start, rows.start + 3, rows.end - 3] {
        for col in [cols.start, cols.start + 1, cols.end - 2] {
            let pos = CellPos::new(row, col);
            let origin = g.pixel_origin(pos);
            if origin.x < 50.0
                || origin.y < 24.0
                || origin.x + 1.0 >= WIDTH
                || origin.y + 1.0 >= HEIGHT
            {
                // clipped by a header or the canvas edge
                continue;
            }
            assert_eq!(g.resolve_cell(origin.x + 1.0, origin.y + 1.0), Some(pos));
        }
    }
}

#[test]
fn headers_resolve_to_no_cell() {
    let g = grid();
    assert_eq!(g.resolve_cell(10.0, 100.0), None);
    assert_eq!(g.resolve_cell(100.0, 10.0), None);
    assert_eq!(g.hit_test(10.0, 10.0), HitTarget::CornerHeader);
    assert_eq!(g.hit_test(10.0, 100.0), HitTarget::RowHeader(3));
    assert_eq!(g.hit_test(100.0, 10.0), HitTarget::ColumnHeader(0));
}

#[test]
fn points_past_the_last_line_resolve_to_no_cell() {
    let g = grid_sized(5, 3);
    // 3 columns end at x = 50 + 240
    assert_eq!(g.resolve_cell(300.0, 30.0), None);
    // 5 rows end at y = 24 + 120
    assert_eq!(g.resolve_cell(60.0, 150.0), None);
    assert_eq!(g.resolve_cell(60.0, 140.0), Some(CellPos::new(4, 0)));
}

#[test]
fn visible_range_includes_partial_trailing_line() {
    let g = grid();
    // 576px of data area over 24px rows: 24 full rows + slack
    let rows = g.visible_row_range();
    assert_eq!(rows.start, 0);
    assert!(rows.end >= 25);
    assert!(rows.end <= 27);
}

#[test]
fn hover_cursor_over_header_boundaries() {
    let g = grid();
    assert_eq!(g.hover_cursor(130.0, 10.0), "col-resize");
    assert_eq!(g.hover_cursor(25.0, 96.0), "row-resize");
    assert_eq!(g.hover_cursor(90.0, 10.0), "default");
    // boundaries inside the data area are not handles
    assert_eq!(g.hover_cursor(130.0, 100.0), "default");
}

#[test]
fn row_resize_clamps_to_the_floor() {
    let mut g = grid();
    // trailing edge of row 2 is at sheet y = 72, screen y = 96
    assert!(g.on_pointer_down(25.0, 96.0, NONE));
    assert!(g.is_resizing());
    g.on_pointer_move(25.0, 56.0, NONE);
    assert_eq!(g.size(Axis::Row, 2), 16.0);
    g.on_pointer_move(25.0, 0.0, NONE);
    assert_eq!(g.size(Axis::Row, 2), 16.0);
    assert!(g.on_pointer_up(25.0, 0.0, NONE));
    assert!(!g.is_resizing());
    assert_eq!(g.size(Axis::Row, 2), 16.0);
}

#[test]
fn column_resize_is_one_history_entry() {
    let mut g = grid();
    let version = g.layout_version();
    // boundary between columns 0 and 1
    assert!(g.on_pointer_down(130.0, 10.0, NONE));
    for x in [140.0, 160.0, 200.0, 230.0] {
        g.on_pointer_move(x, 12.0, NONE);
    }
    g.on_pointer_up(230.0, 12.0, NONE);
    assert_eq!(g.size(Axis::Column, 0), 180.0);
    assert!(g.layout_version() > version);
    assert_eq!(g.history().len(), 1);

    assert!(g.undo());
    assert_eq!(g.size(Axis::Column, 0), 80.0);
    assert!(!g.can_undo());
    assert!(g.redo());
    assert_eq!(g.size(Axis::Column, 0), 180.0);
}

#[test]
fn resize_back_to_start_records_nothing() {
    let mut g = grid();
    g.on_pointer_down(130.0, 10.0, NONE);
    g.on_pointer_move(170.0, 10.0, NONE);
    g.on_pointer_move(130.0, 10.0, NONE);
    g.on_pointer_up(130.0, 10.0, NONE);
    assert_eq!(g.size(Axis::Column, 0), 80.0);
    assert!(!g.can_undo());
}

#[test]
fn cancelled_resize_restores_the_size() {
    let mut g = grid();
    g.on_pointer_down(25.0, 48.0, NONE);
    g.on_pointer_move(25.0, 90.0, NONE);
    assert_eq!(g.size(Axis::Row, 0), 66.0);
    assert!(g.on_pointer_cancel());
    assert_eq!(g.size(Axis::Row, 0), 24.0);
    assert!(!g.is_resizing());
    assert!(!g.can_undo());
}

#[test]
fn resize_commits_an_open_edit_first() {
    let mut g = grid();
    g.on_key_down("q", NONE);
    assert!(g.is_editing());
    g.on_pointer_down(130.0, 10.0, NONE);
    assert!(!g.is_editing());
    assert_eq!(g.cell_value(CellPos::new(0, 0)), "q");
    g.on_pointer_up(130.0, 10.0, NONE);
}
