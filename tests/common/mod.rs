//! Shared helpers for the integration tests.
//!
//! Screen coordinates assume the default config: 50px row header,
//! 24px column header, 24px rows, 80px columns, no scroll.
#![allow(dead_code, clippy::cast_lossless)]

use vastgrid::{CellPos, GridConfig, GridView, Modifiers};

pub const WIDTH: f64 = 800.0;
pub const HEIGHT: f64 = 600.0;

/// Full-size grid on an 800×600 canvas.
pub fn grid() -> GridView {
    GridView::new(GridConfig::default(), WIDTH, HEIGHT)
}

/// Grid with custom dimensions, everything else default.
pub fn grid_sized(total_rows: u32, total_cols: u32) -> GridView {
    GridView::new(
        GridConfig {
            total_rows,
            total_cols,
            ..GridConfig::default()
        },
        WIDTH,
        HEIGHT,
    )
}

/// A point a few pixels inside the cell's top-left corner.
pub fn inside(grid: &GridView, pos: CellPos) -> (f64, f64) {
    let origin = grid.pixel_origin(pos);
    (origin.x + 5.0, origin.y + 5.0)
}

pub fn click(grid: &mut GridView, pos: CellPos) {
    let (x, y) = inside(grid, pos);
    grid.on_pointer_down(x, y, Modifiers::NONE);
    grid.on_pointer_up(x, y, Modifiers::NONE);
}

/// Press on `from`, move to `to`, release.
pub fn drag(grid: &mut GridView, from: CellPos, to: CellPos) {
    let (x0, y0) = inside(grid, from);
    let (x1, y1) = inside(grid, to);
    grid.on_pointer_down(x0, y0, Modifiers::NONE);
    grid.on_pointer_move(x1, y1, Modifiers::NONE);
    grid.on_pointer_up(x1, y1, Modifiers::NONE);
}

/// Type `text` into the focused cell and press Enter.
pub fn type_into_focus(grid: &mut GridView, text: &str) {
    for ch in text.chars() {
        grid.on_key_down(&ch.to_string(), Modifiers::NONE);
    }
    grid.on_key_down("Enter", Modifiers::NONE);
}

pub fn ctrl(key: &str, grid: &mut GridView) -> bool {
    grid.on_key_down(key, Modifiers::with_command())
}
