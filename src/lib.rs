//! vastgrid - virtualized grid interaction engine
//!
//! The engine behind a canvas spreadsheet of up to 100,000 rows × 500
//! columns that never materializes more than the visible cells:
//! - Pixel ↔ cell mapping under variable row heights and column widths
//! - Cell, row, column and range selection driven by pointer and keyboard
//! - Drag-to-resize headers and drag-to-autoscroll
//! - In-place editing, clipboard and bounded undo/redo over sparse cells
//!
//! Painting and DOM wiring belong to the shell; it feeds raw input in and
//! reads visible ranges, selection bounds and cell values back out.
//!
//! # Usage (Rust)
//!
//! ```
//! use vastgrid::{CellPos, GridConfig, GridView, Modifiers};
//!
//! let mut grid = GridView::new(GridConfig::default(), 800.0, 600.0);
//! grid.on_key_down("7", Modifiers::NONE);
//! grid.on_key_down("Enter", Modifiers::NONE);
//! assert_eq!(grid.cell_value(CellPos::new(0, 0)), "7");
//! assert!(grid.undo());
//! ```
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { GridHandle } from 'vastgrid';
//! await init();
//! const grid = new GridHandle(null, canvas.width, canvas.height);
//! ```

pub mod config;
pub mod editor;
pub mod error;
pub mod layout;
pub mod selection;
pub mod sheet;
pub mod stats;
pub mod store;
pub mod table;
pub mod types;
pub mod viewer;
pub mod wasm;

use wasm_bindgen::prelude::*;

pub use config::GridConfig;
pub use editor::{Command, CommandHistory, EditSession, EditState, PendingWrite};
pub use error::{GridError, Result};
pub use layout::{CellRect, HitTarget, Point, SizeIndex, Viewport};
pub use selection::{DragState, SelectionModel};
pub use sheet::Sheet;
pub use stats::SelectionStats;
pub use store::CellStore;
pub use types::*;
pub use viewer::{Clipboard, GridView, Key, Modifiers, Redraw, ResizeHandle};
pub use wasm::GridHandle;

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
