//! `GridView` - the single controller that owns every piece of grid state.
//!
//! The shell feeds it raw input (pointer coordinates, key names, scroll
//! positions) and reads back geometry, selection bounds and cell values.
//! Every cell or size mutation goes through [`CommandHistory`], so anything
//! reachable from here is undoable.
//!
//! Event handlers live in `events.rs`; clipboard, resize and autoscroll
//! helpers in their own modules.

mod clipboard;
mod events;
mod keys;
mod resize;
mod scroll;

pub use clipboard::Clipboard;
pub use keys::{Key, Modifiers};
pub use resize::{ResizeController, ResizeHandle};
pub use scroll::{AutoScroller, ScrollDirection};

use std::fs;
use std::ops::Range;
use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use crate::config::GridConfig;
use crate::editor::{Command, CommandHistory, EditSession};
use crate::error::Result;
use crate::layout::{CellRect, HitTarget, Point, Viewport};
use crate::selection::SelectionModel;
use crate::sheet::Sheet;
use crate::stats::SelectionStats;
use crate::store::CellStore;
use crate::table::table_to_store;
use crate::types::{Axis, Bounds, CellPos, SelectionBounds};

/// Dirty flags handed to the shell's render loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Redraw {
    /// Cell content or geometry changed
    pub content: bool,
    /// Only selection/edit overlays changed
    pub overlay: bool,
}

/// The grid interaction engine.
#[derive(Debug, Clone)]
pub struct GridView {
    config: GridConfig,
    sheet: Sheet,
    viewport: Viewport,
    selection: SelectionModel,
    edit: EditSession,
    history: CommandHistory,
    clipboard: Option<Clipboard>,
    resize: ResizeController,
    autoscroll: AutoScroller,
    /// Last pointer position seen during a drag, re-resolved on autoscroll.
    last_pointer: Option<Point>,
    needs_render: bool,
    needs_overlay_render: bool,
}

impl GridView {
    /// Create an empty grid for a canvas of `width` × `height` pixels.
    pub fn new(config: GridConfig, width: f64, height: f64) -> Self {
        let sheet = Sheet::new(&config);
        GridView {
            viewport: Viewport::from_config(&config, width, height),
            selection: SelectionModel::new(config.total_rows, config.total_cols),
            edit: EditSession::new(),
            history: CommandHistory::new(config.history_capacity),
            clipboard: None,
            resize: ResizeController::new(),
            autoscroll: AutoScroller::new(&config),
            last_pointer: None,
            needs_render: true,
            needs_overlay_render: true,
            sheet,
            config,
        }
    }

    /// Create a grid from a (possibly partial) JSON config.
    ///
    /// # Errors
    /// Returns an error if the config is malformed or invalid.
    pub fn with_config_json(json: &str, width: f64, height: f64) -> Result<Self> {
        Ok(Self::new(GridConfig::from_json(json)?, width, height))
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn sheet(&self) -> &Sheet {
        &self.sheet
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn selection(&self) -> &SelectionModel {
        &self.selection
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    pub fn clipboard(&self) -> Option<&Clipboard> {
        self.clipboard.as_ref()
    }

    // ------------------------------------------------------------------
    // Geometry queries
    // ------------------------------------------------------------------

    /// Cell under a screen point, `None` over headers or outside the grid.
    pub fn resolve_cell(&self, x: f64, y: f64) -> Option<CellPos> {
        self.viewport.resolve_cell(x, y, &self.sheet.sizes)
    }

    pub fn hit_test(&self, x: f64, y: f64) -> HitTarget {
        self.viewport.hit_test(x, y, &self.sheet.sizes)
    }

    /// Screen position of a cell's top-left corner.
    pub fn pixel_origin(&self, pos: CellPos) -> Point {
        self.viewport.pixel_origin(pos, &self.sheet.sizes)
    }

    pub fn cell_rect(&self, pos: CellPos) -> CellRect {
        self.viewport.cell_rect(pos, &self.sheet.sizes)
    }

    pub fn visible_row_range(&self) -> Range<u32> {
        self.viewport.visible_range(Axis::Row, &self.sheet.sizes)
    }

    pub fn visible_col_range(&self) -> Range<u32> {
        self.viewport.visible_range(Axis::Column, &self.sheet.sizes)
    }

    pub fn total_extent(&self, axis: Axis) -> f64 {
        self.sheet.sizes.total_extent(axis)
    }

    pub fn size(&self, axis: Axis, index: u32) -> f64 {
        self.sheet.sizes.get(axis, index)
    }

    /// Change counter for row/column sizes. Renderers cache geometry against it.
    pub fn layout_version(&self) -> u64 {
        self.sheet.sizes.version()
    }

    /// CSS cursor for the pointer position.
    pub fn hover_cursor(&self, x: f64, y: f64) -> &'static str {
        if let Some(handle) = self.resize.active_handle() {
            return handle.cursor();
        }
        ResizeController::hover_cursor(
            Point::new(x, y),
            &self.viewport,
            &self.sheet.sizes,
            self.config.resize_tolerance,
        )
    }

    // ------------------------------------------------------------------
    // Selection and values
    // ------------------------------------------------------------------

    pub fn selection_bounds(&self) -> SelectionBounds {
        self.selection.selection_bounds()
    }

    pub fn header_highlighted(&self, axis: Axis, index: u32) -> bool {
        self.selection.header_highlighted(axis, index)
    }

    pub fn cell_value(&self, pos: CellPos) -> &str {
        self.sheet.cells.value(pos)
    }

    pub fn selection_stats(&self) -> SelectionStats {
        SelectionStats::compute(&self.sheet.cells, self.selection.bounds())
    }

    pub fn select_all(&mut self) {
        self.commit_edit();
        self.selection.select_all();
        self.needs_overlay_render = true;
    }

    // ------------------------------------------------------------------
    // Editing
    // ------------------------------------------------------------------

    pub fn is_editing(&self) -> bool {
        self.edit.is_open()
    }

    pub fn edit_session(&self) -> &EditSession {
        &self.edit
    }

    pub fn edit_text(&self) -> Option<&str> {
        self.edit.text()
    }

    pub fn edit_rect(&self) -> Option<CellRect> {
        self.edit.rect()
    }

    /// Sync the buffer from the shell's input element.
    pub fn set_edit_text(&mut self, text: &str) {
        self.edit.set_text(text);
    }

    /// Open the editor on the focused cell. `seed` replaces the current
    /// value as the initial buffer.
    pub fn begin_edit(&mut self, seed: Option<&str>) {
        let pos = self.selection.focus();
        self.open_editor(pos, seed);
    }

    pub(crate) fn open_editor(&mut self, pos: CellPos, seed: Option<&str>) {
        self.commit_edit();
        if self.viewport.scroll_into_view(pos, &self.sheet.sizes) {
            self.needs_render = true;
        }
        let rect = self.viewport.cell_rect(pos, &self.sheet.sizes);
        self.edit.open(pos, self.sheet.cells.value(pos), seed, rect);
        self.needs_overlay_render = true;
    }

    /// Close the editor, writing the buffer. Returns true if a value changed.
    pub fn commit_edit(&mut self) -> bool {
        let was_open = self.edit.is_open();
        let write = self.edit.close(true);
        if was_open {
            self.needs_overlay_render = true;
        }
        let Some(write) = write else {
            return false;
        };
        let Some(command) = Command::update_cell(&self.sheet, write.pos, &write.value) else {
            return false;
        };
        tracing::debug!(pos = %write.pos, "edit committed");
        self.execute(command);
        true
    }

    /// Close the editor and discard the buffer.
    pub fn cancel_edit(&mut self) {
        if self.edit.is_open() {
            self.edit.close(false);
            self.needs_overlay_render = true;
        }
    }

    // ------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------

    pub fn undo(&mut self) -> bool {
        self.commit_edit();
        let changed = self.history.undo(&mut self.sheet);
        if changed {
            self.after_mutation();
        }
        changed
    }

    pub fn redo(&mut self) -> bool {
        self.commit_edit();
        let changed = self.history.redo(&mut self.sheet);
        if changed {
            self.after_mutation();
        }
        changed
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    fn execute(&mut self, command: Command) {
        self.history.execute(command, &mut self.sheet);
        self.after_mutation();
    }

    fn after_mutation(&mut self) {
        // a resize undo can shrink the sheet under the current scroll
        self.viewport.clamp_scroll(&self.sheet.sizes);
        self.needs_render = true;
        self.needs_overlay_render = true;
    }

    // ------------------------------------------------------------------
    // Clipboard
    // ------------------------------------------------------------------

    /// Snapshot the selection into the clipboard.
    pub fn copy(&mut self) -> bool {
        self.commit_edit();
        self.clipboard = Some(Clipboard::capture(
            &self.sheet.cells,
            self.selection.bounds(),
            false,
        ));
        true
    }

    /// Snapshot the selection, then clear it as one undoable step.
    pub fn cut(&mut self) -> bool {
        self.commit_edit();
        let bounds = self.selection.bounds();
        self.clipboard = Some(Clipboard::capture(&self.sheet.cells, bounds, true));
        if let Some(command) = Command::delete_range(&self.sheet, bounds) {
            self.execute(command);
        }
        true
    }

    /// Paste the clipboard at the selection's top-left cell, clipped to the
    /// grid. The pasted extent becomes the selection. Returns true if any
    /// cell changed.
    pub fn paste(&mut self) -> bool {
        self.commit_edit();
        let Some(clipboard) = self.clipboard.take() else {
            return false;
        };
        let changed = self.paste_clipboard(&clipboard);
        self.clipboard = Some(clipboard);
        changed
    }

    /// Parse tab-separated text (from the system clipboard) and paste it.
    pub fn paste_text(&mut self, text: &str) -> bool {
        self.commit_edit();
        let clipboard = Clipboard::from_tsv(text);
        if clipboard.is_empty() {
            return false;
        }
        let changed = self.paste_clipboard(&clipboard);
        self.clipboard = Some(clipboard);
        changed
    }

    /// Clipboard contents as tab-separated text.
    pub fn clipboard_text(&self) -> Option<String> {
        self.clipboard.as_ref().map(Clipboard::to_tsv)
    }

    fn paste_clipboard(&mut self, clipboard: &Clipboard) -> bool {
        if clipboard.is_empty() {
            return false;
        }
        let origin = self.selection.bounds().top_left();
        let last = self.sheet.clamp(CellPos::new(
            origin.row.saturating_add(clipboard.height() - 1),
            origin.col.saturating_add(clipboard.width() - 1),
        ));
        self.selection.select_range(origin, last);
        self.needs_overlay_render = true;

        let target = Bounds::spanning(origin, last);
        match Command::paste_range(&self.sheet, target, &clipboard.rows) {
            Some(command) => {
                self.execute(command);
                true
            }
            None => false,
        }
    }

    // ------------------------------------------------------------------
    // Structural edits
    // ------------------------------------------------------------------

    /// Clear every cell in the selection.
    pub fn delete_selection(&mut self) -> bool {
        self.commit_edit();
        match Command::delete_range(&self.sheet, self.selection.bounds()) {
            Some(command) => {
                self.execute(command);
                true
            }
            None => false,
        }
    }

    pub fn insert_row(&mut self, at: u32) -> bool {
        self.insert_line(Axis::Row, at)
    }

    pub fn insert_column(&mut self, at: u32) -> bool {
        self.insert_line(Axis::Column, at)
    }

    fn insert_line(&mut self, axis: Axis, at: u32) -> bool {
        self.commit_edit();
        match Command::insert_line(&self.sheet, axis, at) {
            Some(command) => {
                self.execute(command);
                true
            }
            None => false,
        }
    }

    // ------------------------------------------------------------------
    // Load / save
    // ------------------------------------------------------------------

    /// Replace the cell contents with a record table. Malformed input (not
    /// an array, empty, first record not an object) leaves the store as is.
    pub fn load_table(&mut self, table: &Value) -> bool {
        self.commit_edit();
        let Some(store) = table_to_store(table, self.sheet.total_rows(), self.sheet.total_cols())
        else {
            tracing::debug!("table rejected");
            return false;
        };
        tracing::debug!(cells = store.len(), "table loaded");
        self.replace_cells(store)
    }

    /// [`GridView::load_table`] from JSON text.
    ///
    /// # Errors
    /// Returns an error if `json` is not valid JSON.
    pub fn load_table_json(&mut self, json: &str) -> Result<bool> {
        let table: Value = serde_json::from_str(json)?;
        Ok(self.load_table(&table))
    }

    /// [`GridView::load_table_json`] from a file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub fn load_table_file(&mut self, path: impl AsRef<Path>) -> Result<bool> {
        let text = fs::read_to_string(path)?;
        self.load_table_json(&text)
    }

    /// Write [`GridView::state_json`] to a file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be written.
    pub fn save_state_file(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, self.state_json()?)?;
        Ok(())
    }

    /// Persisted form of the cell contents: `{"row,col": value}`.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn state_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.sheet.cells)?)
    }

    /// Replace the cell contents with a persisted `{"row,col": value}` map.
    /// Keys outside the grid are dropped. The replacement is undoable.
    ///
    /// # Errors
    /// Returns an error for malformed JSON or keys that are not `"row,col"`.
    pub fn load_state_json(&mut self, json: &str) -> Result<bool> {
        let mut store: CellStore = serde_json::from_str(json)?;
        store.clip(self.sheet.total_rows(), self.sheet.total_cols());
        self.commit_edit();
        Ok(self.replace_cells(store))
    }

    fn replace_cells(&mut self, store: CellStore) -> bool {
        match Command::replace(&self.sheet, store) {
            Some(command) => {
                self.execute(command);
                true
            }
            None => false,
        }
    }

    // ------------------------------------------------------------------
    // Render bookkeeping
    // ------------------------------------------------------------------

    /// Return and clear the dirty flags.
    pub fn take_redraw(&mut self) -> Redraw {
        let redraw = Redraw {
            content: self.needs_render,
            overlay: self.needs_overlay_render || self.needs_render,
        };
        self.needs_render = false;
        self.needs_overlay_render = false;
        redraw
    }

    /// Whether anything is waiting to be drawn.
    pub fn needs_redraw(&self) -> bool {
        self.needs_render || self.needs_overlay_render
    }

    pub fn invalidate(&mut self) {
        self.needs_render = true;
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::float_cmp,
    clippy::indexing_slicing
)]
mod tests {
    use super::*;
    use crate::types::SelectionMode;
    use serde_json::json;

    fn view() -> GridView {
        GridView::new(GridConfig::default(), 850.0, 624.0)
    }

    #[test]
    fn test_new_view_is_dirty_once() {
        let mut v = view();
        assert_eq!(
            v.take_redraw(),
            Redraw {
                content: true,
                overlay: true
            }
        );
        assert_eq!(v.take_redraw(), Redraw::default());
    }

    #[test]
    fn test_origin_and_resolve_agree() {
        let v = view();
        for pos in [CellPos::new(0, 0), CellPos::new(10, 3), CellPos::new(24, 9)] {
            let origin = v.pixel_origin(pos);
            assert_eq!(v.resolve_cell(origin.x + 1.0, origin.y + 1.0), Some(pos));
        }
    }

    #[test]
    fn test_edit_commit_is_undoable() {
        let mut v = view();
        v.begin_edit(Some("42"));
        assert!(v.is_editing());
        assert!(v.commit_edit());
        assert_eq!(v.cell_value(CellPos::new(0, 0)), "42");
        assert!(v.undo());
        assert_eq!(v.cell_value(CellPos::new(0, 0)), "");
        assert!(v.redo());
        assert_eq!(v.cell_value(CellPos::new(0, 0)), "42");
    }

    #[test]
    fn test_cut_then_paste_moves_values() {
        let mut v = view();
        v.load_table(&json!([{"a": 1, "b": 2}]));
        v.selection.select_range(CellPos::new(0, 0), CellPos::new(1, 1));
        assert!(v.cut());
        assert!(v.sheet().cells().is_empty());

        v.selection.select_cell(CellPos::new(5, 5));
        assert!(v.paste());
        assert_eq!(v.cell_value(CellPos::new(5, 5)), "a");
        assert_eq!(v.cell_value(CellPos::new(6, 6)), "2");
        assert_eq!(v.selection_bounds().mode, SelectionMode::Range);
        assert_eq!(v.selection_bounds().max_row, 6);
        // the cut clipboard stays pasteable
        v.selection.select_cell(CellPos::new(10, 0));
        assert!(v.paste());
        assert_eq!(v.cell_value(CellPos::new(10, 0)), "a");
    }

    #[test]
    fn test_paste_without_clipboard_is_noop() {
        let mut v = view();
        assert!(!v.paste());
        assert!(!v.can_undo());
    }

    #[test]
    fn test_paste_text_parses_tsv() {
        let mut v = view();
        v.selection.select_cell(CellPos::new(2, 1));
        assert!(v.paste_text("x\ty\n1\t2\n"));
        assert_eq!(v.cell_value(CellPos::new(3, 2)), "2");
        assert_eq!(v.clipboard_text().unwrap(), "x\ty\n1\t2");
    }

    #[test]
    fn test_delete_selection_and_stats() {
        let mut v = view();
        v.load_table(&json!([{"n": 1}, {"n": 2}, {"n": 3}]));
        v.selection.begin_col_header(0, false);
        v.selection.end_drag();
        let stats = v.selection_stats();
        assert_eq!(stats.count, 4);
        assert_eq!(stats.sum, 6.0);
        assert!(v.delete_selection());
        assert!(v.sheet().cells().is_empty());
        assert!(!v.delete_selection());
    }

    #[test]
    fn test_insert_row_undo() {
        let mut v = view();
        v.load_table(&json!([{"k": "v"}]));
        assert!(v.insert_row(0));
        assert_eq!(v.cell_value(CellPos::new(1, 0)), "k");
        assert!(v.undo());
        assert_eq!(v.cell_value(CellPos::new(0, 0)), "k");
        assert!(!v.insert_column(500));
    }

    #[test]
    fn test_state_json_round_trip() {
        let mut v = view();
        v.load_table(&json!([{"name": "x"}]));
        let json = v.state_json().unwrap();
        assert_eq!(json, r#"{"0,0":"name","1,0":"x"}"#);

        let mut other = view();
        assert!(other.load_state_json(&json).unwrap());
        assert_eq!(other.sheet().cells(), v.sheet().cells());
        assert!(other.load_state_json("{\"bad\": \"x\"}").is_err());
        assert!(!other.load_state_json(&json).unwrap());
    }

    #[test]
    fn test_load_state_drops_out_of_grid_keys() {
        let mut v = GridView::new(
            GridConfig {
                total_rows: 10,
                total_cols: 10,
                ..GridConfig::default()
            },
            800.0,
            600.0,
        );
        v.load_state_json(r#"{"1,1":"in","50,1":"out"}"#).unwrap();
        assert_eq!(v.sheet().cells().len(), 1);
    }
}
