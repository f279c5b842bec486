//! Pointer, keyboard and scroll handlers for `GridView`.
//!
//! Handlers run in arrival order and never block. Pointer-up and
//! pointer-cancel always leave the view with no drag, no resize and no
//! autoscroll in progress.

use super::keys::{Key, Modifiers};
use super::{GridView, ResizeController};
use crate::layout::{HitTarget, Point};
use crate::types::{Axis, CellPos};

impl GridView {
    /// Pointer pressed. Returns true if the event was consumed.
    pub fn on_pointer_down(&mut self, x: f64, y: f64, mods: Modifiers) -> bool {
        let point = Point::new(x, y);
        self.autoscroll.cancel();
        self.last_pointer = Some(point);

        if let Some(handle) = ResizeController::hit_test(
            point,
            &self.viewport,
            &self.sheet.sizes,
            self.config.resize_tolerance,
        ) {
            self.commit_edit();
            self.resize.begin(handle, point, &self.sheet.sizes);
            self.needs_overlay_render = true;
            return true;
        }

        let hit = self.hit_test(x, y);
        if let Some(editing) = self.edit.pos() {
            if hit == HitTarget::Cell(editing) {
                // click inside the editor's own cell
                return true;
            }
            self.commit_edit();
        }

        match hit {
            HitTarget::Cell(pos) => self.selection.begin_cell(pos, mods.shift),
            HitTarget::RowHeader(row) => self.selection.begin_row_header(row, mods.shift),
            HitTarget::ColumnHeader(col) => self.selection.begin_col_header(col, mods.shift),
            HitTarget::CornerHeader => self.selection.select_all(),
            HitTarget::None => {
                self.last_pointer = None;
                return false;
            }
        }
        self.needs_overlay_render = true;
        true
    }

    /// Pointer moved. Drives an active resize or extends a drag selection.
    pub fn on_pointer_move(&mut self, x: f64, y: f64, _mods: Modifiers) -> bool {
        let point = Point::new(x, y);
        if self.resize.is_active() {
            self.last_pointer = Some(point);
            if self.resize.update(point, &mut self.sheet.sizes) {
                self.viewport.clamp_scroll(&self.sheet.sizes);
                self.needs_render = true;
                return true;
            }
            return false;
        }
        if !self.selection.is_dragging() {
            return false;
        }
        self.last_pointer = Some(point);
        let changed = self.extend_drag_to(point);
        self.autoscroll.update(point, &self.viewport, self.selection.drag());
        changed
    }

    /// Pointer released. The selection keeps the bounds from the last move.
    pub fn on_pointer_up(&mut self, _x: f64, _y: f64, _mods: Modifiers) -> bool {
        self.autoscroll.cancel();
        self.last_pointer = None;
        if let Some(command) = self.resize.end(&mut self.sheet.sizes) {
            self.execute(command);
            return true;
        }
        let was_dragging = self.selection.end_drag();
        if was_dragging {
            self.needs_overlay_render = true;
        }
        was_dragging
    }

    /// Pointer capture lost. An in-flight resize is rolled back.
    pub fn on_pointer_cancel(&mut self) -> bool {
        self.autoscroll.cancel();
        self.last_pointer = None;
        let resized = self.resize.cancel(&mut self.sheet.sizes);
        if resized {
            self.viewport.clamp_scroll(&self.sheet.sizes);
            self.needs_render = true;
        }
        let dragged = self.selection.end_drag();
        resized || dragged
    }

    /// Double-click on a cell opens the editor there.
    pub fn on_double_click(&mut self, x: f64, y: f64) -> bool {
        let HitTarget::Cell(pos) = self.hit_test(x, y) else {
            return false;
        };
        self.autoscroll.cancel();
        self.selection.end_drag();
        self.selection.select_cell(pos);
        self.open_editor(pos, None);
        true
    }

    /// Key pressed. `key` is a DOM `KeyboardEvent.key` value. Returns true if
    /// the key was handled and the shell should suppress its default action.
    pub fn on_key_down(&mut self, key: &str, mods: Modifiers) -> bool {
        let key = Key::parse(key);
        if self.edit.is_open() {
            return self.edit_key(key, mods);
        }

        if mods.command() {
            return self.command_key(key, mods);
        }

        if let Some((d_row, d_col)) = key.arrow_delta() {
            self.navigate(d_row, d_col, mods.shift);
            return true;
        }

        match key {
            Key::Enter | Key::F2 => self.begin_edit(None),
            Key::Tab => self.navigate(0, if mods.shift { -1 } else { 1 }, false),
            Key::Home => {
                let focus = self.selection.focus();
                self.jump_to(CellPos::new(focus.row, 0), mods.shift);
            }
            Key::End => {
                let focus = self.selection.focus();
                let last = self.sheet.total_cols().saturating_sub(1);
                self.jump_to(CellPos::new(focus.row, last), mods.shift);
            }
            Key::PageUp => self.navigate(-self.page_rows(), 0, mods.shift),
            Key::PageDown => self.navigate(self.page_rows(), 0, mods.shift),
            Key::Delete | Key::Backspace => {
                self.delete_selection();
            }
            Key::Char(ch) if !mods.alt => {
                let mut buf = [0u8; 4];
                self.begin_edit(Some(ch.encode_utf8(&mut buf)));
            }
            _ => return false,
        }
        true
    }

    fn edit_key(&mut self, key: Key, mods: Modifiers) -> bool {
        match key {
            Key::Enter => {
                self.commit_edit();
                self.navigate(if mods.shift { -1 } else { 1 }, 0, false);
            }
            Key::Tab => {
                self.commit_edit();
                self.navigate(0, if mods.shift { -1 } else { 1 }, false);
            }
            Key::Escape => self.cancel_edit(),
            Key::Backspace => self.edit.backspace(),
            Key::Char(ch) if !mods.command() => self.edit.insert_char(ch),
            _ => {}
        }
        self.needs_overlay_render = true;
        true
    }

    fn command_key(&mut self, key: Key, mods: Modifiers) -> bool {
        let Key::Char(ch) = key else {
            return false;
        };
        match ch.to_ascii_lowercase() {
            'a' => self.select_all(),
            'c' => {
                self.copy();
            }
            'x' => {
                self.cut();
            }
            'v' => {
                self.paste();
            }
            'z' if mods.shift => {
                self.redo();
            }
            'z' => {
                self.undo();
            }
            'y' => {
                self.redo();
            }
            _ => return false,
        }
        true
    }

    fn navigate(&mut self, d_row: i64, d_col: i64, extend: bool) {
        let focus = if extend {
            self.selection.extend_focus(d_row, d_col)
        } else {
            self.selection.move_focus(d_row, d_col)
        };
        self.reveal(focus);
    }

    fn jump_to(&mut self, pos: CellPos, extend: bool) {
        if extend {
            self.selection.extend_to(pos);
        } else {
            self.selection.select_cell(pos);
        }
        self.reveal(self.selection.focus());
    }

    fn reveal(&mut self, pos: CellPos) {
        if self.viewport.scroll_into_view(pos, &self.sheet.sizes) {
            self.needs_render = true;
        }
        self.needs_overlay_render = true;
    }

    /// Rows fully visible in the data area, at least one.
    fn page_rows(&self) -> i64 {
        let range = self.visible_row_range();
        i64::from(range.end.saturating_sub(range.start).saturating_sub(2).max(1))
    }

    /// Absolute scroll position from the shell's scroll container. Any open
    /// edit is committed first.
    pub fn on_scroll(&mut self, scroll_top: f64, scroll_left: f64) -> bool {
        self.commit_edit();
        let moved = self
            .viewport
            .set_scroll(scroll_left, scroll_top, &self.sheet.sizes);
        self.after_scroll(moved)
    }

    /// Relative scroll (mouse wheel, trackpad).
    pub fn on_wheel(&mut self, delta_x: f64, delta_y: f64) -> bool {
        self.commit_edit();
        let moved = self.viewport.scroll_by(delta_x, delta_y, &self.sheet.sizes);
        self.after_scroll(moved)
    }

    fn after_scroll(&mut self, moved: bool) -> bool {
        if !moved {
            return false;
        }
        self.needs_render = true;
        // a drag keeps following the stationary pointer
        if let Some(point) = self.last_pointer {
            if self.selection.is_dragging() {
                self.extend_drag_to(point);
            }
        }
        true
    }

    /// Canvas resized.
    pub fn resize_viewport(&mut self, width: f64, height: f64) {
        self.viewport.resize(width, height, &self.sheet.sizes);
        if let Some(pos) = self.edit.pos() {
            let rect = self.viewport.cell_rect(pos, &self.sheet.sizes);
            self.edit.set_rect(rect);
        }
        self.needs_render = true;
    }

    /// One autoscroll step: scroll, then re-resolve the cell under the
    /// stationary pointer with the new offset. Returns true if the view moved.
    pub fn autoscroll_tick(&mut self) -> bool {
        if !self.selection.is_dragging() {
            self.autoscroll.cancel();
            return false;
        }
        if !self.autoscroll.tick(&mut self.viewport, &self.sheet.sizes) {
            return false;
        }
        self.needs_render = true;
        if let Some(point) = self.last_pointer {
            self.extend_drag_to(point);
        }
        true
    }

    pub fn is_autoscrolling(&self) -> bool {
        self.autoscroll.is_active()
    }

    pub fn autoscroll_interval_ms(&self) -> u32 {
        self.autoscroll.interval_ms()
    }

    pub fn is_resizing(&self) -> bool {
        self.resize.is_active()
    }

    /// Drag the selection focus to the cell under `point`, clamping points
    /// over headers or outside the canvas to the nearest data cell.
    fn extend_drag_to(&mut self, point: Point) -> bool {
        let sizes = &self.sheet.sizes;
        let pos = CellPos::new(
            self.viewport.index_at_clamped(Axis::Row, point.y, sizes),
            self.viewport.index_at_clamped(Axis::Column, point.x, sizes),
        );
        let changed = self.selection.drag_to(pos);
        if changed {
            self.needs_overlay_render = true;
        }
        changed
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::config::GridConfig;
    use crate::types::{Bounds, SelectionMode};

    const NONE: Modifiers = Modifiers::NONE;

    fn view() -> GridView {
        GridView::new(GridConfig::default(), 850.0, 624.0)
    }

    /// Screen point in the middle of a cell.
    fn center(v: &GridView, pos: CellPos) -> (f64, f64) {
        let rect = v.cell_rect(pos);
        (rect.x + rect.width / 2.0, rect.y + rect.height / 2.0)
    }

    #[test]
    fn test_click_selects_cell() {
        let mut v = view();
        let (x, y) = center(&v, CellPos::new(3, 2));
        assert!(v.on_pointer_down(x, y, NONE));
        assert!(v.on_pointer_up(x, y, NONE));
        let b = v.selection_bounds();
        assert_eq!(b.mode, SelectionMode::Cell);
        assert_eq!(b.bounds(), Bounds::single(CellPos::new(3, 2)));
    }

    #[test]
    fn test_click_on_nothing_is_ignored() {
        let mut v = view();
        assert!(!v.on_pointer_down(-5.0, 10.0, NONE));
        assert!(!v.selection().is_dragging());
    }

    #[test]
    fn test_drag_up_left_normalizes() {
        let mut v = view();
        let (x0, y0) = center(&v, CellPos::new(5, 5));
        let (x1, y1) = center(&v, CellPos::new(2, 2));
        v.on_pointer_down(x0, y0, NONE);
        v.on_pointer_move(x1, y1, NONE);
        v.on_pointer_up(x1, y1, NONE);
        let b = v.selection_bounds();
        assert_eq!((b.min_row, b.max_row, b.min_col, b.max_col), (2, 5, 2, 5));
        assert_eq!(b.mode, SelectionMode::Range);
    }

    #[test]
    fn test_pointer_up_keeps_last_move_bounds() {
        let mut v = view();
        let (x0, y0) = center(&v, CellPos::new(1, 1));
        let (x1, y1) = center(&v, CellPos::new(3, 3));
        let (x2, y2) = center(&v, CellPos::new(9, 9));
        v.on_pointer_down(x0, y0, NONE);
        v.on_pointer_move(x1, y1, NONE);
        v.on_pointer_up(x2, y2, NONE);
        assert_eq!(v.selection_bounds().max_row, 3);
    }

    #[test]
    fn test_column_header_click() {
        let mut v = view();
        v.on_pointer_down(50.0 + 80.0 * 3.0 + 40.0, 12.0, NONE);
        let b = v.selection_bounds();
        assert_eq!(b.mode, SelectionMode::Column);
        assert_eq!((b.min_col, b.max_col), (3, 3));
        assert_eq!((b.min_row, b.max_row), (0, 99_999));
    }

    #[test]
    fn test_corner_selects_all() {
        let mut v = view();
        v.on_pointer_down(10.0, 10.0, NONE);
        let b = v.selection_bounds();
        assert_eq!(b.mode, SelectionMode::Range);
        assert_eq!((b.max_row, b.max_col), (99_999, 499));
        assert!(!v.can_undo());
    }

    #[test]
    fn test_drag_to_edge_autoscrolls_and_extends() {
        let mut v = view();
        let (x, y) = center(&v, CellPos::new(2, 1));
        v.on_pointer_down(x, y, NONE);
        v.on_pointer_move(x, 615.0, NONE);
        assert!(v.is_autoscrolling());
        let before = v.selection_bounds().max_row;
        for _ in 0..10 {
            assert!(v.autoscroll_tick());
        }
        assert_eq!(v.viewport().scroll_y, 200.0);
        assert!(v.selection_bounds().max_row > before);

        v.on_pointer_up(x, 615.0, NONE);
        assert!(!v.is_autoscrolling());
        assert!(!v.autoscroll_tick());
    }

    #[test]
    fn test_pointer_cancel_clears_autoscroll() {
        let mut v = view();
        let (x, y) = center(&v, CellPos::new(2, 1));
        v.on_pointer_down(x, y, NONE);
        v.on_pointer_move(845.0, y, NONE);
        assert!(v.is_autoscrolling());
        assert!(v.on_pointer_cancel());
        assert!(!v.is_autoscrolling());
        assert!(!v.selection().is_dragging());
    }

    #[test]
    fn test_resize_drag_is_one_history_entry() {
        let mut v = view();
        // boundary between row 2 and row 3 in the row header band
        let y = 24.0 + 24.0 * 3.0;
        assert_eq!(v.hover_cursor(10.0, y), "row-resize");
        v.on_pointer_down(10.0, y, NONE);
        assert!(v.is_resizing());
        for step in 1..=16 {
            v.on_pointer_move(10.0, y + f64::from(step), NONE);
        }
        v.on_pointer_up(10.0, y + 16.0, NONE);
        assert_eq!(v.size(Axis::Row, 2), 40.0);
        assert_eq!(v.history().len(), 1);

        assert!(v.undo());
        assert_eq!(v.size(Axis::Row, 2), 24.0);
    }

    #[test]
    fn test_resize_cancel_restores() {
        let mut v = view();
        let x = 50.0 + 80.0;
        v.on_pointer_down(x, 10.0, NONE);
        v.on_pointer_move(x + 30.0, 10.0, NONE);
        assert_eq!(v.size(Axis::Column, 0), 110.0);
        v.on_pointer_cancel();
        assert_eq!(v.size(Axis::Column, 0), 80.0);
        assert!(!v.can_undo());
    }

    #[test]
    fn test_resize_flushes_open_edit() {
        let mut v = view();
        v.on_key_down("q", NONE);
        assert!(v.is_editing());
        v.on_pointer_down(50.0 + 80.0, 10.0, NONE);
        assert!(!v.is_editing());
        assert_eq!(v.cell_value(CellPos::new(0, 0)), "q");
    }

    #[test]
    fn test_typing_then_enter_advances() {
        let mut v = view();
        v.on_key_down("4", NONE);
        v.on_key_down("2", NONE);
        assert_eq!(v.edit_text(), Some("42"));
        v.on_key_down("Enter", NONE);
        assert!(!v.is_editing());
        assert_eq!(v.cell_value(CellPos::new(0, 0)), "42");
        assert_eq!(v.selection().focus(), CellPos::new(1, 0));
    }

    #[test]
    fn test_escape_discards_edit() {
        let mut v = view();
        v.on_key_down("F2", NONE);
        v.set_edit_text("nope");
        v.on_key_down("Escape", NONE);
        assert!(!v.is_editing());
        assert!(v.sheet().cells().is_empty());
    }

    #[test]
    fn test_scroll_commits_edit() {
        let mut v = view();
        v.on_key_down("x", NONE);
        assert!(v.on_scroll(240.0, 0.0));
        assert!(!v.is_editing());
        assert_eq!(v.cell_value(CellPos::new(0, 0)), "x");
    }

    #[test]
    fn test_enter_on_last_row_advance_scrolls_into_view() {
        let mut v = view();
        v.selection.select_cell(CellPos::new(24, 0));
        v.on_key_down("Enter", NONE);
        v.set_edit_text("v");
        v.on_key_down("Enter", NONE);
        assert_eq!(v.selection().focus(), CellPos::new(25, 0));
        assert_eq!(v.viewport().scroll_y, 26.0 * 24.0 - 600.0);
    }

    #[test]
    fn test_arrow_keys_and_shift_extend() {
        let mut v = view();
        v.on_key_down("ArrowUp", NONE);
        assert_eq!(v.selection().focus(), CellPos::new(0, 0));
        v.on_key_down("ArrowRight", NONE);
        v.on_key_down("ArrowDown", Modifiers::shifted());
        let b = v.selection_bounds();
        assert_eq!(b.mode, SelectionMode::Range);
        assert_eq!(b.bounds(), Bounds::spanning(CellPos::new(0, 1), CellPos::new(1, 1)));
        v.on_key_down("End", NONE);
        assert_eq!(v.selection().focus(), CellPos::new(1, 499));
        assert!(v.viewport().scroll_x > 0.0);
    }

    #[test]
    fn test_shortcuts() {
        let mut v = view();
        v.on_key_down("h", NONE);
        v.on_key_down("Enter", NONE);
        v.on_key_down("ArrowUp", NONE);
        assert!(v.on_key_down("c", Modifiers::with_command()));
        v.on_key_down("ArrowRight", NONE);
        assert!(v.on_key_down("v", Modifiers::with_command()));
        assert_eq!(v.cell_value(CellPos::new(0, 1)), "h");
        assert!(v.on_key_down("z", Modifiers::with_command()));
        assert_eq!(v.cell_value(CellPos::new(0, 1)), "");
        assert!(v.on_key_down("y", Modifiers::with_command()));
        assert_eq!(v.cell_value(CellPos::new(0, 1)), "h");
        assert!(v.on_key_down("a", Modifiers::with_command()));
        assert_eq!(v.selection_bounds().max_row, 99_999);
        assert!(!v.on_key_down("Shift", NONE));
    }

    #[test]
    fn test_double_click_opens_editor_with_value() {
        let mut v = view();
        v.on_key_down("k", NONE);
        v.on_key_down("Tab", NONE);
        let (x, y) = center(&v, CellPos::new(0, 0));
        assert!(v.on_double_click(x, y));
        assert_eq!(v.edit_text(), Some("k"));
        let rect = v.edit_rect().unwrap();
        assert_eq!((rect.x, rect.y), (50.0, 24.0));
    }
}
