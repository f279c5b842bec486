//! WASM-exported handle for the JavaScript shell.
//!
//! `GridHandle` wraps a [`GridView`] behind `Rc<RefCell<_>>` so the
//! autoscroll timer closure can reach it between events. Arguments are
//! primitives (coordinates, key names, a modifier bitmask) and structured
//! results are returned as plain JS objects.
//!
//! ```javascript
//! import init, { GridHandle } from 'vastgrid';
//! await init();
//! const grid = new GridHandle('{"totalRows": 100000}', canvas.width, canvas.height);
//! grid.set_render_callback(() => requestAnimationFrame(paint));
//! canvas.onpointerdown = (e) => grid.on_pointer_down(e.offsetX, e.offsetY, mods(e));
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Function;
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::closure::Closure;

use crate::config::GridConfig;
use crate::types::{Axis, CellPos};
use crate::viewer::{GridView, Modifiers};

/// State shared between the handle and its timer callback.
struct SharedGrid {
    view: GridView,
    render_callback: Option<Function>,
    #[cfg(target_arch = "wasm32")]
    autoscroll_timer: Option<i32>,
    #[cfg(target_arch = "wasm32")]
    autoscroll_closure: Option<Closure<dyn FnMut()>>,
}

/// The grid engine as seen from JavaScript.
#[wasm_bindgen]
pub struct GridHandle {
    state: Rc<RefCell<SharedGrid>>,
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
}

#[wasm_bindgen]
impl GridHandle {
    /// Create a grid. `config_json` may be partial or omitted.
    ///
    /// # Errors
    /// Returns an error if the config is malformed or invalid.
    #[wasm_bindgen(constructor)]
    pub fn new(
        config_json: Option<String>,
        width: f64,
        height: f64,
    ) -> Result<GridHandle, JsValue> {
        #[cfg(target_arch = "wasm32")]
        console_error_panic_hook::set_once();

        let config = match config_json.as_deref() {
            Some(json) if !json.trim().is_empty() => GridConfig::from_json(json)?,
            _ => GridConfig::default(),
        };
        Ok(Self::from_view(GridView::new(config, width, height)))
    }

    /// Register a JS callback to request a render on the next animation frame.
    pub fn set_render_callback(&mut self, callback: Option<Function>) {
        self.state.borrow_mut().render_callback = callback;
    }

    // ---- geometry ----

    /// `{row, col}` under a screen point, or `null`.
    pub fn resolve_cell(&self, x: f64, y: f64) -> Result<JsValue, JsValue> {
        match self.state.borrow().view.resolve_cell(x, y) {
            Some(pos) => to_js(&pos),
            None => Ok(JsValue::NULL),
        }
    }

    /// `{x, y}` of a cell's top-left corner on screen.
    pub fn pixel_origin(&self, row: u32, col: u32) -> Result<JsValue, JsValue> {
        to_js(&self.state.borrow().view.pixel_origin(CellPos::new(row, col)))
    }

    /// `[start, end)` of the rows to paint.
    pub fn visible_row_range(&self) -> Vec<u32> {
        let range = self.state.borrow().view.visible_row_range();
        vec![range.start, range.end]
    }

    /// `[start, end)` of the columns to paint.
    pub fn visible_col_range(&self) -> Vec<u32> {
        let range = self.state.borrow().view.visible_col_range();
        vec![range.start, range.end]
    }

    pub fn row_height(&self, row: u32) -> f64 {
        self.state.borrow().view.size(Axis::Row, row)
    }

    pub fn col_width(&self, col: u32) -> f64 {
        self.state.borrow().view.size(Axis::Column, col)
    }

    /// Total scrollable width (for the scroll container's spacer).
    pub fn content_width(&self) -> f64 {
        self.state.borrow().view.total_extent(Axis::Column)
    }

    /// Total scrollable height.
    pub fn content_height(&self) -> f64 {
        self.state.borrow().view.total_extent(Axis::Row)
    }

    #[allow(clippy::cast_precision_loss)]
    pub fn layout_version(&self) -> f64 {
        self.state.borrow().view.layout_version() as f64
    }

    pub fn hover_cursor(&self, x: f64, y: f64) -> String {
        self.state.borrow().view.hover_cursor(x, y).to_string()
    }

    // ---- selection and values ----

    /// `{minRow, maxRow, minCol, maxCol, mode}`
    pub fn selection_bounds(&self) -> Result<JsValue, JsValue> {
        to_js(&self.state.borrow().view.selection_bounds())
    }

    pub fn row_header_highlighted(&self, row: u32) -> bool {
        self.state.borrow().view.header_highlighted(Axis::Row, row)
    }

    pub fn col_header_highlighted(&self, col: u32) -> bool {
        self.state.borrow().view.header_highlighted(Axis::Column, col)
    }

    pub fn cell_value(&self, row: u32, col: u32) -> String {
        self.state
            .borrow()
            .view
            .cell_value(CellPos::new(row, col))
            .to_string()
    }

    /// `{count, numericCount, sum, average, min, max}`
    pub fn selection_stats(&self) -> Result<JsValue, JsValue> {
        to_js(&self.state.borrow().view.selection_stats())
    }

    // ---- input events ----

    pub fn on_pointer_down(&mut self, x: f64, y: f64, modifiers: u32) -> bool {
        self.dispatch(|v| v.on_pointer_down(x, y, Modifiers::from_bits(modifiers)))
    }

    pub fn on_pointer_move(&mut self, x: f64, y: f64, modifiers: u32) -> bool {
        self.dispatch(|v| v.on_pointer_move(x, y, Modifiers::from_bits(modifiers)))
    }

    pub fn on_pointer_up(&mut self, x: f64, y: f64, modifiers: u32) -> bool {
        self.dispatch(|v| v.on_pointer_up(x, y, Modifiers::from_bits(modifiers)))
    }

    pub fn on_pointer_cancel(&mut self) -> bool {
        self.dispatch(GridView::on_pointer_cancel)
    }

    pub fn on_double_click(&mut self, x: f64, y: f64) -> bool {
        self.dispatch(|v| v.on_double_click(x, y))
    }

    /// Returns true if the shell should call `preventDefault()`.
    pub fn on_key_down(&mut self, key: &str, modifiers: u32) -> bool {
        self.dispatch(|v| v.on_key_down(key, Modifiers::from_bits(modifiers)))
    }

    pub fn on_scroll(&mut self, scroll_top: f64, scroll_left: f64) -> bool {
        self.dispatch(|v| v.on_scroll(scroll_top, scroll_left))
    }

    pub fn on_wheel(&mut self, delta_x: f64, delta_y: f64) -> bool {
        self.dispatch(|v| v.on_wheel(delta_x, delta_y))
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.dispatch(|v| v.resize_viewport(width, height));
    }

    pub fn is_autoscrolling(&self) -> bool {
        self.state.borrow().view.is_autoscrolling()
    }

    // ---- editing ----

    pub fn is_editing(&self) -> bool {
        self.state.borrow().view.is_editing()
    }

    pub fn edit_text(&self) -> Option<String> {
        self.state.borrow().view.edit_text().map(str::to_string)
    }

    /// `[x, y, width, height]` of the cell being edited, empty when closed.
    pub fn edit_rect(&self) -> Vec<f64> {
        self.state
            .borrow()
            .view
            .edit_rect()
            .map(|r| vec![r.x, r.y, r.width, r.height])
            .unwrap_or_default()
    }

    pub fn set_edit_text(&mut self, text: &str) {
        self.state.borrow_mut().view.set_edit_text(text);
    }

    pub fn begin_edit(&mut self, seed: Option<String>) {
        self.dispatch(|v| v.begin_edit(seed.as_deref()));
    }

    pub fn commit_edit(&mut self) -> bool {
        self.dispatch(GridView::commit_edit)
    }

    pub fn cancel_edit(&mut self) {
        self.dispatch(GridView::cancel_edit);
    }

    // ---- toolbar actions ----

    pub fn undo(&mut self) -> bool {
        self.dispatch(GridView::undo)
    }

    pub fn redo(&mut self) -> bool {
        self.dispatch(GridView::redo)
    }

    pub fn can_undo(&self) -> bool {
        self.state.borrow().view.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.state.borrow().view.can_redo()
    }

    pub fn copy(&mut self) -> bool {
        self.dispatch(GridView::copy)
    }

    pub fn cut(&mut self) -> bool {
        self.dispatch(GridView::cut)
    }

    pub fn paste(&mut self) -> bool {
        self.dispatch(GridView::paste)
    }

    /// Paste tab-separated text read from the system clipboard.
    pub fn paste_text(&mut self, text: &str) -> bool {
        self.dispatch(|v| v.paste_text(text))
    }

    /// Clipboard contents as tab-separated text for the system clipboard.
    pub fn clipboard_text(&self) -> Option<String> {
        self.state.borrow().view.clipboard_text()
    }

    pub fn delete_selection(&mut self) -> bool {
        self.dispatch(GridView::delete_selection)
    }

    pub fn select_all(&mut self) {
        self.dispatch(GridView::select_all);
    }

    pub fn insert_row(&mut self, at: u32) -> bool {
        self.dispatch(|v| v.insert_row(at))
    }

    pub fn insert_column(&mut self, at: u32) -> bool {
        self.dispatch(|v| v.insert_column(at))
    }

    // ---- load / save ----

    /// Load an array of records. Anything that is not a non-empty array of
    /// objects is ignored.
    pub fn load_table(&mut self, records: JsValue) -> bool {
        let Ok(table) = serde_wasm_bindgen::from_value::<serde_json::Value>(records) else {
            return false;
        };
        self.dispatch(|v| v.load_table(&table))
    }

    /// # Errors
    /// Returns an error if `json` is not valid JSON.
    pub fn load_table_json(&mut self, json: &str) -> Result<bool, JsValue> {
        Ok(self.dispatch(|v| v.load_table_json(json))?)
    }

    /// Cell contents as `{"row,col": value}` JSON.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn state_json(&self) -> Result<String, JsValue> {
        Ok(self.state.borrow().view.state_json()?)
    }

    /// # Errors
    /// Returns an error for malformed JSON or invalid keys.
    pub fn load_state_json(&mut self, json: &str) -> Result<bool, JsValue> {
        Ok(self.dispatch(|v| v.load_state_json(json))?)
    }

    /// `{content, overlay}` dirty flags, cleared by this call.
    pub fn take_redraw(&mut self) -> Result<JsValue, JsValue> {
        let redraw = self.state.borrow_mut().view.take_redraw();
        to_js(&redraw)
    }
}

impl GridHandle {
    pub fn from_view(view: GridView) -> Self {
        GridHandle {
            state: Rc::new(RefCell::new(SharedGrid {
                view,
                render_callback: None,
                #[cfg(target_arch = "wasm32")]
                autoscroll_timer: None,
                #[cfg(target_arch = "wasm32")]
                autoscroll_closure: None,
            })),
        }
    }

    /// Run an operation on the view, then start or stop the autoscroll timer
    /// and ask the shell to render if anything changed.
    fn dispatch<R>(&mut self, op: impl FnOnce(&mut GridView) -> R) -> R {
        let (result, callback) = {
            let mut s = self.state.borrow_mut();
            let result = op(&mut s.view);
            let callback = if s.view.needs_redraw() {
                s.render_callback.clone()
            } else {
                None
            };
            (result, callback)
        };
        #[cfg(target_arch = "wasm32")]
        Self::sync_autoscroll_timer(&self.state);
        Self::invoke_render_callback(callback);
        result
    }

    fn invoke_render_callback(callback: Option<Function>) {
        if let Some(callback) = callback {
            let _ = callback.call0(&JsValue::NULL);
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn sync_autoscroll_timer(state: &Rc<RefCell<SharedGrid>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let mut s = state.borrow_mut();
        let active = s.view.is_autoscrolling();
        match (active, s.autoscroll_timer) {
            (true, None) => {
                if s.autoscroll_closure.is_none() {
                    let weak_state = Rc::downgrade(state);
                    let closure = Closure::wrap(Box::new(move || {
                        if let Some(state) = weak_state.upgrade() {
                            GridHandle::handle_autoscroll_tick(&state);
                        }
                    }) as Box<dyn FnMut()>);
                    s.autoscroll_closure = Some(closure);
                }
                let interval =
                    i32::try_from(s.view.autoscroll_interval_ms()).unwrap_or(i32::MAX);
                let Some(callback) = s.autoscroll_closure.as_ref() else {
                    return;
                };
                let timer = window
                    .set_interval_with_callback_and_timeout_and_arguments_0(
                        callback.as_ref().unchecked_ref(),
                        interval,
                    )
                    .ok();
                s.autoscroll_timer = timer;
            }
            (false, Some(timer_id)) => {
                window.clear_interval_with_handle(timer_id);
                s.autoscroll_timer = None;
            }
            _ => {}
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn handle_autoscroll_tick(state: &Rc<RefCell<SharedGrid>>) {
        let callback = {
            let mut s = state.borrow_mut();
            let moved = s.view.autoscroll_tick();
            if moved {
                s.render_callback.clone()
            } else {
                None
            }
        };
        Self::sync_autoscroll_timer(state);
        Self::invoke_render_callback(callback);
    }
}

impl Drop for GridHandle {
    fn drop(&mut self) {
        #[cfg(target_arch = "wasm32")]
        if let Ok(mut s) = self.state.try_borrow_mut() {
            let timer = s.autoscroll_timer.take();
            if let (Some(timer_id), Some(window)) = (timer, web_sys::window()) {
                window.clear_interval_with_handle(timer_id);
            }
            s.autoscroll_closure = None;
        }
    }
}
