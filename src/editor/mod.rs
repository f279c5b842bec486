//! In-place cell editing and the undo history behind every write.
//!
//! `EditSession` tracks the edit buffer for the one cell being edited. It
//! never writes to the store itself: closing with `save` hands back a
//! [`PendingWrite`] that the controller turns into a history command.

mod command;
mod history;

pub use command::{CellChange, Command};
pub use history::CommandHistory;

use crate::layout::CellRect;
use crate::types::CellPos;

/// A cell being edited.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenEdit {
    pub pos: CellPos,
    /// Current buffer contents.
    pub text: String,
    /// Cell value when the edit opened.
    pub original: String,
    /// Screen rectangle the input overlay should cover.
    pub rect: CellRect,
}

/// Edit lifecycle
#[derive(Debug, Clone, Default, PartialEq)]
pub enum EditState {
    #[default]
    Closed,
    Open(OpenEdit),
}

/// Buffer contents to write back when an edit closes with `save`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingWrite {
    pub pos: CellPos,
    pub value: String,
}

/// The in-place cell editor.
#[derive(Debug, Clone, Default)]
pub struct EditSession {
    state: EditState,
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin editing `pos`. `current` is the stored value; `seed` replaces it
    /// as the initial buffer (e.g. the keystroke that started the edit).
    pub fn open(&mut self, pos: CellPos, current: &str, seed: Option<&str>, rect: CellRect) {
        self.state = EditState::Open(OpenEdit {
            pos,
            text: seed.unwrap_or(current).to_string(),
            original: current.to_string(),
            rect,
        });
    }

    /// Close the session. With `save`, returns the write to perform if the
    /// buffer differs from the original value. Closing a closed session is a
    /// no-op.
    pub fn close(&mut self, save: bool) -> Option<PendingWrite> {
        let EditState::Open(edit) = std::mem::take(&mut self.state) else {
            return None;
        };
        if !save || edit.text == edit.original {
            return None;
        }
        Some(PendingWrite {
            pos: edit.pos,
            value: edit.text,
        })
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, EditState::Open(_))
    }

    pub fn state(&self) -> &EditState {
        &self.state
    }

    pub fn pos(&self) -> Option<CellPos> {
        match &self.state {
            EditState::Open(edit) => Some(edit.pos),
            EditState::Closed => None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match &self.state {
            EditState::Open(edit) => Some(edit.text.as_str()),
            EditState::Closed => None,
        }
    }

    pub fn rect(&self) -> Option<CellRect> {
        match &self.state {
            EditState::Open(edit) => Some(edit.rect),
            EditState::Closed => None,
        }
    }

    /// Replace the buffer (the shell's input element is the source of truth
    /// for IME and cursor editing).
    pub fn set_text(&mut self, text: &str) {
        if let EditState::Open(edit) = &mut self.state {
            edit.text = text.to_string();
        }
    }

    /// Move the overlay after the canvas is resized.
    pub fn set_rect(&mut self, rect: CellRect) {
        if let EditState::Open(edit) = &mut self.state {
            edit.rect = rect;
        }
    }

    pub fn insert_char(&mut self, ch: char) {
        if let EditState::Open(edit) = &mut self.state {
            edit.text.push(ch);
        }
    }

    pub fn backspace(&mut self) {
        if let EditState::Open(edit) = &mut self.state {
            edit.text.pop();
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn rect() -> CellRect {
        CellRect {
            x: 50.0,
            y: 24.0,
            width: 80.0,
            height: 24.0,
        }
    }

    #[test]
    fn test_close_twice_is_noop() {
        let mut edit = EditSession::new();
        edit.open(CellPos::new(0, 0), "", Some("x"), rect());
        assert_eq!(
            edit.close(true),
            Some(PendingWrite {
                pos: CellPos::new(0, 0),
                value: "x".into()
            })
        );
        assert_eq!(edit.close(true), None);
        assert_eq!(edit.close(true), None);
        assert!(!edit.is_open());
    }

    #[test]
    fn test_cancel_discards_buffer() {
        let mut edit = EditSession::new();
        edit.open(CellPos::new(2, 3), "old", None, rect());
        edit.set_text("new");
        assert_eq!(edit.close(false), None);
        assert_eq!(edit.state(), &EditState::Closed);
    }

    #[test]
    fn test_unchanged_buffer_writes_nothing() {
        let mut edit = EditSession::new();
        edit.open(CellPos::new(2, 3), "same", None, rect());
        assert_eq!(edit.text(), Some("same"));
        assert_eq!(edit.close(true), None);
    }

    #[test]
    fn test_clearing_buffer_produces_empty_write() {
        let mut edit = EditSession::new();
        edit.open(CellPos::new(1, 1), "ab", None, rect());
        edit.backspace();
        edit.backspace();
        edit.backspace();
        let write = edit.close(true).unwrap();
        assert_eq!(write.value, "");
    }

    #[test]
    fn test_typing_appends() {
        let mut edit = EditSession::new();
        edit.open(CellPos::new(1, 1), "", Some("4"), rect());
        edit.insert_char('2');
        assert_eq!(edit.text(), Some("42"));
        assert_eq!(edit.rect(), Some(rect()));
    }
}
