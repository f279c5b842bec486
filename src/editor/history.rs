//! Linear undo/redo stack.
//!
//! Entries `[0, cursor)` are applied; `[cursor, len)` form the redo tail.
//! Executing a new command truncates the tail. When the stack exceeds its
//! capacity the oldest entry is discarded.

use std::collections::VecDeque;

use super::command::Command;
use crate::sheet::Sheet;

/// Bounded command history with a cursor.
#[derive(Debug, Clone)]
pub struct CommandHistory {
    entries: VecDeque<Command>,
    cursor: usize,
    capacity: usize,
}

impl CommandHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            cursor: 0,
            capacity: capacity.max(1),
        }
    }

    /// Apply `command` to `sheet` and push it, dropping any redo tail.
    pub fn execute(&mut self, command: Command, sheet: &mut Sheet) {
        command.apply(sheet);
        tracing::debug!(command = command.label(), cursor = self.cursor, "execute");
        self.entries.truncate(self.cursor);
        self.entries.push_back(command);
        if self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
        self.cursor = self.entries.len();
    }

    /// Revert the entry before the cursor. Returns false on an empty stack.
    pub fn undo(&mut self, sheet: &mut Sheet) -> bool {
        let Some(index) = self.cursor.checked_sub(1) else {
            return false;
        };
        let Some(command) = self.entries.get(index) else {
            return false;
        };
        command.revert(sheet);
        tracing::debug!(command = command.label(), cursor = index, "undo");
        self.cursor = index;
        true
    }

    /// Re-apply the entry at the cursor. Returns false when nothing is undone.
    pub fn redo(&mut self, sheet: &mut Sheet) -> bool {
        let Some(command) = self.entries.get(self.cursor) else {
            return false;
        };
        command.apply(sheet);
        tracing::debug!(command = command.label(), cursor = self.cursor, "redo");
        self.cursor += 1;
        true
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor < self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of applied entries.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
