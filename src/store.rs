//! Sparse cell storage.
//!
//! Only non-empty cells are stored; an absent key reads as the empty string.
//! The persisted form is a flat JSON object keyed by `"row,col"` strings,
//! which is the only place the string key survives.

use std::collections::BTreeMap;
use std::ops::Bound::{Excluded, Included, Unbounded};

use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::types::{Axis, Bounds, CellPos};

/// Sparse `(row, col) → value` storage.
///
/// Mutation is crate-private: cell content changes only through history
/// commands so every write stays undoable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellStore {
    cells: BTreeMap<CellPos, String>,
}

impl CellStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from entries. Empty values are skipped.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (CellPos, String)>,
    {
        let cells = entries
            .into_iter()
            .filter(|(_, value)| !value.is_empty())
            .collect();
        Self { cells }
    }

    pub fn get(&self, pos: CellPos) -> Option<&str> {
        self.cells.get(&pos).map(String::as_str)
    }

    /// Value at `pos`, or `""` when the cell is empty.
    pub fn value(&self, pos: CellPos) -> &str {
        self.get(pos).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CellPos, &str)> + '_ {
        self.cells.iter().map(|(pos, v)| (*pos, v.as_str()))
    }

    /// Non-empty cells inside `bounds`, in row-major order.
    ///
    /// Walks only the stored rows in range, so a whole-column selection over
    /// a mostly empty sheet stays cheap.
    pub fn iter_in(&self, bounds: Bounds) -> impl Iterator<Item = (CellPos, &str)> + '_ {
        let start = CellPos::new(bounds.min_row, 0);
        let end = match bounds.max_row.checked_add(1) {
            Some(next) => Excluded(CellPos::new(next, 0)),
            None => Unbounded,
        };
        self.cells
            .range((Included(start), end))
            .filter(move |(pos, _)| pos.col >= bounds.min_col && pos.col <= bounds.max_col)
            .map(|(pos, v)| (*pos, v.as_str()))
    }

    /// Write a value, returning the previous one. Writing `""` deletes the key.
    pub(crate) fn set(&mut self, pos: CellPos, value: String) -> Option<String> {
        if value.is_empty() {
            self.cells.remove(&pos)
        } else {
            self.cells.insert(pos, value)
        }
    }

    /// Apply an optional value: `None` deletes.
    pub(crate) fn put(&mut self, pos: CellPos, value: Option<&String>) {
        match value {
            Some(v) => {
                self.set(pos, v.clone());
            }
            None => {
                self.cells.remove(&pos);
            }
        }
    }

    /// Remove every cell inside `bounds`, returning what was removed.
    pub(crate) fn remove_in(&mut self, bounds: Bounds) -> Vec<(CellPos, String)> {
        let keys: Vec<CellPos> = self.iter_in(bounds).map(|(pos, _)| pos).collect();
        keys.into_iter()
            .filter_map(|pos| self.cells.remove(&pos).map(|v| (pos, v)))
            .collect()
    }

    /// Shift every cell at or beyond `at` on `axis` one index forward.
    ///
    /// Cells pushed past `limit` fall off the grid and are returned so the
    /// insert can be reverted.
    pub(crate) fn insert_line(
        &mut self,
        axis: Axis,
        at: u32,
        limit: u32,
    ) -> Vec<(CellPos, String)> {
        let moved = self.take_where(|pos| pos.along(axis) >= at);
        let mut dropped = Vec::new();
        for (pos, value) in moved {
            let index = pos.along(axis);
            if index + 1 >= limit {
                dropped.push((pos, value));
            } else {
                self.cells.insert(shifted(pos, axis, index + 1), value);
            }
        }
        dropped
    }

    /// Inverse of [`CellStore::insert_line`]: drop line `at`, shift later
    /// lines back, then restore cells that had fallen off the end.
    pub(crate) fn remove_line(&mut self, axis: Axis, at: u32, restore: &[(CellPos, String)]) {
        let moved = self.take_where(|pos| pos.along(axis) >= at);
        for (pos, value) in moved {
            let index = pos.along(axis);
            if index > at {
                self.cells.insert(shifted(pos, axis, index - 1), value);
            }
        }
        for (pos, value) in restore {
            self.cells.insert(*pos, value.clone());
        }
    }

    /// Drop every cell outside `[0, rows) × [0, cols)`.
    pub(crate) fn clip(&mut self, rows: u32, cols: u32) {
        self.cells.retain(|pos, _| pos.row < rows && pos.col < cols);
    }

    fn take_where(&mut self, pred: impl Fn(&CellPos) -> bool) -> Vec<(CellPos, String)> {
        let keys: Vec<CellPos> = self.cells.keys().filter(|p| pred(p)).copied().collect();
        keys.into_iter()
            .filter_map(|pos| self.cells.remove(&pos).map(|v| (pos, v)))
            .collect()
    }
}

fn shifted(pos: CellPos, axis: Axis, index: u32) -> CellPos {
    match axis {
        Axis::Row => CellPos::new(index, pos.col),
        Axis::Column => CellPos::new(pos.row, index),
    }
}

impl Serialize for CellStore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (pos, value) in &self.cells {
            map.serialize_entry(&pos.to_key(), value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for CellStore {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, String>::deserialize(deserializer)?;
        let mut entries = Vec::with_capacity(raw.len());
        for (key, value) in raw {
            let pos = CellPos::from_key(&key).map_err(D::Error::custom)?;
            entries.push((pos, value));
        }
        Ok(Self::from_entries(entries))
    }
}
