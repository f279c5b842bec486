//! Reversible grid mutations.
//!
//! Every change to cell content (and every committed resize) is one of these
//! variants. Each carries the data needed to invert itself, is built against
//! the current [`Sheet`] before anything is touched, and applies without
//! failing, so the history never holds a half-applied entry.

use crate::sheet::Sheet;
use crate::store::CellStore;
use crate::types::{Axis, Bounds, CellPos};

/// One cell's value before and after a change (`None` = empty).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellChange {
    pub pos: CellPos,
    pub before: Option<String>,
    pub after: Option<String>,
}

/// A reversible unit of mutation
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Single cell write (edit commit)
    UpdateCell(CellChange),
    /// Block write starting at an anchor (paste)
    PasteRange { changes: Vec<CellChange> },
    /// Clear a region (delete key, cut)
    DeleteRange {
        bounds: Bounds,
        removed: Vec<(CellPos, String)>,
    },
    /// Row height or column width change
    Resize {
        axis: Axis,
        index: u32,
        before: Option<f64>,
        after: f64,
    },
    /// Insert an empty row or column, shifting later ones forward
    InsertLine {
        axis: Axis,
        at: u32,
        dropped_cells: Vec<(CellPos, String)>,
        dropped_size: Option<f64>,
    },
    /// Whole-store replacement (table load, state restore)
    Replace {
        before: CellStore,
        after: CellStore,
    },
}

impl Command {
    /// Write `value` at `pos`. `None` if out of bounds or nothing would change.
    pub fn update_cell(sheet: &Sheet, pos: CellPos, value: &str) -> Option<Self> {
        if !sheet.in_bounds(pos) {
            return None;
        }
        let change = change_at(sheet, pos, value)?;
        Some(Command::UpdateCell(change))
    }

    /// Write a block of rows over `target`, a destination already clipped to
    /// the grid. Stored cells of `target` the block does not reach are
    /// cleared in the same command.
    pub fn paste_range(sheet: &Sheet, target: Bounds, rows: &[Vec<String>]) -> Option<Self> {
        let origin = target.top_left();
        let mut changes = Vec::new();
        for (dr, row) in rows.iter().enumerate() {
            for (dc, value) in row.iter().enumerate() {
                let Some(pos) = offset_pos(origin, dr, dc) else {
                    break;
                };
                if !target.contains(pos) || !sheet.in_bounds(pos) {
                    continue;
                }
                if let Some(change) = change_at(sheet, pos, value) {
                    changes.push(change);
                }
            }
        }

        let reached = |pos: CellPos| {
            let dr = (pos.row - origin.row) as usize;
            let dc = (pos.col - origin.col) as usize;
            rows.get(dr).is_some_and(|row| dc < row.len())
        };
        changes.extend(
            sheet
                .cells
                .iter_in(target)
                .filter(|(pos, _)| !reached(*pos))
                .map(|(pos, value)| CellChange {
                    pos,
                    before: Some(value.to_string()),
                    after: None,
                }),
        );

        if changes.is_empty() {
            None
        } else {
            Some(Command::PasteRange { changes })
        }
    }

    /// Clear every cell in `bounds`. `None` if the region is already empty.
    pub fn delete_range(sheet: &Sheet, bounds: Bounds) -> Option<Self> {
        let removed: Vec<(CellPos, String)> = sheet
            .cells
            .iter_in(bounds)
            .map(|(pos, v)| (pos, v.to_string()))
            .collect();
        if removed.is_empty() {
            None
        } else {
            Some(Command::DeleteRange { bounds, removed })
        }
    }

    /// Record a resize from a captured override to a final size.
    pub fn resize(axis: Axis, index: u32, before: Option<f64>, after: f64) -> Self {
        Command::Resize {
            axis,
            index,
            before,
            after,
        }
    }

    /// Insert an empty line at `at`. The last line falls off the grid.
    pub fn insert_line(sheet: &Sheet, axis: Axis, at: u32) -> Option<Self> {
        let count = sheet.count(axis);
        if at >= count {
            return None;
        }
        let last = count - 1;
        let dropped_cells = sheet
            .cells
            .iter()
            .filter(|(pos, _)| pos.along(axis) == last)
            .map(|(pos, v)| (pos, v.to_string()))
            .collect();
        Some(Command::InsertLine {
            axis,
            at,
            dropped_cells,
            dropped_size: sheet.sizes.axis(axis).override_of(last),
        })
    }

    /// Replace the whole store. `None` if it would not change.
    pub fn replace(sheet: &Sheet, after: CellStore) -> Option<Self> {
        if sheet.cells == after {
            return None;
        }
        Some(Command::Replace {
            before: sheet.cells.clone(),
            after,
        })
    }

    pub(crate) fn apply(&self, sheet: &mut Sheet) {
        match self {
            Command::UpdateCell(change) => sheet.cells.put(change.pos, change.after.as_ref()),
            Command::PasteRange { changes } => {
                for change in changes {
                    sheet.cells.put(change.pos, change.after.as_ref());
                }
            }
            Command::DeleteRange { bounds, .. } => {
                sheet.cells.remove_in(*bounds);
            }
            Command::Resize {
                axis, index, after, ..
            } => {
                sheet.sizes.set(*axis, *index, *after);
            }
            Command::InsertLine { axis, at, .. } => {
                let limit = sheet.count(*axis);
                sheet.cells.insert_line(*axis, *at, limit);
                sheet.sizes.axis_mut(*axis).insert_line(*at);
            }
            Command::Replace { after, .. } => sheet.cells = after.clone(),
        }
    }

    pub(crate) fn revert(&self, sheet: &mut Sheet) {
        match self {
            Command::UpdateCell(change) => sheet.cells.put(change.pos, change.before.as_ref()),
            Command::PasteRange { changes } => {
                for change in changes.iter().rev() {
                    sheet.cells.put(change.pos, change.before.as_ref());
                }
            }
            Command::DeleteRange { removed, .. } => {
                for (pos, value) in removed {
                    sheet.cells.set(*pos, value.clone());
                }
            }
            Command::Resize {
                axis,
                index,
                before,
                ..
            } => sheet.sizes.axis_mut(*axis).restore(*index, *before),
            Command::InsertLine {
                axis,
                at,
                dropped_cells,
                dropped_size,
            } => {
                sheet.cells.remove_line(*axis, *at, dropped_cells);
                sheet.sizes.axis_mut(*axis).remove_line(*at, *dropped_size);
            }
            Command::Replace { before, .. } => sheet.cells = before.clone(),
        }
    }

    /// Short name for logs.
    pub fn label(&self) -> &'static str {
        match self {
            Command::UpdateCell(_) => "update_cell",
            Command::PasteRange { .. } => "paste_range",
            Command::DeleteRange { .. } => "delete_range",
            Command::Resize { .. } => "resize",
            Command::InsertLine { .. } => "insert_line",
            Command::Replace { .. } => "replace",
        }
    }
}

fn change_at(sheet: &Sheet, pos: CellPos, value: &str) -> Option<CellChange> {
    let before = sheet.cells.get(pos);
    let after = (!value.is_empty()).then_some(value);
    if before == after {
        return None;
    }
    Some(CellChange {
        pos,
        before: before.map(str::to_string),
        after: after.map(str::to_string),
    })
}

fn offset_pos(origin: CellPos, dr: usize, dc: usize) -> Option<CellPos> {
    let row = origin.row.checked_add(u32::try_from(dr).ok()?)?;
    let col = origin.col.checked_add(u32::try_from(dc).ok()?)?;
    Some(CellPos::new(row, col))
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::config::GridConfig;

    fn sheet(rows: u32, cols: u32) -> Sheet {
        Sheet::new(&GridConfig {
            total_rows: rows,
            total_cols: cols,
            ..GridConfig::default()
        })
    }

    #[test]
    fn test_update_cell_round_trip() {
        let mut s = sheet(10, 10);
        let cmd = Command::update_cell(&s, CellPos::new(1, 1), "hi").unwrap();
        cmd.apply(&mut s);
        assert_eq!(s.cells().value(CellPos::new(1, 1)), "hi");
        cmd.revert(&mut s);
        assert!(s.cells().is_empty());
    }

    #[test]
    fn test_update_cell_noop_is_none() {
        let s = sheet(10, 10);
        assert!(Command::update_cell(&s, CellPos::new(1, 1), "").is_none());
        assert!(Command::update_cell(&s, CellPos::new(10, 0), "x").is_none());
    }

    #[test]
    fn test_paste_clips_rows_and_cols() {
        let s = sheet(10, 3);
        let block = vec![vec!["a".to_string(); 5]; 5];
        let target = Bounds::spanning(CellPos::new(8, 1), s.clamp(CellPos::new(12, 5)));
        let Some(Command::PasteRange { changes }) = Command::paste_range(&s, target, &block) else {
            panic!("expected a paste command");
        };
        // rows 8..10, cols 1..3
        assert_eq!(changes.len(), 4);
        assert!(changes.iter().all(|c| c.pos.row >= 8 && c.pos.col >= 1));
    }

    #[test]
    fn test_paste_clears_cells_past_stored_values() {
        let mut s = sheet(20, 5);
        for pos in [(10, 1), (11, 0), (12, 2), (13, 0)] {
            s.cells.set(CellPos::new(pos.0, pos.1), "x".into());
        }
        let block = vec![vec!["a".to_string()]];
        let target = Bounds::spanning(CellPos::new(10, 0), CellPos::new(12, 2));
        let cmd = Command::paste_range(&s, target, &block).unwrap();
        cmd.apply(&mut s);
        assert_eq!(s.cells().value(CellPos::new(10, 0)), "a");
        assert_eq!(s.cells().value(CellPos::new(10, 1)), "");
        assert_eq!(s.cells().value(CellPos::new(11, 0)), "");
        assert_eq!(s.cells().value(CellPos::new(12, 2)), "");
        // outside the target
        assert_eq!(s.cells().value(CellPos::new(13, 0)), "x");

        cmd.revert(&mut s);
        assert_eq!(s.cells().len(), 4);
        assert_eq!(s.cells().value(CellPos::new(10, 0)), "");
        assert_eq!(s.cells().value(CellPos::new(12, 2)), "x");
    }

    #[test]
    fn test_delete_range_restores_on_revert() {
        let mut s = sheet(10, 10);
        s.cells.set(CellPos::new(2, 2), "x".into());
        s.cells.set(CellPos::new(3, 3), "y".into());
        let bounds = Bounds::spanning(CellPos::new(0, 0), CellPos::new(2, 9));
        let cmd = Command::delete_range(&s, bounds).unwrap();
        cmd.apply(&mut s);
        assert_eq!(s.cells().len(), 1);
        cmd.revert(&mut s);
        assert_eq!(s.cells().value(CellPos::new(2, 2)), "x");
    }

    #[test]
    fn test_insert_line_drops_last_row() {
        let mut s = sheet(3, 2);
        s.cells.set(CellPos::new(2, 0), "last".into());
        s.cells.set(CellPos::new(0, 0), "first".into());
        s.sizes.set(Axis::Row, 2, 40.0);
        let before = s.cells().clone();

        let cmd = Command::insert_line(&s, Axis::Row, 0).unwrap();
        cmd.apply(&mut s);
        assert_eq!(s.cells().value(CellPos::new(1, 0)), "first");
        assert_eq!(s.cells().value(CellPos::new(2, 0)), "");

        cmd.revert(&mut s);
        assert_eq!(s.cells(), &before);
        assert_eq!(s.sizes().get(Axis::Row, 2), 40.0);
    }

    #[test]
    fn test_resize_revert_to_default() {
        let mut s = sheet(10, 10);
        let cmd = Command::resize(Axis::Column, 4, None, 150.0);
        cmd.apply(&mut s);
        assert_eq!(s.sizes().get(Axis::Column, 4), 150.0);
        cmd.revert(&mut s);
        assert_eq!(s.sizes().axis(Axis::Column).override_of(4), None);
    }
}
