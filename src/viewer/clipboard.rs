//! Copy/cut/paste snapshots and TSV text interop.
//!
//! The clipboard records the full extent of the copied selection but only
//! stores values up to the last non-empty row and column. Everything past
//! that (and every gap) reads as `""`, so copying a whole column costs what
//! its content costs while paste still clears the whole destination.

use crate::store::CellStore;
use crate::types::Bounds;

/// A deep snapshot of copied values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clipboard {
    /// Stored values, anchored at the top-left of the extent.
    pub rows: Vec<Vec<String>>,
    /// Taken by cut rather than copy.
    pub cut: bool,
    height: u32,
    width: u32,
}

impl Clipboard {
    /// Snapshot the values inside `bounds`. Absent cells read as `""`.
    pub fn capture(cells: &CellStore, bounds: Bounds, cut: bool) -> Self {
        let mut content: Option<(u32, u32)> = None;
        for (pos, _) in cells.iter_in(bounds) {
            let (r, c) = content.unwrap_or((pos.row, pos.col));
            content = Some((r.max(pos.row), c.max(pos.col)));
        }
        let mut rows = Vec::new();
        if let Some((max_row, max_col)) = content {
            let width = (max_col - bounds.min_col) as usize + 1;
            let height = (max_row - bounds.min_row) as usize + 1;
            rows = vec![vec![String::new(); width]; height];
            for (pos, value) in cells.iter_in(bounds) {
                let r = (pos.row - bounds.min_row) as usize;
                let c = (pos.col - bounds.min_col) as usize;
                if let Some(slot) = rows.get_mut(r).and_then(|row| row.get_mut(c)) {
                    *slot = value.to_string();
                }
            }
        }
        Self {
            rows,
            cut,
            height: bounds.row_count(),
            width: bounds.col_count(),
        }
    }

    /// Wrap parsed rows. The extent is the row count by the widest row.
    pub fn from_rows(rows: Vec<Vec<String>>) -> Self {
        let height = u32::try_from(rows.len()).unwrap_or(u32::MAX);
        let width = rows
            .iter()
            .map(|r| u32::try_from(r.len()).unwrap_or(u32::MAX))
            .max()
            .unwrap_or(0);
        Self {
            rows,
            cut: false,
            height,
            width,
        }
    }

    /// Rows spanned by the copied selection.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Columns spanned by the copied selection.
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn is_empty(&self) -> bool {
        self.height == 0 || self.width == 0
    }

    /// Value at an offset inside the extent.
    pub fn value(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map_or("", String::as_str)
    }

    /// Tab-separated text for the system clipboard.
    pub fn to_tsv(&self) -> String {
        (0..self.height as usize)
            .map(|r| {
                (0..self.width as usize)
                    .map(|c| escape_cell_value(self.value(r, c)))
                    .collect::<Vec<_>>()
                    .join("\t")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Parse tab-separated text. Quoted fields may contain tabs, newlines and
    /// doubled quotes. A trailing newline does not add an empty row.
    pub fn from_tsv(text: &str) -> Self {
        let mut rows = Vec::new();
        let mut row = Vec::new();
        let mut field = String::new();
        let mut quoted = false;
        let mut field_start = true;
        let mut chars = text.chars().peekable();

        while let Some(ch) = chars.next() {
            if quoted {
                if ch == '"' {
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        field.push('"');
                    } else {
                        quoted = false;
                    }
                } else {
                    field.push(ch);
                }
                continue;
            }
            match ch {
                '"' if field_start => {
                    quoted = true;
                    field_start = false;
                }
                '\t' => {
                    row.push(std::mem::take(&mut field));
                    field_start = true;
                }
                '\r' if chars.peek() == Some(&'\n') => {}
                '\n' => {
                    row.push(std::mem::take(&mut field));
                    rows.push(std::mem::take(&mut row));
                    field_start = true;
                }
                _ => {
                    field.push(ch);
                    field_start = false;
                }
            }
        }
        if !field_start || !row.is_empty() {
            row.push(field);
            rows.push(row);
        }
        Self::from_rows(rows)
    }
}

/// Escape a cell value for TSV/clipboard format.
/// Values containing tabs, newlines or quotes are wrapped in quotes with
/// internal quotes doubled.
pub(crate) fn escape_cell_value(value: &str) -> String {
    let needs_quoting = value.contains(['\t', '\n', '\r', '"']);
    if needs_quoting {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
