use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{GridError, Result};

/// Logical cell coordinate. Ordered row-major so a `BTreeMap` keyed by it
/// iterates rows top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellPos {
    pub row: u32, // 0-indexed
    pub col: u32, // 0-indexed
}

impl CellPos {
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Index along the given axis.
    pub const fn along(self, axis: Axis) -> u32 {
        match axis {
            Axis::Row => self.row,
            Axis::Column => self.col,
        }
    }

    /// Persisted key form (`"row,col"`).
    pub fn to_key(self) -> String {
        format!("{},{}", self.row, self.col)
    }

    /// Parse a persisted `"row,col"` key.
    ///
    /// # Errors
    /// Returns `GridError::InvalidCellKey` when the key is not two
    /// comma-separated unsigned integers.
    pub fn from_key(key: &str) -> Result<Self> {
        let (row, col) = key
            .split_once(',')
            .ok_or_else(|| GridError::InvalidCellKey(key.to_string()))?;
        let row = row
            .trim()
            .parse::<u32>()
            .map_err(|_| GridError::InvalidCellKey(key.to_string()))?;
        let col = col
            .trim()
            .parse::<u32>()
            .map_err(|_| GridError::InvalidCellKey(key.to_string()))?;
        Ok(Self { row, col })
    }
}

impl fmt::Display for CellPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Row or column dimension. Sizing and mapping code is written once and
/// parameterized over this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Axis {
    Row,
    Column,
}

impl Axis {
    pub const fn other(self) -> Self {
        match self {
            Axis::Row => Axis::Column,
            Axis::Column => Axis::Row,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_key_round_trip() {
        let pos = CellPos::new(12, 340);
        assert_eq!(pos.to_key(), "12,340");
        assert_eq!(CellPos::from_key("12,340").unwrap(), pos);
    }

    #[test]
    fn test_key_tolerates_spaces() {
        assert_eq!(CellPos::from_key(" 3 , 4").unwrap(), CellPos::new(3, 4));
    }

    #[test]
    fn test_bad_keys_rejected() {
        for key in ["", "1", "a,b", "1,-2", "1;2"] {
            assert!(
                matches!(CellPos::from_key(key), Err(GridError::InvalidCellKey(_))),
                "key {key:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_row_major_order() {
        assert!(CellPos::new(0, 499) < CellPos::new(1, 0));
        assert!(CellPos::new(1, 0) < CellPos::new(1, 1));
    }
}
