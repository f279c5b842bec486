//! Summary statistics over the selected cells.

use serde::Serialize;

use crate::store::CellStore;
use crate::types::Bounds;

/// count/sum/average/min/max for the status bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionStats {
    /// Non-empty cells in the selection
    pub count: usize,
    /// Cells whose value parses as a finite number
    pub numeric_count: usize,
    pub sum: f64,
    pub average: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl SelectionStats {
    /// Only stored cells are visited, so whole-row and whole-column
    /// selections cost what the content costs.
    pub fn compute(cells: &CellStore, bounds: Bounds) -> Self {
        Self::from_values(cells.iter_in(bounds).map(|(_, v)| v))
    }

    pub fn from_values<'a>(values: impl Iterator<Item = &'a str>) -> Self {
        let mut stats = Self::default();
        for value in values {
            if value.is_empty() {
                continue;
            }
            stats.count += 1;
            let Some(n) = parse_number(value) else {
                continue;
            };
            stats.numeric_count += 1;
            stats.sum += n;
            stats.min = Some(stats.min.map_or(n, |m| m.min(n)));
            stats.max = Some(stats.max.map_or(n, |m| m.max(n)));
        }
        if stats.numeric_count > 0 {
            stats.average = Some(stats.sum / stats.numeric_count as f64);
        }
        stats
    }
}

fn parse_number(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::types::CellPos;

    #[test]
    fn test_mixed_values() {
        let stats = SelectionStats::from_values(["3", "x", " 4.5 ", "", "-1", "inf"].into_iter());
        assert_eq!(stats.count, 5);
        assert_eq!(stats.numeric_count, 3);
        assert_eq!(stats.sum, 6.5);
        assert_eq!(stats.min, Some(-1.0));
        assert_eq!(stats.max, Some(4.5));
        assert!((stats.average.unwrap() - 6.5 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_numbers() {
        let stats = SelectionStats::from_values(["a", "b"].into_iter());
        assert_eq!(stats.count, 2);
        assert_eq!(stats.average, None);
        assert_eq!(stats.min, None);
    }

    #[test]
    fn test_compute_respects_bounds() {
        let cells = CellStore::from_entries([
            (CellPos::new(0, 3), "10".to_string()),
            (CellPos::new(500, 3), "20".to_string()),
            (CellPos::new(1, 4), "99".to_string()),
        ]);
        let column = Bounds {
            min_row: 0,
            max_row: 99_999,
            min_col: 3,
            max_col: 3,
        };
        let stats = SelectionStats::compute(&cells, column);
        assert_eq!(stats.count, 2);
        assert_eq!(stats.sum, 30.0);
    }
}
