//! Grid configuration.
//!
//! Every field has a default, so a shell can pass a partial JSON object
//! (e.g. `{"totalRows": 5000}`) and inherit the rest.

use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};
use crate::types::Axis;

/// Default row height in pixels
pub const DEFAULT_ROW_HEIGHT: f64 = 24.0;
/// Default column width in pixels
pub const DEFAULT_COL_WIDTH: f64 = 80.0;
/// Rows can never be shorter than this
pub const MIN_ROW_HEIGHT: f64 = 16.0;
/// Columns can never be narrower than this
pub const MIN_COL_WIDTH: f64 = 20.0;

/// Configuration for grid dimensions, header bands and interaction timings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridConfig {
    /// Number of logical rows
    pub total_rows: u32,
    /// Number of logical columns
    pub total_cols: u32,
    pub default_row_height: f64,
    pub default_col_width: f64,
    pub min_row_height: f64,
    pub min_col_width: f64,
    /// Width of the row header band on the left (~50px default)
    pub row_header_width: f64,
    /// Height of the column header band on top (~24px default)
    pub col_header_height: f64,
    /// Distance from a header boundary that still grabs the resize handle
    pub resize_tolerance: f64,
    /// Width of the band along each viewport edge that triggers autoscroll
    pub autoscroll_edge: f64,
    /// Pixels scrolled per autoscroll tick
    pub autoscroll_step: f64,
    /// Autoscroll tick interval
    pub autoscroll_interval_ms: u32,
    /// Maximum number of undo entries kept
    pub history_capacity: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            total_rows: 100_000,
            total_cols: 500,
            default_row_height: DEFAULT_ROW_HEIGHT,
            default_col_width: DEFAULT_COL_WIDTH,
            min_row_height: MIN_ROW_HEIGHT,
            min_col_width: MIN_COL_WIDTH,
            row_header_width: 50.0,
            col_header_height: 24.0,
            resize_tolerance: 2.0,
            autoscroll_edge: 50.0,
            autoscroll_step: 20.0,
            autoscroll_interval_ms: 30,
            history_capacity: 100,
        }
    }
}

impl GridConfig {
    /// Parse a (possibly partial) JSON config and validate it.
    ///
    /// # Errors
    /// Returns an error for malformed JSON or values that fail [`GridConfig::validate`].
    pub fn from_json(json: &str) -> Result<Self> {
        let config: GridConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the config describes a usable grid.
    ///
    /// # Errors
    /// Returns `GridError::InvalidConfig` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.total_rows == 0 || self.total_cols == 0 {
            return Err(GridError::InvalidConfig(
                "grid must have at least one row and one column".into(),
            ));
        }
        for (name, min, default) in [
            ("row height", self.min_row_height, self.default_row_height),
            ("column width", self.min_col_width, self.default_col_width),
        ] {
            if !min.is_finite() || min < 1.0 {
                return Err(GridError::InvalidConfig(format!(
                    "minimum {name} must be at least 1px"
                )));
            }
            if !default.is_finite() || default < min {
                return Err(GridError::InvalidConfig(format!(
                    "default {name} {default} is below the minimum {min}"
                )));
            }
        }
        for (name, value) in [
            ("rowHeaderWidth", self.row_header_width),
            ("colHeaderHeight", self.col_header_height),
            ("resizeTolerance", self.resize_tolerance),
            ("autoscrollEdge", self.autoscroll_edge),
            ("autoscrollStep", self.autoscroll_step),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(GridError::InvalidConfig(format!(
                    "{name} must be a non-negative number"
                )));
            }
        }
        if self.history_capacity == 0 {
            return Err(GridError::InvalidConfig(
                "historyCapacity must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Number of indices along an axis.
    pub fn count(&self, axis: Axis) -> u32 {
        match axis {
            Axis::Row => self.total_rows,
            Axis::Column => self.total_cols,
        }
    }
}
