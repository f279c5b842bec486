//! Structured error types for vastgrid.
//!
//! Geometry and selection never fail; errors only surface at the boundaries
//! where external data enters the engine (JSON state, tables, config, files).

/// All errors that can occur while loading or persisting grid state.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// JSON (de)serialization error.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A persisted cell key that is not of the form `"row,col"`.
    #[error("Invalid cell key: {0}")]
    InvalidCellKey(String),

    /// Configuration values that cannot describe a usable grid.
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GridError>;

impl From<GridError> for wasm_bindgen::JsValue {
    fn from(e: GridError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
