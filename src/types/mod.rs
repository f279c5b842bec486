//! Core value types shared by the grid engine.

mod cell;
mod selection;

pub use cell::*;
pub use selection::*;
