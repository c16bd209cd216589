//! # Error Types
//!
//! Error enums shared across the engine. None of these are allowed to abort a
//! frame: location format errors are recovered at the codec boundary, data
//! errors become a retryable load state, and layout errors are returned to the
//! caller that asked for an out-of-grid cell.

use thiserror::Error;

use crate::layout::GridCoordinate;

/// Malformed external location code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("location code `{code}` has {parts} dash-separated parts, expected 3")]
    PartCount { code: String, parts: usize },

    #[error("location code `{code}`: {field} `{value}` is not an integer")]
    NotAnInteger {
        code: String,
        field: &'static str,
        value: String,
    },

    #[error("location code `{code}`: {field} is 1-based, got 0")]
    ZeroIndex { code: String, field: &'static str },

    #[error("location code `{code}`: invalid section `{section}`")]
    InvalidSection { code: String, section: String },

    #[error("row {row} has no section letter in warehouse {warehouse}")]
    RowOutOfRange { row: u32, warehouse: char },
}

/// The warehouse data fetch failed or produced nothing usable.
#[derive(Debug, Error)]
pub enum DataUnavailableError {
    #[error("fetch failed: {0}")]
    Fetch(String),

    #[error("warehouse source returned no records")]
    Empty,

    #[error("malformed warehouse records: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("could not read warehouse records: {0}")]
    Io(#[from] std::io::Error),
}

/// Layout parameter invariant violations and geometry preconditions.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("shelves_x_per_row has {actual} entries but shelves_z is {expected}")]
    RowCountMismatch { expected: u32, actual: usize },

    #[error("gap `{name}` must be a finite value >= 0, got {value}")]
    NegativeGap { name: &'static str, value: f32 },

    #[error("floor footprint must be positive, got {width} x {depth}")]
    NonPositiveFootprint { width: f32, depth: f32 },

    #[error("cell {coord} is outside the declared grid")]
    OutOfBounds { coord: GridCoordinate },

    #[error("no loading area with index {0}")]
    UnknownArea(usize),
}

/// Configuration document could not be used.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("could not read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid layout: {0}")]
    Layout(#[from] LayoutError),
}
