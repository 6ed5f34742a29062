//! Error types for grid handling.

use gmtplot_exec::ExecError;
use thiserror::Error;

/// Result type for grid operations.
pub type GridResult<T> = Result<T, GridError>;

/// Errors that can occur while building, serializing, or sampling grids.
#[derive(Debug, Error)]
pub enum GridError {
    /// The grid is missing data or a range needed for serialization.
    #[error("grid is not fully specified: {reason}")]
    NotFullySpecified { reason: &'static str },

    /// An axis range with min >= max.
    #[error("invalid range: minimum must be smaller than maximum, got {min} and {max}")]
    InvalidRange { min: f64, max: f64 },

    /// The sample count does not match the declared shape.
    #[error("expected {expected} samples for a {rows}x{cols} grid, got {actual}")]
    DimensionMismatch {
        rows: usize,
        cols: usize,
        expected: usize,
        actual: usize,
    },

    /// A native grid header that cannot be valid.
    #[error("malformed grid header: {0}")]
    MalformedHeader(String),

    /// Coordinate slices of differing lengths were passed together.
    #[error("mismatched input lengths: {0}")]
    MismatchedLengths(&'static str),

    /// A GMT call failed.
    #[error(transparent)]
    Exec(#[from] ExecError),

    /// IO error reading or writing grid bytes.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
