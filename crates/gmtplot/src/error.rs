//! Error types for plot composition.

use gmtplot_exec::ExecError;
use gmtplot_grid::GridError;
use thiserror::Error;

/// Result type for plotting operations.
pub type PlotResult<T> = Result<T, PlotError>;

/// Errors that can occur while composing a plot.
#[derive(Debug, Error)]
pub enum PlotError {
    /// A drawing call was made before the area's region was set.
    #[error("region of interest is not set")]
    RegionNotSet,

    /// A drawing call was made before the area's projection was set.
    #[error("projection is not set")]
    ProjectionNotSet,

    /// A coordinate frame was requested for an area with no size.
    #[error("area size is not set")]
    SizeNotSet,

    /// An unrecognized paper size name.
    #[error("unknown paper size `{0}`")]
    UnknownPaperSize(String),

    /// A per-point argument whose length differs from the point count.
    #[error("per-point argument has {actual} entries for {expected} points")]
    PerPointLengthMismatch { expected: usize, actual: usize },

    /// Coordinate slices of differing lengths were passed together.
    #[error("mismatched input lengths: {0}")]
    MismatchedLengths(&'static str),

    /// A GMT program produced output the caller cannot proceed with.
    #[error("unusable output from {0}")]
    UnusableOutput(&'static str),

    /// A GMT call failed.
    #[error(transparent)]
    Exec(#[from] ExecError),

    /// A grid operation failed.
    #[error(transparent)]
    Grid(#[from] GridError),

    /// IO error while writing the plot file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
