//! GMT grid handling.
//!
//! A [`Grid`] is a rectangular field of `f32` samples plus georeferencing
//! metadata: axis ranges, node registration, value scale/offset, and the
//! free-text labels GMT's native grid format carries. Grids are exchanged
//! with the GMT programs in that native binary layout ([`native`]), either
//! piped over stdin or through temporary files, and the grid-centric
//! operations (track sampling, reprojection, triangulation) live in
//! [`ops`].
//!
//! ```
//! use gmtplot_grid::{Grid, GridData};
//!
//! let mut grid = Grid::new();
//! grid.set_x_range(0.0, 10.0)?;
//! grid.set_y_range(0.0, 20.0)?;
//! grid.set_data(GridData::filled(3, 3, 0.0)?);
//!
//! let mut buf = Vec::new();
//! gmtplot_grid::native::write(&grid, &mut buf)?;
//! let parsed = gmtplot_grid::native::read(&mut buf.as_slice())?;
//! assert_eq!(parsed.data(), grid.data());
//! # Ok::<(), gmtplot_grid::GridError>(())
//! ```

pub mod error;
pub mod grid;
pub mod native;
pub mod ops;

#[cfg(test)]
mod test_stub;

pub use error::{GridError, GridResult};
pub use grid::{
    Grid, GridData, Registration, GRD_COMMAND_LEN, GRD_REMARK_LEN, GRD_TITLE_LEN, GRD_UNIT_LEN,
};
pub use ops::{grid_command, triangulate, DEFAULT_TRACK_TOLERANCE};
