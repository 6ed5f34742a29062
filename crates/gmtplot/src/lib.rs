//! Compose cartographic and scientific plots by driving the GMT
//! command-line programs.
//!
//! A plot is a [`Canvas`] (one PostScript file) holding a tree of nested
//! plotting areas: cartesian ([`AreaXY`], the data-fitted [`AutoXy`]),
//! geographic ([`AreaGeo`]), and legend areas ([`KeyArea`]). Every drawing
//! call shells out to the matching GMT program, piping point data or a
//! serialized grid through its stdin and appending the returned PostScript
//! to the canvas. GMT does all projection, contouring, and gridding work;
//! this crate only arranges the calls.
//!
//! # Example
//!
//! ```no_run
//! use gmtplot::{AreaGeo, AreaXY, Canvas, Session};
//!
//! let session = Session::new()?;
//! let mut plot = Canvas::new(&session, "map.ps")?;
//! plot.defaults.set("LABEL_FONT_SIZE", "12p")?;
//!
//! let mut map = AreaGeo::new(&plot, "B33.5/60.5/52.83/68.17", [1.0, 0.0], 10.0);
//! map.set_region([7.0, 49.0], [59.92, 71.95], true)?;
//! map.coastline("-W")?;
//! map.coord_system(true)?;
//!
//! let mut graph = AreaXY::new(&plot, [1.0, 14.0], [10.0, 5.0]);
//! graph.line("-W1/255/0/0", &[2.0, 3.0, 4.0], &[3.0, 1.5, 1.0])?;
//! graph.coord_system(false)?;
//!
//! plot.close()?;
//! # Ok::<(), gmtplot::PlotError>(())
//! ```

pub mod area;
pub mod area_geo;
pub mod area_xy;
pub mod auto_xy;
pub mod canvas;
pub mod error;
pub mod legend;
pub mod util;

#[cfg(test)]
mod test_stub;

pub use area::{Area, ContourKind, Contours, Parent, PlotArg};
pub use area_geo::AreaGeo;
pub use area_xy::AreaXY;
pub use auto_xy::AutoXy;
pub use canvas::{paper_size, Canvas, CanvasConfig, CanvasHandle, Orientation};
pub use error::{PlotError, PlotResult};
pub use legend::{colour_key, KeyArea};
pub use util::{expand_interval, round_down, round_down_with, round_up, round_up_with};

// The layers underneath, re-exported for callers that work with grids or
// run GMT programs directly.
pub use gmtplot_exec::{Defaults, ExecError, ExecResult, Session};
pub use gmtplot_grid::{
    grid_command, triangulate, Grid, GridData, GridError, GridResult, Registration,
};
