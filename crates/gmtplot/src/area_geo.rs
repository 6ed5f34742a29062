//! Geographic plotting areas.

use std::ops::{Deref, DerefMut};

use gmtplot_exec::Defaults;

use crate::area::{Area, Parent};
use crate::canvas::CanvasHandle;
use crate::error::{PlotError, PlotResult};

/// A plotting area with a geographic projection.
///
/// The projection string is GMT's `-J` value without the size suffix; the
/// size is appended from the width (and height, when given). When only the
/// width is known, the height is derived from the projected position of the
/// region's upper-right corner the first time the region is set.
pub struct AreaGeo {
    area: Area,
    /// The same rectangle in paper coordinates; configured once the region
    /// (and with it the height) is known.
    pub paper: Area,
    width: f64,
    height: Option<f64>,
}

impl AreaGeo {
    /// Creates a geographic area of the given width; the height follows
    /// from the projection when the region is set.
    pub fn new(parent: &dyn Parent, projection: &str, pos: [f64; 2], width: f64) -> Self {
        Self::build(parent, projection, pos, width, None)
    }

    /// Creates a geographic area with an explicit width and height.
    pub fn with_size(parent: &dyn Parent, projection: &str, pos: [f64; 2], size: [f64; 2]) -> Self {
        Self::build(parent, projection, pos, size[0], Some(size[1]))
    }

    fn build(
        parent: &dyn Parent,
        projection: &str,
        pos: [f64; 2],
        width: f64,
        height: Option<f64>,
    ) -> Self {
        let mut area = Area::new(parent, pos);
        match height {
            Some(height) => {
                area.set_projection(format!("{projection}/{width}/{height}"));
                area.size = Some([width, height]);
            }
            None => area.set_projection(format!("{projection}/{width}")),
        }
        let paper = Area::new(&area, [0.0, 0.0]);
        Self {
            area,
            paper,
            width,
            height,
        }
    }

    /// Sets the region of interest and finishes the frame: a derived
    /// height is computed by projecting the upper-right corner, and the
    /// paper companion area is laid out to match.
    pub fn set_region(&mut self, ll: [f64; 2], ur: [f64; 2], rectangular: bool) -> PlotResult<()> {
        self.area.set_region(ll, ur, rectangular);

        if self.height.is_none() {
            let (_, ys) = self.area.project(&[ur[0]], &[ur[1]], false)?;
            let height = ys.first().copied().unwrap_or(f64::NAN);
            if !height.is_finite() {
                return Err(PlotError::UnusableOutput("mapproject"));
            }
            self.height = Some(height);
        }

        let size = [self.width, self.height.unwrap_or(self.width)];
        self.area.size = Some(size);
        self.paper.size = Some(size);
        self.paper.set_region([0.0, 0.0], size, true);
        self.paper.set_projection(format!("X{}/{}", size[0], size[1]));
        Ok(())
    }

    /// Draws the coastline with `pscoast`.
    pub fn coastline(&mut self, args: &str) -> PlotResult<()> {
        self.area.canvas_command("pscoast", args, b"")
    }
}

impl Deref for AreaGeo {
    type Target = Area;

    fn deref(&self) -> &Area {
        &self.area
    }
}

impl DerefMut for AreaGeo {
    fn deref_mut(&mut self) -> &mut Area {
        &mut self.area
    }
}

impl Parent for AreaGeo {
    fn handle(&self) -> CanvasHandle {
        self.area.handle()
    }

    fn defaults(&self) -> &Defaults {
        &self.area.defaults
    }

    fn origin(&self) -> [f64; 2] {
        self.area.position()
    }
}
