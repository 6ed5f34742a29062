//! Cartesian plotting areas.

use std::ops::{Deref, DerefMut};

use gmtplot_exec::Defaults;

use crate::area::{Area, Parent};
use crate::canvas::CanvasHandle;
use crate::util::{round_down, round_up};

/// A cartesian plotting area with a linear or logarithmic frame.
///
/// Dereferences to [`Area`] for the drawing methods. The companion
/// [`AreaXY::paper`] area shares the rectangle but keeps paper coordinates,
/// for annotations placed in centimetres rather than data units.
pub struct AreaXY {
    area: Area,
    /// The same rectangle in paper coordinates.
    pub paper: Area,
    /// Round the respective region bound to a tidy value on
    /// [`AreaXY::set_region`].
    pub round_lower_x: bool,
    pub round_lower_y: bool,
    pub round_upper_x: bool,
    pub round_upper_y: bool,
}

impl AreaXY {
    /// Creates a cartesian area of `size` centimetres at `pos` relative to
    /// the parent, with linear axes and a region matching the size.
    pub fn new(parent: &dyn Parent, pos: [f64; 2], size: [f64; 2]) -> Self {
        Self::with_log_axes(parent, pos, size, false, false)
    }

    /// Like [`AreaXY::new`] with either axis logarithmic.
    pub fn with_log_axes(
        parent: &dyn Parent,
        pos: [f64; 2],
        size: [f64; 2],
        log_x: bool,
        log_y: bool,
    ) -> Self {
        let mut area = Area::new(parent, pos);
        area.size = Some(size);

        let x = if log_x {
            format!("{}l", size[0])
        } else {
            format!("{}", size[0])
        };
        let y = if log_y {
            format!("{}l", size[1])
        } else {
            format!("{}", size[1])
        };
        area.set_projection(format!("X{x}/{y}"));

        let mut paper = Area::new(&area, [0.0, 0.0]);
        paper.size = Some(size);
        paper.set_region([0.0, 0.0], size, true);
        paper.set_projection(format!("X{}/{}", size[0], size[1]));

        let mut this = Self {
            area,
            paper,
            round_lower_x: false,
            round_lower_y: false,
            round_upper_x: false,
            round_upper_y: false,
        };
        this.set_region([0.0, 0.0], size);
        this
    }

    /// Sets the region of interest, optionally snapping bounds flagged via
    /// the `round_*` fields to tidy values.
    pub fn set_region(&mut self, ll: [f64; 2], ur: [f64; 2]) {
        let mut ll = ll;
        let mut ur = ur;
        if self.round_lower_x {
            ll[0] = round_down(ll[0]);
        }
        if self.round_lower_y {
            ll[1] = round_down(ll[1]);
        }
        if self.round_upper_x {
            ur[0] = round_up(ur[0]);
        }
        if self.round_upper_y {
            ur[1] = round_up(ur[1]);
        }
        self.area.set_region(ll, ur, true);
    }
}

impl Deref for AreaXY {
    type Target = Area;

    fn deref(&self) -> &Area {
        &self.area
    }
}

impl DerefMut for AreaXY {
    fn deref_mut(&mut self) -> &mut Area {
        &mut self.area
    }
}

impl Parent for AreaXY {
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
