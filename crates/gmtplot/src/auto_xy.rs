//! Cartesian areas that size their region to the data.
//!
//! Drawing calls made before [`AutoXy::finalise`] are recorded together
//! with their bounding boxes instead of being executed; finalising picks a
//! region covering everything recorded, then replays the calls. After
//! that the area behaves like a plain [`AreaXY`].

use std::ops::{Deref, DerefMut};

use gmtplot_exec::Defaults;
use gmtplot_grid::Grid;

use crate::area::{ContourKind, Contours, Parent, PlotArg};
use crate::area_xy::AreaXY;
use crate::canvas::CanvasHandle;
use crate::error::PlotResult;
use crate::util::round_up_with;

enum Deferred {
    Line {
        args: String,
        xs: Vec<f64>,
        ys: Vec<f64>,
    },
    Steps {
        args: String,
        xs: Vec<f64>,
        ys: Vec<f64>,
    },
    Symbols {
        args: String,
        xs: Vec<f64>,
        ys: Vec<f64>,
        size: PlotArg<String>,
        symbol: PlotArg<String>,
    },
    Points {
        args: String,
        xs: Vec<f64>,
        ys: Vec<f64>,
        x_errors: Vec<f64>,
        y_errors: Vec<f64>,
    },
    Image {
        grid: Grid,
        colormap: String,
        args: String,
    },
    Contour {
        grid: Grid,
        contours: Contours,
        args: String,
    },
}

impl Deferred {
    fn bounds(&self) -> Option<[f64; 4]> {
        match self {
            Deferred::Line { xs, ys, .. }
            | Deferred::Steps { xs, ys, .. }
            | Deferred::Symbols { xs, ys, .. }
            | Deferred::Points { xs, ys, .. } => point_bounds(xs, ys),
            Deferred::Image { grid, .. } | Deferred::Contour { grid, .. } => {
                let x = grid.x_range();
                let y = grid.y_range();
                Some([x[0], y[0], x[1], y[1]])
            }
        }
    }

    fn replay(self, area: &mut AreaXY) -> PlotResult<()> {
        match self {
            Deferred::Line { args, xs, ys } => area.line(&args, &xs, &ys),
            Deferred::Steps { args, xs, ys } => area.steps(&args, &xs, &ys),
            Deferred::Symbols {
                args,
                xs,
                ys,
                size,
                symbol,
            } => area.symbols(&xs, &ys, &size, &symbol, &args),
            Deferred::Points {
                args,
                xs,
                ys,
                x_errors,
                y_errors,
            } => area.points_with_errors(&xs, &ys, &x_errors, &y_errors, &args),
            Deferred::Image {
                grid,
                colormap,
                args,
            } => area.image(&grid, &colormap, &args),
            Deferred::Contour {
                grid,
                contours,
                args,
            } => area.contour(&grid, &contours, &args, ContourKind::Plain),
        }
    }
}

fn point_bounds(xs: &[f64], ys: &[f64]) -> Option<[f64; 4]> {
    let mut bounds: Option<[f64; 4]> = None;
    for (&x, &y) in xs.iter().zip(ys) {
        if !x.is_finite() || !y.is_finite() {
            continue;
        }
        bounds = Some(match bounds {
            None => [x, y, x, y],
            Some(b) => [b[0].min(x), b[1].min(y), b[2].max(x), b[3].max(y)],
        });
    }
    bounds
}

fn merge(acc: Option<[f64; 4]>, add: Option<[f64; 4]>) -> Option<[f64; 4]> {
    match (acc, add) {
        (Some(a), Some(b)) => Some([
            a[0].min(b[0]),
            a[1].min(b[1]),
            a[2].max(b[2]),
            a[3].max(b[3]),
        ]),
        (a, None) => a,
        (None, b) => b,
    }
}

/// A cartesian area whose region is fitted to the recorded data.
pub struct AutoXy {
    xy: AreaXY,
    bounds: Option<[f64; 4]>,
    finalised: bool,
    deferred: Vec<Deferred>,
}

impl AutoXy {
    pub fn new(parent: &dyn Parent, pos: [f64; 2], size: [f64; 2]) -> Self {
        Self::with_log_axes(parent, pos, size, false, false)
    }

    pub fn with_log_axes(
        parent: &dyn Parent,
        pos: [f64; 2],
        size: [f64; 2],
        log_x: bool,
        log_y: bool,
    ) -> Self {
        Self {
            xy: AreaXY::with_log_axes(parent, pos, size, log_x, log_y),
            bounds: None,
            finalised: false,
            deferred: Vec::new(),
        }
    }

    fn record(&mut self, plot: Deferred) {
        self.bounds = merge(self.bounds, plot.bounds());
        self.deferred.push(plot);
    }

    /// Records or draws a polyline; see [`crate::Area::line`].
    pub fn line(&mut self, args: &str, xs: &[f64], ys: &[f64]) -> PlotResult<()> {
        if self.finalised {
            return self.xy.line(args, xs, ys);
        }
        let (xs, ys) = finite_points(xs, ys);
        self.record(Deferred::Line {
            args: args.to_string(),
            xs,
            ys,
        });
        Ok(())
    }

    /// Records or draws a staircase line; see [`crate::Area::steps`].
    pub fn steps(&mut self, args: &str, xs: &[f64], ys: &[f64]) -> PlotResult<()> {
        if self.finalised {
            return self.xy.steps(args, xs, ys);
        }
        let (xs, ys) = finite_points(xs, ys);
        self.record(Deferred::Steps {
            args: args.to_string(),
            xs,
            ys,
        });
        Ok(())
    }

    /// Records or draws symbols; see [`crate::Area::symbols`].
    pub fn symbols(
        &mut self,
        xs: &[f64],
        ys: &[f64],
        size: &PlotArg<String>,
        symbol: &PlotArg<String>,
        args: &str,
    ) -> PlotResult<()> {
        if self.finalised {
            return self.xy.symbols(xs, ys, size, symbol, args);
        }
        self.record(Deferred::Symbols {
            args: args.to_string(),
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            size: size.clone(),
            symbol: symbol.clone(),
        });
        Ok(())
    }

    /// Records or draws points with error bars; see
    /// [`crate::Area::points_with_errors`].
    pub fn points_with_errors(
        &mut self,
        xs: &[f64],
        ys: &[f64],
        x_errors: &[f64],
        y_errors: &[f64],
        args: &str,
    ) -> PlotResult<()> {
        if self.finalised {
            return self.xy.points_with_errors(xs, ys, x_errors, y_errors, args);
        }
        self.record(Deferred::Points {
            args: args.to_string(),
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            x_errors: x_errors.to_vec(),
            y_errors: y_errors.to_vec(),
        });
        Ok(())
    }

    /// Records or draws a grid image; see [`crate::Area::image`].
    pub fn image(&mut self, grid: &Grid, colormap: &str, args: &str) -> PlotResult<()> {
        if self.finalised {
            return self.xy.image(grid, colormap, args);
        }
        self.record(Deferred::Image {
            grid: grid.clone(),
            colormap: colormap.to_string(),
            args: args.to_string(),
        });
        Ok(())
    }

    /// Records or draws grid contours; see [`crate::Area::contour`].
    pub fn contour(&mut self, grid: &Grid, contours: &Contours, args: &str) -> PlotResult<()> {
        if self.finalised {
            return self.xy.contour(grid, contours, args, ContourKind::Plain);
        }
        self.record(Deferred::Contour {
            grid: grid.clone(),
            contours: contours.clone(),
            args: args.to_string(),
        });
        Ok(())
    }

    /// Fixes the region from the recorded bounding box and replays the
    /// recorded plots.
    ///
    /// Degenerate extents are widened by one unit on each side. With
    /// `expand_x`/`expand_y` the respective axis is widened to bounds
    /// rounded against the span's magnitude.
    pub fn finalise(&mut self, expand_x: bool, expand_y: bool) -> PlotResult<()> {
        if self.finalised {
            return Ok(());
        }
        let mut bb = match self.bounds {
            Some(bb) => bb,
            None => {
                log::warn!("auto area finalised with nothing plotted; using a unit region");
                [0.0, 0.0, 1.0, 1.0]
            }
        };
        if bb[0] == bb[2] {
            bb[0] -= 1.0;
            bb[2] += 1.0;
        }
        if bb[1] == bb[3] {
            bb[1] -= 1.0;
            bb[3] += 1.0;
        }

        let whole: Vec<f64> = (1..=10).map(f64::from).collect();
        if expand_x {
            let interval = round_up_with(bb[2] - bb[0], &whole);
            let fact = 10f64.powf(interval.log10().floor());
            bb[0] = (bb[0] / fact - 0.1).floor() * fact;
            bb[2] = (bb[2] / fact + 0.1).ceil() * fact;
        }
        if expand_y {
            let interval = round_up_with(bb[3] - bb[1], &whole);
            let fact = 10f64.powf(interval.log10().floor());
            bb[1] = (bb[1] / fact - 0.1).floor() * fact;
            bb[3] = (bb[3] / fact + 0.1).ceil() * fact;
        }

        self.xy.set_region([bb[0], bb[1]], [bb[2], bb[3]]);
        self.finalised = true;

        for plot in std::mem::take(&mut self.deferred) {
            plot.replay(&mut self.xy)?;
        }
        Ok(())
    }

    /// Draws the coordinate frame, finalising first if needed.
    pub fn coord_system(&mut self, with_grid: bool) -> PlotResult<()> {
        if !self.finalised {
            self.finalise(false, false)?;
        }
        self.xy.coord_system(with_grid)
    }

    pub fn is_finalised(&self) -> bool {
        self.finalised
    }
}

fn finite_points(xs: &[f64], ys: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let mut out_x = Vec::with_capacity(xs.len());
    let mut out_y = Vec::with_capacity(ys.len());
    for (&x, &y) in xs.iter().zip(ys) {
        if x.is_finite() && y.is_finite() {
            out_x.push(x);
            out_y.push(y);
        }
    }
    (out_x, out_y)
}

impl Deref for AutoXy {
    type Target = AreaXY;

    fn deref(&self) -> &AreaXY {
        &self.xy
    }
}

impl DerefMut for AutoXy {
    fn deref_mut(&mut self) -> &mut AreaXY {
        &mut self.xy
    }
}

impl Parent for AutoXy {
    fn handle(&self) -> CanvasHandle {
        Parent::handle(&self.xy)
    }

    fn defaults(&self) -> &Defaults {
        &self.xy.defaults
    }

    fn origin(&self) -> [f64; 2] {
        self.xy.position()
    }
}
