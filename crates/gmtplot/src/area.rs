//! The base plotting area.
//!
//! An area is a rectangle on the canvas with its own region of interest,
//! projection, and settings. Drawing methods build the GMT flag strings,
//! run the program, and append the captured PostScript to the shared plot
//! file, tracking the `-X`/`-Y` displacement against the canvas's current
//! origin.

use std::fmt::Write as _;
use std::fs;

use gmtplot_exec::Defaults;
use gmtplot_grid::{grid_command, Grid};

use crate::canvas::CanvasHandle;
use crate::error::{PlotError, PlotResult};
use crate::util::round_up;

/// Anything a plotting area can be nested inside: the canvas or another
/// area. Children snapshot the parent's settings at creation time and
/// position themselves relative to the parent's origin.
pub trait Parent {
    /// Shared canvas this node draws to.
    fn handle(&self) -> CanvasHandle;
    /// Settings a child inherits (by value) at creation.
    fn defaults(&self) -> &Defaults;
    /// Absolute origin of this node on the canvas.
    fn origin(&self) -> [f64; 2];
}

/// A per-point drawing argument: one value for every point, or one value
/// per point.
#[derive(Debug, Clone)]
pub enum PlotArg<T> {
    Single(T),
    PerPoint(Vec<T>),
}

impl<T> PlotArg<T> {
    pub fn single(value: impl Into<T>) -> Self {
        PlotArg::Single(value.into())
    }

    pub fn per_point(values: Vec<T>) -> Self {
        PlotArg::PerPoint(values)
    }

    /// Validates a per-point vector against the point count.
    fn check(&self, expected: usize) -> PlotResult<()> {
        match self {
            PlotArg::Single(_) => Ok(()),
            PlotArg::PerPoint(values) if values.len() == expected => Ok(()),
            PlotArg::PerPoint(values) => Err(PlotError::PerPointLengthMismatch {
                expected,
                actual: values.len(),
            }),
        }
    }

    fn get(&self, index: usize) -> &T {
        match self {
            PlotArg::Single(value) => value,
            PlotArg::PerPoint(values) => &values[index],
        }
    }
}

/// Contour levels: an explicit list, or a GMT contour file prepared by the
/// caller.
#[derive(Debug, Clone)]
pub enum Contours {
    Levels(Vec<f64>),
    File(std::path::PathBuf),
}

/// Whether contour lines are annotated with their level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContourKind {
    #[default]
    Plain,
    Annotated,
}

impl ContourKind {
    fn as_char(self) -> char {
        match self {
            ContourKind::Plain => 'c',
            ContourKind::Annotated => 'a',
        }
    }
}

/// Base plotting area.
pub struct Area {
    handle: CanvasHandle,
    /// Settings snapshotted from the parent; diverge freely.
    pub defaults: Defaults,
    pos: [f64; 2],
    /// Width and height on the canvas, set by the concrete area types.
    pub size: Option<[f64; 2]>,
    ll: [f64; 2],
    ur: [f64; 2],
    region: Option<String>,
    projection: Option<String>,

    /// Axis label font size, e.g. `24p`.
    pub label_size: String,
    /// Axis label font number.
    pub label_font: String,
    pub x_label: String,
    pub y_label: String,
    pub x_label_offset: f64,
    pub y_label_offset: f64,
    /// Tick mark spacing per axis; empty for none.
    pub x_tick: String,
    pub y_tick: String,
    /// Grid line spacing per axis; empty for none.
    pub x_grid: String,
    pub y_grid: String,
    /// Annotation spacing per axis; empty picks a rounded value.
    pub x_annot: String,
    pub y_annot: String,
    pub title: String,
    /// GMT axis string (which of W/E/S/N get drawn).
    pub axis: String,

    /// Set when a clip operation produced an empty path; drawing is
    /// suppressed until `unclip`.
    clipped: bool,
}

impl Area {
    /// Creates an area at `pos` relative to `parent`.
    pub fn new(parent: &dyn Parent, pos: [f64; 2]) -> Self {
        let handle = parent.handle();
        let session = handle.session();
        let defaults = Defaults::from_snapshot(&session, parent.defaults().snapshot());
        let origin = parent.origin();

        let label_size = defaults.get("LABEL_FONT_SIZE").unwrap_or("24p").to_string();
        let label_font = defaults.get("LABEL_FONT").unwrap_or("0").to_string();
        let axis = defaults.get("BASEMAP_AXES").unwrap_or("WESN").to_string();

        Self {
            handle,
            defaults,
            pos: [pos[0] + origin[0], pos[1] + origin[1]],
            size: None,
            ll: [0.0, 0.0],
            ur: [0.0, 0.0],
            region: None,
            projection: None,
            label_size,
            label_font,
            x_label: String::new(),
            y_label: String::new(),
            x_label_offset: 1.0,
            y_label_offset: 1.5,
            x_tick: String::new(),
            y_tick: String::new(),
            x_grid: String::new(),
            y_grid: String::new(),
            x_annot: String::new(),
            y_annot: String::new(),
            title: String::new(),
            axis,
            clipped: false,
        }
    }

    /// Absolute position on the canvas.
    pub fn position(&self) -> [f64; 2] {
        self.pos
    }

    /// Sets the region of interest from its lower-left and upper-right
    /// corners. `rectangular` selects GMT's `...r` corner form.
    pub fn set_region(&mut self, ll: [f64; 2], ur: [f64; 2], rectangular: bool) {
        self.ll = ll;
        self.ur = ur;
        self.region = Some(if rectangular {
            format!("{}/{}/{}/{}r", ll[0], ll[1], ur[0], ur[1])
        } else {
            format!("{}/{}/{}/{}", ll[0], ur[0], ll[1], ur[1])
        });
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    pub fn lower_left(&self) -> [f64; 2] {
        self.ll
    }

    pub fn upper_right(&self) -> [f64; 2] {
        self.ur
    }

    pub fn set_projection(&mut self, projection: impl Into<String>) {
        self.projection = Some(projection.into());
    }

    pub fn projection(&self) -> Option<&str> {
        self.projection.as_deref()
    }

    fn frame(&self) -> PlotResult<(String, String)> {
        let region = self.region.clone().ok_or(PlotError::RegionNotSet)?;
        let projection = self.projection.clone().ok_or(PlotError::ProjectionNotSet)?;
        Ok((region, projection))
    }

    /// Runs a GMT program with the overlay flags and this area's `-X`/`-Y`
    /// displacement appended, and writes the returned PostScript to the
    /// canvas.
    pub fn command(&mut self, tool: &str, args: &str, input: &[u8]) -> PlotResult<()> {
        let (session, full_args) = {
            let mut state = self.handle.state.borrow_mut();
            let disp = [self.pos[0] - state.pos[0], self.pos[1] - state.pos[1]];
            state.pos = self.pos;
            (
                state.session.clone(),
                format!("{} -K -O -X{} -Y{}", args, disp[0], disp[1]),
            )
        };
        let output = session.run(tool, &full_args, input)?;
        self.handle.state.borrow().append(&output)?;
        Ok(())
    }

    /// Like [`Area::command`] with the area's `-R`/`-J` flags prepended.
    /// Fails before spawning anything if the region or projection is not
    /// set yet.
    pub fn canvas_command(&mut self, tool: &str, args: &str, input: &[u8]) -> PlotResult<()> {
        let (region, projection) = self.frame()?;
        self.command(tool, &format!("-R{region} -J{projection} {args}"), input)
    }

    /// Runs a grid-consuming GMT program, piping the serialized grid on
    /// stdin (the leading `=bf` argument tells the tool so).
    pub fn grid_command(&mut self, tool: &str, grid: &Grid, args: &str) -> PlotResult<()> {
        let (region, projection) = self.frame()?;
        let (session, full_args) = {
            let mut state = self.handle.state.borrow_mut();
            let disp = [self.pos[0] - state.pos[0], self.pos[1] - state.pos[1]];
            state.pos = self.pos;
            (
                state.session.clone(),
                format!(
                    "=bf -R{region} -J{projection} {args} -K -O -X{} -Y{}",
                    disp[0], disp[1]
                ),
            )
        };
        let output = grid_command(&session, tool, &full_args, grid)?;
        self.handle.state.borrow().append(&output)?;
        Ok(())
    }

    /// Draws a text string at `xy` with the default size and justification.
    pub fn text(&mut self, xy: [f64; 2], text: &str) -> PlotResult<()> {
        self.text_with(xy, text, "12 0 0 LB", "")
    }

    /// Draws a text string; `text_args` is GMT's
    /// `size angle fontno justify` tuple, `args` extra `pstext` flags.
    pub fn text_with(
        &mut self,
        xy: [f64; 2],
        text: &str,
        text_args: &str,
        args: &str,
    ) -> PlotResult<()> {
        let line = format!("{} {} {} {}\n", xy[0], xy[1], text_args, text);
        self.canvas_command("pstext", args, line.as_bytes())
    }

    /// Draws a wrapped paragraph of text.
    pub fn paragraph_text(&mut self, xy: [f64; 2], text: &str) -> PlotResult<()> {
        self.paragraph_text_with(xy, text, "12 0 0 LB 13p 6 c", "")
    }

    /// Paragraph text; `text_args` is GMT's
    /// `size angle fontno justify linespace parwidth parjust` tuple.
    pub fn paragraph_text_with(
        &mut self,
        xy: [f64; 2],
        text: &str,
        text_args: &str,
        args: &str,
    ) -> PlotResult<()> {
        let input = format!(">{} {} {}\n{}\n", xy[0], xy[1], text_args, text);
        self.canvas_command("pstext", &format!("-M {args}"), input.as_bytes())
    }

    /// Draws the coordinate frame with `psbasemap` and the axis labels.
    ///
    /// The `-B` string is assembled from the annotation/tick/grid spacings;
    /// axes with nothing configured get a rounded annotation interval
    /// derived from the region and size. With `with_grid`, axes without an
    /// explicit grid spacing reuse their annotation spacing for grid lines.
    pub fn coord_system(&mut self, with_grid: bool) -> PlotResult<()> {
        let size = self.size.ok_or(PlotError::SizeNotSet)?;

        let mut spec = String::new();
        let mut have_x = false;
        let mut have_y = false;
        if !self.x_annot.is_empty() {
            have_x = true;
            let _ = write!(spec, "a{}", self.x_annot);
        }
        if !self.x_tick.is_empty() {
            have_x = true;
            let _ = write!(spec, "f{}", self.x_tick);
        }
        if !self.x_grid.is_empty() {
            have_x = true;
            let _ = write!(spec, "g{}", self.x_grid);
        } else if with_grid && !self.x_annot.is_empty() {
            let _ = write!(spec, "g{}", self.x_annot);
        }
        if have_x {
            if !self.y_annot.is_empty() {
                have_y = true;
                if !spec.ends_with('/') {
                    spec.push('/');
                }
                let _ = write!(spec, "a{}", self.y_annot);
            }
            if !self.y_tick.is_empty() {
                have_y = true;
                let _ = write!(spec, "f{}", self.y_tick);
            }
            if !self.y_grid.is_empty() {
                have_y = true;
                let _ = write!(spec, "g{}", self.y_grid);
            } else if with_grid && !self.y_annot.is_empty() {
                let _ = write!(spec, "g{}", self.y_annot);
            }
            if have_y {
                spec.push('/');
            }
        }
        if !self.title.is_empty() {
            let _ = write!(spec, ":.{}:", self.title);
        }
        if !have_x {
            let annot = round_up((self.ur[0] - self.ll[0]) / size[0]);
            let _ = write!(spec, "a{annot}");
            if with_grid {
                let _ = write!(spec, "g{annot}");
            }
        }
        if !have_y {
            spec.push('/');
            let annot = round_up((self.ur[1] - self.ll[1]) / size[1]);
            let _ = write!(spec, "a{annot}");
            if with_grid {
                let _ = write!(spec, "g{annot}");
            }
        }
        spec.push_str(&self.axis);
        self.canvas_command("psbasemap", &format!("-B{spec}"), b"")?;

        self.draw_axis_labels(size)
    }

    /// Places the axis label paragraphs in boxes offset from the frame, on
    /// whichever side the axis string draws.
    fn draw_axis_labels(&mut self, size: [f64; 2]) -> PlotResult<()> {
        let spacing = line_spacing(&self.label_size);
        let points = font_points(&self.label_size);

        if !self.x_label.is_empty() {
            let placement = if self.axis.contains('N') {
                Some(("LB", 0.0, [0.0, size[1] + self.x_label_offset]))
            } else if self.axis.contains('S') {
                Some(("LT", 5.0, [0.0, -5.0 - self.x_label_offset]))
            } else {
                None
            };
            if let Some((justify, inset, pos)) = placement {
                let mut label_box = LabelBox::new(self, pos, [size[0], 5.0]);
                let text_args = format!(
                    "{} 0 {} {} {} {} c",
                    points, self.label_font, justify, spacing, size[0]
                );
                label_box
                    .area
                    .paragraph_text_with([0.0, inset], &self.x_label, &text_args, "-N")?;
            }
        }

        if !self.y_label.is_empty() {
            let placement = if self.axis.contains('E') {
                Some(("LT", 0.0, [size[0] + self.y_label_offset, 0.0]))
            } else if self.axis.contains('W') {
                Some(("LB", -5.0 + self.y_label_offset, [-5.0, 0.0]))
            } else {
                None
            };
            if let Some((justify, inset, pos)) = placement {
                let mut label_box = LabelBox::new(self, pos, [5.0, size[1]]);
                let text_args = format!(
                    "{} 90 {} {} {} {} c",
                    points, self.label_font, justify, spacing, size[1]
                );
                label_box
                    .area
                    .paragraph_text_with([inset, 0.0], &self.y_label, &text_args, "-N")?;
            }
        }
        Ok(())
    }

    /// Plots symbols with `psxy -S`. Size and symbol code are either shared
    /// by all points or given per point.
    pub fn symbols(
        &mut self,
        xs: &[f64],
        ys: &[f64],
        size: &PlotArg<String>,
        symbol: &PlotArg<String>,
        args: &str,
    ) -> PlotResult<()> {
        if xs.len() != ys.len() {
            return Err(PlotError::MismatchedLengths("symbol coordinates"));
        }
        size.check(xs.len())?;
        symbol.check(xs.len())?;

        let mut input = String::new();
        for i in 0..xs.len() {
            let _ = writeln!(input, "{} {} {} {}", xs[i], ys[i], size.get(i), symbol.get(i));
        }
        self.canvas_command("psxy", &format!("{args} -S"), input.as_bytes())
    }

    /// Plots points with error bars (`psxy -Exy0`).
    pub fn points_with_errors(
        &mut self,
        xs: &[f64],
        ys: &[f64],
        x_errors: &[f64],
        y_errors: &[f64],
        args: &str,
    ) -> PlotResult<()> {
        if xs.len() != ys.len() || xs.len() != x_errors.len() || xs.len() != y_errors.len() {
            return Err(PlotError::MismatchedLengths("point coordinates and errors"));
        }
        let mut input = String::new();
        for i in 0..xs.len() {
            let _ = writeln!(input, "{} {} {} {}", xs[i], ys[i], x_errors[i], y_errors[i]);
        }
        self.canvas_command("psxy", &format!("{args} -Exy0"), input.as_bytes())
    }

    /// Plots a polyline. Points with a non-finite coordinate are dropped.
    pub fn line(&mut self, args: &str, xs: &[f64], ys: &[f64]) -> PlotResult<()> {
        if xs.len() != ys.len() {
            return Err(PlotError::MismatchedLengths("line coordinates"));
        }
        let mut input = String::new();
        for (x, y) in xs.iter().zip(ys) {
            if x.is_finite() && y.is_finite() {
                let _ = writeln!(input, "{x} {y}");
            }
        }
        self.canvas_command("psxy", args, input.as_bytes())
    }

    /// Plots a staircase line: each segment runs horizontally to the next
    /// x before stepping to the next y.
    pub fn steps(&mut self, args: &str, xs: &[f64], ys: &[f64]) -> PlotResult<()> {
        if xs.len() != ys.len() {
            return Err(PlotError::MismatchedLengths("step coordinates"));
        }
        if xs.len() < 2 {
            return self.line(args, xs, ys);
        }
        let mut sx = Vec::with_capacity(2 * xs.len() - 1);
        let mut sy = Vec::with_capacity(2 * xs.len() - 1);
        for i in 0..xs.len() - 1 {
            sx.push(xs[i]);
            sy.push(ys[i]);
            sx.push(xs[i + 1]);
            sy.push(ys[i]);
        }
        sx.push(xs[xs.len() - 1]);
        sy.push(ys[ys.len() - 1]);
        self.line(args, &sx, &sy)
    }

    /// Renders a grid as a colour image (`grdimage`).
    pub fn image(&mut self, grid: &Grid, colormap: &str, args: &str) -> PlotResult<()> {
        if self.clipped {
            return Ok(());
        }
        self.grid_command("grdimage", grid, &format!("-C{colormap} {args}"))
    }

    /// Contours a grid (`grdcontour`).
    pub fn contour(
        &mut self,
        grid: &Grid,
        contours: &Contours,
        args: &str,
        kind: ContourKind,
    ) -> PlotResult<()> {
        if self.clipped {
            return Ok(());
        }
        match contours {
            Contours::Levels(levels) => {
                let mut file = tempfile::Builder::new().suffix(".cntr").tempfile()?;
                let mut table = String::new();
                for level in levels {
                    let _ = writeln!(table, "{}\t{}", level, kind.as_char());
                }
                use std::io::Write as _;
                file.write_all(table.as_bytes())?;
                file.flush()?;
                self.grid_command(
                    "grdcontour",
                    grid,
                    &format!("-C{} {}", file.path().display(), args),
                )
            }
            Contours::File(path) => {
                self.grid_command("grdcontour", grid, &format!("-C{} {}", path.display(), args))
            }
        }
    }

    /// Establishes a clip path from the `level` contour of `grid`.
    ///
    /// Boundary samples above the level are pulled just below it first so
    /// the contour closes. If the contour produces no path at all, nothing
    /// is inside it: subsequent image/contour calls are suppressed until
    /// [`Area::unclip`].
    pub fn clip(&mut self, grid: &mut Grid, level: f64) -> PlotResult<()> {
        let (region, projection) = self.frame()?;

        let mut level_file = tempfile::Builder::new().suffix(".cntr").tempfile()?;
        {
            use std::io::Write as _;
            level_file.write_all(format!("{level}\tc\n").as_bytes())?;
            level_file.flush()?;
        }

        if let Some(data) = grid.data_mut() {
            let level = level as f32;
            let (rows, cols) = (data.rows(), data.cols());
            let clamp = |data: &mut gmtplot_grid::GridData, row: usize, col: usize| {
                if data.value(row, col) > level {
                    data.set_value(row, col, level - 0.1);
                }
            };
            for col in 0..cols {
                clamp(data, 0, col);
                clamp(data, rows - 1, col);
            }
            for row in 0..rows {
                clamp(data, row, 0);
                clamp(data, row, cols - 1);
            }
        }

        let clip_file = tempfile::Builder::new().suffix(".clip").tempfile()?;
        let session = self.handle.session();
        let args = format!(
            "=bf -R{region} -J{projection} -C{} -M -D{}",
            level_file.path().display(),
            clip_file.path().display()
        );
        grid_command(&session, "grdcontour", &args, grid)?;

        let path = fs::read_to_string(clip_file.path())?;
        if path.lines().count() > 1 {
            self.canvas_command(
                "psclip",
                &format!("{} -M", clip_file.path().display()),
                b"",
            )
        } else {
            self.clipped = true;
            Ok(())
        }
    }

    /// Removes the current clip path, or re-enables drawing after an empty
    /// clip.
    pub fn unclip(&mut self) -> PlotResult<()> {
        if self.clipped {
            self.clipped = false;
            return Ok(());
        }
        self.canvas_command("psclip", "-C", b"")
    }

    /// Projects coordinates through `mapproject`.
    ///
    /// Returns `(x, y)` vectors aligned with the input; a line the toolkit
    /// mangled yields a NaN pair rather than shifting later points.
    pub fn project(
        &self,
        lons: &[f64],
        lats: &[f64],
        inverse: bool,
    ) -> PlotResult<(Vec<f64>, Vec<f64>)> {
        if lons.len() != lats.len() {
            return Err(PlotError::MismatchedLengths("projection coordinates"));
        }
        let (region, projection) = self.frame()?;

        let mut input = String::new();
        for (lon, lat) in lons.iter().zip(lats) {
            let _ = writeln!(input, "{lon} {lat}");
        }
        let flag = if inverse { "-I " } else { "" };
        let args = format!("{flag}-R{region} -J{projection}");
        let session = self.handle.session();
        let output = session.run("mapproject", &args, input.as_bytes())?;
        Ok(parse_coordinate_lines(
            &String::from_utf8_lossy(&output),
            lons.len(),
        ))
    }

    /// Whether drawing is currently suppressed by an empty clip path.
    pub fn is_clipped(&self) -> bool {
        self.clipped
    }
}

impl Parent for Area {
    fn handle(&self) -> CanvasHandle {
        self.handle.clone()
    }

    fn defaults(&self) -> &Defaults {
        &self.defaults
    }

    fn origin(&self) -> [f64; 2] {
        self.pos
    }
}

/// Throwaway cartesian sub-area used for axis labels; sized in paper
/// coordinates.
struct LabelBox {
    area: Area,
}

impl LabelBox {
    fn new(parent: &Area, pos: [f64; 2], size: [f64; 2]) -> Self {
        let mut area = Area::new(parent, pos);
        area.size = Some(size);
        area.set_region([0.0, 0.0], size, true);
        area.set_projection(format!("X{}/{}", size[0], size[1]));
        Self { area }
    }
}

/// Parses `x y` coordinate lines, padding with NaN pairs so the result
/// stays aligned with the request.
fn parse_coordinate_lines(output: &str, expected: usize) -> (Vec<f64>, Vec<f64>) {
    let mut xs = vec![f64::NAN; expected];
    let mut ys = vec![f64::NAN; expected];
    for (i, line) in output.lines().take(expected).enumerate() {
        let mut fields = line.split_whitespace();
        let x = fields.next().and_then(|f| f.parse::<f64>().ok());
        let y = fields.next().and_then(|f| f.parse::<f64>().ok());
        if let (Some(x), Some(y)) = (x, y) {
            xs[i] = x;
            ys[i] = y;
        }
    }
    (xs, ys)
}

/// `24p` -> `26.4p`: the line spacing used for axis label paragraphs.
pub(crate) fn line_spacing(label_size: &str) -> String {
    let (points, unit) = split_size(label_size);
    match points.parse::<f64>() {
        Ok(value) => format!("{:.1}{}", 1.1 * value, unit),
        Err(_) => label_size.to_string(),
    }
}

/// The numeric part of a font size like `24p`.
pub(crate) fn font_points(label_size: &str) -> String {
    split_size(label_size).0.to_string()
}

fn split_size(label_size: &str) -> (&str, &str) {
    if label_size.len() > 1 && label_size.is_char_boundary(label_size.len() - 1) {
        label_size.split_at(label_size.len() - 1)
    } else {
        (label_size, "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Canvas;
    use crate::test_stub::{plot_toolkit, write_stub};
    use gmtplot_exec::Session;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn canvas(dir: &TempDir) -> Canvas {
        let session = Session::with_bin_dir(dir.path());
        Canvas::new(&session, dir.path().join("plot.ps")).unwrap()
    }

    fn plotted_lines(dir: &TempDir) -> Vec<String> {
        std::fs::read_to_string(dir.path().join("plot.ps"))
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    fn test_area(parent: &dyn Parent) -> Area {
        let mut area = Area::new(parent, [1.0, 0.0]);
        area.size = Some([10.0, 5.0]);
        area.set_region([0.0, 0.0], [10.0, 5.0], true);
        area.set_projection("X10/5");
        area
    }

    #[test]
    fn test_displacement_tracking() {
        let dir = plot_toolkit();
        let plot = canvas(&dir);
        let mut area = test_area(&plot);

        area.text([1.0, 1.0], "Hello, world").unwrap();
        area.text([2.0, 2.0], "again").unwrap();

        let lines = plotted_lines(&dir);
        // Preamble, then two pstext calls: the first moves the origin, the
        // second stays put.
        assert_eq!(
            lines[1],
            "pstext -R0/0/10/5r -JX10/5 -K -O -X1 -Y0"
        );
        assert_eq!(
            lines[2],
            "pstext -R0/0/10/5r -JX10/5 -K -O -X0 -Y0"
        );
    }

    #[test]
    fn test_region_and_projection_are_required() {
        let dir = plot_toolkit();
        let plot = canvas(&dir);
        let mut area = Area::new(&plot, [0.0, 0.0]);

        assert!(matches!(
            area.text([0.0, 0.0], "nope"),
            Err(PlotError::RegionNotSet)
        ));
        area.set_region([0.0, 0.0], [1.0, 1.0], true);
        assert!(matches!(
            area.text([0.0, 0.0], "nope"),
            Err(PlotError::ProjectionNotSet)
        ));
        // Nothing reached the plot file beyond the preamble.
        assert_eq!(plotted_lines(&dir).len(), 1);
    }

    #[test]
    fn test_symbols_per_point_validation() {
        let dir = plot_toolkit();
        let plot = canvas(&dir);
        let mut area = test_area(&plot);

        let err = area
            .symbols(
                &[2.0, 4.0],
                &[3.0, 1.0],
                &PlotArg::single("1"),
                &PlotArg::per_point(vec!["c".to_string()]),
                "",
            )
            .unwrap_err();
        assert!(matches!(
            err,
            PlotError::PerPointLengthMismatch {
                expected: 2,
                actual: 1
            }
        ));

        area.symbols(
            &[2.0, 4.0],
            &[3.0, 1.0],
            &PlotArg::single("1"),
            &PlotArg::per_point(vec!["c".to_string(), "a".to_string()]),
            "",
        )
        .unwrap();
        let lines = plotted_lines(&dir);
        assert_eq!(lines[1], "psxy -R0/0/10/5r -JX10/5 -S -K -O -X1 -Y0");
    }

    #[test]
    fn test_line_drops_non_finite_points() {
        let dir = plot_toolkit();
        let plot = canvas(&dir);
        let mut area = test_area(&plot);
        area.line("-W1", &[1.0, f64::NAN, 3.0], &[1.0, 2.0, 3.0])
            .unwrap();
        let lines = plotted_lines(&dir);
        assert!(lines[1].starts_with("psxy"));
        assert!(lines[1].contains("-W1"));
    }

    #[test]
    fn test_coord_system_auto_annotation() {
        let dir = plot_toolkit();
        let plot = canvas(&dir);
        let mut area = test_area(&plot);

        area.coord_system(false).unwrap();
        let lines = plotted_lines(&dir);
        // Region spans 10 over a 10 cm axis and 5 over 5 cm: both axes get
        // the rounded interval for 1.0.
        assert_eq!(
            lines[1],
            "psbasemap -R0/0/10/5r -JX10/5 -Ba1/a1WESN -K -O -X1 -Y0"
        );
    }

    #[test]
    fn test_coord_system_explicit_spacings_and_title() {
        let dir = plot_toolkit();
        let plot = canvas(&dir);
        let mut area = test_area(&plot);
        area.x_annot = "2".to_string();
        area.x_tick = "1".to_string();
        area.y_annot = "1".to_string();
        area.title = "profile".to_string();

        area.coord_system(true).unwrap();
        let lines = plotted_lines(&dir);
        assert_eq!(
            lines[1],
            "psbasemap -R0/0/10/5r -JX10/5 -Ba2f1g2/a1g1/:.profile:WESN -K -O -X1 -Y0"
        );
    }

    #[test]
    fn test_coord_system_draws_axis_labels() {
        let dir = plot_toolkit();
        let plot = canvas(&dir);
        let mut area = test_area(&plot);
        area.x_label = "distance".to_string();
        area.y_label = "depth".to_string();

        area.coord_system(false).unwrap();
        let lines = plotted_lines(&dir);
        // basemap plus one paragraph-text call per labelled axis.
        assert_eq!(lines.len(), 4);
        assert!(lines[2].starts_with("pstext -R0/0/10/5r"));
        assert!(lines[2].contains("-M -N"));
        assert!(lines[3].contains("-M -N"));
    }

    #[test]
    fn test_project_aligns_output() {
        let dir = plot_toolkit();
        let plot = canvas(&dir);
        let area = test_area(&plot);

        // The stub shifts x by 1 and y by 2.
        let (xs, ys) = area.project(&[20.0, 30.0], &[50.0, 60.0], false).unwrap();
        assert_eq!(xs, vec![21.0, 31.0]);
        assert_eq!(ys, vec![52.0, 62.0]);
    }

    #[test]
    fn test_project_malformed_line_becomes_nan() {
        let dir = plot_toolkit();
        write_stub(
            dir.path(),
            "mapproject",
            "cat > /dev/null\nprintf '1 2\\ngarbage\\n'",
        );
        let plot = canvas(&dir);
        let area = test_area(&plot);

        let (xs, ys) = area
            .project(&[0.0, 0.0, 0.0], &[0.0, 0.0, 0.0], true)
            .unwrap();
        assert_eq!((xs[0], ys[0]), (1.0, 2.0));
        assert!(xs[1].is_nan() && ys[1].is_nan());
        assert!(xs[2].is_nan() && ys[2].is_nan());
    }

    #[test]
    fn test_clip_suppresses_drawing_when_path_is_empty() {
        use gmtplot_grid::{Grid, GridData};

        let dir = plot_toolkit();
        let plot = canvas(&dir);
        let mut area = test_area(&plot);

        let mut grid = Grid::new();
        grid.set_x_range(0.0, 10.0).unwrap();
        grid.set_y_range(0.0, 5.0).unwrap();
        grid.set_data(GridData::filled(4, 4, 2.0).unwrap());

        // The stub grdcontour writes nothing to the -D file, so the clip
        // path stays empty and drawing is suppressed.
        area.clip(&mut grid, 1.0).unwrap();
        let before = plotted_lines(&dir).len();
        area.image(&grid, "colours.cpt", "").unwrap();
        assert_eq!(plotted_lines(&dir).len(), before);

        area.unclip().unwrap();
        area.image(&grid, "colours.cpt", "").unwrap();
        let lines = plotted_lines(&dir);
        assert!(lines.last().unwrap().starts_with("grdimage =bf"));
        // Boundary samples were pulled below the clip level.
        let data = grid.data().unwrap();
        assert!((data.value(0, 0) - 0.9).abs() < 1e-6);
        assert_eq!(data.value(1, 1), 2.0);
    }

    #[test]
    fn test_contour_levels_and_kind() {
        use gmtplot_grid::{Grid, GridData};

        let dir = plot_toolkit();
        let plot = canvas(&dir);
        let mut area = test_area(&plot);

        let mut grid = Grid::new();
        grid.set_x_range(0.0, 10.0).unwrap();
        grid.set_y_range(0.0, 5.0).unwrap();
        grid.set_data(GridData::filled(3, 3, 0.0).unwrap());

        area.contour(
            &grid,
            &Contours::Levels(vec![1.0, 2.0]),
            "",
            ContourKind::Annotated,
        )
        .unwrap();
        let lines = plotted_lines(&dir);
        assert!(lines[1].starts_with("grdcontour =bf -R0/0/10/5r -JX10/5 -C"));
    }
}
