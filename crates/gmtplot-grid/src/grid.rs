//! The grid data model: a rectangular field of samples plus the
//! georeferencing metadata GMT's native grid format carries.

use std::fmt;

use crate::error::{GridError, GridResult};

/// Width of the fixed unit-label fields in the native header.
pub const GRD_UNIT_LEN: usize = 80;
/// Width of the fixed title field in the native header.
pub const GRD_TITLE_LEN: usize = 80;
/// Width of the fixed command field in the native header.
pub const GRD_COMMAND_LEN: usize = 320;
/// Width of the fixed remark field in the native header.
pub const GRD_REMARK_LEN: usize = 160;

/// Node registration: whether the extreme coordinates of a grid fall on
/// sample centers (`GridLine`) or sample edges (`Pixel`). Decides how the
/// sample spacing is derived from the ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Registration {
    /// Samples sit on the grid lines; the range endpoints are samples.
    #[default]
    GridLine,
    /// Samples sit in the cell centers; the range endpoints are cell edges.
    Pixel,
}

impl Registration {
    /// The header flag value for this registration.
    pub fn flag(self) -> i32 {
        match self {
            Registration::GridLine => 0,
            Registration::Pixel => 1,
        }
    }

    /// Parses a header flag.
    pub fn from_flag(flag: i32) -> GridResult<Self> {
        match flag {
            0 => Ok(Registration::GridLine),
            1 => Ok(Registration::Pixel),
            other => Err(GridError::MalformedHeader(format!(
                "node registration flag must be 0 or 1, got {other}"
            ))),
        }
    }
}

/// A two-dimensional `f32` sample array in scanline order.
///
/// Row 0 is the northernmost scanline and columns run west to east, which is
/// exactly the order the native format stores samples in.
#[derive(Debug, Clone, PartialEq)]
pub struct GridData {
    rows: usize,
    cols: usize,
    values: Vec<f32>,
}

impl GridData {
    /// Builds a data array from a row-major sample vector.
    pub fn new(rows: usize, cols: usize, values: Vec<f32>) -> GridResult<Self> {
        let expected = rows * cols;
        if rows == 0 || cols == 0 || values.len() != expected {
            return Err(GridError::DimensionMismatch {
                rows,
                cols,
                expected,
                actual: values.len(),
            });
        }
        Ok(Self { rows, cols, values })
    }

    /// Builds a constant-valued array.
    pub fn filled(rows: usize, cols: usize, value: f32) -> GridResult<Self> {
        Self::new(rows, cols, vec![value; rows * cols])
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Sample at `(row, col)`. Panics when out of bounds, like slice
    /// indexing.
    pub fn value(&self, row: usize, col: usize) -> f32 {
        self.values[row * self.cols + col]
    }

    pub fn set_value(&mut self, row: usize, col: usize, value: f32) {
        self.values[row * self.cols + col] = value;
    }

    /// All samples in scanline order.
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// One scanline.
    pub fn row(&self, row: usize) -> &[f32] {
        &self.values[row * self.cols..(row + 1) * self.cols]
    }

    /// Smallest and largest sample.
    pub fn min_max(&self) -> (f32, f32) {
        let mut min = self.values[0];
        let mut max = self.values[0];
        for &v in &self.values {
            if v < min {
                min = v;
            }
            if v > max {
                max = v;
            }
        }
        (min, max)
    }
}

/// A GMT grid: georeferencing metadata plus an optional sample array.
///
/// Constructed empty; the ranges and data are filled in by the caller or by
/// parsing a native-format buffer. Serialization and the derived quantities
/// require the grid to be complete (data set, both ranges non-degenerate).
#[derive(Debug, Clone)]
pub struct Grid {
    x_range: [f64; 2],
    y_range: [f64; 2],
    registration: Registration,
    /// Factor grid values must be multiplied by.
    pub z_scale: f64,
    /// Offset added to grid values after scaling.
    pub z_offset: f64,
    pub x_units: String,
    pub y_units: String,
    pub z_units: String,
    pub title: String,
    pub command: String,
    pub remark: String,
    data: Option<GridData>,
}

impl Grid {
    pub fn new() -> Self {
        Self {
            x_range: [0.0, 0.0],
            y_range: [0.0, 0.0],
            registration: Registration::GridLine,
            z_scale: 1.0,
            z_offset: 0.0,
            x_units: String::new(),
            y_units: String::new(),
            z_units: String::new(),
            title: String::new(),
            command: String::new(),
            remark: String::new(),
            data: None,
        }
    }

    /// Sets the x range; `min` must be strictly smaller than `max`.
    pub fn set_x_range(&mut self, min: f64, max: f64) -> GridResult<()> {
        if min >= max {
            return Err(GridError::InvalidRange { min, max });
        }
        self.x_range = [min, max];
        Ok(())
    }

    pub fn x_range(&self) -> [f64; 2] {
        self.x_range
    }

    /// Sets the y range; `min` must be strictly smaller than `max`.
    pub fn set_y_range(&mut self, min: f64, max: f64) -> GridResult<()> {
        if min >= max {
            return Err(GridError::InvalidRange { min, max });
        }
        self.y_range = [min, max];
        Ok(())
    }

    pub fn y_range(&self) -> [f64; 2] {
        self.y_range
    }

    pub fn set_registration(&mut self, registration: Registration) {
        self.registration = registration;
    }

    pub fn registration(&self) -> Registration {
        self.registration
    }

    pub fn set_data(&mut self, data: GridData) {
        self.data = Some(data);
    }

    pub fn data(&self) -> Option<&GridData> {
        self.data.as_ref()
    }

    pub fn data_mut(&mut self) -> Option<&mut GridData> {
        self.data.as_mut()
    }

    /// The data array, provided the grid is complete. This is the
    /// precondition for serialization and every derived quantity: data
    /// assigned and both ranges non-degenerate.
    pub(crate) fn complete(&self) -> GridResult<&GridData> {
        let data = self.data.as_ref().ok_or(GridError::NotFullySpecified {
            reason: "data array is not set",
        })?;
        if self.x_range[0] == self.x_range[1] {
            return Err(GridError::NotFullySpecified {
                reason: "x range is not set",
            });
        }
        if self.y_range[0] == self.y_range[1] {
            return Err(GridError::NotFullySpecified {
                reason: "y range is not set",
            });
        }
        Ok(data)
    }

    /// Sample spacing along x and y, derived from the ranges, the shape,
    /// and the registration.
    pub fn spacing(&self) -> GridResult<(f64, f64)> {
        let data = self.complete()?;
        let nx = data.cols() as f64;
        let ny = data.rows() as f64;
        let width = self.x_range[1] - self.x_range[0];
        let height = self.y_range[1] - self.y_range[0];
        Ok(match self.registration {
            Registration::GridLine => (width / (nx - 1.0), height / (ny - 1.0)),
            Registration::Pixel => (width / nx, height / ny),
        })
    }

    /// Smallest and largest sample value.
    pub fn z_range(&self) -> GridResult<(f32, f32)> {
        Ok(self.complete()?.min_max())
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "x_range      : {:?}", self.x_range)?;
        writeln!(f, "y_range      : {:?}", self.y_range)?;
        writeln!(f, "registration : {:?}", self.registration)?;
        writeln!(f, "z_scale      : {}", self.z_scale)?;
        writeln!(f, "z_offset     : {}", self.z_offset)?;
        writeln!(f, "x_units      : {}", self.x_units)?;
        writeln!(f, "y_units      : {}", self.y_units)?;
        writeln!(f, "z_units      : {}", self.z_units)?;
        writeln!(f, "title        : {}", self.title)?;
        writeln!(f, "command      : {}", self.command)?;
        writeln!(f, "remark       : {}", self.remark)?;
        match &self.data {
            Some(data) => writeln!(f, "size         : {}x{}", data.rows(), data.cols()),
            None => writeln!(f, "size         : no data"),
        }
    }
}
