//! Grid operations that delegate to the GMT programs.
//!
//! Each operation exchanges the grid with the toolkit in the native `=bf`
//! layout, either over stdin or through a temporary file, and parses
//! whatever table output comes back.

use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufReader, Write as _};
use std::path::Path;

use gmtplot_exec::Session;
use tempfile::NamedTempFile;

use crate::error::{GridError, GridResult};
use crate::grid::Grid;
use crate::native;

/// How far a sample returned by `grdtrack` may sit from the requested track
/// point before it is treated as belonging to a different point. Grid
/// units; override per call with [`Grid::track_with_tolerance`].
pub const DEFAULT_TRACK_TOLERANCE: f64 = 5.0;

/// Pipes a serialized grid into a GMT program and returns its stdout.
///
/// An incomplete grid fails before any process is spawned.
pub fn grid_command(
    session: &Session,
    tool: &str,
    args: &str,
    grid: &Grid,
) -> GridResult<Vec<u8>> {
    let mut payload = Vec::new();
    native::write(grid, &mut payload)?;
    Ok(session.run_with_writer(tool, args, move |sink| sink.write_all(&payload))?)
}

impl Grid {
    /// Samples the grid along a track of `(x, y)` points via `grdtrack`.
    ///
    /// The returned profile has one entry per input point. Points the
    /// toolkit produced no sample for (outside the grid, malformed output
    /// line, or a sample further than the tolerance from the requested
    /// point) come back as NaN, so the profile stays aligned with the
    /// track.
    pub fn track(&self, session: &Session, xs: &[f64], ys: &[f64]) -> GridResult<Vec<f64>> {
        self.track_with_tolerance(session, xs, ys, DEFAULT_TRACK_TOLERANCE)
    }

    /// [`Grid::track`] with an explicit alignment tolerance.
    pub fn track_with_tolerance(
        &self,
        session: &Session,
        xs: &[f64],
        ys: &[f64],
        tolerance: f64,
    ) -> GridResult<Vec<f64>> {
        if xs.len() != ys.len() {
            return Err(GridError::MismatchedLengths("track x and y coordinates"));
        }
        let grd = write_temp_grid(self)?;

        let mut track = String::new();
        for (x, y) in xs.iter().zip(ys) {
            let _ = writeln!(track, "{x} {y}");
        }
        let args = format!("-G{}=bf -Q", grd.path().display());
        let output = session.run("grdtrack", &args, track.as_bytes())?;
        Ok(align_track(
            &String::from_utf8_lossy(&output),
            xs,
            ys,
            tolerance,
        ))
    }

    /// Reprojects the grid via `grdproject`; `args` carries the projection
    /// flags.
    pub fn project(&self, session: &Session, args: &str) -> GridResult<Grid> {
        let input = write_temp_grid(self)?;
        let output = tempfile::Builder::new().suffix(".grd").tempfile()?;
        let run_args = format!(
            "{}=bf -G{}=bf {}",
            input.path().display(),
            output.path().display(),
            args
        );
        session.run("grdproject", &run_args, b"")?;
        Grid::from_native_file(output.path())
    }

    /// Reads a grid stored in the native layout.
    pub fn from_native_file(path: &Path) -> GridResult<Grid> {
        let mut reader = BufReader::new(File::open(path)?);
        native::read(&mut reader)
    }

    /// Reads any grid file the toolkit understands by converting it to the
    /// native layout with `grdreformat` first.
    pub fn from_file(session: &Session, path: &Path) -> GridResult<Grid> {
        let converted = tempfile::Builder::new().suffix(".grd").tempfile()?;
        let args = format!("{} {}=bf", path.display(), converted.path().display());
        session.run("grdreformat", &args, b"")?;
        Grid::from_native_file(converted.path())
    }
}

/// Grids scattered `(x, y, z)` points via Delaunay triangulation.
///
/// The region is taken from `minmax -I`, the gridding done by
/// `triangulate`, and the result read back in the native layout.
pub fn triangulate(
    session: &Session,
    xs: &[f64],
    ys: &[f64],
    zs: &[f64],
    x_inc: f64,
    y_inc: f64,
) -> GridResult<Grid> {
    if xs.len() != ys.len() || xs.len() != zs.len() {
        return Err(GridError::MismatchedLengths("triangulation coordinates"));
    }

    let mut points = String::new();
    for i in 0..xs.len() {
        let _ = writeln!(points, "{} {} {}", xs[i], ys[i], zs[i]);
    }

    let region = session.run("minmax", &format!("-I{x_inc}/{y_inc}"), points.as_bytes())?;
    let region = String::from_utf8_lossy(&region);

    let output = tempfile::Builder::new().suffix(".grd").tempfile()?;
    let args = format!(
        "-G{}=bf -I{}/{} {}",
        output.path().display(),
        x_inc,
        y_inc,
        region.trim()
    );
    session.run("triangulate", &args, points.as_bytes())?;
    Grid::from_native_file(output.path())
}

/// Serializes a grid into a temporary `.grd` file for tools that take a
/// grid argument instead of reading stdin.
fn write_temp_grid(grid: &Grid) -> GridResult<NamedTempFile> {
    let mut file = tempfile::Builder::new().suffix(".grd").tempfile()?;
    native::write(grid, &mut file)?;
    file.flush()?;
    Ok(file)
}

/// Realigns `grdtrack` output with the requested track points.
///
/// The toolkit emits one `x y z` line per sample it could take, in track
/// order, skipping points it could not sample. Missing, malformed, or
/// out-of-tolerance lines therefore become NaN entries; a line that does
/// not belong to the current point is retried against the next one.
fn align_track(output: &str, xs: &[f64], ys: &[f64], tolerance: f64) -> Vec<f64> {
    let lines: Vec<&str> = output.lines().collect();
    let mut profile = Vec::with_capacity(xs.len());
    let mut next = 0usize;

    for (x, y) in xs.iter().zip(ys) {
        let Some(line) = lines.get(next) else {
            profile.push(f64::NAN);
            continue;
        };
        let mut fields = line.split_whitespace();
        let sample = (
            fields.next().and_then(|f| f.parse::<f64>().ok()),
            fields.next().and_then(|f| f.parse::<f64>().ok()),
            fields.next().and_then(|f| f.parse::<f64>().ok()),
        );
        let (Some(sx), Some(sy), Some(sz)) = sample else {
            // Unparseable line: consume it, record a gap.
            profile.push(f64::NAN);
            next += 1;
            continue;
        };
        if (x - sx).abs() > tolerance || (y - sy).abs() > tolerance {
            // Sample belongs to a later point; this one has no sample.
            profile.push(f64::NAN);
            continue;
        }
        profile.push(sz);
        next += 1;
    }
    profile
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridData;
    use crate::test_stub::{stub_toolkit, write_stub};
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn sample_grid() -> Grid {
        let mut grid = Grid::new();
        grid.set_x_range(0.0, 10.0).unwrap();
        grid.set_y_range(0.0, 20.0).unwrap();
        grid.title = "sample".to_string();
        grid.set_data(GridData::filled(3, 3, 1.25).unwrap());
        grid
    }

    #[test]
    fn test_grid_command_pipes_native_bytes() {
        // A pass-through tool hands the serialized grid straight back.
        let dir = stub_toolkit(&[("gridcat", "exec cat")]);
        let session = Session::with_bin_dir(dir.path());
        let grid = sample_grid();

        let out = grid_command(&session, "gridcat", "", &grid).unwrap();
        let parsed = native::read(&mut Cursor::new(&out)).unwrap();
        assert_eq!(parsed.title, "sample");
        assert_eq!(parsed.data(), grid.data());
    }

    #[test]
    fn test_grid_command_rejects_incomplete_grid() {
        let dir = stub_toolkit(&[]);
        let session = Session::with_bin_dir(dir.path());
        let grid = Grid::new();
        // Fails before any spawn; the stub directory has no tools at all.
        assert!(matches!(
            grid_command(&session, "gridcat", "", &grid),
            Err(GridError::NotFullySpecified { .. })
        ));
    }

    #[test]
    fn test_track_alignment() {
        let xs = [0.0, 1.0, 9.0];
        let ys = [0.0, 1.0, 9.0];
        let output = "0 0 1.5\n1 1 2.5\n";
        let profile = align_track(output, &xs, &ys, DEFAULT_TRACK_TOLERANCE);
        assert_eq!(profile.len(), 3);
        assert_eq!(profile[0], 1.5);
        assert_eq!(profile[1], 2.5);
        assert!(profile[2].is_nan());
    }

    #[test]
    fn test_track_skips_points_without_samples() {
        // The second track point was not sampled; its line belongs to the
        // third point and must not be consumed early.
        let xs = [0.0, 50.0, 100.0];
        let ys = [0.0, 50.0, 100.0];
        let output = "0 0 1.0\n100 100 3.0\n";
        let profile = align_track(output, &xs, &ys, 5.0);
        assert_eq!(profile[0], 1.0);
        assert!(profile[1].is_nan());
        assert_eq!(profile[2], 3.0);
    }

    #[test]
    fn test_track_malformed_line_becomes_nan() {
        let xs = [0.0, 1.0];
        let ys = [0.0, 1.0];
        let output = "0 0 not-a-number\n1 1 2.5\n";
        let profile = align_track(output, &xs, &ys, 5.0);
        assert!(profile[0].is_nan());
        assert_eq!(profile[1], 2.5);
    }

    #[test]
    fn test_track_end_to_end_with_stub() {
        let dir = stub_toolkit(&[]);
        write_stub(
            dir.path(),
            "grdtrack",
            "cat > /dev/null\nprintf '0 0 1.5\\n1 1 2.5\\n'",
        );
        let session = Session::with_bin_dir(dir.path());
        let grid = sample_grid();

        let profile = grid
            .track(&session, &[0.0, 1.0, 9.0], &[0.0, 1.0, 9.0])
            .unwrap();
        assert_eq!(profile[0], 1.5);
        assert_eq!(profile[1], 2.5);
        assert!(profile[2].is_nan());
    }

    #[test]
    fn test_track_length_mismatch() {
        let dir = stub_toolkit(&[]);
        let session = Session::with_bin_dir(dir.path());
        let grid = sample_grid();
        assert!(matches!(
            grid.track(&session, &[0.0, 1.0], &[0.0]),
            Err(GridError::MismatchedLengths(_))
        ));
    }

    #[test]
    fn test_triangulate_length_mismatch() {
        let dir = stub_toolkit(&[]);
        let session = Session::with_bin_dir(dir.path());
        assert!(matches!(
            triangulate(&session, &[0.0, 1.0], &[0.0, 1.0], &[0.0], 1.0, 1.0),
            Err(GridError::MismatchedLengths(_))
        ));
    }

    #[test]
    fn test_native_file_round_trip() {
        let grid = sample_grid();
        let file = write_temp_grid(&grid).unwrap();
        let parsed = Grid::from_native_file(file.path()).unwrap();
        assert_eq!(parsed.x_range(), grid.x_range());
        assert_eq!(parsed.data(), grid.data());
    }
}
