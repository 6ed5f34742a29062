//! The native binary grid format.
//!
//! Fixed-layout header in host byte order, followed by the samples as raw
//! `f32` scanlines (north to south, west to east):
//!
//! | field | type |
//! |---|---|
//! | nx, ny | `i32` each |
//! | node registration flag | `i32` |
//! | x_min, x_max, y_min, y_max | `f64` |
//! | z_min, z_max | `f64`, derived from the data |
//! | x_inc, y_inc | `f64`, derived from ranges and shape |
//! | z_scale_factor, z_add_offset | `f64` |
//! | x/y/z units | 80 bytes each, NUL padded |
//! | title | 80 bytes, NUL padded |
//! | command | 320 bytes, NUL padded |
//! | remark | 160 bytes, NUL padded |
//!
//! This is the `=bf` layout the GMT programs read from and write to pipes
//! and files; matching it byte for byte is what makes the grids exchanged
//! with the toolkit interoperable.

use std::io::{Read, Write};

use byteorder::{NativeEndian, ReadBytesExt, WriteBytesExt};

use crate::error::{GridError, GridResult};
use crate::grid::{
    Grid, GridData, Registration, GRD_COMMAND_LEN, GRD_REMARK_LEN, GRD_TITLE_LEN, GRD_UNIT_LEN,
};

/// Total size of the fixed header in bytes.
pub const HEADER_LEN: usize = 3 * 4 + 10 * 8 + 3 * GRD_UNIT_LEN + GRD_TITLE_LEN
    + GRD_COMMAND_LEN
    + GRD_REMARK_LEN;

/// Serializes a grid.
///
/// Fails with [`GridError::NotFullySpecified`] before writing anything if
/// the data array is missing or either range is degenerate.
pub fn write<W: Write>(grid: &Grid, sink: &mut W) -> GridResult<()> {
    let data = grid.complete()?;
    let (x_inc, y_inc) = grid.spacing()?;
    let (z_min, z_max) = data.min_max();
    let x_range = grid.x_range();
    let y_range = grid.y_range();

    sink.write_i32::<NativeEndian>(data.cols() as i32)?;
    sink.write_i32::<NativeEndian>(data.rows() as i32)?;
    sink.write_i32::<NativeEndian>(grid.registration().flag())?;
    for value in [
        x_range[0],
        x_range[1],
        y_range[0],
        y_range[1],
        f64::from(z_min),
        f64::from(z_max),
        x_inc,
        y_inc,
        grid.z_scale,
        grid.z_offset,
    ] {
        sink.write_f64::<NativeEndian>(value)?;
    }
    write_text(sink, &grid.x_units, GRD_UNIT_LEN)?;
    write_text(sink, &grid.y_units, GRD_UNIT_LEN)?;
    write_text(sink, &grid.z_units, GRD_UNIT_LEN)?;
    write_text(sink, &grid.title, GRD_TITLE_LEN)?;
    write_text(sink, &grid.command, GRD_COMMAND_LEN)?;
    write_text(sink, &grid.remark, GRD_REMARK_LEN)?;

    for &value in data.values() {
        sink.write_f32::<NativeEndian>(value)?;
    }
    Ok(())
}

/// Parses a grid from the native layout. The exact inverse of [`write`]:
/// the sample payload is reshaped to the dimensions declared in the header.
pub fn read<R: Read>(source: &mut R) -> GridResult<Grid> {
    let nx = source.read_i32::<NativeEndian>()?;
    let ny = source.read_i32::<NativeEndian>()?;
    let flag = source.read_i32::<NativeEndian>()?;
    if nx <= 0 || ny <= 0 {
        return Err(GridError::MalformedHeader(format!(
            "non-positive grid dimensions {nx}x{ny}"
        )));
    }
    let registration = Registration::from_flag(flag)?;

    let mut doubles = [0f64; 10];
    for value in &mut doubles {
        *value = source.read_f64::<NativeEndian>()?;
    }
    let [x_min, x_max, y_min, y_max, _z_min, _z_max, _x_inc, _y_inc, z_scale, z_offset] = doubles;

    let mut grid = Grid::new();
    grid.set_x_range(x_min, x_max)?;
    grid.set_y_range(y_min, y_max)?;
    grid.set_registration(registration);
    grid.z_scale = z_scale;
    grid.z_offset = z_offset;
    grid.x_units = read_text(source, GRD_UNIT_LEN)?;
    grid.y_units = read_text(source, GRD_UNIT_LEN)?;
    grid.z_units = read_text(source, GRD_UNIT_LEN)?;
    grid.title = read_text(source, GRD_TITLE_LEN)?;
    grid.command = read_text(source, GRD_COMMAND_LEN)?;
    grid.remark = read_text(source, GRD_REMARK_LEN)?;

    let count = nx as usize * ny as usize;
    let mut values = Vec::with_capacity(count);
    for _ in 0..count {
        values.push(source.read_f32::<NativeEndian>()?);
    }
    grid.set_data(GridData::new(ny as usize, nx as usize, values)?);
    Ok(grid)
}

/// Writes a NUL-padded fixed-width text field. The text is truncated to
/// `width - 1` bytes so the field stays NUL terminated.
fn write_text<W: Write>(sink: &mut W, text: &str, width: usize) -> GridResult<()> {
    let mut field = vec![0u8; width];
    let bytes = text.as_bytes();
    let len = bytes.len().min(width - 1);
    field[..len].copy_from_slice(&bytes[..len]);
    sink.write_all(&field)?;
    Ok(())
}

fn read_text<R: Read>(source: &mut R, width: usize) -> GridResult<String> {
    let mut field = vec![0u8; width];
    source.read_exact(&mut field)?;
    let len = field.iter().position(|&b| b == 0).unwrap_or(width);
    Ok(String::from_utf8_lossy(&field[..len]).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn sample_grid() -> Grid {
        let mut grid = Grid::new();
        grid.set_x_range(0.0, 10.0).unwrap();
        grid.set_y_range(10.0, 20.0).unwrap();
        grid.z_scale = 2.0;
        grid.z_offset = -1.5;
        grid.x_units = "km".to_string();
        grid.y_units = "km".to_string();
        grid.z_units = "m".to_string();
        grid.title = "surface elevation".to_string();
        grid.command = "triangulate -I1/1".to_string();
        grid.remark = "synthetic".to_string();
        let values: Vec<f32> = (0..6).map(|i| i as f32 * 0.5 - 1.0).collect();
        grid.set_data(GridData::new(2, 3, values).unwrap());
        grid
    }

    #[test]
    fn test_round_trip() {
        let grid = sample_grid();
        let mut buf = Vec::new();
        write(&grid, &mut buf).unwrap();

        let parsed = read(&mut Cursor::new(&buf)).unwrap();
        assert_eq!(parsed.x_range(), grid.x_range());
        assert_eq!(parsed.y_range(), grid.y_range());
        assert_eq!(parsed.registration(), grid.registration());
        assert_eq!(parsed.z_scale, grid.z_scale);
        assert_eq!(parsed.z_offset, grid.z_offset);
        assert_eq!(parsed.x_units, grid.x_units);
        assert_eq!(parsed.y_units, grid.y_units);
        assert_eq!(parsed.z_units, grid.z_units);
        assert_eq!(parsed.title, grid.title);
        assert_eq!(parsed.command, grid.command);
        assert_eq!(parsed.remark, grid.remark);
        assert_eq!(parsed.data(), grid.data());
    }

    #[test]
    fn test_round_trip_zero_grid() {
        let mut grid = Grid::new();
        grid.set_x_range(0.0, 10.0).unwrap();
        grid.set_y_range(0.0, 20.0).unwrap();
        grid.set_data(GridData::filled(3, 3, 0.0).unwrap());

        let mut buf = Vec::new();
        write(&grid, &mut buf).unwrap();
        let parsed = read(&mut Cursor::new(&buf)).unwrap();

        let data = parsed.data().unwrap();
        assert_eq!((data.rows(), data.cols()), (3, 3));
        assert!(data.values().iter().all(|&v| v == 0.0));
        assert_eq!(parsed.x_range(), [0.0, 10.0]);
        assert_eq!(parsed.y_range(), [0.0, 20.0]);
    }

    #[test]
    fn test_layout_is_fixed_width() {
        let grid = sample_grid();
        let mut buf = Vec::new();
        write(&grid, &mut buf).unwrap();

        assert_eq!(HEADER_LEN, 892);
        assert_eq!(buf.len(), HEADER_LEN + 6 * 4);
        assert_eq!(&buf[0..4], &3i32.to_ne_bytes());
        assert_eq!(&buf[4..8], &2i32.to_ne_bytes());
        assert_eq!(&buf[8..12], &0i32.to_ne_bytes());
        assert_eq!(&buf[12..20], &0f64.to_ne_bytes());
        assert_eq!(&buf[20..28], &10f64.to_ne_bytes());
    }

    #[test]
    fn test_pixel_registration_round_trips() {
        let mut grid = sample_grid();
        grid.set_registration(Registration::Pixel);
        let mut buf = Vec::new();
        write(&grid, &mut buf).unwrap();
        let parsed = read(&mut Cursor::new(&buf)).unwrap();
        assert_eq!(parsed.registration(), Registration::Pixel);
    }

    #[test]
    fn test_write_requires_complete_grid() {
        let mut buf = Vec::new();

        // No data.
        let mut grid = Grid::new();
        grid.set_x_range(0.0, 1.0).unwrap();
        grid.set_y_range(0.0, 1.0).unwrap();
        assert!(matches!(
            write(&grid, &mut buf),
            Err(GridError::NotFullySpecified { .. })
        ));
        assert!(buf.is_empty());

        // Degenerate range (never set).
        let mut grid = Grid::new();
        grid.set_data(GridData::filled(2, 2, 1.0).unwrap());
        assert!(matches!(
            write(&grid, &mut buf),
            Err(GridError::NotFullySpecified { .. })
        ));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_read_rejects_bad_headers() {
        let grid = sample_grid();
        let mut buf = Vec::new();
        write(&grid, &mut buf).unwrap();

        // Corrupt the dimension field.
        let mut bad = buf.clone();
        bad[0..4].copy_from_slice(&(-1i32).to_ne_bytes());
        assert!(matches!(
            read(&mut Cursor::new(&bad)),
            Err(GridError::MalformedHeader(_))
        ));

        // Corrupt the registration flag.
        let mut bad = buf.clone();
        bad[8..12].copy_from_slice(&7i32.to_ne_bytes());
        assert!(matches!(
            read(&mut Cursor::new(&bad)),
            Err(GridError::MalformedHeader(_))
        ));

        // Truncated payload.
        let short = &buf[..buf.len() - 2];
        assert!(read(&mut Cursor::new(short)).is_err());
    }

    #[test]
    fn test_long_text_fields_are_truncated() {
        let mut grid = sample_grid();
        grid.title = "t".repeat(200);
        let mut buf = Vec::new();
        write(&grid, &mut buf).unwrap();
        let parsed = read(&mut Cursor::new(&buf)).unwrap();
        assert_eq!(parsed.title.len(), GRD_TITLE_LEN - 1);
    }
}
