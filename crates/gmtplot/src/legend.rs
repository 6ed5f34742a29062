//! Legends, keys, and colour bars.

use std::ops::{Deref, DerefMut};

use crate::area::{Parent, PlotArg};
use crate::area_xy::AreaXY;
use crate::error::PlotResult;

/// A legend area: a grid of entry slots filled left to right, top to
/// bottom, each pairing a sample (symbol, line, box) with its caption.
pub struct KeyArea {
    xy: AreaXY,
    columns: usize,
    rows: usize,
    entry_size: [f64; 2],
    next_slot: usize,
}

impl KeyArea {
    /// Creates a key area with the default 3x4 slot grid.
    pub fn new(parent: &dyn Parent, pos: [f64; 2], size: [f64; 2]) -> Self {
        let xy = AreaXY::new(parent, pos, size);
        let mut this = Self {
            xy,
            columns: 0,
            rows: 0,
            entry_size: [0.0, 0.0],
            next_slot: 0,
        };
        this.set_layout(3, 4);
        this
    }

    /// Changes the slot grid; already placed entries keep their slots.
    pub fn set_layout(&mut self, columns: usize, rows: usize) {
        self.columns = columns.max(1);
        self.rows = rows.max(1);
        if let Some(size) = self.xy.size {
            self.entry_size = [
                size[0] / self.columns as f64,
                size[1] / self.rows as f64,
            ];
        }
    }

    fn next_position(&mut self) -> [f64; 2] {
        let row = self.next_slot / self.columns;
        let col = self.next_slot % self.columns;
        self.next_slot += 1;
        [
            col as f64 * self.entry_size[0],
            (self.rows as f64 - 0.5 - row as f64) * self.entry_size[1],
        ]
    }

    /// Adds a symbol entry with the default sample size.
    pub fn symbol_entry(&mut self, caption: &str, colour: &str, symbol: &str) -> PlotResult<()> {
        self.symbol_entry_sized(caption, colour, symbol, "0.5")
    }

    /// Adds a symbol entry; `size` is the symbol sample size in
    /// centimetres.
    pub fn symbol_entry_sized(
        &mut self,
        caption: &str,
        colour: &str,
        symbol: &str,
        size: &str,
    ) -> PlotResult<()> {
        let [x, y] = self.next_position();
        self.xy.symbols(
            &[x + 0.4],
            &[y],
            &PlotArg::single(size),
            &PlotArg::single(symbol),
            &format!("-G{colour} -W0"),
        )?;
        self.xy.text_with([x + 0.8, y], caption, "10 0 0 ML", "")
    }

    /// Adds a line sample drawn with the given pen.
    pub fn line_entry(&mut self, caption: &str, pen: &str) -> PlotResult<()> {
        let [x, y] = self.next_position();
        self.xy.line(&format!("-W{pen}"), &[x, x + 0.7], &[y, y])?;
        self.xy.text_with([x + 0.8, y], caption, "10 0 0 ML", "")
    }

    /// Adds a filled box entry.
    pub fn box_entry(&mut self, caption: &str, colour: &str) -> PlotResult<()> {
        self.symbol_entry_sized(caption, colour, "s", "0.7")
    }
}

impl Deref for KeyArea {
    type Target = AreaXY;

    fn deref(&self) -> &AreaXY {
        &self.xy
    }
}

impl DerefMut for KeyArea {
    fn deref_mut(&mut self) -> &mut AreaXY {
        &mut self.xy
    }
}

/// Draws a colour bar for `colormap` with `psscale`, horizontal or
/// vertical depending on the aspect ratio of `size`, with `title` set
/// along the long edge.
pub fn colour_key(
    parent: &dyn Parent,
    colormap: &str,
    title: &str,
    args: &str,
    pos: [f64; 2],
    size: [f64; 2],
    label_offset: f64,
) -> PlotResult<()> {
    let mut area = AreaXY::new(parent, pos, size);
    let label_font = area.label_font.clone();
    let points = crate::area::font_points(&area.label_size);
    let spacing = crate::area::line_spacing(&area.label_size);

    if size[0] > size[1] {
        area.command(
            "psscale",
            &format!(
                "-D{}/{}/{}/{}h -C{} {}",
                size[0] / 2.0,
                size[1],
                size[0],
                size[1],
                colormap,
                args
            ),
            b"",
        )?;
        if !title.is_empty() {
            let mut label_box = AreaXY::new(&area, [0.0, -2.8], [size[0], 2.0]);
            let text_args = format!("{} 0 {} LT {} {} c", points, label_font, spacing, size[0]);
            label_box.paragraph_text_with([0.0, 2.0], title, &text_args, "-N")?;
        }
    } else {
        area.command(
            "psscale",
            &format!(
                "-D0/{}/{}/{} -C{} {}",
                size[1] / 2.0,
                size[1],
                size[0],
                colormap,
                args
            ),
            b"",
        )?;
        if !title.is_empty() {
            let mut label_box = AreaXY::new(&area, [size[0] + label_offset, 0.0], [2.0, size[1]]);
            let text_args = format!("{} 90 {} LT {} {} c", points, label_font, spacing, size[1]);
            label_box.paragraph_text_with([0.0, 0.0], title, &text_args, "-N")?;
        }
    }
    Ok(())
}
