//! The output medium: a PostScript file plus the GMT state behind it.

use std::cell::RefCell;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::rc::Rc;

use gmtplot_exec::{Defaults, Session};

use crate::area::Parent;
use crate::error::{PlotError, PlotResult};

/// Page orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl Orientation {
    /// The value GMT's `PAGE_ORIENTATION` default takes.
    pub fn as_str(self) -> &'static str {
        match self {
            Orientation::Portrait => "portrait",
            Orientation::Landscape => "landscape",
        }
    }
}

/// Usable drawing surface in centimetres for a named paper size, or `None`
/// for an unrecognized name.
pub fn paper_size(name: &str, orientation: Orientation) -> Option<[f64; 2]> {
    let [width, height] = match name.to_ascii_lowercase().as_str() {
        "a4" => [18.0, 24.7],
        "a3" => [29.7, 37.0],
        _ => return None,
    };
    Some(match orientation {
        Orientation::Portrait => [width, height],
        Orientation::Landscape => [height, width],
    })
}

/// Configuration for a new canvas.
#[derive(Debug, Clone)]
pub struct CanvasConfig {
    /// Paper size name passed to `PAPER_MEDIA`.
    pub paper: String,
    pub orientation: Orientation,
    /// Delete GMT's per-directory state files before plotting, so the plot
    /// starts from the global settings.
    pub reset: bool,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            paper: "a4".to_string(),
            orientation: Orientation::Portrait,
            reset: true,
        }
    }
}

impl CanvasConfig {
    pub fn paper(mut self, paper: impl Into<String>) -> Self {
        self.paper = paper.into();
        self
    }

    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn reset(mut self, reset: bool) -> Self {
        self.reset = reset;
        self
    }
}

/// State shared by the canvas and every area drawing on it.
#[derive(Debug)]
pub(crate) struct CanvasState {
    pub(crate) session: Session,
    path: PathBuf,
    /// Current plot origin; drawing calls emit `-X`/`-Y` displacements
    /// relative to it.
    pub(crate) pos: [f64; 2],
}

impl CanvasState {
    /// Appends captured PostScript to the plot file.
    pub(crate) fn append(&self, bytes: &[u8]) -> io::Result<()> {
        if bytes.is_empty() {
            return Ok(());
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(bytes)
    }
}

/// Shared reference to the canvas state. Cheap to clone; plotting is
/// single-threaded, so interior mutability is enough.
#[derive(Debug, Clone)]
pub struct CanvasHandle {
    pub(crate) state: Rc<RefCell<CanvasState>>,
}

impl CanvasHandle {
    pub(crate) fn session(&self) -> Session {
        self.state.borrow().session.clone()
    }
}

/// A GMT plot in progress: the PostScript file, the settings pushed for it,
/// and the paper it is laid out on.
#[derive(Debug)]
pub struct Canvas {
    handle: CanvasHandle,
    /// Settings for this plot; nested areas snapshot them at creation.
    pub defaults: Defaults,
    paper: [f64; 2],
}

impl Canvas {
    /// Starts an A4 portrait plot written to `path`.
    pub fn new(session: &Session, path: impl Into<PathBuf>) -> PlotResult<Self> {
        Self::create(session, path, &CanvasConfig::default())
    }

    /// Starts a plot with explicit paper and reset behavior.
    ///
    /// Pushes `PAPER_MEDIA` and `PAGE_ORIENTATION` to the toolkit and
    /// writes the PostScript preamble (a quiet `pstext -K` call) to `path`,
    /// creating or truncating it.
    pub fn create(
        session: &Session,
        path: impl Into<PathBuf>,
        config: &CanvasConfig,
    ) -> PlotResult<Self> {
        let path = path.into();

        if config.reset {
            // GMT keeps per-directory state; absent files are fine.
            let _ = fs::remove_file(".gmtcommands");
            let _ = fs::remove_file(".gmtdefaults");
        }

        let paper = paper_size(&config.paper, config.orientation)
            .ok_or_else(|| PlotError::UnknownPaperSize(config.paper.clone()))?;

        let mut defaults = Defaults::load(session)?;
        defaults.set("PAPER_MEDIA", &config.paper)?;
        defaults.set("PAGE_ORIENTATION", config.orientation.as_str())?;

        let preamble = session.run_quiet("pstext", "-JX1 -R0/1/0/1 -K", b"0 0 10 0 0 0 \n")?;
        fs::write(&path, &preamble)?;

        let state = CanvasState {
            session: session.clone(),
            path,
            pos: [0.0, 0.0],
        };
        Ok(Self {
            handle: CanvasHandle {
                state: Rc::new(RefCell::new(state)),
            },
            defaults,
            paper,
        })
    }

    /// Finishes the plot by appending the PostScript trailer.
    pub fn close(self) -> PlotResult<()> {
        let state = self.handle.state.borrow();
        let trailer = state
            .session
            .run_quiet("pstext", "-JX1 -R0/1/0/1 -O", b"0 0 10 0 0 0 \n")?;
        state.append(&trailer)?;
        Ok(())
    }

    /// Usable drawing surface in centimetres.
    pub fn paper(&self) -> [f64; 2] {
        self.paper
    }

    /// The PostScript file being written.
    pub fn path(&self) -> PathBuf {
        self.handle.state.borrow().path.clone()
    }
}

impl Parent for Canvas {
    fn handle(&self) -> CanvasHandle {
        self.handle.clone()
    }

    fn defaults(&self) -> &Defaults {
        &self.defaults
    }

    fn origin(&self) -> [f64; 2] {
        [0.0, 0.0]
    }
}
