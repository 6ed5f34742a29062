//! GMT toolkit discovery and command execution.

use std::io;
use std::path::{Path, PathBuf};

use crate::error::{ExecError, ExecResult};
use crate::runner;

/// Binary probed for when searching `PATH` for a GMT installation. Every GMT
/// install ships it next to the plotting programs.
pub const SENTINEL: &str = "gmtset";

/// Locates the directory holding the GMT binaries by searching `PATH` for
/// the [`SENTINEL`] program.
pub fn find_bin_dir() -> ExecResult<PathBuf> {
    let sentinel = which::which(SENTINEL).map_err(|_| ExecError::ToolkitNotFound)?;
    let dir = sentinel.parent().ok_or(ExecError::ToolkitNotFound)?;
    Ok(dir.to_path_buf())
}

/// Handle on one GMT installation.
///
/// All external state the toolkit touches (the binaries, the per-directory
/// defaults files) is reached through a session, so call sites cannot
/// accidentally mix installations. Cloning is cheap; clones share the same
/// process-global GMT configuration, which is ambient external state.
#[derive(Debug, Clone)]
pub struct Session {
    bin_dir: PathBuf,
    verbose: bool,
    warn: bool,
}

impl Session {
    /// Creates a session for the GMT installation found on `PATH`.
    ///
    /// Failing to find one is a configuration error; nothing is retried.
    pub fn new() -> ExecResult<Self> {
        Ok(Self {
            bin_dir: find_bin_dir()?,
            verbose: false,
            warn: true,
        })
    }

    /// Creates a session for an explicit binary directory, bypassing the
    /// `PATH` search.
    pub fn with_bin_dir(bin_dir: impl Into<PathBuf>) -> Self {
        Self {
            bin_dir: bin_dir.into(),
            verbose: false,
            warn: true,
        }
    }

    /// Logs every command line at info level instead of debug.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Controls whether stderr chatter from successful commands is surfaced
    /// as a warning.
    pub fn warn(mut self, warn: bool) -> Self {
        self.warn = warn;
        self
    }

    /// Directory holding the GMT binaries.
    pub fn bin_dir(&self) -> &Path {
        &self.bin_dir
    }

    /// Runs a GMT program, piping `input` into it and returning its stdout.
    ///
    /// `args` is split on whitespace; GMT flag strings never need embedded
    /// spaces (text content travels via stdin). Non-zero exit is an error
    /// carrying the exit code and the captured stderr; stderr output on a
    /// zero exit is surfaced as a warning and execution continues.
    pub fn run(&self, tool: &str, args: &str, input: &[u8]) -> ExecResult<Vec<u8>> {
        self.run_inner(tool, args, input, self.warn)
    }

    /// Like [`Session::run`] but never warns about stderr output. Used for
    /// calls whose stderr chatter is expected.
    pub fn run_quiet(&self, tool: &str, args: &str, input: &[u8]) -> ExecResult<Vec<u8>> {
        self.run_inner(tool, args, input, false)
    }

    /// Runs a GMT program whose input payload is produced by a callback
    /// writing into a buffer, for callers that serialize their input rather
    /// than holding it as a ready-made slice.
    pub fn run_with_writer<F>(&self, tool: &str, args: &str, write_input: F) -> ExecResult<Vec<u8>>
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut payload = Vec::new();
        write_input(&mut payload)?;
        self.run(tool, args, &payload)
    }

    fn run_inner(&self, tool: &str, args: &str, input: &[u8], warn: bool) -> ExecResult<Vec<u8>> {
        let program = self.bin_dir.join(tool);
        let argv: Vec<&str> = args.split_whitespace().collect();
        if self.verbose {
            log::info!("{} {}", program.display(), args);
        } else {
            log::debug!("{} {}", program.display(), args);
        }

        let run = runner::execute(&program, &argv, input)?;
        if !run.status.success() {
            return Err(ExecError::CommandFailed {
                program: tool.to_string(),
                code: run.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&run.stderr).into_owned(),
            });
        }
        if warn && !run.stderr.is_empty() {
            log::warn!("{}\n{}", tool, String::from_utf8_lossy(&run.stderr));
        }
        Ok(run.stdout)
    }
}
