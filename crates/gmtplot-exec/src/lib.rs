//! Low-level interface to the GMT programs.
//!
//! GMT does all of the actual cartographic and numeric work; this crate
//! arranges for its executables to be found and run, moving bytes through
//! their standard streams without deadlocking, and keeps the toolkit's
//! global defaults in sync with in-process overrides.
//!
//! Execution is strictly synchronous: [`Session::run`] does not return
//! until the child has exited. Unix only.
//!
//! # Example
//!
//! ```no_run
//! use gmtplot_exec::{Defaults, Session};
//!
//! let session = Session::new()?;
//! let projected = session.run(
//!     "mapproject",
//!     "-R7/49/60.18/71.92r -JB33.5/60.5/52.83/68.17/10",
//!     b"20 50\n",
//! )?;
//!
//! let mut defaults = Defaults::load(&session)?;
//! defaults.set("PAPER_MEDIA", "a3")?;
//! # Ok::<(), gmtplot_exec::ExecError>(())
//! ```

pub mod defaults;
pub mod error;
mod runner;
pub mod session;

#[cfg(test)]
mod test_stub;

pub use defaults::Defaults;
pub use error::{ExecError, ExecResult};
pub use session::{find_bin_dir, Session, SENTINEL};
