//! Error types for GMT process execution.

use std::io;
use thiserror::Error;

/// Result type for GMT execution operations.
pub type ExecResult<T> = Result<T, ExecError>;

/// Errors that can occur while locating or running GMT programs.
#[derive(Debug, Error)]
pub enum ExecError {
    /// No directory on `PATH` contains the GMT binaries.
    #[error("cannot find the GMT binaries: no directory on PATH contains `gmtset`")]
    ToolkitNotFound,

    /// Failed to spawn a GMT program.
    #[error("failed to spawn `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// A GMT program exited with non-zero status.
    #[error("{program} failed with exit code {code}\n{stderr}")]
    CommandFailed {
        program: String,
        code: i32,
        stderr: String,
    },

    /// A GMT default was requested that the toolkit does not know about.
    #[error("unknown GMT default `{key}`")]
    UnknownKey { key: String },

    /// IO error while talking to a child process.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ExecError::CommandFailed {
            program: "psxy".to_string(),
            code: 64,
            stderr: "bad region".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("psxy"));
        assert!(text.contains("64"));
        assert!(text.contains("bad region"));

        let err = ExecError::UnknownKey {
            key: "NO_SUCH_KEY".to_string(),
        };
        assert!(err.to_string().contains("NO_SUCH_KEY"));
    }
}
