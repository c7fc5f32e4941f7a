use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Canonical result for the generation pipeline.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a generation run. There is no local recovery:
/// a failed table requires a full re-run.
#[derive(Debug, Error)]
pub enum Error {
    /// A planner or catalog precondition was violated.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The input template for a table does not exist.
    #[error("template not found: {}", .0.display())]
    MissingTemplate(PathBuf),

    /// The backend exited with a non-zero status.
    #[error("generating table {template} failed: {status}")]
    BackendFailed {
        template: String,
        status: ExitStatus,
    },

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
