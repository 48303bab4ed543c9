use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Convenience alias used throughout the library.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Central error type for vendo.
///
/// Registry and store errors abort the invoked command; the two external
/// command variants are caught per repository during `update` so one failing
/// repo never takes down the rest of the run.
#[derive(Debug, Error)]
pub enum Error {
    /// The config document exists but is not well-formed.
    #[error("invalid config at {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Filesystem read/write/mkdir failure.
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Repo '{0}' already exists")]
    DuplicateName(String),

    #[error("Repo '{0}' not found")]
    NotFound(String),

    /// The git subprocess ran but exited non-zero.
    #[error("'git {command}' failed: {status}")]
    ExternalCommand { command: String, status: ExitStatus },

    /// The git subprocess could not be started at all.
    #[error("failed to run 'git {command}': {source}")]
    ExternalLaunch {
        command: String,
        source: std::io::Error,
    },

    #[error("could not determine home directory")]
    HomeDir,
}
