use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Failures surfaced by the scan pipeline.
#[derive(Error, Debug)]
pub enum Error {
    /// Unsupported extension, bad exclusion pattern or missing required field.
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Path not found or not a directory: {}", .0.display())]
    PathNotFound(PathBuf),

    /// A matched file could not be opened or is not valid UTF-8.
    #[error("Unreadable file '{}': {reason}", path.display())]
    UnreadableFile { path: PathBuf, reason: String },

    #[error("IO error at '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Process exit code used by `main` for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Configuration(_) => 2,
            Self::PathNotFound(_) => 3,
            Self::UnreadableFile { .. } => 4,
            Self::Io { .. } => 1,
        }
    }
}
