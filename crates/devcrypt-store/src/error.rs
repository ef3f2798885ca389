//! Error types for the store module.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Nothing stored at the path.
    #[error("{} does not exist", .0.display())]
    NotFound(PathBuf),

    /// The path cannot name a file.
    #[error("invalid path: {}", .0.display())]
    InvalidPath(PathBuf),

    /// No location for the key files could be determined.
    #[error("cannot determine key location; pass --key or --config-dir")]
    NoKeyPath,

    /// I/O error on a specific path.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
