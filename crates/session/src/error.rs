//! Error types for file access and session operations.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::TabId;

/// Category of a [`FileIoError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileIoErrorKind {
    NotFound,
    PermissionDenied,
    Decode,
    DiskFull,
    Other,
}

/// Failure reported by a [`FileIo`](crate::FileIo) implementation.
///
/// Always recoverable: the operation that hit it is aborted and the
/// session keeps its previous state.
#[derive(Debug, Error)]
pub enum FileIoError {
    #[error("file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("permission denied: {}", .path.display())]
    PermissionDenied { path: PathBuf },

    #[error("cannot decode {} as text", .path.display())]
    Decode { path: PathBuf },

    #[error("not enough disk space to write {}", .path.display())]
    DiskFull { path: PathBuf },

    #[error("{}: {source}", .path.display())]
    Other {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FileIoError {
    /// Build an error of the given kind for `path`
    pub fn new(kind: FileIoErrorKind, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match kind {
            FileIoErrorKind::NotFound => Self::NotFound { path },
            FileIoErrorKind::PermissionDenied => Self::PermissionDenied { path },
            FileIoErrorKind::Decode => Self::Decode { path },
            FileIoErrorKind::DiskFull => Self::DiskFull { path },
            FileIoErrorKind::Other => Self::Other {
                path,
                source: io::Error::other("I/O error"),
            },
        }
    }

    /// Classify an `std::io::Error` raised while accessing `path`
    pub fn from_io(path: &Path, err: io::Error) -> Self {
        let path = path.to_path_buf();
        match err.kind() {
            io::ErrorKind::NotFound => Self::NotFound { path },
            io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            io::ErrorKind::StorageFull => Self::DiskFull { path },
            io::ErrorKind::InvalidData => Self::Decode { path },
            _ => Self::Other { path, source: err },
        }
    }

    pub fn kind(&self) -> FileIoErrorKind {
        match self {
            Self::NotFound { .. } => FileIoErrorKind::NotFound,
            Self::PermissionDenied { .. } => FileIoErrorKind::PermissionDenied,
            Self::Decode { .. } => FileIoErrorKind::Decode,
            Self::DiskFull { .. } => FileIoErrorKind::DiskFull,
            Self::Other { .. } => FileIoErrorKind::Other,
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound { path }
            | Self::PermissionDenied { path }
            | Self::Decode { path }
            | Self::DiskFull { path }
            | Self::Other { path, .. } => path,
        }
    }
}

/// Failure of a session manager operation
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Io(#[from] FileIoError),

    #[error("no tab with id {0}")]
    UnknownTab(TabId),
}

/// Rejected go-to-line input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GoToLineError {
    #[error("'{0}' is not a valid line number")]
    NotANumber(String),
}
