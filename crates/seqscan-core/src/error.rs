//! Error types for scanning operations.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fatal errors: API misuse or a bad anchor path for a single-file operation.
///
/// Anything discovered while walking directories is recorded as a
/// [`DirectoryError`] in the scan result instead.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Invalid configuration (bad `min_len`, malformed glob, empty root).
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// The anchor file does not exist.
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    /// The anchor path exists but is not a regular file.
    #[error("Not a regular file: {path}")]
    NotARegularFile { path: PathBuf },

    /// Frame range too large to expand into paths.
    #[error("Range too large: {count} frames (max {max})")]
    RangeTooLarge { count: u64, max: u64 },

    /// Generic I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ScanError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::FileNotFound { path },
            _ => Self::Io { path, source },
        }
    }

    /// Create an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}

/// Kind of directory access error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DirectoryErrorKind {
    /// Permission was denied.
    PermissionDenied,
    /// Directory vanished or never existed.
    NotFound,
    /// A root path is not a directory.
    NotADirectory,
    /// Error reading a directory or one of its entries.
    ReadError,
    /// Symbolic link leads back to a directory on its own descent path.
    SymlinkCycle,
}

/// Non-fatal error recorded while enumerating a directory.
///
/// Broken symlinks are not errors: they are listed as orphans.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DirectoryError {
    /// Path where the error occurred.
    pub path: PathBuf,
    /// Kind of error.
    pub kind: DirectoryErrorKind,
    /// Human-readable message.
    pub message: String,
}

impl DirectoryError {
    /// Create a new directory error.
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>, kind: DirectoryErrorKind) -> Self {
        Self {
            path: path.into(),
            kind,
            message: message.into(),
        }
    }

    /// Classify an I/O error for a path.
    pub fn from_io(path: impl Into<PathBuf>, error: &std::io::Error) -> Self {
        let path = path.into();
        let kind = match error.kind() {
            std::io::ErrorKind::PermissionDenied => DirectoryErrorKind::PermissionDenied,
            std::io::ErrorKind::NotFound => DirectoryErrorKind::NotFound,
            _ => DirectoryErrorKind::ReadError,
        };
        Self {
            message: format!("{}: {error}", path.display()),
            path,
            kind,
        }
    }

    /// Create a not-a-directory error for a root.
    pub fn not_a_directory(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            message: format!("Not a directory: {}", path.display()),
            path,
            kind: DirectoryErrorKind::NotADirectory,
        }
    }

    /// Create a symlink cycle error. The subtree at `path` was skipped.
    pub fn symlink_cycle(path: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let target = target.into();
        Self {
            message: format!(
                "Symlink cycle: {} -> {} (ancestor directory)",
                path.display(),
                target.display()
            ),
            path,
            kind: DirectoryErrorKind::SymlinkCycle,
        }
    }
}

impl std::fmt::Display for DirectoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}
