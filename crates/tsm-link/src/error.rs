//! Error types for ts-modules-postinstall.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for link operations.
pub type Result<T> = std::result::Result<T, LinkError>;

/// Main error type for ts-modules-postinstall.
#[derive(Error, Debug)]
pub enum LinkError {
    /// A side directory operation was refused by the filesystem
    #[error("Failed to {action} {}: {source}", .path.display())]
    Filesystem {
        action: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },

    /// Package.json not found
    #[error("package.json not found in {0}")]
    PackageJsonNotFound(String),

    /// Package.json has no usable name
    #[error("Could not determine package name from package.json")]
    MissingPackageName,

    /// Invalid package.json
    #[error("Invalid package.json: {0}")]
    InvalidPackageJson(String),

    /// Error from the loader library
    #[error(transparent)]
    Resolve(#[from] tsm_loader::ResolveError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LinkError {
    /// Wrap an IO error from `action` on `path`.
    pub fn filesystem(
        action: &'static str,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        LinkError::Filesystem {
            action,
            path: path.into(),
            source,
        }
    }
}
