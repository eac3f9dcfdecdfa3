// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Error types for module resolution

use std::path::PathBuf;
use thiserror::Error;

/// Result type for resolution operations
pub type Result<T> = std::result::Result<T, ResolveError>;

/// Errors that can occur while resolving a module
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Module not found by the host resolver
    #[error("Cannot find module '{0}'")]
    ModuleNotFound(String),

    /// A side-directory package has no usable entry point
    #[error("Cannot resolve entry point for module at {}", .dir.display())]
    EntryNotFound {
        /// The package directory that was searched
        dir: PathBuf,
    },

    /// A package.json could not be read or parsed
    #[error("Error parsing package.json in {}: {reason}", .dir.display())]
    ManifestParse {
        /// Directory holding the manifest
        dir: PathBuf,
        /// Reason for failure
        reason: String,
    },

    /// File system error
    #[error("File system error: {0}")]
    Io(#[from] std::io::Error),

    /// A resolved path could not be expressed as a file URL
    #[error("Cannot convert {} to a file URL", .0.display())]
    InvalidUrl(PathBuf),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ResolveError {
    /// Create a module not found error
    pub fn module_not_found(module: impl Into<String>) -> Self {
        Self::ModuleNotFound(module.into())
    }

    /// Create a manifest parse error
    pub fn manifest_parse(dir: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::ManifestParse {
            dir: dir.into(),
            reason: reason.to_string(),
        }
    }
}
