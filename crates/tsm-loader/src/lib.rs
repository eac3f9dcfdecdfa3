// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! # tsm-loader
//!
//! Module resolution through a `ts_modules` side directory.
//!
//! Packages that ship their source (for example TypeScript that has not been
//! compiled) are registered as symlinks under `<project>/ts_modules/`. Bare
//! specifiers are looked up there first and only fall back to the regular
//! `node_modules` algorithm when no entry exists.
//!
//! Two interceptors are provided:
//!
//! - [`RequireInterceptor`] for synchronous, `require()`-style filename
//!   resolution. It substitutes the side-directory path and hands it back to
//!   the host resolver.
//! - [`ImportInterceptor`] for the asynchronous `import` resolution hook. It
//!   picks a concrete entry file itself via [`resolve_entry`].
//!
//! Rather than patching a global resolver, both are [`ResolveStrategy`]
//! implementations composed into a [`ResolutionChain`]:
//!
//! ```rust,no_run
//! use std::path::Path;
//! use tsm_loader::{LoaderConfig, ModuleResolve, ResolutionChain, ResolveRequest};
//!
//! # fn main() -> tsm_loader::Result<()> {
//! let config = LoaderConfig::load()?;
//! let chain = ResolutionChain::for_require(&config);
//!
//! let parent = Path::new("/project/src/main.js");
//! let resolution = chain.resolve(&ResolveRequest::new("widget", parent))?;
//! println!("{}", resolution.module);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod chain;
pub mod cjs;
pub mod config;
pub mod entry;
pub mod error;
pub mod esm;
pub mod host;
pub mod manifest;
pub mod path;
pub mod side_dir;
pub mod specifier;

// Re-exports
pub use chain::{
    ModuleResolve, Resolution, ResolutionChain, ResolveOptions, ResolveRequest, ResolveStrategy,
};
pub use cjs::RequireInterceptor;
pub use config::LoaderConfig;
pub use entry::resolve_entry;
pub use error::{ResolveError, Result};
pub use esm::{HookResolution, ImportInterceptor, ResolveContext};
pub use host::{HostResolver, ResolvedModule};
pub use manifest::Manifest;
pub use side_dir::{SideDirectory, SideEntry, find_project_root};
pub use specifier::{is_bare_import, is_bare_require};

/// Version of the loader
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default name of the side directory at the project root
pub const SIDE_DIR_NAME: &str = "ts_modules";

/// Manifest file consulted in package directories
pub const MANIFEST_FILE: &str = "package.json";
