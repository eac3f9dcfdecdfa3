// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! `import` resolution hook
//!
//! Follows the loader-hook chaining protocol: the hook receives the
//! specifier, the import context and the next resolver in line. It either
//! returns a final result (with `short_circuit` set) or hands the specifier
//! to the next resolver untouched.
//!
//! Unlike the require interceptor, a directory in the side directory is
//! turned into a concrete file here via [`resolve_entry`].

use crate::chain::{ModuleResolve, Resolution, ResolveRequest, ResolveStrategy};
use crate::entry::resolve_entry;
use crate::error::{ResolveError, Result};
use crate::host::ResolvedModule;
use crate::side_dir::{SideDirectory, SideEntry};
use crate::specifier::is_bare_import;
use std::future::Future;
use std::path::{Path, PathBuf};
use tracing::debug;
use url::Url;

/// Context passed alongside an import specifier
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveContext {
    /// URL of the importing module, absent for the entry point
    pub parent_url: Option<Url>,
    /// Export conditions in effect (`import`, `node`, ...)
    pub conditions: Vec<String>,
}

impl ResolveContext {
    /// Context for an import made from the file at `parent`
    pub fn from_parent(parent: &Path) -> Result<Self> {
        let parent_url = Url::from_file_path(parent)
            .map_err(|_| ResolveError::InvalidUrl(parent.to_path_buf()))?;
        Ok(Self {
            parent_url: Some(parent_url),
            conditions: vec!["node".to_string(), "import".to_string()],
        })
    }

    /// The importing module as a filesystem path, if it is a file URL
    pub fn parent_path(&self) -> Option<PathBuf> {
        self.parent_url.as_ref()?.to_file_path().ok()
    }
}

/// Result of an import resolution hook
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookResolution {
    /// Resolved module URL
    pub url: Url,
    /// No later hook should run
    pub short_circuit: bool,
}

impl HookResolution {
    /// Convert a chain resolution into hook form
    pub fn from_resolution(resolution: &Resolution) -> Result<Self> {
        let url = match &resolution.module {
            ResolvedModule::BuiltIn(name) => Url::parse(&format!("node:{}", name))
                .map_err(|e| ResolveError::module_not_found(format!("node:{}: {}", name, e)))?,
            ResolvedModule::File(p) | ResolvedModule::Json(p) | ResolvedModule::Native(p) => {
                file_url(p)?
            }
        };
        Ok(Self {
            url,
            short_circuit: resolution.short_circuit,
        })
    }
}

/// Redirects bare imports into the side directory
#[derive(Debug, Clone)]
pub struct ImportInterceptor {
    side_dir: SideDirectory,
}

impl ImportInterceptor {
    /// Create a hook over `side_dir`
    pub fn new(side_dir: SideDirectory) -> Self {
        Self { side_dir }
    }

    /// The side directory consulted
    pub fn side_dir(&self) -> &SideDirectory {
        &self.side_dir
    }

    /// The resolve hook.
    ///
    /// `default_resolve` is the next resolver in the chain and is only
    /// invoked when the side directory has no entry for `specifier`.
    /// [`ResolveError::EntryNotFound`] from a side-directory package is
    /// returned as is.
    pub async fn resolve<F, Fut>(
        &self,
        specifier: &str,
        context: &ResolveContext,
        default_resolve: F,
    ) -> Result<HookResolution>
    where
        F: FnOnce(String, ResolveContext) -> Fut,
        Fut: Future<Output = Result<HookResolution>>,
    {
        if is_bare_import(specifier) {
            let entry = self.side_dir.lookup_async(specifier).await;
            if let Some(path) = self.locate(specifier, entry)? {
                return Ok(HookResolution {
                    url: file_url(&path)?,
                    short_circuit: true,
                });
            }
        }

        default_resolve(specifier.to_string(), context.clone()).await
    }

    /// Concrete file for a side-directory entry, `None` when absent
    fn locate(&self, specifier: &str, entry: SideEntry) -> Result<Option<PathBuf>> {
        match entry {
            SideEntry::Absent => Ok(None),
            SideEntry::File(path) => {
                debug!("Import '{}' resolved to file {}", specifier, path.display());
                Ok(Some(path))
            }
            SideEntry::Directory(dir) => {
                let path = resolve_entry(&dir)?;
                debug!("Import '{}' resolved to entry {}", specifier, path.display());
                Ok(Some(path))
            }
        }
    }
}

impl ResolveStrategy for ImportInterceptor {
    fn name(&self) -> &'static str {
        "import-interceptor"
    }

    fn try_resolve(
        &self,
        request: &ResolveRequest<'_>,
        _fallback: &dyn ModuleResolve,
    ) -> Result<Option<Resolution>> {
        if !is_bare_import(request.specifier) {
            return Ok(None);
        }

        let entry = self.side_dir.lookup(request.specifier);
        Ok(self
            .locate(request.specifier, entry)?
            .map(|path| Resolution::terminal(ResolvedModule::from_path(path))))
    }
}

fn file_url(path: &Path) -> Result<Url> {
    Url::from_file_path(path).map_err(|_| ResolveError::InvalidUrl(path.to_path_buf()))
}
