// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! `require()` interceptor
//!
//! Bare requests whose name exists in the side directory are resolved as if
//! the caller had required the side-directory path directly. Directory and
//! extension handling is left to the fallback resolver.

use crate::chain::{ModuleResolve, Resolution, ResolveRequest, ResolveStrategy};
use crate::error::Result;
use crate::side_dir::SideDirectory;
use crate::specifier::is_bare_require;
use tracing::debug;

/// Redirects bare `require()` requests into the side directory
#[derive(Debug, Clone)]
pub struct RequireInterceptor {
    side_dir: SideDirectory,
}

impl RequireInterceptor {
    /// Create an interceptor over `side_dir`
    pub fn new(side_dir: SideDirectory) -> Self {
        Self { side_dir }
    }

    /// The side directory consulted
    pub fn side_dir(&self) -> &SideDirectory {
        &self.side_dir
    }
}

impl ResolveStrategy for RequireInterceptor {
    fn name(&self) -> &'static str {
        "require-interceptor"
    }

    fn try_resolve(
        &self,
        request: &ResolveRequest<'_>,
        fallback: &dyn ModuleResolve,
    ) -> Result<Option<Resolution>> {
        if !is_bare_require(request.specifier) {
            return Ok(None);
        }

        let entry = self.side_dir.lookup(request.specifier);
        let Some(candidate) = entry.path() else {
            return Ok(None);
        };

        let Some(candidate) = candidate.to_str() else {
            debug!(
                "Skipping side directory entry with non UTF-8 path: {}",
                candidate.display()
            );
            return Ok(None);
        };

        debug!("Redirecting '{}' to {}", request.specifier, candidate);
        fallback
            .resolve(&request.with_specifier(candidate))
            .map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{HostResolver, ResolvedModule};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn setup() -> (TempDir, SideDirectory) {
        let temp = TempDir::new().unwrap();
        let root = temp.path().canonicalize().unwrap();
        let side = SideDirectory::for_project(&root);
        fs::create_dir_all(side.path().join("widget")).unwrap();
        fs::write(side.path().join("widget/index.js"), "").unwrap();
        (temp, side)
    }

    #[test]
    fn test_bare_request_is_redirected() {
        let (_temp, side) = setup();
        let interceptor = RequireInterceptor::new(side.clone());
        let host = HostResolver::new();
        let parent = side.path().parent().unwrap().join("main.js");

        let resolution = interceptor
            .try_resolve(&ResolveRequest::new("widget", &parent), &host)
            .unwrap()
            .unwrap();
        assert_eq!(
            resolution.module,
            ResolvedModule::File(side.path().join("widget/index.js"))
        );
        assert!(!resolution.short_circuit);
    }

    #[test]
    fn test_relative_request_is_ignored() {
        let (_temp, side) = setup();
        // A file that a naive join would find
        fs::write(side.path().join("foo.js"), "").unwrap();
        let interceptor = RequireInterceptor::new(side.clone());
        let host = HostResolver::new();
        let parent = side.path().join("main.js");

        let claimed = interceptor
            .try_resolve(&ResolveRequest::new("./foo", &parent), &host)
            .unwrap();
        assert!(claimed.is_none());
    }

    #[test]
    fn test_missing_entry_is_ignored() {
        let (_temp, side) = setup();
        let interceptor = RequireInterceptor::new(side);
        let host = HostResolver::new();

        let claimed = interceptor
            .try_resolve(&ResolveRequest::new("lodash", Path::new("/x/main.js")), &host)
            .unwrap();
        assert!(claimed.is_none());
    }
}
