// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Entry point selection for side-directory packages

use crate::error::{ResolveError, Result};
use crate::manifest::Manifest;
use crate::path;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Index files tried when the manifest names no entry, in order
pub const INDEX_FILES: &[&str] = &["index.ts", "index.js"];

/// Pick the file a consumer should load for the package in `package_dir`.
///
/// First match wins:
///
/// 1. `ts:main` from `package.json`
/// 2. `main` from `package.json`
/// 3. `index.ts`
/// 4. `index.js`
///
/// Manifest fields are joined onto `package_dir` without checking that the
/// target exists. An unreadable or malformed manifest is logged and treated
/// as missing.
pub fn resolve_entry(package_dir: &Path) -> Result<PathBuf> {
    match Manifest::read_from_dir(package_dir) {
        Ok(Some(manifest)) => {
            if let Some(ts_main) = manifest.ts_entry() {
                debug!("Using ts:main '{}' in {}", ts_main, package_dir.display());
                return Ok(path::join(package_dir, ts_main));
            }
            if let Some(main) = manifest.main_entry() {
                debug!("Using main '{}' in {}", main, package_dir.display());
                return Ok(path::join(package_dir, main));
            }
        }
        Ok(None) => {}
        Err(e) => warn!("{}", e),
    }

    for index in INDEX_FILES {
        let candidate = package_dir.join(index);
        if candidate.exists() {
            return Ok(candidate);
        }
    }

    Err(ResolveError::EntryNotFound {
        dir: package_dir.to_path_buf(),
    })
}
