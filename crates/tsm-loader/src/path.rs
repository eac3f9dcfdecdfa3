// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Lexical path helpers (`path.join` / `path.normalize` semantics)

use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

/// Normalize a path without touching the filesystem.
///
/// `.` segments are dropped and `..` pops the previous segment. A `..` at the
/// root of an absolute path is discarded; in a relative path it is kept.
pub fn normalize(path: &Path) -> PathBuf {
    let mut prefix = PathBuf::new();
    let mut components: Vec<&OsStr> = Vec::new();
    let mut is_absolute = false;

    for component in path.components() {
        match component {
            Component::Prefix(p) => prefix.push(p.as_os_str()),
            Component::RootDir => {
                prefix.push(Component::RootDir.as_os_str());
                is_absolute = true;
            }
            Component::CurDir => continue,
            Component::ParentDir => {
                if components.last().is_some_and(|c| *c != OsStr::new("..")) {
                    components.pop();
                } else if !is_absolute {
                    components.push(OsStr::new(".."));
                }
            }
            Component::Normal(c) => components.push(c),
        }
    }

    let mut result = prefix;
    for c in components {
        result.push(c);
    }

    if result.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        result
    }
}

/// Join `tail` onto `base` and normalize the result, like `path.join`.
///
/// Unlike [`Path::join`], an absolute `tail` does not replace `base`.
pub fn join(base: &Path, tail: &str) -> PathBuf {
    let tail = tail.trim_start_matches(['/', '\\']);
    normalize(&base.join(tail))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_drops_dots() {
        assert_eq!(normalize(Path::new("/a/./b/../c")), PathBuf::from("/a/c"));
        assert_eq!(normalize(Path::new("a/b/../../..")), PathBuf::from(".."));
        assert_eq!(normalize(Path::new("/../x")), PathBuf::from("/x"));
        assert_eq!(normalize(Path::new("./")), PathBuf::from("."));
    }

    #[test]
    fn test_join_keeps_base() {
        assert_eq!(
            join(Path::new("/pkg"), "lib/entry.ts"),
            PathBuf::from("/pkg/lib/entry.ts")
        );
        assert_eq!(
            join(Path::new("/pkg"), "./dist/../src/index.ts"),
            PathBuf::from("/pkg/src/index.ts")
        );
        assert_eq!(join(Path::new("/pkg"), "/abs"), PathBuf::from("/pkg/abs"));
    }
}
