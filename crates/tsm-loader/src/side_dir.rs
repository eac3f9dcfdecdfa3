// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! The `ts_modules` side directory
//!
//! Each child of the side directory is named after a package and links to
//! that package's source somewhere else on disk. Lookups follow the link, so
//! a dangling link reads as [`SideEntry::Absent`].

use crate::SIDE_DIR_NAME;
use crate::path;
use std::ffi::OsStr;
use std::fs::Metadata;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// What a side-directory candidate points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SideEntry {
    /// A regular file (after following links)
    File(PathBuf),
    /// A directory (after following links)
    Directory(PathBuf),
    /// Nothing usable at that path
    Absent,
}

impl SideEntry {
    /// Path of the entry, if present
    pub fn path(&self) -> Option<&Path> {
        match self {
            SideEntry::File(p) | SideEntry::Directory(p) => Some(p),
            SideEntry::Absent => None,
        }
    }

    fn from_metadata(candidate: PathBuf, result: io::Result<Metadata>) -> Self {
        match result {
            Ok(meta) if meta.is_dir() => SideEntry::Directory(candidate),
            Ok(_) => SideEntry::File(candidate),
            Err(e) => {
                if e.kind() != io::ErrorKind::NotFound {
                    debug!("Treating {} as absent: {}", candidate.display(), e);
                }
                SideEntry::Absent
            }
        }
    }
}

/// A side directory rooted at a fixed path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SideDirectory {
    root: PathBuf,
}

impl SideDirectory {
    /// Use `root` as the side directory itself
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The side directory named `name` under `project_root`
    pub fn in_project(project_root: &Path, name: &str) -> Self {
        Self::new(project_root.join(name))
    }

    /// The default `ts_modules` directory under `project_root`
    pub fn for_project(project_root: &Path) -> Self {
        Self::in_project(project_root, SIDE_DIR_NAME)
    }

    /// Path of the side directory
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Where a specifier (or package name) would live in the side directory.
    ///
    /// The join is lexical, so `a/../b` lands on `<root>/b`.
    pub fn candidate(&self, specifier: &str) -> PathBuf {
        path::join(&self.root, specifier)
    }

    /// Look a specifier up, following links
    pub fn lookup(&self, specifier: &str) -> SideEntry {
        let candidate = self.candidate(specifier);
        let meta = std::fs::metadata(&candidate);
        SideEntry::from_metadata(candidate, meta)
    }

    /// Look a specifier up without blocking the async runtime
    pub async fn lookup_async(&self, specifier: &str) -> SideEntry {
        let candidate = self.candidate(specifier);
        let meta = tokio::fs::metadata(&candidate).await;
        SideEntry::from_metadata(candidate, meta)
    }

    /// Package names registered in the side directory, sorted.
    ///
    /// Entries under an `@scope` directory are reported as `@scope/name`.
    /// A missing side directory has no names.
    pub fn names(&self) -> io::Result<Vec<String>> {
        let read = match std::fs::read_dir(&self.root) {
            Ok(read) => read,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let mut names = Vec::new();
        for entry in read {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().to_string();
            if name.starts_with('@') && entry.file_type()?.is_dir() {
                for scoped in std::fs::read_dir(entry.path())? {
                    let scoped = scoped?;
                    names.push(format!("{}/{}", name, scoped.file_name().to_string_lossy()));
                }
            } else {
                names.push(name);
            }
        }

        names.sort();
        Ok(names)
    }
}

/// Find the project root that owns `cwd`.
///
/// Inside an installed package (`<root>/node_modules/pkg`) the project root
/// is the parent of the last `node_modules` component, or `/` when that
/// parent is empty. Anywhere else it is `cwd` itself.
pub fn find_project_root(cwd: &Path) -> PathBuf {
    let components: Vec<_> = cwd.components().collect();
    let position = components
        .iter()
        .rposition(|c| c.as_os_str() == OsStr::new("node_modules"));

    match position {
        Some(index) => {
            let root: PathBuf = components[..index].iter().collect();
            if root.as_os_str().is_empty() {
                PathBuf::from(std::path::MAIN_SEPARATOR_STR)
            } else {
                root
            }
        }
        None => cwd.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_candidate_is_lexical() {
        let side = SideDirectory::new("/project/ts_modules");
        assert_eq!(
            side.candidate("widget"),
            PathBuf::from("/project/ts_modules/widget")
        );
        assert_eq!(
            side.candidate("@scope/widget/lib"),
            PathBuf::from("/project/ts_modules/@scope/widget/lib")
        );
        assert_eq!(
            side.candidate("a/../widget"),
            PathBuf::from("/project/ts_modules/widget")
        );
    }

    #[test]
    fn test_lookup_kinds() {
        let temp = TempDir::new().unwrap();
        let side = SideDirectory::for_project(temp.path());
        std::fs::create_dir_all(side.path().join("pkg-dir")).unwrap();
        std::fs::write(side.path().join("pkg-file.ts"), "export {}").unwrap();

        assert!(matches!(side.lookup("pkg-dir"), SideEntry::Directory(_)));
        assert!(matches!(side.lookup("pkg-file.ts"), SideEntry::File(_)));
        assert_eq!(side.lookup("missing"), SideEntry::Absent);
    }

    #[test]
    fn test_names_include_scoped_packages() {
        let temp = TempDir::new().unwrap();
        let side = SideDirectory::for_project(temp.path());
        assert!(side.names().unwrap().is_empty());

        std::fs::create_dir_all(side.path().join("@acme/gadget")).unwrap();
        std::fs::create_dir_all(side.path().join("widget")).unwrap();
        std::fs::write(side.path().join("single.ts"), "").unwrap();

        assert_eq!(
            side.names().unwrap(),
            vec!["@acme/gadget", "single.ts", "widget"]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_link_is_absent() {
        let temp = TempDir::new().unwrap();
        let side = SideDirectory::for_project(temp.path());
        std::fs::create_dir_all(side.path()).unwrap();
        std::os::unix::fs::symlink(temp.path().join("gone"), side.path().join("ghost")).unwrap();

        assert_eq!(side.lookup("ghost"), SideEntry::Absent);
    }

    #[test]
    fn test_find_project_root() {
        assert_eq!(
            find_project_root(Path::new("/work/app/node_modules/widget")),
            PathBuf::from("/work/app")
        );
        assert_eq!(
            find_project_root(Path::new("/work/app/node_modules/a/node_modules/b")),
            PathBuf::from("/work/app/node_modules/a")
        );
        assert_eq!(
            find_project_root(Path::new("/work/app")),
            PathBuf::from("/work/app")
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_find_project_root_at_filesystem_root() {
        assert_eq!(
            find_project_root(Path::new("/node_modules/widget")),
            PathBuf::from("/")
        );
    }
}
