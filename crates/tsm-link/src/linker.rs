//! Side directory materialization.
//!
//! Publishing a package puts one symlink named after the package into the
//! side directory. Any previous entry under that name is unlinked first, so
//! a name never has more than one entry.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};
use tsm_loader::SideDirectory;

use crate::error::{LinkError, Result};

/// Outcome of a publish.
#[derive(Debug, Clone)]
pub struct Published {
    /// The link that was created
    pub link: PathBuf,
    /// What it points at
    pub target: PathBuf,
    /// Whether the side directory had to be created
    pub created_side_dir: bool,
}

/// A registered package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkedPackage {
    /// Package name (`@scope/name` for scoped packages)
    pub name: String,
    /// Path of the entry inside the side directory
    pub path: PathBuf,
    /// Link target, `None` if the entry is not a link
    pub target: Option<PathBuf>,
    /// The link target no longer exists
    pub dangling: bool,
}

/// Create the side directory if it does not exist yet.
///
/// Returns `true` when it was created.
pub fn ensure_side_dir(side_dir: &SideDirectory) -> Result<bool> {
    match fs::create_dir(side_dir.path()) {
        Ok(()) => {
            info!("Created side directory at {}", side_dir.path().display());
            Ok(true)
        }
        Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(LinkError::filesystem("create", side_dir.path(), e)),
    }
}

/// Register `package_name` in the side directory as a link to `source`.
pub fn publish(side_dir: &SideDirectory, package_name: &str, source: &Path) -> Result<Published> {
    let created_side_dir = ensure_side_dir(side_dir)?;
    let link = side_dir.candidate(package_name);

    // Scoped packages live one level down
    if let Some(parent) = link.parent() {
        if parent != side_dir.path() {
            fs::create_dir_all(parent).map_err(|e| LinkError::filesystem("create", parent, e))?;
        }
    }

    if remove_entry(&link).map_err(|e| LinkError::filesystem("remove", &link, e))? {
        debug!("Removed previous entry {}", link.display());
    }

    create_link(source, &link).map_err(|e| LinkError::filesystem("create symlink", &link, e))?;
    info!("Linked {} -> {}", link.display(), source.display());

    Ok(Published {
        link,
        target: source.to_path_buf(),
        created_side_dir,
    })
}

/// Remove `package_name` from the side directory.
///
/// Returns `false` if there was nothing to remove.
pub fn unpublish(side_dir: &SideDirectory, package_name: &str) -> Result<bool> {
    let link = side_dir.candidate(package_name);
    let removed = remove_entry(&link).map_err(|e| LinkError::filesystem("remove", &link, e))?;
    if removed {
        info!("Unlinked {}", link.display());
    }
    Ok(removed)
}

/// List registered packages, sorted by name.
pub fn entries(side_dir: &SideDirectory) -> Result<Vec<LinkedPackage>> {
    let names = side_dir
        .names()
        .map_err(|e| LinkError::filesystem("read", side_dir.path(), e))?;

    Ok(names
        .into_iter()
        .map(|name| {
            let path = side_dir.candidate(&name);
            describe(name, path)
        })
        .collect())
}

fn describe(name: String, path: PathBuf) -> LinkedPackage {
    let target = fs::read_link(&path).ok();
    let dangling = target.is_some() && !path.exists();
    LinkedPackage {
        name,
        path,
        target,
        dangling,
    }
}

/// Unlink a file or symlink, non-recursively.
///
/// A missing entry is not an error. A real directory is left alone and
/// reported as an error.
fn remove_entry(path: &Path) -> std::io::Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => remove_dir_link(path, e),
    }
}

#[cfg(unix)]
fn remove_dir_link(_path: &Path, err: std::io::Error) -> std::io::Result<bool> {
    Err(err)
}

#[cfg(windows)]
fn remove_dir_link(path: &Path, err: std::io::Error) -> std::io::Result<bool> {
    // Directory symlinks and junctions need remove_dir on Windows
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_symlink() => {
            fs::remove_dir(path)?;
            Ok(true)
        }
        _ => Err(err),
    }
}

#[cfg(unix)]
fn create_link(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn create_link(target: &Path, link: &Path) -> std::io::Result<()> {
    if target.is_dir() {
        std::os::windows::fs::symlink_dir(target, link)
    } else {
        std::os::windows::fs::symlink_file(target, link)
    }
}
