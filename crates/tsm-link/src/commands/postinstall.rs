//! Postinstall command implementation (no subcommand given).

use std::path::{Path, PathBuf};

use tracing::debug;
use tsm_loader::Manifest;

use crate::cli::Cli;
use crate::commands::CommandContext;
use crate::error::{LinkError, Result};
use crate::linker::Published;

/// Register the package in the current directory.
pub fn run(cli: &Cli) -> Result<()> {
    let ctx = CommandContext::new(cli)?;
    execute(&ctx).map(|_| ())
}

/// Register the package in `ctx.cwd` under its manifest name.
pub fn execute(ctx: &CommandContext) -> Result<Published> {
    let name = package_name(&ctx.cwd)?;
    let entry = default_entry(&ctx.cwd);
    debug!("Registering {} from {}", name, entry.display());
    ctx.register(&name, &entry)
}

/// Read the package name from `dir/package.json`.
fn package_name(dir: &Path) -> Result<String> {
    match Manifest::read_from_dir(dir) {
        Ok(Some(manifest)) => manifest
            .package_name()
            .map(String::from)
            .ok_or(LinkError::MissingPackageName),
        Ok(None) => Err(LinkError::PackageJsonNotFound(dir.display().to_string())),
        Err(e) => Err(LinkError::InvalidPackageJson(e.to_string())),
    }
}

/// `./src` when the package has one, otherwise the package root.
fn default_entry(dir: &Path) -> PathBuf {
    if dir.join("src").exists() {
        PathBuf::from("./src")
    } else {
        PathBuf::from(".")
    }
}
