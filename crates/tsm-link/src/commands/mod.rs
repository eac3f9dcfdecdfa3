//! Command implementations for ts-modules-postinstall.

pub mod add;
pub mod list;
pub mod postinstall;
pub mod remove;

use std::path::{Path, PathBuf};

use owo_colors::OwoColorize;
use tsm_loader::config::ENV_PREFIX;
use tsm_loader::{LoaderConfig, SideDirectory, find_project_root};

use crate::cli::Cli;
use crate::error::Result;
use crate::linker::{self, Published};

/// Common context for command execution.
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// Directory the command was started in (the package being installed)
    pub cwd: PathBuf,
    /// Loader configuration for the project that owns `cwd`
    pub config: LoaderConfig,
    /// Suppress non-error output
    pub quiet: bool,
}

impl CommandContext {
    /// Create a new command context.
    pub fn new(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir()?;
        Self::for_dir(cwd, cli.root.clone(), cli.quiet)
    }

    /// Context for a package in `cwd`, with an optional explicit project
    /// root.
    pub fn for_dir(cwd: PathBuf, root: Option<PathBuf>, quiet: bool) -> Result<Self> {
        Self::with_env(cwd, root, quiet, std::env::vars())
    }

    /// Like [`CommandContext::for_dir`], reading `TS_MODULES_*` settings from
    /// `vars` instead of the process environment.
    pub fn with_env(
        cwd: PathBuf,
        root: Option<PathBuf>,
        quiet: bool,
        vars: impl IntoIterator<Item = (String, String)>,
    ) -> Result<Self> {
        let explicit = root.map(|root| cwd.join(root));
        let project_root = explicit.clone().unwrap_or_else(|| find_project_root(&cwd));

        // An explicit root already accounts for TS_MODULES_ROOT (clap reads
        // it into --root), so the loader must not apply it a second time
        let root_var = format!("{}ROOT", ENV_PREFIX);
        let vars = vars
            .into_iter()
            .filter(|(key, _)| explicit.is_none() || *key != root_var);
        let mut config = LoaderConfig::load_from(&project_root, vars)?;

        // An explicit --root wins over the rc file
        if let Some(root) = explicit {
            config.project_root = tsm_loader::path::normalize(&root);
        }

        Ok(Self { cwd, config, quiet })
    }

    /// The side directory for this project.
    pub fn side_dir(&self) -> SideDirectory {
        self.config.side_directory()
    }

    /// Resolve a path given on the command line against `cwd`.
    pub fn resolve_path(&self, relative: &Path) -> PathBuf {
        tsm_loader::path::normalize(&self.cwd.join(relative))
    }

    /// Publish `package_name` pointing at `relative_entry` and report it.
    pub fn register(&self, package_name: &str, relative_entry: &Path) -> Result<Published> {
        let target = self.resolve_path(relative_entry);
        let published = linker::publish(&self.side_dir(), package_name, &target)?;

        if !self.quiet {
            if published.created_side_dir {
                println!(
                    "{} {} folder at {}",
                    "Created".green(),
                    self.config.side_dir,
                    self.side_dir().path().display().cyan()
                );
            }
            println!(
                "{} {} {} {}",
                "Created symlink:".green(),
                published.link.display().cyan(),
                "->".dimmed(),
                published.target.display()
            );
        }

        Ok(published)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_relative_root_from_env_is_applied_once() {
        let temp = TempDir::new().unwrap();
        let project = temp.path().join("other");
        fs::create_dir_all(&project).unwrap();
        fs::write(project.join(".tsmodulesrc"), "side-dir=vendor_src\n").unwrap();

        // clap hands TS_MODULES_ROOT over as --root
        let ctx = CommandContext::with_env(
            temp.path().to_path_buf(),
            Some(PathBuf::from("other")),
            true,
            env(&[("TS_MODULES_ROOT", "other")]),
        )
        .unwrap();

        assert_eq!(ctx.config.project_root, project);
        assert_eq!(ctx.side_dir().path(), project.join("vendor_src"));
    }

    #[test]
    fn test_root_discovered_without_explicit_root() {
        let temp = TempDir::new().unwrap();
        let package = temp.path().join("app/node_modules/widget");
        fs::create_dir_all(&package).unwrap();

        let ctx = CommandContext::with_env(package.clone(), None, true, env(&[])).unwrap();
        assert_eq!(ctx.config.project_root, temp.path().join("app"));
        assert_eq!(ctx.resolve_path(Path::new("./src")), package.join("src"));
    }
}
