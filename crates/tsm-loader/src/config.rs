// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Loader configuration
//!
//! Values are layered: built-in defaults, then `<root>/.tsmodulesrc`
//! (`key=value` lines), then `TS_MODULES_*` environment variables.

use crate::SIDE_DIR_NAME;
use crate::error::{ResolveError, Result};
use crate::host::{DEFAULT_EXTENSIONS, HostResolver};
use crate::side_dir::SideDirectory;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Project-level config file name
pub const CONFIG_FILE: &str = ".tsmodulesrc";

/// Prefix for environment overrides
pub const ENV_PREFIX: &str = "TS_MODULES_";

/// Configuration for the loader.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Project root holding the side directory
    pub project_root: PathBuf,

    /// Side directory name under the project root
    pub side_dir: String,

    /// Extensions the host resolver tries
    pub extensions: Vec<String>,

    /// Log level
    pub loglevel: String,

    /// Custom config values
    pub extra: BTreeMap<String, String>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            project_root: PathBuf::from("."),
            side_dir: SIDE_DIR_NAME.to_string(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            loglevel: "warn".to_string(),
            extra: BTreeMap::new(),
        }
    }
}

impl LoaderConfig {
    /// Load configuration for the current directory.
    pub fn load() -> Result<Self> {
        let cwd = std::env::current_dir()?;
        Self::load_from(&cwd, std::env::vars())
    }

    /// Load configuration for `project_root` with the given environment.
    ///
    /// A `root` override from the environment moves the project root, and
    /// the config file is then read from the new root.
    pub fn load_from(
        project_root: &Path,
        vars: impl IntoIterator<Item = (String, String)>,
    ) -> Result<Self> {
        let env: Vec<(String, String)> = vars
            .into_iter()
            .filter_map(|(key, value)| {
                key.strip_prefix(ENV_PREFIX)
                    .map(|k| (k.to_lowercase().replace('_', "-"), value))
            })
            .collect();

        let mut config = LoaderConfig {
            project_root: project_root.to_path_buf(),
            ..LoaderConfig::default()
        };
        if let Some((_, root)) = env.iter().find(|(k, _)| k == "root") {
            config.set("root", root);
            config.anchor_root(project_root);
        }

        let rc_path = config.project_root.join(CONFIG_FILE);
        match std::fs::read_to_string(&rc_path) {
            Ok(content) => config.merge_from_str(&content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(ResolveError::Config(format!(
                    "cannot read {}: {}",
                    rc_path.display(),
                    e
                )));
            }
        }

        for (key, value) in &env {
            config.set(key, value);
        }

        config.anchor_root(project_root);
        Ok(config)
    }

    /// Resolve a relative project root against `base`
    fn anchor_root(&mut self, base: &Path) {
        if self.project_root.is_relative() {
            self.project_root = base.join(&self.project_root);
        }
        self.project_root = crate::path::normalize(&self.project_root);
    }

    /// Merge `key=value` lines.
    pub fn merge_from_str(&mut self, content: &str) {
        for line in content.lines() {
            let line = line.trim();

            // Skip comments and empty lines
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            if let Some((key, value)) = line.split_once('=') {
                self.set(key.trim(), value.trim());
            }
        }
    }

    /// Set a configuration value.
    pub fn set(&mut self, key: &str, value: &str) {
        match key {
            "root" => self.project_root = PathBuf::from(value),
            "side-dir" => self.side_dir = value.to_string(),
            "extensions" => {
                self.extensions = value
                    .split(',')
                    .map(str::trim)
                    .filter(|e| !e.is_empty())
                    .map(|e| {
                        if e.starts_with('.') {
                            e.to_string()
                        } else {
                            format!(".{}", e)
                        }
                    })
                    .collect();
            }
            "loglevel" => self.loglevel = value.to_string(),
            _ => {
                self.extra.insert(key.to_string(), value.to_string());
            }
        }
    }

    /// Get a configuration value.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "root" => Some(self.project_root.display().to_string()),
            "side-dir" => Some(self.side_dir.clone()),
            "extensions" => Some(self.extensions.join(",")),
            "loglevel" => Some(self.loglevel.clone()),
            _ => self.extra.get(key).cloned(),
        }
    }

    /// The configured side directory
    pub fn side_directory(&self) -> SideDirectory {
        SideDirectory::in_project(&self.project_root, &self.side_dir)
    }

    /// A host resolver using the configured extensions
    pub fn host_resolver(&self) -> HostResolver {
        HostResolver::with_extensions(self.extensions.iter().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn no_env() -> Vec<(String, String)> {
        Vec::new()
    }

    #[test]
    fn test_defaults() {
        let temp = TempDir::new().unwrap();
        let config = LoaderConfig::load_from(temp.path(), no_env()).unwrap();
        assert_eq!(config.project_root, temp.path());
        assert_eq!(config.side_dir, "ts_modules");
        assert_eq!(config.extensions, vec![".js", ".json", ".node"]);
        assert_eq!(
            config.side_directory().path(),
            temp.path().join("ts_modules")
        );
    }

    #[test]
    fn test_rc_file_then_env() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join(CONFIG_FILE),
            "# project settings\nside-dir = src_modules\nextensions = ts, .js\nloglevel=info\n",
        )
        .unwrap();

        let env = vec![
            ("TS_MODULES_LOGLEVEL".to_string(), "debug".to_string()),
            ("UNRELATED".to_string(), "x".to_string()),
        ];
        let config = LoaderConfig::load_from(temp.path(), env).unwrap();

        assert_eq!(config.side_dir, "src_modules");
        assert_eq!(config.extensions, vec![".ts", ".js"]);
        assert_eq!(config.loglevel, "debug");
        assert!(config.extra.is_empty());
    }

    #[test]
    fn test_env_root_moves_project() {
        let temp = TempDir::new().unwrap();
        let other = temp.path().join("other");
        std::fs::create_dir_all(&other).unwrap();
        std::fs::write(other.join(CONFIG_FILE), "side-dir=vendor_src").unwrap();

        let env = vec![("TS_MODULES_ROOT".to_string(), "other".to_string())];
        let config = LoaderConfig::load_from(temp.path(), env).unwrap();

        assert_eq!(config.project_root, other);
        assert_eq!(config.side_dir, "vendor_src");
    }

    #[test]
    fn test_get_set_roundtrip_and_extra() {
        let mut config = LoaderConfig::default();
        config.set("side-dir", "x_modules");
        config.set("custom-key", "value");
        assert_eq!(config.get("side-dir").as_deref(), Some("x_modules"));
        assert_eq!(config.get("custom-key").as_deref(), Some("value"));
        assert_eq!(config.get("missing"), None);
    }
}
