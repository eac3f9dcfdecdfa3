// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Resolution session shared by the one-shot command and the REPL.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::debug;
use tsm_loader::{
    HookResolution, ImportInterceptor, LoaderConfig, ModuleResolve, ResolutionChain,
    ResolveContext, ResolveRequest, Result,
};

/// File name used for the importing module when none is given
pub const DEFAULT_PARENT: &str = "[tsm]";

/// Which loader path a specifier goes through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// `require()` semantics
    #[default]
    Require,
    /// `import` semantics
    Import,
}

impl Mode {
    /// Parse `cjs` / `esm` (and the obvious aliases)
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "cjs" | "require" | "commonjs" => Some(Mode::Require),
            "esm" | "import" | "module" => Some(Mode::Import),
            _ => None,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Require => write!(f, "cjs"),
            Mode::Import => write!(f, "esm"),
        }
    }
}

/// Loader state for resolving specifiers on behalf of one parent module
pub struct Session {
    config: LoaderConfig,
    require: ResolutionChain,
    import: ResolutionChain,
    mode: Mode,
    parent: PathBuf,
}

impl Session {
    /// Build both chains from `config`, importing from `parent`
    pub fn new(config: LoaderConfig, parent: PathBuf) -> Self {
        let require = ResolutionChain::for_require(&config);
        let import = ResolutionChain::for_import(&config);
        Self {
            config,
            require,
            import,
            mode: Mode::default(),
            parent,
        }
    }

    /// The loader configuration
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// How specifiers are currently resolved
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Switch between `require` and `import` resolution
    pub fn set_mode(&mut self, mode: Mode) {
        debug!("Switching to {} resolution", mode);
        self.mode = mode;
    }

    /// The module specifiers are resolved from
    pub fn parent(&self) -> &Path {
        &self.parent
    }

    /// Resolve from `parent` from now on. A directory stands for a module
    /// inside it.
    pub fn set_parent(&mut self, parent: PathBuf) {
        self.parent = if parent.is_dir() {
            parent.join(DEFAULT_PARENT)
        } else {
            parent
        };
        debug!("Resolving from {}", self.parent.display());
    }

    /// Resolve through the chain for the current mode.
    pub fn resolve(&self, specifier: &str) -> Result<String> {
        let request = ResolveRequest::new(specifier, &self.parent);
        match self.mode {
            Mode::Require => Ok(self.require.resolve(&request)?.module.to_string()),
            Mode::Import => {
                let resolution = self.import.resolve(&request)?;
                Ok(HookResolution::from_resolution(&resolution)?.url.to_string())
            }
        }
    }

    /// Resolve through the asynchronous import hook, with the host resolver
    /// as the next hook in line.
    pub async fn resolve_hook(&self, specifier: &str) -> Result<HookResolution> {
        let hook = ImportInterceptor::new(self.config.side_directory());
        let host = self.config.host_resolver();
        let context = ResolveContext::from_parent(&self.parent)?;
        let fallback_parent = self.parent.clone();

        hook.resolve(specifier, &context, |specifier, context| async move {
            let parent = context.parent_path().unwrap_or(fallback_parent);
            let request = ResolveRequest::new(&specifier, &parent);
            let resolution = host.resolve(&request)?;
            HookResolution::from_resolution(&resolution)
        })
        .await
    }

    /// Names registered in the side directory, sorted. Unreadable
    /// directories simply offer no names.
    pub fn package_names(&self) -> Vec<String> {
        self.config.side_directory().names().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn session(root: &Path) -> Session {
        let config = LoaderConfig::load_from(root, Vec::new()).unwrap();
        Session::new(config, root.join(DEFAULT_PARENT))
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!(Mode::parse("cjs"), Some(Mode::Require));
        assert_eq!(Mode::parse(" ESM "), Some(Mode::Import));
        assert_eq!(Mode::parse("amd"), None);
        assert_eq!(Mode::Import.to_string(), "esm");
    }

    #[test]
    fn test_builtin_in_both_modes() {
        let temp = TempDir::new().unwrap();
        let mut session = session(temp.path());

        assert_eq!(session.resolve("fs").unwrap(), "node:fs");
        session.set_mode(Mode::Import);
        assert_eq!(session.resolve("fs").unwrap(), "node:fs");
    }

    #[test]
    fn test_unknown_package_fails() {
        let temp = TempDir::new().unwrap();
        let session = session(temp.path());
        assert!(session.resolve("no-such-package").is_err());
    }

    #[test]
    fn test_set_parent_directory() {
        let temp = TempDir::new().unwrap();
        let mut session = session(temp.path());
        let nested = temp.path().join("nested");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("util.js"), "").unwrap();

        session.set_parent(nested.clone());
        assert_eq!(session.parent(), nested.join(DEFAULT_PARENT));
        assert!(session.resolve("./util").unwrap().ends_with("util.js"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_side_directory_packages() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("widget-src");
        fs::create_dir_all(&source).unwrap();
        fs::write(source.join("index.ts"), "export {}").unwrap();
        let side = temp.path().join("ts_modules");
        fs::create_dir_all(side.join("@acme")).unwrap();
        std::os::unix::fs::symlink(&source, side.join("widget")).unwrap();
        std::os::unix::fs::symlink(&source, side.join("@acme/gadget")).unwrap();

        let mut session = session(temp.path());
        assert_eq!(session.package_names(), vec!["@acme/gadget", "widget"]);

        session.set_mode(Mode::Import);
        assert!(session.resolve("widget").unwrap().ends_with("/widget/index.ts"));

        let hooked = session.resolve_hook("widget").await.unwrap();
        assert!(hooked.short_circuit);
        assert!(hooked.url.path().ends_with("/widget/index.ts"));

        let builtin = session.resolve_hook("path").await.unwrap();
        assert_eq!(builtin.url.as_str(), "node:path");
        assert!(!builtin.short_circuit);
    }
}
