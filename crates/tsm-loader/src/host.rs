// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Default module resolution (Node.js algorithm)
//!
//! This is what the interceptors fall back to when the side directory has no
//! entry, and what the require interceptor re-enters with the side-directory
//! path substituted for the specifier.

use crate::chain::{ModuleResolve, Resolution, ResolveRequest};
use crate::error::{ResolveError, Result};
use crate::manifest::Manifest;
use crate::specifier::{is_path_like, split_package_specifier};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Built-in module names
pub const BUILTIN_MODULES: &[&str] = &[
    "assert",
    "buffer",
    "child_process",
    "cluster",
    "console",
    "constants",
    "crypto",
    "dgram",
    "dns",
    "domain",
    "events",
    "fs",
    "http",
    "https",
    "module",
    "net",
    "os",
    "path",
    "perf_hooks",
    "process",
    "punycode",
    "querystring",
    "readline",
    "repl",
    "stream",
    "string_decoder",
    "sys",
    "timers",
    "tls",
    "tty",
    "url",
    "util",
    "v8",
    "vm",
    "worker_threads",
    "zlib",
];

/// Extensions tried when a path does not name a file exactly
pub const DEFAULT_EXTENSIONS: &[&str] = &[".js", ".json", ".node"];

/// A successfully located module
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedModule {
    /// Built-in module (fs, path, http, etc.)
    BuiltIn(String),
    /// Source file (resolved path)
    File(PathBuf),
    /// JSON file
    Json(PathBuf),
    /// Native addon (.node file)
    Native(PathBuf),
}

impl ResolvedModule {
    /// Categorize a file by extension
    pub fn from_path(path: PathBuf) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => ResolvedModule::Json(path),
            Some("node") => ResolvedModule::Native(path),
            _ => ResolvedModule::File(path),
        }
    }

    /// Filesystem path, for everything except built-ins
    pub fn path(&self) -> Option<&Path> {
        match self {
            ResolvedModule::BuiltIn(_) => None,
            ResolvedModule::File(p) | ResolvedModule::Json(p) | ResolvedModule::Native(p) => {
                Some(p)
            }
        }
    }
}

impl fmt::Display for ResolvedModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolvedModule::BuiltIn(name) => write!(f, "node:{}", name),
            ResolvedModule::File(p) | ResolvedModule::Json(p) | ResolvedModule::Native(p) => {
                write!(f, "{}", p.display())
            }
        }
    }
}

/// Module resolver implementing the Node.js resolution algorithm
#[derive(Debug, Clone)]
pub struct HostResolver {
    /// File extensions to try
    extensions: Vec<String>,
}

impl HostResolver {
    /// Create a resolver with the default extensions
    pub fn new() -> Self {
        Self::with_extensions(DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()))
    }

    /// Create a resolver trying `extensions` (each with its leading dot)
    pub fn with_extensions(extensions: impl IntoIterator<Item = String>) -> Self {
        Self {
            extensions: extensions.into_iter().collect(),
        }
    }

    /// Check if a module is a built-in
    pub fn is_builtin(&self, name: &str) -> bool {
        let name = name.strip_prefix("node:").unwrap_or(name);
        BUILTIN_MODULES.contains(&name)
    }

    /// Resolve a module specifier
    pub fn resolve_module(&self, request: &ResolveRequest<'_>) -> Result<ResolvedModule> {
        let specifier = request.specifier;

        if self.is_builtin(specifier) {
            let name = specifier.strip_prefix("node:").unwrap_or(specifier);
            return Ok(ResolvedModule::BuiltIn(name.to_string()));
        }

        if is_path_like(specifier) {
            let parent_dir = request.parent.parent().unwrap_or(Path::new("."));
            let path = parent_dir.join(specifier);
            return self
                .resolve_path(&path)?
                .ok_or_else(|| ResolveError::module_not_found(specifier));
        }

        self.resolve_node_modules(request)
    }

    /// Resolve a path as a file, then with extensions, then as a directory.
    ///
    /// `Ok(None)` means nothing matched.
    pub fn resolve_path(&self, path: &Path) -> Result<Option<ResolvedModule>> {
        if let Some(file) = self.resolve_as_file(path) {
            return Ok(Some(categorize_file(file)));
        }

        if path.is_dir() {
            return Ok(self.resolve_directory(path));
        }

        Ok(None)
    }

    /// Exact file, then the path with each extension appended
    fn resolve_as_file(&self, path: &Path) -> Option<PathBuf> {
        if path.is_file() {
            return Some(path.to_path_buf());
        }

        self.extensions.iter().find_map(|ext| {
            let mut with_ext = path.as_os_str().to_os_string();
            with_ext.push(ext);
            let with_ext = PathBuf::from(with_ext);
            with_ext.is_file().then_some(with_ext)
        })
    }

    /// Resolve a directory (package.json main, then index files)
    fn resolve_directory(&self, dir: &Path) -> Option<ResolvedModule> {
        match Manifest::read_from_dir(dir) {
            Ok(Some(manifest)) => {
                if let Some(main) = manifest.main_entry() {
                    let main_path = dir.join(main);
                    if let Some(file) = self.resolve_as_file(&main_path) {
                        return Some(categorize_file(file));
                    }
                    if let Some(index) = self.resolve_index(&main_path) {
                        return Some(index);
                    }
                }
            }
            Ok(None) => {}
            Err(e) => warn!("{}", e),
        }

        self.resolve_index(dir)
    }

    fn resolve_index(&self, dir: &Path) -> Option<ResolvedModule> {
        self.extensions.iter().find_map(|ext| {
            let index = dir.join(format!("index{}", ext));
            index.is_file().then(|| categorize_file(index))
        })
    }

    /// Resolve a module from node_modules
    fn resolve_node_modules(&self, request: &ResolveRequest<'_>) -> Result<ResolvedModule> {
        let specifier = request.specifier;
        let (package_name, subpath) = split_package_specifier(specifier);

        let starts: Vec<&Path> = match &request.options.paths {
            Some(paths) => paths.iter().map(PathBuf::as_path).collect(),
            None => request.parent.parent().into_iter().collect(),
        };

        for start in starts {
            // Walk up directory tree looking for node_modules
            for dir in start.ancestors() {
                let package_dir = dir.join("node_modules").join(package_name);
                if !package_dir.exists() {
                    continue;
                }

                let found = match subpath {
                    Some(sub) => self.resolve_path(&package_dir.join(sub))?,
                    None => self.resolve_directory(&package_dir),
                };
                if let Some(module) = found {
                    return Ok(module);
                }
            }
        }

        Err(ResolveError::module_not_found(specifier))
    }
}

impl Default for HostResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleResolve for HostResolver {
    fn resolve(&self, request: &ResolveRequest<'_>) -> Result<Resolution> {
        self.resolve_module(request).map(Resolution::new)
    }
}

fn categorize_file(path: PathBuf) -> ResolvedModule {
    let path = path.canonicalize().unwrap_or(path);
    ResolvedModule::from_path(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_is_builtin() {
        let resolver = HostResolver::new();
        assert!(resolver.is_builtin("fs"));
        assert!(resolver.is_builtin("path"));
        assert!(resolver.is_builtin("node:fs"));
        assert!(!resolver.is_builtin("lodash"));
    }

    #[test]
    fn test_builtin_strips_prefix() {
        let resolver = HostResolver::new();
        let parent = Path::new("/app/main.js");
        let module = resolver
            .resolve_module(&ResolveRequest::new("node:path", parent))
            .unwrap();
        assert_eq!(module, ResolvedModule::BuiltIn("path".to_string()));
        assert_eq!(module.to_string(), "node:path");
    }

    #[test]
    fn test_relative_with_extension() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().canonicalize().unwrap();
        fs::write(root.join("util.js"), "").unwrap();
        fs::write(root.join("data.json"), "{}").unwrap();

        let resolver = HostResolver::new();
        let parent = root.join("main.js");

        let util = resolver
            .resolve_module(&ResolveRequest::new("./util", &parent))
            .unwrap();
        assert_eq!(util, ResolvedModule::File(root.join("util.js")));

        let data = resolver
            .resolve_module(&ResolveRequest::new("./data", &parent))
            .unwrap();
        assert_eq!(data, ResolvedModule::Json(root.join("data.json")));
    }

    #[test]
    fn test_directory_main_then_index() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().canonicalize().unwrap();
        fs::create_dir_all(root.join("lib/dist")).unwrap();
        fs::write(root.join("lib/package.json"), r#"{"main":"dist/out"}"#).unwrap();
        fs::write(root.join("lib/dist/out.js"), "").unwrap();
        fs::create_dir_all(root.join("plain")).unwrap();
        fs::write(root.join("plain/index.js"), "").unwrap();

        let resolver = HostResolver::new();
        let parent = root.join("main.js");

        let lib = resolver
            .resolve_module(&ResolveRequest::new("./lib", &parent))
            .unwrap();
        assert_eq!(lib, ResolvedModule::File(root.join("lib/dist/out.js")));

        let plain = resolver
            .resolve_module(&ResolveRequest::new("./plain", &parent))
            .unwrap();
        assert_eq!(plain, ResolvedModule::File(root.join("plain/index.js")));
    }

    #[test]
    fn test_node_modules_walk_up() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().canonicalize().unwrap();
        fs::create_dir_all(root.join("node_modules/@scope/pkg/lib")).unwrap();
        fs::write(root.join("node_modules/@scope/pkg/index.js"), "").unwrap();
        fs::write(root.join("node_modules/@scope/pkg/lib/extra.js"), "").unwrap();
        fs::create_dir_all(root.join("src/deep")).unwrap();

        let resolver = HostResolver::new();
        let parent = root.join("src/deep/main.js");

        let pkg = resolver
            .resolve_module(&ResolveRequest::new("@scope/pkg", &parent))
            .unwrap();
        assert_eq!(
            pkg,
            ResolvedModule::File(root.join("node_modules/@scope/pkg/index.js"))
        );

        let extra = resolver
            .resolve_module(&ResolveRequest::new("@scope/pkg/lib/extra", &parent))
            .unwrap();
        assert_eq!(
            extra,
            ResolvedModule::File(root.join("node_modules/@scope/pkg/lib/extra.js"))
        );
    }

    #[test]
    fn test_missing_module() {
        let temp = TempDir::new().unwrap();
        let resolver = HostResolver::new();
        let parent = temp.path().join("main.js");

        let err = resolver
            .resolve_module(&ResolveRequest::new("./nope", &parent))
            .unwrap_err();
        assert!(matches!(err, ResolveError::ModuleNotFound(ref s) if s == "./nope"));
    }

    #[test]
    fn test_custom_extensions() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().canonicalize().unwrap();
        fs::create_dir_all(root.join("pkg")).unwrap();
        fs::write(root.join("pkg/index.ts"), "").unwrap();

        let resolver = HostResolver::with_extensions([".ts".to_string(), ".js".to_string()]);
        let module = resolver.resolve_path(&root.join("pkg")).unwrap();
        assert_eq!(module, Some(ResolvedModule::File(root.join("pkg/index.ts"))));
    }
}
