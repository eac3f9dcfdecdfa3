// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Resolution strategy chain
//!
//! A [`ResolutionChain`] is an ordered list of [`ResolveStrategy`] values in
//! front of a fallback resolver. Each strategy may claim a request; the first
//! claim wins and anything unclaimed goes to the fallback. Strategies are
//! handed the fallback so they can re-enter default resolution with a
//! rewritten request.

use crate::cjs::RequireInterceptor;
use crate::config::LoaderConfig;
use crate::error::Result;
use crate::esm::ImportInterceptor;
use crate::host::ResolvedModule;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Extra options accompanying a request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Directories to start the `node_modules` lookup from, replacing the
    /// parent's own directory
    pub paths: Option<Vec<PathBuf>>,
}

/// A single resolution request
#[derive(Debug, Clone)]
pub struct ResolveRequest<'a> {
    /// The module specifier as written
    pub specifier: &'a str,
    /// Filename of the requesting module
    pub parent: &'a Path,
    /// Whether the request is for the program's entry module
    pub is_main: bool,
    /// Extra options
    pub options: ResolveOptions,
}

impl<'a> ResolveRequest<'a> {
    /// Create a request for `specifier` made from `parent`
    pub fn new(specifier: &'a str, parent: &'a Path) -> Self {
        Self {
            specifier,
            parent,
            is_main: false,
            options: ResolveOptions::default(),
        }
    }

    /// Mark the request as the entry module
    pub fn main(mut self, is_main: bool) -> Self {
        self.is_main = is_main;
        self
    }

    /// Attach options
    pub fn with_options(mut self, options: ResolveOptions) -> Self {
        self.options = options;
        self
    }

    /// The same request with a different specifier
    pub fn with_specifier<'b>(&self, specifier: &'b str) -> ResolveRequest<'b>
    where
        'a: 'b,
    {
        ResolveRequest {
            specifier,
            parent: self.parent,
            is_main: self.is_main,
            options: self.options.clone(),
        }
    }
}

/// The outcome of resolving a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// What was found
    pub module: ResolvedModule,
    /// No further resolution stages should run
    pub short_circuit: bool,
}

impl Resolution {
    /// A resolution later stages may still refine
    pub fn new(module: ResolvedModule) -> Self {
        Self {
            module,
            short_circuit: false,
        }
    }

    /// A final resolution
    pub fn terminal(module: ResolvedModule) -> Self {
        Self {
            module,
            short_circuit: true,
        }
    }
}

/// Anything that turns a request into a resolution
pub trait ModuleResolve: Send + Sync {
    /// Resolve the request or fail
    fn resolve(&self, request: &ResolveRequest<'_>) -> Result<Resolution>;
}

/// One link in a [`ResolutionChain`]
pub trait ResolveStrategy: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &'static str;

    /// Claim the request with `Some`, or pass it on with `None`.
    ///
    /// `fallback` is the chain's default resolver.
    fn try_resolve(
        &self,
        request: &ResolveRequest<'_>,
        fallback: &dyn ModuleResolve,
    ) -> Result<Option<Resolution>>;
}

/// An ordered list of strategies in front of a fallback resolver
pub struct ResolutionChain {
    strategies: Vec<Arc<dyn ResolveStrategy>>,
    fallback: Arc<dyn ModuleResolve>,
}

impl ResolutionChain {
    /// A chain with no strategies
    pub fn new(fallback: Arc<dyn ModuleResolve>) -> Self {
        Self {
            strategies: Vec::new(),
            fallback,
        }
    }

    /// Append a strategy; earlier strategies get the first chance to claim
    pub fn with_strategy(mut self, strategy: Arc<dyn ResolveStrategy>) -> Self {
        self.strategies.push(strategy);
        self
    }

    /// The standard chain for `require()`: side directory, then host
    pub fn for_require(config: &LoaderConfig) -> Self {
        let chain = Self::new(Arc::new(config.host_resolver()))
            .with_strategy(Arc::new(RequireInterceptor::new(config.side_directory())));
        chain.announce();
        chain
    }

    /// The standard chain for `import`: side directory with entry
    /// selection, then host
    pub fn for_import(config: &LoaderConfig) -> Self {
        let chain = Self::new(Arc::new(config.host_resolver()))
            .with_strategy(Arc::new(ImportInterceptor::new(config.side_directory())));
        chain.announce();
        chain
    }

    /// Names of the installed strategies, in order
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    fn announce(&self) {
        info!(
            strategies = ?self.strategy_names(),
            "ts-modules loader activated: resolving bare module names via the side directory if available"
        );
    }
}

impl ModuleResolve for ResolutionChain {
    fn resolve(&self, request: &ResolveRequest<'_>) -> Result<Resolution> {
        for strategy in &self.strategies {
            if let Some(resolution) = strategy.try_resolve(request, self.fallback.as_ref())? {
                debug!(
                    "{} claimed '{}' -> {}",
                    strategy.name(),
                    request.specifier,
                    resolution.module
                );
                return Ok(resolution);
            }
        }

        self.fallback.resolve(request)
    }
}

impl fmt::Debug for ResolutionChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolutionChain")
            .field("strategies", &self.strategy_names())
            .finish_non_exhaustive()
    }
}
