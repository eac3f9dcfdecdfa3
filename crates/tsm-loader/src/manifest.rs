// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Package manifest (`package.json`) fields used during resolution

use crate::MANIFEST_FILE;
use crate::error::{ResolveError, Result};
use serde::{Deserialize, Deserializer};
use std::io::ErrorKind;
use std::path::Path;

/// The subset of `package.json` this crate reads.
///
/// Fields that are empty or hold anything but a string count as absent, so
/// one odd field never hides the others.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Manifest {
    /// Package name
    #[serde(default, deserialize_with = "string_field")]
    pub name: Option<String>,

    /// Standard entry point
    #[serde(default, deserialize_with = "string_field")]
    pub main: Option<String>,

    /// Source entry point, preferred over `main`
    #[serde(rename = "ts:main", default, deserialize_with = "string_field")]
    pub ts_main: Option<String>,
}

impl Manifest {
    /// Parse a manifest from JSON text.
    pub fn parse(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }

    /// Read `package.json` from `dir`.
    ///
    /// Returns `Ok(None)` when the file does not exist. Any other read or
    /// parse failure is a [`ResolveError::ManifestParse`].
    pub fn read_from_dir(dir: &Path) -> Result<Option<Self>> {
        let content = match std::fs::read_to_string(dir.join(MANIFEST_FILE)) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ResolveError::manifest_parse(dir, e)),
        };

        Self::parse(&content)
            .map(Some)
            .map_err(|e| ResolveError::manifest_parse(dir, e))
    }

    /// The `ts:main` field, if set and non-empty
    pub fn ts_entry(&self) -> Option<&str> {
        non_empty(self.ts_main.as_deref())
    }

    /// The `main` field, if set and non-empty
    pub fn main_entry(&self) -> Option<&str> {
        non_empty(self.main.as_deref())
    }

    /// The package name, if set and non-empty
    pub fn package_name(&self) -> Option<&str> {
        non_empty(self.name.as_deref())
    }
}

/// Accept any JSON value, keeping only strings
fn string_field<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(Some(s)),
        _ => Ok(None),
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
