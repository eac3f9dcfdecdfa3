// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Specifier classification
//!
//! The require and import paths each carry their own "bare specifier" rule.
//! They agree on Unix but differ on Windows:
//!
//! | specifier (Windows) | [`is_bare_require`] | [`is_bare_import`] |
//! |-------------|--------------------------|--------------------|
//! | `C:\x`      | not bare                 | not bare           |
//! | `C:/x`      | not bare                 | bare               |
//! | `\\srv\x`   | not bare (UNC is absolute) | bare             |
//! | `\x`        | bare                     | bare               |
//!
//! On Unix both treat anything starting with `/` as absolute.

use std::path::Path;

/// Bare-specifier rule for `require()` resolution.
///
/// Bare means: does not start with `.` and is not an absolute path by the
/// platform's own rules.
pub fn is_bare_require(request: &str) -> bool {
    !request.starts_with('.') && !Path::new(request).is_absolute()
}

/// Bare-specifier rule for the `import` resolution hook.
///
/// Bare means: does not start with `.` or `/`, and is not a drive-letter
/// path of the form `X:\`.
pub fn is_bare_import(specifier: &str) -> bool {
    !specifier.starts_with('.') && !specifier.starts_with('/') && !has_drive_prefix(specifier)
}

/// `^[A-Za-z]:\\`
fn has_drive_prefix(specifier: &str) -> bool {
    let bytes = specifier.as_bytes();
    bytes.len() >= 3 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' && bytes[2] == b'\\'
}

/// Whether the host resolver treats the specifier as a file path rather
/// than a package name
pub fn is_path_like(specifier: &str) -> bool {
    specifier == "."
        || specifier == ".."
        || specifier.starts_with("./")
        || specifier.starts_with("../")
        || specifier.starts_with('/')
        || (cfg!(windows)
            && (specifier.starts_with(".\\")
                || specifier.starts_with("..\\")
                || Path::new(specifier).is_absolute()))
}

/// Split a package specifier into name and optional subpath.
///
/// Scoped packages keep their scope: `@babel/core/lib` is
/// `("@babel/core", Some("lib"))`.
pub fn split_package_specifier(specifier: &str) -> (&str, Option<&str>) {
    if let Some(rest) = specifier.strip_prefix('@') {
        // Scoped package: @scope/name or @scope/name/subpath
        if let Some(slash_pos) = rest.find('/') {
            let after_scope = &specifier[slash_pos + 2..];
            if let Some(subpath_pos) = after_scope.find('/') {
                let name_end = slash_pos + 2 + subpath_pos;
                return (&specifier[..name_end], Some(&specifier[name_end + 1..]));
            }
        }
        (specifier, None)
    } else if let Some(slash_pos) = specifier.find('/') {
        (&specifier[..slash_pos], Some(&specifier[slash_pos + 1..]))
    } else {
        (specifier, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_require() {
        assert!(is_bare_require("widget"));
        assert!(is_bare_require("@scope/widget/sub"));
        assert!(!is_bare_require("./widget"));
        assert!(!is_bare_require("../widget"));
        assert!(!is_bare_require(".hidden"));
        #[cfg(unix)]
        assert!(!is_bare_require("/abs/widget"));
    }

    #[test]
    fn test_bare_import() {
        assert!(is_bare_import("widget"));
        assert!(is_bare_import("node:fs"));
        assert!(!is_bare_import("./widget"));
        assert!(!is_bare_import("/abs/widget"));
        assert!(!is_bare_import("C:\\src\\widget"));
        // Forward-slash drive paths slip through the import rule
        assert!(is_bare_import("C:/src/widget"));
    }

    #[cfg(unix)]
    #[test]
    fn test_rules_agree_on_unix() {
        for s in ["widget", "./x", "../x", "/x", "@a/b", "C:/x", ".x"] {
            assert_eq!(is_bare_require(s), is_bare_import(s), "{s}");
        }
    }

    #[test]
    fn test_path_like() {
        assert!(is_path_like("./a"));
        assert!(is_path_like("../a"));
        assert!(is_path_like("/a"));
        assert!(is_path_like(".."));
        assert!(!is_path_like("lodash"));
        assert!(!is_path_like(".bin"));
    }

    #[test]
    fn test_split_package_specifier() {
        assert_eq!(split_package_specifier("lodash"), ("lodash", None));
        assert_eq!(split_package_specifier("lodash/get"), ("lodash", Some("get")));
        assert_eq!(split_package_specifier("@types/node"), ("@types/node", None));
        assert_eq!(
            split_package_specifier("@babel/core/lib/index"),
            ("@babel/core", Some("lib/index"))
        );
    }
}
