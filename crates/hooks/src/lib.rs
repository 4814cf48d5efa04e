// fwrelease - Firmware Release Pipeline Hooks
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

pub mod describe;
pub mod publish;
pub mod version_tag;

use std::path::{Path, PathBuf};

/// Compose the canonical binary name: `{name}_{board}_v{version}`.
///
/// Underscore-joined, literal `v` prefix. No escaping is applied; whatever the
/// config and tag query emit is used verbatim, so the caller is responsible
/// for keeping these path-safe.
pub fn binary_name(firmware_name: &str, board: &str, version: &str) -> String {
    format!("{}_{}_v{}", firmware_name, board, version)
}

/// Versioned archive directory, relative to the build's working directory.
pub fn output_dir(version: &str) -> PathBuf {
    Path::new("binaries").join(version)
}
