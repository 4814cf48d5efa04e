// fwrelease - Firmware Release Pipeline Hooks
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use anyhow::{Context, Result};
use fwrelease_config::{BuildEnv, ProjectConfig};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::{binary_name, output_dir};

/// Where the artifact landed, for CLI reporting.
#[derive(Debug, Clone, Serialize)]
pub struct PublishOutcome {
    pub binary_name: String,
    pub destination: PathBuf,
    pub artifact: PathBuf,
    pub sha256: String,
}

/// Copy the linked binary into the versioned archive directory.
///
/// This hook stands in for the orchestrator's upload action: instead of
/// flashing a device, the artifact is archived locally. The naming mismatch
/// (an "upload" hook that copies files) is inherited from the host build
/// tool's extension model and is intentional.
///
/// The version comes from `firmware.version` in the project file, not from
/// version control; see [`fwrelease_config::FirmwareSection`] for the
/// divergence this allows.
///
/// `work_dir` is the build's working directory; the archive lands at
/// `<work_dir>/binaries/<version>/`. The copy keeps the artifact's original
/// filename (the linker's output name), it is not renamed to the composed
/// binary name.
pub fn run(
    config: &ProjectConfig,
    board_option: Option<&str>,
    env: &mut BuildEnv,
    source: &Path,
    work_dir: &Path,
) -> Result<PublishOutcome> {
    config.validate()?;
    let firmware_name = &config.firmware.name;
    let board = config.resolve_board(board_option)?;
    let version = config.require_version()?;

    // Program name is set here too, alongside the upload substitution, so a
    // publish-only pipeline still gets the composed output name.
    let binary_name = binary_name(firmware_name, &board, version);
    env.replace_prog_name(binary_name.clone());

    let destination = work_dir.join(output_dir(version));
    info!("Copying binary to {}", destination.display());

    // Idempotent: an existing archive directory is reused, prior contents are
    // left in place (same-version rebuilds overwrite file by file).
    std::fs::create_dir_all(&destination)
        .with_context(|| format!("Failed to create archive directory {:?}", destination))?;

    let file_name = source
        .file_name()
        .with_context(|| format!("Artifact path {:?} has no file name", source))?;
    let artifact = destination.join(file_name);
    std::fs::copy(source, &artifact)
        .with_context(|| format!("Failed to copy {:?} to {:?}", source, artifact))?;

    let sha256 = file_sha256(&artifact)?;
    info!("Archived {} ({})", artifact.display(), sha256);

    Ok(PublishOutcome {
        binary_name,
        destination,
        artifact,
        sha256,
    })
}

fn file_sha256(path: &Path) -> Result<String> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read artifact {:?}", path))?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(format!("{:x}", hasher.finalize()))
}
