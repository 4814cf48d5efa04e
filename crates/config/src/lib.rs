// fwrelease - Firmware Release Pipeline Hooks
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The `firmware` section of the project file.
///
/// `version` is optional here because only the publish hook reads it; the tag
/// hook derives its version from source control instead. When both are in play
/// and the file's version lags the latest tag, the archive directory name will
/// not match the `FW_VERSION` compiled into the binary. Nothing reconciles the
/// two; keeping them in sync is a project-maintenance concern.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FirmwareSection {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
}

/// Project configuration the build orchestrator exposes to hooks. Read-only.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProjectConfig {
    pub firmware: FirmwareSection,
    /// Default board identifier; a per-invocation option overrides it.
    #[serde(default)]
    pub board: Option<String>,
}

impl ProjectConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read project file at {:?}", path))?;
        let config = Self::from_yaml(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("Failed to parse project file YAML")
    }

    pub fn validate(&self) -> Result<()> {
        if self.firmware.name.trim().is_empty() {
            anyhow::bail!("'firmware.name' cannot be empty");
        }
        Ok(())
    }

    /// Resolve the board identifier for this build. The per-invocation option
    /// wins over the project file, mirroring how the orchestrator scopes board
    /// options per build environment.
    pub fn resolve_board(&self, option: Option<&str>) -> Result<String> {
        option
            .map(str::to_string)
            .or_else(|| self.board.clone())
            .context("No board identifier: set 'board' in the project file or pass --board")
    }

    /// The literal `firmware.version` value, required by the publish hook.
    pub fn require_version(&self) -> Result<&str> {
        self.firmware
            .version
            .as_deref()
            .context("'firmware.version' is not set in the project file")
    }
}

/// Mutable build-environment state shared between the orchestrator and hooks.
///
/// Hooks mutate this context rather than ambient globals. It is persisted as
/// JSON so the orchestrator can thread the same state through successive build
/// steps; loading before a hook runs is what makes `append_build_flag`
/// genuinely additive across invocations.
#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct BuildEnv {
    /// Compile flags accumulated so far. Append-only from a hook's view.
    #[serde(default)]
    pub build_flags: Vec<String>,
    /// Output binary name (the orchestrator's program-name setting).
    #[serde(default)]
    pub prog_name: Option<String>,
}

impl BuildEnv {
    /// Load persisted state, or start fresh if no state file exists yet.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!("No build env state at {:?}, starting fresh", path);
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read build env state at {:?}", path))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse build env state at {:?}", path))
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create state directory {:?}", parent)
                })?;
            }
        }
        let json = serde_json::to_string_pretty(self).context("Failed to serialize build env")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write build env state to {:?}", path))
    }

    /// Additive: existing flags are never replaced or reordered.
    pub fn append_build_flag(&mut self, flag: impl Into<String>) {
        self.build_flags.push(flag.into());
    }

    pub fn replace_prog_name(&mut self, name: impl Into<String>) {
        self.prog_name = Some(name.into());
    }
}
