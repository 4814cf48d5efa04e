// fwrelease - Firmware Release Pipeline Hooks
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use std::path::PathBuf;
use std::process::Command;
use thiserror::Error;

/// Failure of the tag-describe query. Both variants abort the build; an
/// unversioned build must not silently proceed.
#[derive(Debug, Error)]
pub enum DescribeError {
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{command}` exited with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: std::process::ExitStatus,
        stderr: String,
    },
}

/// Narrow seam over "run the version-control describe query, capture stdout,
/// fail on non-zero exit". Production uses [`GitDescriber`]; tests substitute
/// a fixed-string double.
pub trait TagDescriber {
    /// Raw stdout of the query, including any trailing newline. Callers trim
    /// surrounding whitespace.
    fn describe(&self) -> Result<String, DescribeError>;
}

/// Describes the current commit by its nearest tag via `git describe --tags`.
///
/// Blocking, no timeout. The query is local and near-instantaneous; if it
/// hangs, the build hangs.
#[derive(Debug, Default)]
pub struct GitDescriber {
    work_dir: Option<PathBuf>,
}

const GIT_DESCRIBE: &str = "git describe --tags";

impl GitDescriber {
    /// Query the working tree of the current process directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Query the working tree rooted at `dir` instead.
    pub fn in_dir<P: Into<PathBuf>>(dir: P) -> Self {
        Self {
            work_dir: Some(dir.into()),
        }
    }
}

impl TagDescriber for GitDescriber {
    fn describe(&self) -> Result<String, DescribeError> {
        let mut cmd = Command::new("git");
        cmd.args(["describe", "--tags"]);
        if let Some(dir) = &self.work_dir {
            cmd.current_dir(dir);
        }

        let output = cmd.output().map_err(|source| DescribeError::Spawn {
            command: GIT_DESCRIBE.to_string(),
            source,
        })?;

        if !output.status.success() {
            return Err(DescribeError::CommandFailed {
                command: GIT_DESCRIBE.to_string(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
