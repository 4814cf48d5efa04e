// fwrelease - Firmware Release Pipeline Hooks
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use anyhow::{Context, Result};
use fwrelease_config::{BuildEnv, ProjectConfig};
use serde::Serialize;
use tracing::info;

use crate::binary_name;
use crate::describe::TagDescriber;

/// What the tag hook resolved, for CLI reporting. Nothing downstream consumes
/// this; the hook's real effect is the [`BuildEnv`] mutation.
#[derive(Debug, Clone, Serialize)]
pub struct TagOutcome {
    pub firmware_name: String,
    pub board: String,
    pub version: String,
    pub binary_name: String,
    pub build_flag: String,
}

/// Derive the firmware version from the tag-describe query and propagate it
/// into the build environment.
///
/// Appends `-DFW_VERSION=<version>` to the flag list (additive, existing
/// flags kept) and replaces the program name with the composed binary name.
/// A failing describe query propagates and aborts the build.
pub fn run(
    config: &ProjectConfig,
    board_option: Option<&str>,
    env: &mut BuildEnv,
    describer: &dyn TagDescriber,
) -> Result<TagOutcome> {
    config.validate()?;
    let firmware_name = config.firmware.name.clone();
    let board = config.resolve_board(board_option)?;

    // Used verbatim apart from trimming surrounding whitespace. May carry a
    // commit-distance/hash suffix when the tag is not exact.
    let raw = describer
        .describe()
        .context("version describe query failed")?;
    let version = raw.trim().to_string();

    info!("Firmware Name: {}", firmware_name);
    info!("Firmware Version: {}", version);

    let build_flag = format!("-DFW_VERSION={}", version);
    env.append_build_flag(build_flag.clone());

    let binary_name = binary_name(&firmware_name, &board, &version);
    env.replace_prog_name(binary_name.clone());

    Ok(TagOutcome {
        firmware_name,
        board,
        version,
        binary_name,
        build_flag,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::describe::DescribeError;

    struct FixedDescriber(&'static str);

    impl TagDescriber for FixedDescriber {
        fn describe(&self) -> Result<String, DescribeError> {
            Ok(self.0.to_string())
        }
    }

    struct FailingDescriber;

    impl TagDescriber for FailingDescriber {
        fn describe(&self) -> Result<String, DescribeError> {
            Err(DescribeError::Spawn {
                command: "git describe --tags".to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no git"),
            })
        }
    }

    fn config(yaml: &str) -> ProjectConfig {
        ProjectConfig::from_yaml(yaml).unwrap()
    }

    #[test]
    fn test_trailing_newline_is_stripped() {
        let config = config("firmware:\n  name: \"fw\"\nboard: \"uno\"\n");
        let mut env = BuildEnv::default();
        let outcome = run(&config, None, &mut env, &FixedDescriber("v2.0.0\n")).unwrap();
        assert_eq!(outcome.version, "v2.0.0");
    }

    #[test]
    fn test_build_flag_is_exact_and_additive() {
        let config = config("firmware:\n  name: \"fw\"\nboard: \"uno\"\n");
        let mut env = BuildEnv::default();
        env.append_build_flag("-DDEBUG=1");

        run(&config, None, &mut env, &FixedDescriber("2.0.0\n")).unwrap();
        assert_eq!(env.build_flags, vec!["-DDEBUG=1", "-DFW_VERSION=2.0.0"]);
    }

    #[test]
    fn test_prog_name_is_composed_binary_name() {
        let config = config("firmware:\n  name: \"foo\"\n");
        let mut env = BuildEnv::default();
        let outcome = run(&config, Some("uno"), &mut env, &FixedDescriber("1.2.3")).unwrap();
        assert_eq!(outcome.binary_name, "foo_uno_v1.2.3");
        assert_eq!(env.prog_name.as_deref(), Some("foo_uno_v1.2.3"));
    }

    #[test]
    fn test_describe_failure_propagates_and_env_is_untouched() {
        let config = config("firmware:\n  name: \"fw\"\nboard: \"uno\"\n");
        let mut env = BuildEnv::default();
        env.append_build_flag("-DDEBUG=1");

        let err = run(&config, None, &mut env, &FailingDescriber).unwrap_err();
        assert!(err.to_string().contains("version describe query failed"));
        assert_eq!(env.build_flags, vec!["-DDEBUG=1"]);
        assert_eq!(env.prog_name, None);
    }

    #[test]
    fn test_describe_suffix_passes_through() {
        // Not an exact tag: git appends distance and abbreviated hash. No
        // validation, the suffix lands in both the flag and the name.
        let config = config("firmware:\n  name: \"fw\"\nboard: \"uno\"\n");
        let mut env = BuildEnv::default();
        let outcome = run(&config, None, &mut env, &FixedDescriber("v1.4-12-g2414721\n")).unwrap();
        assert_eq!(outcome.version, "v1.4-12-g2414721");
        assert_eq!(env.build_flags, vec!["-DFW_VERSION=v1.4-12-g2414721"]);
        assert_eq!(env.prog_name.as_deref(), Some("fw_uno_vv1.4-12-g2414721"));
    }
}
