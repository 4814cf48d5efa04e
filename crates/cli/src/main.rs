// fwrelease - Firmware Release Pipeline Hooks
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

use fwrelease_config::{BuildEnv, ProjectConfig};
use fwrelease_hooks::describe::GitDescriber;
use fwrelease_hooks::{publish, version_tag};

const EXIT_OK: u8 = 0;
const EXIT_CONFIG_ERROR: u8 = 2;
const EXIT_HOOK_ERROR: u8 = 3;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Firmware release pipeline hooks",
    long_about = None
)]
struct Cli {
    /// Enable debug-level logging
    #[arg(short, long, global = true)]
    trace: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Derive the firmware version from git tags and inject it into the build
    /// environment (compile define + program name).
    Tag(TagArgs),

    /// Copy the linked binary into the versioned archive. Registered in place
    /// of the orchestrator's upload action.
    Publish(PublishArgs),
}

#[derive(Parser, Debug)]
struct TagArgs {
    /// Path to the project file (YAML)
    #[arg(short, long, default_value = "fwrelease.yaml")]
    project: PathBuf,

    /// Board identifier, overriding the project file
    #[arg(short, long)]
    board: Option<String>,

    /// Build-environment state file threaded between hooks
    #[arg(long, default_value = "build-env.json")]
    env_state: PathBuf,

    /// Run the describe query against this working tree instead of the cwd
    #[arg(long)]
    repo: Option<PathBuf>,

    /// Emit the outcome as a single JSON line on stdout
    #[arg(long)]
    json: bool,
}

#[derive(Parser, Debug)]
struct PublishArgs {
    /// Path to the project file (YAML)
    #[arg(short, long, default_value = "fwrelease.yaml")]
    project: PathBuf,

    /// Board identifier, overriding the project file
    #[arg(short, long)]
    board: Option<String>,

    /// Build-environment state file threaded between hooks
    #[arg(long, default_value = "build-env.json")]
    env_state: PathBuf,

    /// Emit the outcome as a single JSON line on stdout
    #[arg(long)]
    json: bool,

    /// Path to the linked artifact to archive
    source: PathBuf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .init();
    }

    match cli.command {
        Commands::Tag(args) => run_tag(args),
        Commands::Publish(args) => run_publish(args),
    }
}

fn run_tag(args: TagArgs) -> ExitCode {
    let config = match ProjectConfig::from_file(&args.project) {
        Ok(config) => config,
        Err(e) => {
            error!("{:#}", e);
            return ExitCode::from(EXIT_CONFIG_ERROR);
        }
    };

    let mut env = match BuildEnv::load_or_default(&args.env_state) {
        Ok(env) => env,
        Err(e) => {
            error!("{:#}", e);
            return ExitCode::from(EXIT_CONFIG_ERROR);
        }
    };

    let describer = match &args.repo {
        Some(dir) => GitDescriber::in_dir(dir),
        None => GitDescriber::new(),
    };

    let outcome = match version_tag::run(&config, args.board.as_deref(), &mut env, &describer) {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("{:#}", e);
            return ExitCode::from(EXIT_HOOK_ERROR);
        }
    };

    if let Err(e) = env.save(&args.env_state) {
        error!("{:#}", e);
        return ExitCode::from(EXIT_HOOK_ERROR);
    }

    if args.json {
        match serde_json::to_string(&outcome) {
            Ok(line) => println!("{}", line),
            Err(e) => {
                error!("Failed to serialize outcome: {}", e);
                return ExitCode::from(EXIT_HOOK_ERROR);
            }
        }
    }

    ExitCode::from(EXIT_OK)
}

fn run_publish(args: PublishArgs) -> ExitCode {
    let config = match ProjectConfig::from_file(&args.project) {
        Ok(config) => config,
        Err(e) => {
            error!("{:#}", e);
            return ExitCode::from(EXIT_CONFIG_ERROR);
        }
    };

    let mut env = match BuildEnv::load_or_default(&args.env_state) {
        Ok(env) => env,
        Err(e) => {
            error!("{:#}", e);
            return ExitCode::from(EXIT_CONFIG_ERROR);
        }
    };

    let work_dir = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            error!("Failed to resolve working directory: {}", e);
            return ExitCode::from(EXIT_HOOK_ERROR);
        }
    };

    let outcome = match publish::run(
        &config,
        args.board.as_deref(),
        &mut env,
        &args.source,
        &work_dir,
    ) {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("{:#}", e);
            return ExitCode::from(EXIT_HOOK_ERROR);
        }
    };

    if let Err(e) = env.save(&args.env_state) {
        error!("{:#}", e);
        return ExitCode::from(EXIT_HOOK_ERROR);
    }

    if args.json {
        match serde_json::to_string(&outcome) {
            Ok(line) => println!("{}", line),
            Err(e) => {
                error!("Failed to serialize outcome: {}", e);
                return ExitCode::from(EXIT_HOOK_ERROR);
            }
        }
    }

    ExitCode::from(EXIT_OK)
}
