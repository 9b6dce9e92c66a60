// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::exec::StopMode;

/// Command-line arguments for `ffrun`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "ffrun",
    version,
    about = "Run ffmpeg (or another program) once, stopping it on Ctrl-C or timeout.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Ffrun.toml` in the current working directory, if it exists.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Executable to run instead of the configured one.
    #[arg(long, value_name = "PATH")]
    pub binary: Option<String>,

    /// Cancel the run after this long (e.g. `30s`, `5m`).
    #[arg(long, value_name = "DURATION")]
    pub timeout: Option<String>,

    /// How to stop the process on cancellation (kill, terminate).
    #[arg(long, value_name = "MODE")]
    pub stop: Option<StopMode>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `FFRUN_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Resolve the executable and print the invocation, but don't run it.
    #[arg(long)]
    pub dry_run: bool,

    /// Arguments for the program, without the program path itself.
    #[arg(value_name = "ARGS", trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

impl CliArgs {
    /// The program arguments as the flat string the runner expects.
    pub fn arg_string(&self) -> String {
        self.args.join(" ")
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
