// src/lib.rs

//! Run an external media-processing program (by default `ffmpeg`) under a
//! small supervisor that exposes pre-start, post-start and on-cancel hooks.
//!
//! ```no_run
//! use std::time::Duration;
//! use ffrun::exec::{CancelSignal, HookedRunner, StopMode};
//!
//! # async fn demo() -> ffrun::errors::Result<()> {
//! let runner = HookedRunner::builder()
//!     .pre_start(|cmd| {
//!         cmd.env("FFREPORT", "file=report.log:level=32");
//!         Ok(())
//!     })
//!     .post_start(|p| tracing::info!(pid = ?p.pid(), "ffmpeg started"))
//!     .stop_mode(StopMode::Terminate)
//!     .build()?;
//!
//! let cancel = CancelSignal::after(Duration::from_secs(60));
//! runner.run(cancel, "-loglevel warning -y -i test.mp4 out.mp4").await
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod logging;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::cli::CliArgs;
use crate::config::{ConfigFile, load_or_default, parse_timeout};
use crate::errors::RunError;
use crate::exec::{CancelSignal, HookedRunner, Invocation};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading and CLI overrides
/// - the hooked runner (IO redirection + env via the pre-start hook)
/// - Ctrl-C and `--timeout` as the cancellation signal
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = load_or_default(args.config.as_deref()).context("loading config")?;
    let cfg = apply_overrides(cfg, &args)?;
    let runner = build_runner(&cfg)?;
    let arg = args.arg_string();

    if args.dry_run {
        let inv = runner.invocation(&arg)?;
        print_dry_run(&cfg, &inv);
        return Ok(());
    }

    let mut cancel = ctrl_c_signal();
    if let Some(timeout) = cfg.timeout {
        info!(?timeout, "run will be cancelled after timeout");
        cancel = cancel.with_deadline(timeout);
    }

    runner.run(cancel, &arg).await?;
    Ok(())
}

/// Apply CLI flags on top of the loaded config.
pub fn apply_overrides(mut cfg: ConfigFile, args: &CliArgs) -> Result<ConfigFile> {
    if let Some(binary) = &args.binary {
        cfg.binary = binary.clone();
    }
    if let Some(timeout) = &args.timeout {
        cfg.timeout = Some(parse_timeout(timeout)?);
    }
    if let Some(stop) = args.stop {
        cfg.stop = stop;
    }
    Ok(cfg)
}

/// Build the runner described by `cfg`.
///
/// Redirect targets are opened by the pre-start hook, once per run, so a
/// missing input file aborts that run before anything is started.
pub fn build_runner(cfg: &ConfigFile) -> errors::Result<HookedRunner> {
    let io = cfg.io.clone();
    let env = cfg.env.clone();

    HookedRunner::builder()
        .binary(cfg.binary.clone())
        .stop_mode(cfg.stop)
        .pre_start(move |cmd| {
            cmd.stdin(io.stdin.input()?)
                .stdout(io.stdout.output()?)
                .stderr(io.stderr.output()?)
                .envs(&env);
            Ok(())
        })
        .post_start(|process| {
            debug!(pid = ?process.pid(), "post-start hook");
        })
        .build()
}

/// Process exit code for the `ffrun` binary given the error `run` returned.
///
/// - the child's own exit code if it exited unsuccessfully by itself
/// - 130 if the run was cancelled
/// - 1 otherwise
pub fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<RunError>() {
        Some(RunError::Exited(failure)) => failure
            .code()
            .and_then(|c| u8::try_from(c).ok())
            .filter(|c| *c != 0)
            .unwrap_or(1),
        Some(RunError::Cancelled(_)) => 130,
        _ => 1,
    }
}

fn ctrl_c_signal() -> CancelSignal {
    CancelSignal::from_future(async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    })
}

fn print_dry_run(cfg: &ConfigFile, inv: &Invocation) {
    println!("ffrun dry-run");
    println!("  program: {}", inv.program.display());
    println!("  args: {:?}", inv.args);
    println!("  stop: {:?}", cfg.stop);
    if let Some(timeout) = cfg.timeout {
        println!("  timeout: {:?}", timeout);
    }
    println!("  stdin: {:?}", cfg.io.stdin);
    println!("  stdout: {:?}", cfg.io.stdout);
    println!("  stderr: {:?}", cfg.io.stderr);
    for (key, value) in cfg.env.iter() {
        println!("  env: {key}={value}");
    }

    debug!("dry-run complete (no execution)");
}
