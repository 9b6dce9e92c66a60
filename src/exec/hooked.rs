// src/exec/hooked.rs

//! The hooked runner: resolve, pre-start, start, post-start, then race the
//! process exit against the cancellation signal.

use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;

use tokio::process::Command;
use tracing::{debug, info};

use crate::errors::{ExitFailure, Result, RunError};

use super::args::Invocation;
use super::cancel::CancelSignal;
use super::hooks::{Hooks, StopMode};
use super::process::Process;

/// Executable looked up on `PATH` when no override is given.
pub const DEFAULT_BINARY: &str = "ffmpeg";

/// Runs one process per [`HookedRunner::run`] call, giving hooks access to it
/// before start, after start, and on cancellation.
///
/// The default runner looks up `ffmpeg` on `PATH` and kills the process when
/// the cancellation signal fires.
#[derive(Debug, Clone)]
pub struct HookedRunner {
    binary: String,
    hooks: Hooks,
}

impl Default for HookedRunner {
    fn default() -> Self {
        Self {
            binary: DEFAULT_BINARY.to_string(),
            hooks: Hooks::default(),
        }
    }
}

impl HookedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> RunnerBuilder {
        RunnerBuilder::default()
    }

    /// The configured executable name or path, before resolution.
    pub fn binary(&self) -> &str {
        &self.binary
    }

    /// Resolve the executable with the OS search rules.
    pub fn resolve(&self) -> Result<PathBuf> {
        which::which(&self.binary).map_err(|source| RunError::Resolve {
            program: self.binary.clone(),
            source,
        })
    }

    /// Resolve the executable and split `arg` into the full invocation.
    pub fn invocation(&self, arg: &str) -> Result<Invocation> {
        Ok(Invocation::new(self.resolve()?, arg))
    }

    /// Run the program with `arg` and wait for it to exit.
    ///
    /// Returns `Ok(())` on a successful exit status. A process that fails
    /// after `cancel` fired is reported as [`RunError::Cancelled`]; any other
    /// unsuccessful exit is [`RunError::Exited`].
    pub async fn run(&self, cancel: CancelSignal, arg: &str) -> Result<()> {
        let inv = self.invocation(arg)?;
        let program = inv.program.display().to_string();
        debug!(program = %program, args = ?inv.args, "invocation resolved");

        let mut cmd = Command::new(&inv.program);
        cmd.args(&inv.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        if let Some(pre_start) = &self.hooks.pre_start {
            if let Err(err) = pre_start(&mut cmd) {
                debug!(program = %program, error = %err, "pre-start hook aborted launch");
                return Err(RunError::PreHook(err));
            }
        }

        let child = cmd.spawn().map_err(|source| RunError::Launch {
            program: program.clone(),
            source,
        })?;
        let mut process = Process::new(child);
        let pid = process.pid();

        info!(program = %program, pid = ?pid, "process started");

        if let Some(post_start) = &self.hooks.post_start {
            post_start(&process);
        }

        let mut cancel = cancel;

        // Either the process exits on its own, or cancellation fires first and
        // the on-cancel hook runs. In both cases the process is waited on, so
        // it is always reaped before we return.
        let (status, cancelled) = tokio::select! {
            biased;

            status = process.wait() => (status, false),

            _ = &mut cancel => {
                info!(pid = ?pid, "cancellation requested; running on-cancel hook");
                (self.hooks.on_cancel)(&mut process);
                (process.wait().await, true)
            }
        };

        let status = status.map_err(RunError::Wait)?;

        info!(
            pid = ?pid,
            exit_code = ?status.code(),
            success = status.success(),
            cancelled,
            "process exited"
        );

        if status.success() {
            Ok(())
        } else if cancelled {
            Err(RunError::Cancelled(ExitFailure { status }))
        } else {
            Err(RunError::Exited(ExitFailure { status }))
        }
    }
}

/// Builder for [`HookedRunner`]. Later calls override earlier ones.
#[derive(Debug, Clone)]
pub struct RunnerBuilder {
    binary: String,
    hooks: Hooks,
}

impl Default for RunnerBuilder {
    fn default() -> Self {
        let HookedRunner { binary, hooks } = HookedRunner::default();
        Self { binary, hooks }
    }
}

impl RunnerBuilder {
    /// Executable name or path. Bare names are looked up on `PATH`.
    pub fn binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Hook run against the unstarted command. An error stops the launch.
    pub fn pre_start<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut Command) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.hooks.pre_start = Some(Arc::new(hook));
        self
    }

    /// Hook run right after the process started. The runner goes on waiting
    /// for the exit as soon as it returns.
    pub fn post_start<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Process) + Send + Sync + 'static,
    {
        self.hooks.post_start = Some(Arc::new(hook));
        self
    }

    /// Replace the default kill-on-cancel hook, e.g. to send a signal the
    /// program handles as a normal exit.
    pub fn on_cancel<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut Process) + Send + Sync + 'static,
    {
        self.hooks.on_cancel = Arc::new(hook);
        self
    }

    /// Use one of the built-in on-cancel behaviours.
    pub fn stop_mode(mut self, mode: StopMode) -> Self {
        self.hooks.on_cancel = mode.into_hook();
        self
    }

    pub fn build(self) -> Result<HookedRunner> {
        if self.binary.trim().is_empty() {
            return Err(RunError::Config(
                "executable path must not be empty".to_string(),
            ));
        }
        Ok(HookedRunner {
            binary: self.binary,
            hooks: self.hooks,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_runner_uses_ffmpeg() {
        assert_eq!(HookedRunner::new().binary(), "ffmpeg");
        assert_eq!(HookedRunner::builder().build().unwrap().binary(), "ffmpeg");
    }

    #[test]
    fn builder_rejects_blank_binary() {
        let err = HookedRunner::builder().binary("  ").build().unwrap_err();
        assert!(matches!(err, RunError::Config(_)));
    }

    #[test]
    fn unknown_binary_fails_resolution() {
        let runner = HookedRunner::builder()
            .binary("ffrun-no-such-binary-on-path")
            .build()
            .unwrap();
        match runner.resolve() {
            Err(RunError::Resolve { program, .. }) => {
                assert_eq!(program, "ffrun-no-such-binary-on-path")
            }
            other => panic!("expected Resolve error, got {other:?}"),
        }
    }
}
