// src/exec/hooks.rs

//! Lifecycle hooks.
//!
//! - pre-start: sees the unstarted [`Command`]; may set IO redirection or
//!   environment, and may abort the launch by returning an error.
//! - post-start: observes the running [`Process`]; cannot abort.
//! - on-cancel: runs once if the cancellation signal fires while the process
//!   is running. The default kills the process.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::Deserialize;
use tokio::process::Command;
use tracing::warn;

use super::process::Process;

pub type PreStartHook = Arc<dyn Fn(&mut Command) -> anyhow::Result<()> + Send + Sync>;
pub type PostStartHook = Arc<dyn Fn(&Process) + Send + Sync>;
pub type CancelHook = Arc<dyn Fn(&mut Process) + Send + Sync>;

/// The set of hooks a runner was built with. Immutable once built.
#[derive(Clone)]
pub struct Hooks {
    pub(crate) pre_start: Option<PreStartHook>,
    pub(crate) post_start: Option<PostStartHook>,
    pub(crate) on_cancel: CancelHook,
}

impl Default for Hooks {
    fn default() -> Self {
        Self {
            pre_start: None,
            post_start: None,
            on_cancel: StopMode::Kill.into_hook(),
        }
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("pre_start", &self.pre_start.is_some())
            .field("post_start", &self.post_start.is_some())
            .finish_non_exhaustive()
    }
}

/// Built-in on-cancel behaviours.
///
/// - `Kill`: forceful kill (default).
/// - `Terminate`: SIGTERM, letting the program shut down cleanly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopMode {
    #[default]
    Kill,
    #[serde(alias = "term")]
    Terminate,
}

impl StopMode {
    pub fn into_hook(self) -> CancelHook {
        Arc::new(move |process: &mut Process| {
            let res = match self {
                StopMode::Kill => process.kill(),
                StopMode::Terminate => process.terminate(),
            };
            if let Err(e) = res {
                warn!(
                    pid = ?process.pid(),
                    mode = ?self,
                    error = %e,
                    "failed to stop process on cancellation"
                );
            }
        })
    }
}

impl FromStr for StopMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "kill" => Ok(StopMode::Kill),
            "terminate" | "term" => Ok(StopMode::Terminate),
            other => Err(format!(
                "invalid stop mode: {other} (expected \"kill\" or \"terminate\")"
            )),
        }
    }
}
