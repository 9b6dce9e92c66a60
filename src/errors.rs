// src/errors.rs

//! Crate-wide error types.
//!
//! [`RunError`] is what [`crate::exec::Runner::run`] returns. Every variant is
//! terminal for the call that produced it; nothing in this crate retries.

use std::fmt;
use std::process::ExitStatus;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RunError {
    /// The executable could not be found with the OS search rules.
    #[error("could not resolve executable '{program}': {source}")]
    Resolve {
        program: String,
        #[source]
        source: which::Error,
    },

    /// The pre-start hook refused the launch. Displays as the hook's error.
    #[error(transparent)]
    PreHook(anyhow::Error),

    #[error("failed to launch '{program}': {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to wait for process: {0}")]
    Wait(#[source] std::io::Error),

    /// The process ran and exited unsuccessfully on its own.
    #[error("process {0}")]
    Exited(ExitFailure),

    /// The process exited unsuccessfully after cancellation was requested.
    #[error("process cancelled, {0}")]
    Cancelled(ExitFailure),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl RunError {
    /// Exit status of the child, when the error comes from a finished process.
    pub fn exit_status(&self) -> Option<ExitStatus> {
        match self {
            RunError::Exited(f) | RunError::Cancelled(f) => Some(f.status),
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, RunError::Cancelled(_))
    }
}

/// Raw exit status of a process that did not exit successfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitFailure {
    pub status: ExitStatus,
}

impl ExitFailure {
    pub fn code(&self) -> Option<i32> {
        self.status.code()
    }

    /// Signal that terminated the process, if any.
    #[cfg(unix)]
    pub fn signal(&self) -> Option<i32> {
        use std::os::unix::process::ExitStatusExt;
        self.status.signal()
    }
}

impl fmt::Display for ExitFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.status)
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, RunError>;
