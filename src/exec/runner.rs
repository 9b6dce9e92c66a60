// src/exec/runner.rs

//! Runner abstraction.
//!
//! Code that drives a wrapped program talks to a `Runner` rather than to
//! [`HookedRunner`] directly, so tests can substitute a fake that never
//! spawns a real process.

use std::future::Future;
use std::pin::Pin;

use crate::errors::Result;

use super::cancel::CancelSignal;
use super::hooked::HookedRunner;

/// Runs the wrapped program once per call and waits for it to exit.
pub trait Runner: Send + Sync {
    /// Start the program with `arg` (whitespace-split, without the program
    /// path itself) and wait for its exit.
    ///
    /// `cancel` is used to stop the process while it is still running.
    fn run<'a>(
        &'a self,
        cancel: CancelSignal,
        arg: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;
}

impl Runner for HookedRunner {
    fn run<'a>(
        &'a self,
        cancel: CancelSignal,
        arg: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(HookedRunner::run(self, cancel, arg))
    }
}
