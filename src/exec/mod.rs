// src/exec/mod.rs

//! Process execution layer.
//!
//! This module launches the wrapped program with `tokio::process::Command`
//! and supervises it until it exits.
//!
//! - [`args`] turns the flat argument string into an [`Invocation`].
//! - [`cancel`] provides the [`CancelSignal`] a caller uses to abandon a run.
//! - [`process`] is the handle hooks use to observe or signal the child.
//! - [`hooks`] holds the hook types and the built-in [`StopMode`]s.
//! - [`hooked`] is [`HookedRunner`], the production runner, and its builder.
//! - [`runner`] provides the [`Runner`] trait so callers can swap in fakes.

pub mod args;
pub mod cancel;
pub mod hooked;
pub mod hooks;
pub mod process;
pub mod runner;

pub use args::{Invocation, split_args};
pub use cancel::{CancelSignal, Canceller, cancel_pair};
pub use hooked::{DEFAULT_BINARY, HookedRunner, RunnerBuilder};
pub use hooks::{CancelHook, Hooks, PostStartHook, PreStartHook, StopMode};
pub use process::Process;
#[cfg(unix)]
pub use process::Signal;
pub use runner::Runner;
