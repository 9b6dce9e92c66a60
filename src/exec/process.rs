// src/exec/process.rs

//! Handle to a launched process, as seen by the post-start and on-cancel hooks.

use std::io;
use std::process::ExitStatus;

use tokio::process::Child;

#[cfg(unix)]
pub use nix::sys::signal::Signal;
#[cfg(unix)]
use nix::unistd::Pid as NixPid;

/// A running child process owned by the runner for the duration of one call.
///
/// Hooks can read the PID and send signals, but only the runner waits on it,
/// so the child is always reaped by the call that started it.
#[derive(Debug)]
pub struct Process {
    child: Child,
    pid: Option<u32>,
}

impl Process {
    pub(crate) fn new(child: Child) -> Self {
        let pid = child.id();
        Self { child, pid }
    }

    /// OS process id, captured at start.
    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    /// Forcefully kill the process (SIGKILL on unix). Does not wait for it.
    pub fn kill(&mut self) -> io::Result<()> {
        self.child.start_kill()
    }

    /// Ask the process to stop.
    ///
    /// On unix this sends SIGTERM, which ffmpeg treats like a user quit and
    /// finalises its output. Elsewhere it falls back to [`Process::kill`].
    pub fn terminate(&mut self) -> io::Result<()> {
        #[cfg(unix)]
        {
            self.signal(Signal::SIGTERM)
        }
        #[cfg(not(unix))]
        {
            self.kill()
        }
    }

    /// Deliver `signal` to the process.
    ///
    /// Fails with `InvalidInput` once the process has been reaped.
    #[cfg(unix)]
    pub fn signal(&self, signal: Signal) -> io::Result<()> {
        let pid = self.child.id().ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "process has already exited")
        })?;
        let pid = i32::try_from(pid)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        nix::sys::signal::kill(NixPid::from_raw(pid), signal).map_err(io::Error::from)
    }

    pub(crate) async fn wait(&mut self) -> io::Result<ExitStatus> {
        self.child.wait().await
    }
}
