// src/exec/cancel.rs

//! Cancellation signal handed to [`crate::exec::Runner::run`].
//!
//! A `CancelSignal` is a one-shot future owned by a single `run` call. When it
//! completes, the runner invokes its on-cancel hook; it never kills the
//! process by itself. Deadlines are expressed through the signal too: the
//! runner has no timeout of its own.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use tokio::sync::oneshot;

/// A future that completes when the current call should be abandoned.
pub struct CancelSignal {
    fut: Pin<Box<dyn Future<Output = ()> + Send>>,
}

impl CancelSignal {
    /// A signal that never fires.
    pub fn never() -> Self {
        Self::from_future(std::future::pending())
    }

    /// Fire when `fut` completes.
    pub fn from_future<F>(fut: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        Self { fut: Box::pin(fut) }
    }

    /// Fire once `after` has elapsed, measured from now.
    ///
    /// A deadline too far out to represent never fires.
    pub fn after(after: Duration) -> Self {
        match tokio::time::Instant::now().checked_add(after) {
            Some(deadline) => {
                Self::from_future(async move { tokio::time::sleep_until(deadline).await })
            }
            None => Self::never(),
        }
    }

    /// Fire when either `self` or `other` fires.
    pub fn or(self, other: CancelSignal) -> Self {
        Self::from_future(async move {
            tokio::select! {
                _ = self => {}
                _ = other => {}
            }
        })
    }

    /// Shorthand for `self.or(CancelSignal::after(timeout))`.
    pub fn with_deadline(self, timeout: Duration) -> Self {
        self.or(Self::after(timeout))
    }
}

impl Default for CancelSignal {
    fn default() -> Self {
        Self::never()
    }
}

impl Future for CancelSignal {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        self.fut.as_mut().poll(cx)
    }
}

impl fmt::Debug for CancelSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancelSignal").finish_non_exhaustive()
    }
}

/// A dropped sender means "no cancellation will ever come", not "cancel now".
impl From<oneshot::Receiver<()>> for CancelSignal {
    fn from(rx: oneshot::Receiver<()>) -> Self {
        Self::from_future(async move {
            if rx.await.is_err() {
                std::future::pending::<()>().await;
            }
        })
    }
}

/// Explicit trigger for a [`CancelSignal`] created by [`cancel_pair`].
#[derive(Debug)]
pub struct Canceller {
    tx: oneshot::Sender<()>,
}

impl Canceller {
    /// Fire the paired signal. Returns `false` if the signal was already dropped,
    /// i.e. the run it belonged to has finished.
    pub fn cancel(self) -> bool {
        self.tx.send(()).is_ok()
    }
}

/// Create a connected `(Canceller, CancelSignal)` pair.
pub fn cancel_pair() -> (Canceller, CancelSignal) {
    let (tx, rx) = oneshot::channel();
    (Canceller { tx }, CancelSignal::from(rx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::timeout;

    async fn fires(signal: CancelSignal) -> bool {
        timeout(Duration::from_millis(50), signal).await.is_ok()
    }

    #[tokio::test]
    async fn never_does_not_fire() {
        assert!(!fires(CancelSignal::never()).await);
    }

    #[tokio::test]
    async fn canceller_fires_signal() {
        let (canceller, signal) = cancel_pair();
        assert!(canceller.cancel());
        assert!(fires(signal).await);
    }

    #[tokio::test]
    async fn dropped_canceller_does_not_fire() {
        let (canceller, signal) = cancel_pair();
        drop(canceller);
        assert!(!fires(signal).await);
    }

    #[tokio::test]
    async fn cancel_after_signal_dropped_reports_false() {
        let (canceller, signal) = cancel_pair();
        drop(signal);
        assert!(!canceller.cancel());
    }

    #[tokio::test]
    async fn deadline_fires_after_duration() {
        let start = tokio::time::Instant::now();
        let signal = CancelSignal::never().with_deadline(Duration::from_millis(20));
        timeout(Duration::from_secs(2), signal)
            .await
            .expect("deadline should fire");
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[tokio::test]
    async fn unrepresentable_deadline_never_fires() {
        assert!(!fires(CancelSignal::after(Duration::MAX)).await);
        assert!(!fires(CancelSignal::never().with_deadline(Duration::MAX)).await);
    }

    #[tokio::test]
    async fn or_fires_when_either_side_fires() {
        let (canceller, signal) = cancel_pair();
        let combined = CancelSignal::never().or(signal);
        canceller.cancel();
        assert!(fires(combined).await);
    }
}
