//! Hooks that record how often (and with what) the runner called them.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use ffrun::exec::{RunnerBuilder, StopMode};

/// Counts hook invocations across clones.
#[derive(Debug, Clone, Default)]
pub struct HookRecorder {
    pre: Arc<AtomicUsize>,
    post: Arc<AtomicUsize>,
    cancel: Arc<AtomicUsize>,
    pids: Arc<Mutex<Vec<u32>>>,
}

impl HookRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install counting pre-start, post-start and on-cancel hooks.
    ///
    /// The on-cancel hook still stops the process according to `stop`.
    pub fn install(&self, builder: RunnerBuilder, stop: StopMode) -> RunnerBuilder {
        let pre = Arc::clone(&self.pre);
        let post = Arc::clone(&self.post);
        let pids = Arc::clone(&self.pids);
        let cancel = Arc::clone(&self.cancel);
        let stop_hook = stop.into_hook();

        builder
            .pre_start(move |_cmd| {
                pre.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .post_start(move |process| {
                post.fetch_add(1, Ordering::SeqCst);
                if let Some(pid) = process.pid() {
                    pids.lock().unwrap().push(pid);
                }
            })
            .on_cancel(move |process| {
                cancel.fetch_add(1, Ordering::SeqCst);
                stop_hook(process);
            })
    }

    pub fn pre_calls(&self) -> usize {
        self.pre.load(Ordering::SeqCst)
    }

    pub fn post_calls(&self) -> usize {
        self.post.load(Ordering::SeqCst)
    }

    pub fn cancel_calls(&self) -> usize {
        self.cancel.load(Ordering::SeqCst)
    }

    pub fn pids(&self) -> Vec<u32> {
        self.pids.lock().unwrap().clone()
    }
}
