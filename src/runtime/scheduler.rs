//! Cancellable delayed callbacks

use std::time::Duration;
use tokio::{task::AbortHandle, time::Instant};
use tracing::trace;

/// Handle to a scheduled callback
///
/// Dropping the handle does not cancel the callback; call [`TimerHandle::cancel`].
#[derive(Debug)]
pub struct TimerHandle {
    abort: AbortHandle,
}

impl TimerHandle {
    /// Cancel the callback if it has not fired yet
    pub fn cancel(&self) {
        self.abort.abort();
    }

    /// Whether the callback already ran or was cancelled
    pub fn is_finished(&self) -> bool {
        self.abort.is_finished()
    }
}

/// Schedules callbacks on the current tokio runtime
#[derive(Debug, Clone, Copy, Default)]
pub struct Scheduler;

impl Scheduler {
    pub fn new() -> Self {
        Self
    }

    /// Run `callback` once after `delay`
    ///
    /// The deadline is fixed when this is called, not when the task first runs.
    pub fn schedule<F>(&self, delay: Duration, callback: F) -> TimerHandle
    where
        F: FnOnce() + Send + 'static,
    {
        let deadline = Instant::now() + delay;
        trace!("Scheduling callback in {:?}", delay);
        let task = tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            callback();
        });
        TimerHandle {
            abort: task.abort_handle(),
        }
    }
}
