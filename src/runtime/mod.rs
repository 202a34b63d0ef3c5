//! Event-loop primitives shared by hooks and the progress bar
//!
//! Scheduling runs on the tokio runtime; wall time comes from a [`Clock`] so
//! tests can follow tokio's paused virtual time.

pub mod clock;
pub mod scheduler;

use std::time::Duration;

pub use clock::{AnchoredClock, Clock, SystemClock};
pub use scheduler::{Scheduler, TimerHandle};

/// Delay between countdown ticks
pub const TICK_INTERVAL_MS: u64 = 1000;
/// Grace period between rendering "done" and notifying the server
pub const NOTIFY_DELAY_MS: u64 = 500;
/// Delay before the progress bar appears on navigation
pub const PROGRESS_SHOW_DELAY_MS: u64 = 300;

/// Tunable hook timings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    pub tick: Duration,
    pub notify_delay: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            tick: Duration::from_millis(TICK_INTERVAL_MS),
            notify_delay: Duration::from_millis(NOTIFY_DELAY_MS),
        }
    }
}
