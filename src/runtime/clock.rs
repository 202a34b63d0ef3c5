//! Wall clock sources

use chrono::{DateTime, Utc};
use tokio::time::Instant;

/// Source of the current wall-clock time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Reads the system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Wall time derived from tokio's monotonic clock
///
/// Captures a wall-clock anchor once and adds the tokio time elapsed since.
/// Under a paused runtime this advances with virtual time.
#[derive(Debug, Clone, Copy)]
pub struct AnchoredClock {
    wall: DateTime<Utc>,
    origin: Instant,
}

impl AnchoredClock {
    pub fn new(wall: DateTime<Utc>) -> Self {
        Self {
            wall,
            origin: Instant::now(),
        }
    }
}

impl Clock for AnchoredClock {
    fn now(&self) -> DateTime<Utc> {
        let elapsed = Instant::now().duration_since(self.origin);
        // i64 nanoseconds cover ~292 years of uptime.
        self.wall + chrono::Duration::nanoseconds(elapsed.as_nanos() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn anchored_clock_follows_virtual_time() {
        let wall = DateTime::parse_from_rfc3339("2025-03-01T12:00:00Z").unwrap().with_timezone(&Utc);
        let clock = AnchoredClock::new(wall);

        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert_eq!(clock.now(), wall + chrono::Duration::milliseconds(1500));
    }
}
