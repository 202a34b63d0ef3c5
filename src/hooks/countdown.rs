//! Countdown hook: renders the time left until the element's target and
//! tells the server once it is reached

use std::sync::{Arc, Mutex, MutexGuard};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::json;
use tracing::{debug, trace};

use super::{Hook, HookContext, Phase};
use crate::{
    error::HookError,
    format::{format_duration, DONE},
    runtime::TimerHandle,
};

/// Data attribute holding the target timestamp
pub const TARGET_ATTR: &str = "target";
/// Event pushed once the countdown has finished
pub const COUNTDOWN_ENDED: &str = "countdown-ended";

#[derive(Debug)]
struct CountdownState {
    phase: Phase,
    target: Option<DateTime<Utc>>,
    timer: Option<TimerHandle>,
    /// Bumped on every cancel; callbacks from an older generation are stale.
    generation: u64,
}

impl CountdownState {
    fn cancel_pending(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
        self.generation += 1;
    }
}

/// Countdown bound to an element's `data-target` timestamp
#[derive(Debug, Clone)]
pub struct Countdown {
    state: Arc<Mutex<CountdownState>>,
}

impl Countdown {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(CountdownState {
                phase: Phase::Idle,
                target: None,
                timer: None,
                generation: 0,
            })),
        }
    }

    /// Target currently being counted towards
    pub fn target(&self) -> Option<DateTime<Utc>> {
        lock(&self.state).target
    }

    fn initialize(&mut self, ctx: &HookContext) -> Result<(), HookError> {
        let generation = {
            let mut state = lock(&self.state);
            state.cancel_pending();
            state.phase = Phase::Idle;
            state.target = None;

            let target = read_target(ctx)?;
            debug!("Countdown {} targeting {}", ctx.element.id(), target);
            state.target = Some(target);
            state.phase = Phase::Counting;
            state.generation
        };

        tick(&self.state, ctx, generation);
        Ok(())
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new()
    }
}

impl Hook for Countdown {
    fn mounted(&mut self, ctx: &HookContext) -> Result<(), HookError> {
        self.initialize(ctx)
    }

    fn updated(&mut self, ctx: &HookContext) -> Result<(), HookError> {
        self.initialize(ctx)
    }

    fn destroyed(&mut self, ctx: &HookContext) {
        let mut state = lock(&self.state);
        state.cancel_pending();
        trace!("Countdown {} torn down in phase {:?}", ctx.element.id(), state.phase);
    }

    fn phase(&self) -> Phase {
        lock(&self.state).phase
    }
}

fn lock(state: &Mutex<CountdownState>) -> MutexGuard<'_, CountdownState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn tick(shared: &Arc<Mutex<CountdownState>>, ctx: &HookContext, generation: u64) {
    let mut state = lock(shared);
    if state.generation != generation || state.phase != Phase::Counting {
        trace!("Skipping stale tick for {}", ctx.element.id());
        return;
    }
    let Some(target) = state.target else {
        return;
    };

    // Floor division so a fraction of a second left counts as finished.
    let remaining = (target - ctx.clock.now()).num_milliseconds().div_euclid(1000);

    if remaining <= 0 {
        ctx.element.render(DONE);
        state.phase = Phase::Finished;

        let notify_state = Arc::clone(shared);
        let notify_ctx = ctx.clone();
        state.timer = Some(ctx.scheduler.schedule(ctx.timings.notify_delay, move || {
            if lock(&notify_state).generation != generation {
                return;
            }
            notify_ctx.push_event(COUNTDOWN_ENDED, json!({}));
            debug!("sent {} event", COUNTDOWN_ENDED);
        }));
    } else {
        ctx.element.render(format_duration(remaining as u64));

        let next_state = Arc::clone(shared);
        let next_ctx = ctx.clone();
        state.timer = Some(ctx.scheduler.schedule(ctx.timings.tick, move || {
            tick(&next_state, &next_ctx, generation)
        }));
    }
}

fn read_target(ctx: &HookContext) -> Result<DateTime<Utc>, HookError> {
    let element = &ctx.element;
    let value = element
        .data(TARGET_ATTR)
        .ok_or_else(|| HookError::MissingAttribute {
            element: element.id().to_string(),
            attribute: TARGET_ATTR.to_string(),
        })?;

    parse_timestamp(&value).map_err(|reason| HookError::InvalidTarget {
        element: element.id().to_string(),
        value,
        reason,
    })
}

/// Parse an ISO 8601 timestamp
///
/// Accepts RFC 3339 with an offset, a date-time without offset, or a bare
/// date. Values without an offset are read as UTC.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, String> {
    let value = value.trim();

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Ok(timestamp.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }

    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|e| e.to_string())?;
    Ok(date.and_hms_opt(0, 0, 0).ok_or("invalid midnight")?.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dom::Element,
        runtime::{AnchoredClock, Scheduler, Timings},
        socket::{LiveSocket, PushedEvent, SocketParams},
    };
    use std::time::Duration;
    use tokio::{sync::mpsc::UnboundedReceiver, time::sleep};

    fn wall() -> DateTime<Utc> {
        parse_timestamp("2025-06-01T09:00:00Z").unwrap()
    }

    fn context(element: Element) -> (HookContext, UnboundedReceiver<PushedEvent>) {
        let (socket, rx) = LiveSocket::new(
            "/live",
            SocketParams {
                csrf_token: "token".to_string(),
            },
        );
        socket.connect();
        let ctx = HookContext {
            element,
            socket,
            scheduler: Scheduler::new(),
            clock: Arc::new(AnchoredClock::new(wall())),
            timings: Timings::default(),
        };
        (ctx, rx)
    }

    fn countdown_to(offset_ms: i64) -> (Countdown, HookContext, UnboundedReceiver<PushedEvent>) {
        let target = wall() + chrono::Duration::milliseconds(offset_ms);
        let element = Element::new("timer", "Countdown").with_data(TARGET_ATTR, target.to_rfc3339());
        let (ctx, rx) = context(element);
        (Countdown::new(), ctx, rx)
    }

    fn drain(rx: &mut UnboundedReceiver<PushedEvent>) -> Vec<PushedEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[tokio::test(start_paused = true)]
    async fn counts_down_then_notifies_once() {
        let (mut countdown, ctx, mut rx) = countdown_to(3000);

        countdown.mounted(&ctx).unwrap();
        assert_eq!(ctx.element.text(), "3s");
        assert_eq!(countdown.phase(), Phase::Counting);

        sleep(Duration::from_millis(1100)).await;
        assert_eq!(ctx.element.text(), "2s");

        sleep(Duration::from_millis(1000)).await;
        assert_eq!(ctx.element.text(), "1s");

        sleep(Duration::from_millis(1000)).await;
        assert_eq!(ctx.element.text(), "done");
        assert_eq!(countdown.phase(), Phase::Finished);
        assert!(drain(&mut rx).is_empty());

        sleep(Duration::from_millis(300)).await;
        assert!(drain(&mut rx).is_empty());

        sleep(Duration::from_millis(200)).await;
        let events = drain(&mut rx);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event, COUNTDOWN_ENDED);
        assert_eq!(events[0].element_id, "timer");
        assert_eq!(events[0].payload, json!({}));

        sleep(Duration::from_secs(10)).await;
        assert!(drain(&mut rx).is_empty());
        assert_eq!(ctx.element.render_count(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn past_target_finishes_immediately() {
        let (mut countdown, ctx, mut rx) = countdown_to(-5000);

        countdown.mounted(&ctx).unwrap();
        assert_eq!(ctx.element.text(), "done");
        assert_eq!(countdown.phase(), Phase::Finished);

        sleep(Duration::from_millis(600)).await;
        assert_eq!(drain(&mut rx).len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn sub_second_remainder_counts_as_done() {
        let (mut countdown, ctx, _rx) = countdown_to(999);
        countdown.mounted(&ctx).unwrap();
        assert_eq!(ctx.element.text(), "done");
    }

    #[tokio::test(start_paused = true)]
    async fn update_replaces_the_pending_tick() {
        let (mut countdown, ctx, mut rx) = countdown_to(10_000);
        countdown.mounted(&ctx).unwrap();

        sleep(Duration::from_millis(1100)).await;
        assert_eq!(ctx.element.text(), "9s");

        let new_target = wall() + chrono::Duration::milliseconds(5000);
        ctx.element.set_data(TARGET_ATTR, new_target.to_rfc3339());
        countdown.updated(&ctx).unwrap();
        assert_eq!(ctx.element.text(), "3s");
        assert_eq!(countdown.target(), Some(new_target));
        assert_eq!(ctx.element.render_count(), 3);

        // The tick scheduled before the update would have fired at 2000 ms.
        sleep(Duration::from_millis(950)).await;
        assert_eq!(ctx.element.render_count(), 3);

        sleep(Duration::from_millis(100)).await;
        assert_eq!(ctx.element.text(), "2s");
        assert_eq!(ctx.element.render_count(), 4);

        sleep(Duration::from_millis(2000)).await;
        assert_eq!(ctx.element.text(), "done");
        assert_eq!(ctx.element.render_count(), 6);

        sleep(Duration::from_millis(600)).await;
        assert_eq!(drain(&mut rx).len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn destroy_stops_renders_and_events() {
        let (mut countdown, ctx, mut rx) = countdown_to(3000);
        countdown.mounted(&ctx).unwrap();

        sleep(Duration::from_millis(1100)).await;
        countdown.destroyed(&ctx);
        countdown.destroyed(&ctx);
        let renders = ctx.element.render_count();

        sleep(Duration::from_secs(10)).await;
        assert_eq!(ctx.element.render_count(), renders);
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn destroy_during_grace_period_cancels_notification() {
        let (mut countdown, ctx, mut rx) = countdown_to(0);
        countdown.mounted(&ctx).unwrap();
        assert_eq!(ctx.element.text(), "done");

        sleep(Duration::from_millis(200)).await;
        countdown.destroyed(&ctx);

        sleep(Duration::from_secs(2)).await;
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn destroy_without_mount_is_harmless() {
        let (mut countdown, ctx, _rx) = countdown_to(3000);
        countdown.destroyed(&ctx);
        assert_eq!(countdown.phase(), Phase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn malformed_target_renders_nothing() {
        let element = Element::new("timer", "Countdown").with_data(TARGET_ATTR, "next tuesday");
        let (ctx, _rx) = context(element);
        let mut countdown = Countdown::new();

        let err = countdown.mounted(&ctx).unwrap_err();
        assert!(matches!(err, HookError::InvalidTarget { ref value, .. } if value == "next tuesday"));
        assert_eq!(countdown.phase(), Phase::Idle);

        sleep(Duration::from_secs(3)).await;
        assert_eq!(ctx.element.render_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn malformed_update_stops_the_running_countdown() {
        let (mut countdown, ctx, _rx) = countdown_to(10_000);
        countdown.mounted(&ctx).unwrap();

        ctx.element.set_data(TARGET_ATTR, "");
        assert!(countdown.updated(&ctx).is_err());
        assert_eq!(countdown.phase(), Phase::Idle);

        sleep(Duration::from_secs(3)).await;
        assert_eq!(ctx.element.render_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn missing_target_attribute() {
        let (ctx, _rx) = context(Element::new("bare", "Countdown"));
        let err = Countdown::new().mounted(&ctx).unwrap_err();
        assert_eq!(
            err,
            HookError::MissingAttribute {
                element: "bare".to_string(),
                attribute: TARGET_ATTR.to_string(),
            }
        );
    }

    #[test]
    fn timestamp_formats() {
        let expected = wall();
        assert_eq!(parse_timestamp("2025-06-01T09:00:00Z").unwrap(), expected);
        assert_eq!(parse_timestamp("2025-06-01T11:00:00+02:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2025-06-01T09:00:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2025-06-01T09:00:00.000").unwrap(), expected);
        assert_eq!(
            parse_timestamp("2025-06-01").unwrap(),
            expected - chrono::Duration::hours(9)
        );
        assert!(parse_timestamp("not a date").is_err());
    }
}
