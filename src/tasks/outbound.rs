//! Drains the socket's outbound queue

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::{socket::PushedEvent, state::AppState};

/// Background task standing in for the wire: takes every pushed event off
/// the queue, logs it and records it as the last delivered event
///
/// Returns once every sender is gone.
pub async fn outbound_task(state: Arc<AppState>, mut outbound_rx: mpsc::UnboundedReceiver<PushedEvent>) {
    info!("Starting outbound event task for {}", state.socket().endpoint());

    while let Some(event) = outbound_rx.recv().await {
        info!(
            "Delivering '{}' from element {} with payload {}",
            event.event, event.element_id, event.payload
        );
        state.record_event(event);
    }

    debug!("Outbound queue closed, stopping outbound event task");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::Config,
        dom::{Document, Element},
        hooks::countdown::{COUNTDOWN_ENDED, TARGET_ATTR},
        runtime::AnchoredClock,
    };
    use chrono::{DateTime, Utc};
    use clap::Parser;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn records_finished_countdowns() {
        let config = Config::parse_from(["live-countdown"]);
        let document = Document::new().with_meta("csrf-token", "token");
        let wall = DateTime::parse_from_rfc3339("2025-06-01T09:00:00Z").unwrap().with_timezone(&Utc);
        let (state, rx) = AppState::new(&config, &document, Arc::new(AnchoredClock::new(wall))).unwrap();
        let state = Arc::new(state);
        state.connect();
        tokio::spawn(outbound_task(Arc::clone(&state), rx));

        let element = Element::new("launch", "Countdown")
            .with_data(TARGET_ATTR, "2025-06-01T09:00:02Z");
        state.mount(element).unwrap();
        assert!(state.last_event().is_none());

        sleep_ms(2600).await;
        let event = state.last_event().unwrap();
        assert_eq!(event.event, COUNTDOWN_ENDED);
        assert_eq!(event.element_id, "launch");
    }

    async fn sleep_ms(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
}
