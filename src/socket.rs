//! Live socket client configuration and event push
//!
//! The wire transport lives outside this crate. Pushed events land on an
//! unbounded queue whose receiver is handed to whoever owns the connection.

use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::{dom::Document, error::ClientError, runtime::Scheduler};

/// Name of the meta tag holding the CSRF token
pub const CSRF_META: &str = "csrf-token";

/// Connection parameters sent with the socket handshake
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocketParams {
    #[serde(rename = "_csrf_token")]
    pub csrf_token: String,
}

impl SocketParams {
    /// Build params from the page's CSRF meta tag
    pub fn from_document(document: &Document) -> Result<Self, ClientError> {
        let csrf_token = document
            .meta_content(CSRF_META)
            .ok_or(ClientError::MissingCsrfToken)?;
        Ok(Self {
            csrf_token: csrf_token.to_string(),
        })
    }
}

/// An event pushed from a hook towards the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushedEvent {
    pub element_id: String,
    pub event: String,
    pub payload: Value,
    pub sent_at: DateTime<Utc>,
}

/// Snapshot of the socket for status reporting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocketStatus {
    pub endpoint: String,
    pub connected: bool,
    pub debug: bool,
    pub latency_ms: Option<u64>,
    pub events_pushed: u64,
}

#[derive(Debug, Default)]
struct SocketState {
    connected: bool,
    debug: bool,
    latency: Option<Duration>,
    events_pushed: u64,
}

/// Client side of the live connection
#[derive(Debug, Clone)]
pub struct LiveSocket {
    endpoint: String,
    params: SocketParams,
    state: Arc<Mutex<SocketState>>,
    outbound: mpsc::UnboundedSender<PushedEvent>,
    scheduler: Scheduler,
}

impl LiveSocket {
    /// Create a disconnected socket and the receiving end of its outbound queue
    pub fn new(
        endpoint: impl Into<String>,
        params: SocketParams,
    ) -> (Self, mpsc::UnboundedReceiver<PushedEvent>) {
        let (outbound, rx) = mpsc::unbounded_channel();
        let socket = Self {
            endpoint: endpoint.into(),
            params,
            state: Arc::new(Mutex::new(SocketState::default())),
            outbound,
            scheduler: Scheduler::new(),
        };
        (socket, rx)
    }

    fn lock(&self) -> MutexGuard<'_, SocketState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn params(&self) -> &SocketParams {
        &self.params
    }

    pub fn connect(&self) {
        let mut state = self.lock();
        if !state.connected {
            state.connected = true;
            info!("Live socket connected to {}", self.endpoint);
        }
    }

    pub fn disconnect(&self) {
        let mut state = self.lock();
        if state.connected {
            state.connected = false;
            info!("Live socket disconnected from {}", self.endpoint);
        }
    }

    pub fn is_connected(&self) -> bool {
        self.lock().connected
    }

    /// Log every push at info level instead of debug
    pub fn enable_debug(&self) {
        self.lock().debug = true;
    }

    pub fn disable_debug(&self) {
        self.lock().debug = false;
    }

    /// Delay every outbound push by `latency`
    pub fn enable_latency_sim(&self, latency: Duration) {
        info!("Latency simulator enabled: {:?}", latency);
        self.lock().latency = Some(latency);
    }

    pub fn disable_latency_sim(&self) {
        info!("Latency simulator disabled");
        self.lock().latency = None;
    }

    /// Push an event to the server, best effort
    ///
    /// Returns `false` when the event was dropped because the socket is not
    /// connected or the queue is closed. Callers are not expected to react.
    pub fn push_event(&self, element_id: &str, event: &str, payload: Value) -> bool {
        let (latency, debug_enabled) = {
            let mut state = self.lock();
            if !state.connected {
                debug!("Dropping '{}' from {}: socket not connected", event, element_id);
                return false;
            }
            state.events_pushed += 1;
            (state.latency, state.debug)
        };

        if debug_enabled {
            info!("push {} -> {} {}", element_id, event, payload);
        } else {
            debug!("push {} -> {}", element_id, event);
        }

        let pushed = PushedEvent {
            element_id: element_id.to_string(),
            event: event.to_string(),
            payload,
            sent_at: Utc::now(),
        };

        match latency {
            Some(delay) => {
                let outbound = self.outbound.clone();
                self.scheduler.schedule(delay, move || {
                    if outbound.send(pushed).is_err() {
                        warn!("Outbound queue closed, delayed event lost");
                    }
                });
                true
            }
            None => match self.outbound.send(pushed) {
                Ok(()) => true,
                Err(_) => {
                    warn!("Outbound queue closed, event lost");
                    false
                }
            },
        }
    }

    /// Number of events accepted for delivery
    pub fn events_pushed(&self) -> u64 {
        self.lock().events_pushed
    }

    pub fn status(&self) -> SocketStatus {
        let state = self.lock();
        SocketStatus {
            endpoint: self.endpoint.clone(),
            connected: state.connected,
            debug: state.debug,
            latency_ms: state.latency.map(|latency| latency.as_millis() as u64),
            events_pushed: state.events_pushed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::time::sleep;

    fn socket() -> (LiveSocket, mpsc::UnboundedReceiver<PushedEvent>) {
        LiveSocket::new(
            "/live",
            SocketParams {
                csrf_token: "token".to_string(),
            },
        )
    }

    #[test]
    fn params_come_from_meta_tag() {
        let document = Document::new().with_meta(CSRF_META, "s3cret");
        let params = SocketParams::from_document(&document).unwrap();
        assert_eq!(params.csrf_token, "s3cret");
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            json!({ "_csrf_token": "s3cret" })
        );
    }

    #[test]
    fn missing_meta_tag_is_an_error() {
        assert_eq!(
            SocketParams::from_document(&Document::new()),
            Err(ClientError::MissingCsrfToken)
        );
    }

    #[tokio::test]
    async fn push_while_disconnected_is_dropped() {
        let (socket, mut rx) = socket();
        assert!(!socket.push_event("timer", "countdown-ended", json!({})));
        assert!(rx.try_recv().is_err());
        assert_eq!(socket.events_pushed(), 0);
    }

    #[tokio::test]
    async fn push_reaches_queue_once_connected() {
        let (socket, mut rx) = socket();
        socket.connect();
        assert!(socket.push_event("timer", "countdown-ended", json!({})));

        let event = rx.try_recv().unwrap();
        assert_eq!(event.element_id, "timer");
        assert_eq!(event.event, "countdown-ended");
        assert_eq!(event.payload, json!({}));
        assert_eq!(socket.status().events_pushed, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn latency_sim_delays_delivery() {
        let (socket, mut rx) = socket();
        socket.connect();
        socket.enable_latency_sim(Duration::from_millis(1000));
        socket.push_event("timer", "countdown-ended", json!({}));

        sleep(Duration::from_millis(900)).await;
        assert!(rx.try_recv().is_err());

        sleep(Duration::from_millis(200)).await;
        assert!(rx.try_recv().is_ok());

        socket.disable_latency_sim();
        socket.push_event("timer", "countdown-ended", json!({}));
        assert!(rx.try_recv().is_ok());
    }
}
