//! API request and response structures

use std::collections::HashMap;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    socket::{PushedEvent, SocketStatus},
    state::WidgetStatus,
    topbar::BarState,
};

/// Body of `POST /elements`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MountRequest {
    pub id: String,
    pub hook: String,
    #[serde(default)]
    pub data: HashMap<String, String>,
}

/// Body of `PUT /elements/:id`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateRequest {
    pub data: HashMap<String, String>,
}

/// Response for element lifecycle endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub widget: Option<WidgetStatus>,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: &str, message: String, widget: Option<WidgetStatus>) -> Self {
        Self {
            status: status.to_string(),
            message,
            timestamp: Utc::now(),
            widget,
        }
    }

    pub fn ok(message: String, widget: Option<WidgetStatus>) -> Self {
        Self::new("ok", message, widget)
    }

    pub fn error(message: String) -> Self {
        Self::new("error", message, None)
    }
}

/// Full client status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub socket: SocketStatus,
    pub progress_bar: BarState,
    pub hooks: Vec<String>,
    pub widgets: Vec<WidgetStatus>,
    pub last_event: Option<PushedEvent>,
    pub uptime_seconds: u64,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
