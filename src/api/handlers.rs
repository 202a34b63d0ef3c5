//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use tracing::{info, warn};

use crate::{
    dom::Element,
    error::HookError,
    state::AppState,
    topbar::PageEvent,
};
use super::responses::{ApiResponse, HealthResponse, MountRequest, StatusResponse, UpdateRequest};

type ApiResult = Result<Json<ApiResponse>, (StatusCode, Json<ApiResponse>)>;

fn status_for(error: &HookError) -> StatusCode {
    match error {
        HookError::UnknownHook(_) => StatusCode::BAD_REQUEST,
        HookError::MissingAttribute { .. } | HookError::InvalidTarget { .. } => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        HookError::UnknownElement(_) => StatusCode::NOT_FOUND,
        HookError::DuplicateElement(_) => StatusCode::CONFLICT,
    }
}

fn reject(error: HookError) -> (StatusCode, Json<ApiResponse>) {
    warn!("Request rejected: {}", error);
    (status_for(&error), Json(ApiResponse::error(error.to_string())))
}

/// Handle POST /elements - Attach an element and mount its hook
pub async fn mount_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<MountRequest>,
) -> ApiResult {
    let element = Element::new(request.id.clone(), request.hook);
    element.replace_data(request.data);

    let phase = state.mount(element).map_err(reject)?;
    info!("Element {} mounted in phase {:?}", request.id, phase);
    Ok(Json(ApiResponse::ok(
        format!("Element {} mounted", request.id),
        state.widget_status(&request.id),
    )))
}

/// Handle PUT /elements/:id - Replace an element's data
pub async fn update_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(request): Json<UpdateRequest>,
) -> ApiResult {
    state.update(&id, request.data).map_err(reject)?;
    Ok(Json(ApiResponse::ok(
        format!("Element {} updated", id),
        state.widget_status(&id),
    )))
}

/// Handle DELETE /elements/:id - Detach an element
pub async fn remove_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult {
    state.remove(&id).map_err(reject)?;
    Ok(Json(ApiResponse::ok(format!("Element {} removed", id), None)))
}

/// Handle POST /navigation/start - Live navigation began loading
pub async fn navigation_start_handler(State(state): State<Arc<AppState>>) -> StatusCode {
    state.handle_page_event(PageEvent::LoadingStart);
    StatusCode::NO_CONTENT
}

/// Handle POST /navigation/stop - Live navigation finished loading
pub async fn navigation_stop_handler(State(state): State<Arc<AppState>>) -> StatusCode {
    state.handle_page_event(PageEvent::LoadingStop);
    StatusCode::NO_CONTENT
}

/// Handle GET /status - Return current client status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        socket: state.socket().status(),
        progress_bar: state.progress_bar().state(),
        hooks: state.registry().names(),
        widgets: state.widget_statuses(),
        last_event: state.last_event(),
        uptime_seconds: state.uptime_seconds(),
    })
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
