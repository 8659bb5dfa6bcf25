//! REST API handlers

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info};

use crate::state::{AppState, ProvisionError};

/// API error response
#[derive(Serialize)]
struct ApiError {
    error: String,
}

impl ApiError {
    fn new(msg: impl Into<String>) -> Self {
        Self { error: msg.into() }
    }
}

impl IntoResponse for ProvisionError {
    fn into_response(self) -> Response {
        match self {
            ProvisionError::InvalidMac(e) => {
                (StatusCode::BAD_REQUEST, Json(ApiError::new(e.to_string()))).into_response()
            }
            // Not-found is answered with the bare message as plain text
            ProvisionError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()).into_response(),
            ProvisionError::Generate(e) => {
                error!(error = %e, "Provisioning file generation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiError::new(format!(
                        "Failed to generate provisioning file: {}",
                        e
                    ))),
                )
                    .into_response()
            }
        }
    }
}

/// Serve the provisioning payload for a device
pub async fn get_provisioning(
    State(state): State<Arc<AppState>>,
    Path(mac): Path<String>,
) -> Response {
    match state.provision(&mac).await {
        Ok(payload) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, payload.content_type)],
            payload.body,
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

/// List provisioned devices
pub async fn list_devices(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.device_summaries().await)
}

/// Reload the device index from disk
pub async fn reload_devices(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    info!("Device index reload requested");

    match state.reload_devices().await {
        Ok(count) => Json(serde_json::json!({
            "status": "reloaded",
            "devices": count
        }))
        .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiError::new(format!("Failed to reload devices: {}", e))),
        )
            .into_response(),
    }
}
