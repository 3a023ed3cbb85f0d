use axum::{
    extract::{
        multipart::MultipartRejection, rejection::PathRejection, DefaultBodyLimit, Multipart, Path,
        State,
    },
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::{info_span, Instrument};
use uuid::Uuid;

use crate::relay::{RelayError, RelayRequest, RelayResponse, RelayTarget};
use crate::state::AppState;

pub fn create_routes(state: &AppState) -> Router<AppState> {
    let max_upload_bytes = state.config.system_config.max_upload_bytes;

    Router::new()
        // Health check
        .route("/api/health", get(health_check))

        // Conversation relay
        .route(
            "/api/recommendation/:transcript/:agentId",
            post(relay_message),
        )
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}

async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "agent_api_configured": state.gateway.is_configured()
    }))
}

/// Forward a dashboard form submission to the target agent.
async fn relay_message(
    State(state): State<AppState>,
    target: Result<Path<RelayTarget>, PathRejection>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<RelayResponse, RelayError> {
    state.gateway.ensure_configured()?;
    let Path(target) = target.map_err(|e| RelayError::unexpected(e.body_text()))?;

    let span = info_span!(
        "relay",
        request_id = %Uuid::new_v4(),
        transcript = %target.transcript_id,
        agent_id = %target.agent_id,
    );

    async move {
        let multipart = multipart.map_err(|e| RelayError::unexpected(e.body_text()))?;
        let request = RelayRequest::from_multipart(target, multipart).await?;
        state.gateway.forward(request).await
    }
    .instrument(span)
    .await
}
