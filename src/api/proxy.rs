//! Chat proxy endpoint handler

use axum::{body::Bytes, extract::State, Json};
use serde_json::Value;
use tracing::{debug, error, info, warn};

use super::middleware::truncate_for_log;
use super::state::AppState;
use super::types::ApiError;
use crate::infrastructure::upstream::UpstreamReply;

/// POST /api/chat (and /api/ask)
///
/// Forwards the JSON body to the upstream and relays its answer. Upstream
/// error statuses are propagated; anything else that goes wrong is a 500.
pub async fn proxy_chat(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let payload: Value = serde_json::from_slice(&body).map_err(|e| {
        error!(error = %e, "Proxy API error: unreadable request body");
        ApiError::internal()
    })?;

    debug!(payload = %truncate_for_log(&payload.to_string(), 200), "Proxying chat request");

    match state.upstream.forward(&payload).await {
        Ok(UpstreamReply::Success(answer)) => {
            info!(upstream = %state.upstream.url(), "Relayed upstream answer");
            Ok(Json(answer))
        }
        Ok(UpstreamReply::Failure { status, reason }) => {
            warn!(status, reason = %reason, "Upstream returned an error status");
            Err(ApiError::upstream(status, &reason))
        }
        Err(e) => {
            error!(error = %e, "Proxy API error");
            Err(e.into())
        }
    }
}
