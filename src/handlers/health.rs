use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::app::AppState;
use crate::error::{ApiError, ApiResult};

/// GET /health - Store connectivity check
pub async fn get(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let now = chrono::Utc::now();

    match state.service.store().ping().await {
        Ok(()) => Ok(Json(json!({
            "status": "ok",
            "timestamp": now,
            "database": "ok"
        }))),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            Err(ApiError::service_unavailable("Database unavailable"))
        }
    }
}
