use axum::Json;
use serde_json::{json, Value};

/// GET /health - Liveness probe
pub async fn health_get() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now(),
    }))
}
