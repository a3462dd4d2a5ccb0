use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service status, version and the configured catalog source.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "advisor-api",
        "collaborators": {
            "job_data": state.config.job_data_url.is_some(),
            "course_catalog": state.config.catalog_source_label(),
            "cache": if state.config.redis_url.is_some() { "redis" } else { "memory" },
            "explanations": state.config.anthropic_api_key.is_some(),
        }
    }))
}
