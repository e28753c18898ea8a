//! Liveness endpoint

use axum::extract::State;
use axum::response::Json;
use chrono::Utc;
use serde_json::{json, Value};

use crate::state::AppState;

pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "uptime_seconds": (Utc::now() - state.started_at).num_seconds(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}
