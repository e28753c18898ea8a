//! `POST /cycle`: run one matching cycle
//!
//! The request body is ignored; empty and `{}` are both accepted.

use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::Json;

use shared::{logging, process_info, process_warn, CycleResponse, ProcessId};

use crate::error::{WebServerError, WebServerResult};
use crate::state::AppState;

pub async fn trigger_cycle(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> WebServerResult<(StatusCode, Json<CycleResponse>)> {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    if !state.authorize(authorization) {
        process_warn!(ProcessId::current(), "🔒 Rejected cycle trigger without valid token");
        return Err(WebServerError::Unauthorized);
    }

    process_info!(ProcessId::current(), "▶️ Cycle triggered over HTTP");
    match state.runner.run_cycle().await {
        Ok(summary) => Ok((StatusCode::OK, Json(CycleResponse::completed(&summary)))),
        Err(e) => {
            logging::log_error(ProcessId::current(), "Triggered cycle", &e);
            Err(WebServerError::CycleFailed(e))
        }
    }
}
