//! WebServer-specific error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use matcher::MatcherError;
use shared::{CycleResponse, SharedError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WebServerError {
    #[error("Server startup error: {0}")]
    ServerStartup(String),

    #[error("Missing or invalid bearer token")]
    Unauthorized,

    #[error("{0}")]
    CycleFailed(#[from] MatcherError),

    #[error("Shared component error: {0}")]
    SharedError(#[from] SharedError),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl WebServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            WebServerError::Unauthorized => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Errors leave the API in the cycle response shape
impl IntoResponse for WebServerError {
    fn into_response(self) -> Response {
        (self.status(), Json(CycleResponse::failed(&self))).into_response()
    }
}

pub type WebServerResult<T> = Result<T, WebServerError>;
