//! API error type and its JSON rendering

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use crate::persistence::StoreError;

/// Errors a handler can return
#[derive(Debug, Error)]
pub enum ApiError {
    /// Body parsed but a field failed its type/presence check
    #[error("{0}")]
    BadRequest(&'static str),
    /// Body was not JSON (or not declared as JSON)
    #[error("invalid JSON body: {0}")]
    InvalidJson(#[from] JsonRejection),
    #[error(transparent)]
    Store(#[from] StoreError),
    /// The blocking store task panicked or was cancelled
    #[error("store task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, *message),
            ApiError::InvalidJson(_) => (StatusCode::BAD_REQUEST, "Invalid JSON body"),
            ApiError::Store(e) => {
                log::error!("Database error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error")
            }
            ApiError::Task(e) => {
                log::error!("Server error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
