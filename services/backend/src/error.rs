//! Central error type for the flip service HTTP surface

use crate::engine::FlipError;
use crate::provider::ProviderError;
use crate::store::StoreError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("randomness upstream unavailable: {0}")]
    UpstreamUnavailable(#[from] ProviderError),

    #[error("counter store failure: {0}")]
    Store(#[from] StoreError),

    #[error("internal server error")]
    Internal(#[from] anyhow::Error),
}

impl From<FlipError> for AppError {
    fn from(e: FlipError) -> Self {
        match e {
            FlipError::Upstream(e) => AppError::UpstreamUnavailable(e),
            FlipError::Store(e) => AppError::Store(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::UpstreamUnavailable(e) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "UPSTREAM_UNAVAILABLE",
                e.to_string(),
            ),
            AppError::Store(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "STORE_ERROR",
                e.to_string(),
            ),
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": code,
            "message": message
        }));

        (status, body).into_response()
    }
}
