//! HTTP error mapping.
//!
//! Response bodies carry a fixed message per status; the underlying detail is
//! only ever logged.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{debug, warn};

use meeple_db::{ErrorKind, StoreError};
use meeple_types::api::ErrorBody;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn public_message(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "Bad Request",
            ApiError::NotFound(_) => "Not Found",
            ApiError::Internal(_) => "Internal Server Error",
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        let detail = err.to_string();
        match err.kind() {
            ErrorKind::BadRequest => ApiError::BadRequest(detail),
            ErrorKind::NotFound => ApiError::NotFound(detail),
            ErrorKind::Unexpected => ApiError::Internal(detail),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Internal(detail) => warn!("request failed: {}", detail),
            other => debug!("rejected request: {}", other),
        }

        let status = self.status_code();
        let body = Json(ErrorBody {
            msg: self.public_message().to_string(),
        });
        (status, body).into_response()
    }
}
