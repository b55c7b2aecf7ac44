use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode as HttpStatus;
use axum::response::{IntoResponse, Json, Response};
use thiserror::Error;
use tracing::error;

use quill_core::ServiceError;
use quill_protocol::{Status, StatusCode};

use crate::convert;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("store error: {0}")]
    Store(#[from] quill_store::StoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ServerResult<T> = Result<T, ServerError>;

/// Error half of every unary handler: a wire [`Status`] with the matching
/// HTTP status code.
#[derive(Debug)]
pub struct ApiError(pub Status);

pub type ApiResult<T> = Result<T, ApiError>;

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        Self(convert::status(&err))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(Status::new(StatusCode::InvalidArgument, rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.0;
        if status.code == StatusCode::Internal {
            error!(message = %status.message, "request failed");
        }
        let http = HttpStatus::from_u16(status.code.http_status())
            .unwrap_or(HttpStatus::INTERNAL_SERVER_ERROR);
        (http, Json(status)).into_response()
    }
}
