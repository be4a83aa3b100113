use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use store_object::{StoreError, ValidationErrors};
use thiserror::Error;
use tracing::{error, warn};

use super::envelope::ApiResponse;

/// Failure of a single request, rendered as an error envelope
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    #[error("{0}")]
    BadRequest(String),

    #[error("not found")]
    NotFound,

    #[error("method not allowed")]
    MethodNotAllowed,

    #[error("{0}")]
    Store(#[from] StoreError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            // Store failures share the client-error status with validation
            ApiError::Validation(_) | ApiError::BadRequest(_) | ApiError::Store(_) => {
                StatusCode::BAD_REQUEST
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Store(e) if !e.is_client_error() => error!("store failure: {}", e),
            ApiError::NotFound | ApiError::MethodNotAllowed => {}
            other => warn!("rejected request: {}", other),
        }

        let body = ApiResponse::<()>::failure(self.to_string());
        (self.status_code(), Json(body)).into_response()
    }
}
