use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use tracker_types::api::ErrorResponse;

pub type ApiResult<T> = Result<T, ApiError>;

/// Every handler failure. Rendered as `(status, {"error": message})`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The user named in the path does not exist.
    #[error("User not found")]
    UserNotFound,

    /// A required field is missing or has the wrong shape.
    #[error("{0}")]
    Validation(String),

    /// The store rejected the operation or is unreachable.
    #[error("Internal server error")]
    Persistence(#[from] anyhow::Error),

    /// A blocking task panicked or was cancelled.
    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::UserNotFound => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Persistence(_) | Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Persistence(ref e) = self {
            error!("Persistence failure: {:#}", e);
        }

        let status = self.status_code();
        let body = Json(ErrorResponse {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}
