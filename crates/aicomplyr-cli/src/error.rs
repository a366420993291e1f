//! HTTP error envelope.

use aicomplyr_core::{ComplianceError, OverrideError};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Report(#[from] ComplianceError),

    #[error(transparent)]
    Override(#[from] OverrideError),

    #[error("Authentication required")]
    Unauthorized,

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Internal server error")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Report(ComplianceError::Config(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Report(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Override(e) => match e {
                OverrideError::Validation(_)
                | OverrideError::NotRequested
                | OverrideError::NotPending => StatusCode::BAD_REQUEST,
                OverrideError::Forbidden(_) => StatusCode::FORBIDDEN,
                OverrideError::DecisionNotFound => StatusCode::NOT_FOUND,
                OverrideError::AlreadyRequested => StatusCode::CONFLICT,
                OverrideError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = ?self, "request failed");
        } else {
            tracing::warn!(error = %self, status = status.as_u16(), "request rejected");
        }

        let body = Json(json!({
            "success": false,
            "error": self.to_string(),
        }));
        (status, body).into_response()
    }
}
