use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use flagforge_api_types::ErrorResponse;
use tracing::error;

use crate::service::CtfError;

/// API error type.
#[derive(Debug)]
pub struct ApiError {
    message: String,
    code: &'static str,
    status: StatusCode,
}

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: "NOT_FOUND",
            status: StatusCode::NOT_FOUND,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn code(&self) -> &'static str {
        self.code
    }
}

impl From<CtfError> for ApiError {
    fn from(err: CtfError) -> Self {
        let (status, code) = match &err {
            CtfError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            CtfError::Inactive(_) => (StatusCode::CONFLICT, "CHALLENGE_INACTIVE"),
            CtfError::AlreadySolved { .. } => (StatusCode::CONFLICT, "ALREADY_SOLVED"),
            CtfError::Unauthorized(_) => (StatusCode::FORBIDDEN, "UNAUTHORIZED"),
            CtfError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            CtfError::RateLimited { .. } => (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMITED"),
            CtfError::Store(e) => {
                error!(error = %e, "store operation failed");
                return ApiError {
                    message: "internal error".to_string(),
                    code: "INTERNAL_ERROR",
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                };
            }
        };

        ApiError {
            message: err.to_string(),
            code,
            status,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            code: self.code.to_string(),
            message: self.message,
        });
        (self.status, body).into_response()
    }
}
