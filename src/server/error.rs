use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::error::ShareError;

/// Error body returned by every endpoint
#[derive(Serialize)]
pub(crate) struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}

impl IntoResponse for ShareError {
    fn into_response(self) -> Response {
        let status = match &self {
            ShareError::SelfRequest | ShareError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ShareError::DuplicateRequest | ShareError::Conflict(_) => StatusCode::CONFLICT,
            ShareError::NotFound(_) => StatusCode::NOT_FOUND,
            ShareError::Forbidden(_) => StatusCode::FORBIDDEN,
            ShareError::Persistence(_) | ShareError::Corrupt(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        // Store details stay in the server log
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        (
            status,
            Json(ErrorBody {
                error: self.code(),
                message,
            }),
        )
            .into_response()
    }
}
