use axum::http::{Method, StatusCode};
use axum::response::IntoResponse;
use serde_json::json;
use thiserror::Error;

use crate::app::validation::ValidationErrors;

/// Every way a request can be refused before or instead of reaching a handler.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not allowed by CORS")]
    CorsRejected { origin: String },

    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error("expected a request with `Content-Type: application/json`")]
    UnsupportedMediaType,

    #[error("failed to read request body: {message}")]
    BodyRead { status: StatusCode, message: String },

    #[error("Cannot {method} {path}")]
    NotFound { method: Method, path: String },
}

impl ApiError {
    pub fn cors_rejected(origin: impl Into<String>) -> Self {
        Self::CorsRejected {
            origin: origin.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::CorsRejected { .. } => StatusCode::FORBIDDEN,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::BodyRead { status, .. } => *status,
            ApiError::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::CorsRejected { .. } => "cors_rejected",
            ApiError::Validation(_) => "validation_error",
            ApiError::UnsupportedMediaType => "unsupported_media_type",
            ApiError::BodyRead { status, .. } if *status == StatusCode::PAYLOAD_TOO_LARGE => {
                "payload_too_large"
            }
            ApiError::BodyRead { .. } => "invalid_body",
            ApiError::NotFound { .. } => "not_found",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let code = self.code();
        let message = self.to_string();

        match self {
            ApiError::Validation(errors) => (
                status,
                axum::Json(json!({
                    "error": code,
                    "message": message,
                    "details": errors.fields(),
                })),
            )
                .into_response(),
            _ => json_error(status, code, message),
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// Fallback for paths no route table entry matched.
pub async fn not_found(method: Method, uri: axum::http::Uri) -> ApiError {
    ApiError::NotFound {
        method,
        path: uri.path().to_string(),
    }
}
