//! Translates `thai_search_core::Error` into an HTTP status and a
//! machine-readable JSON error body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thai_search_core::Error;

pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::Validation { .. } => StatusCode::BAD_REQUEST,
            Error::Configuration { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Error::BackendUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Error::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            Error::Tokenization { .. } | Error::SearchExecution { .. } | Error::Ranking { .. } => {
                StatusCode::BAD_GATEWAY
            }
        };

        let body = Json(serde_json::json!({
            "error": self.0.code(),
            "message": self.0.to_string(),
            "details": self.0.details(),
        }));

        (status, body).into_response()
    }
}
