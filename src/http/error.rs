use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::engine::EngineError;

/// API error response body.
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Everything a handler can fail with.
#[derive(Debug)]
pub enum AppError {
    Engine(EngineError),
    /// Body or query string could not be decoded at all.
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ApiError::new("BAD_REQUEST", msg),
            ),
            AppError::Engine(EngineError::Validation(v)) => {
                let mut body = ApiError::new(
                    "VALIDATION_ERROR",
                    format!("invalid field '{}': {}", v.field, v.reason.as_str()),
                );
                if let Some(detail) = v.detail {
                    body = body.with_details(detail);
                }
                (StatusCode::BAD_REQUEST, body)
            }
            AppError::Engine(e @ EngineError::NotFound(_)) => (
                StatusCode::NOT_FOUND,
                ApiError::new("NOT_FOUND", e.to_string()),
            ),
            AppError::Engine(e @ EngineError::OutOfHours { .. }) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::new("OUT_OF_HOURS", e.to_string()),
            ),
            AppError::Engine(EngineError::Internal(detail)) => {
                tracing::error!("internal error: {detail}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError::new("INTERNAL_ERROR", "internal server error"),
                )
            }
        };

        (status, Json(error)).into_response()
    }
}

impl From<EngineError> for AppError {
    fn from(err: EngineError) -> Self {
        AppError::Engine(err)
    }
}

impl From<JsonRejection> for AppError {
    fn from(err: JsonRejection) -> Self {
        AppError::BadRequest(err.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(err: QueryRejection) -> Self {
        AppError::BadRequest(err.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Span;

    #[test]
    fn status_mapping() {
        let status = |e: EngineError| AppError::from(e).into_response().status();
        assert_eq!(
            status(EngineError::NotFound("x".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status(EngineError::OutOfHours { open: Span::new(480, 1320) }),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status(EngineError::Internal("lock poisoned".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::BadRequest("nope".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn body_omits_empty_details() {
        let body = serde_json::to_value(ApiError::new("NOT_FOUND", "gone")).unwrap();
        assert_eq!(body, serde_json::json!({ "code": "NOT_FOUND", "message": "gone" }));

        let body = serde_json::to_value(ApiError::new("X", "y").with_details("z")).unwrap();
        assert_eq!(body["details"], "z");
    }
}
