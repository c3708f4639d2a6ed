use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::validation::FieldError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Form validation failed with {} field error(s)", .0.len())]
    Fields(Vec<FieldError>),

    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unprocessable entity: {0}")]
    UnprocessableEntity(String),

    #[error("Summary generation error: {0}")]
    Summary(String),

    #[error("Evaluation error: {0}")]
    Evaluation(String),

    #[error("PDF generation error: {0}")]
    Pdf(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Field errors carry a structured list the form renders inline.
        if let AppError::Fields(fields) = &self {
            let body = Json(json!({
                "error": {
                    "code": "VALIDATION_ERROR",
                    "message": "Please fix the errors in the form.",
                    "fields": fields
                }
            }));
            return (StatusCode::BAD_REQUEST, body).into_response();
        }

        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Fields(_) => unreachable!("handled above"),
            AppError::UnsupportedMediaType(msg) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "UNSUPPORTED_MEDIA_TYPE",
                msg.clone(),
            ),
            AppError::PayloadTooLarge(msg) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "PAYLOAD_TOO_LARGE",
                msg.clone(),
            ),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            AppError::UnprocessableEntity(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNPROCESSABLE_ENTITY",
                msg.clone(),
            ),
            AppError::Summary(msg) => {
                tracing::error!("Summary generation error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "SUMMARY_FAILED",
                    "Summary generation failed. Please try again.".to_string(),
                )
            }
            AppError::Evaluation(msg) => {
                tracing::error!("Evaluation error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "EVALUATION_FAILED",
                    "Resume evaluation failed. Please try again.".to_string(),
                )
            }
            AppError::Pdf(msg) => {
                tracing::error!("PDF generation error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "PDF_ERROR",
                    "Failed to generate resume PDF. Please try again.".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_errors_map_to_bad_request() {
        let err = AppError::Fields(vec![FieldError {
            field: "contact.email".to_string(),
            message: "Invalid email address".to_string(),
        }]);
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_collaborator_failures_map_to_bad_gateway() {
        let response = AppError::Evaluation("connection refused".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_upload_precondition_statuses() {
        assert_eq!(
            AppError::UnsupportedMediaType("png".to_string())
                .into_response()
                .status(),
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
        assert_eq!(
            AppError::PayloadTooLarge("6MB".to_string())
                .into_response()
                .status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
    }
}
