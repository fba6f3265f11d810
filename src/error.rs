use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use opentelemetry::trace::TraceContextExt;
use serde_json::json;
use thiserror::Error;
use tracing::Span;
use tracing_opentelemetry::OpenTelemetrySpanExt;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conversion error: {0}")]
    Conversion(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

fn get_trace_id() -> Option<String> {
    let span = Span::current();
    let context = span.context();
    let span_ref = context.span();
    let span_context = span_ref.span_context();

    if span_context.is_valid() {
        Some(span_context.trace_id().to_string())
    } else {
        None
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            // Conversion failures surface the converter's diagnostic output
            AppError::Conversion(msg) => {
                tracing::error!(error = %msg, "PDF conversion error");
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone())
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = if let Some(trace_id) = get_trace_id() {
            json!({
                "error": error_message,
                "status": status.as_u16(),
                "trace_id": trace_id,
            })
        } else {
            json!({
                "error": error_message,
                "status": status.as_u16(),
            })
        };

        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let error = AppError::Validation("topic must not be empty".to_string());
        assert_eq!(
            error.to_string(),
            "Validation error: topic must not be empty"
        );
    }

    #[test]
    fn test_conversion_error() {
        let error = AppError::Conversion("wkhtmltopdf exited with code 1".to_string());
        assert_eq!(
            error.to_string(),
            "Conversion error: wkhtmltopdf exited with code 1"
        );
    }

    #[test]
    fn test_internal_error() {
        let error = AppError::Internal("unexpected".to_string());
        assert_eq!(error.to_string(), "Internal error: unexpected");
    }

    #[test]
    fn test_app_result_ok() {
        fn returns_ok() -> AppResult<i32> {
            Ok(42)
        }
        let result = returns_ok();
        assert!(result.is_ok());
        assert_eq!(result.unwrap(), 42);
    }

    #[test]
    fn test_app_result_err() {
        fn returns_err() -> AppResult<i32> {
            Err(AppError::Validation("test".to_string()))
        }
        let result = returns_err();
        assert!(result.is_err());
    }
}
