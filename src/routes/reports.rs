use axum::{
    Json,
    extract::State,
    http::{HeaderMap, HeaderValue, header},
    response::IntoResponse,
};
use serde::Deserialize;

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::pipeline::{ReportRequest, generate_report};

#[derive(Debug, Deserialize)]
pub struct CreateReportBody {
    pub topic: String,
    pub author: Option<String>,
    pub csv: Option<String>,
}

pub async fn create_report(
    State(state): State<AppState>,
    Json(body): Json<CreateReportBody>,
) -> AppResult<impl IntoResponse> {
    let topic = body.topic.trim();
    if topic.is_empty() {
        return Err(AppError::Validation("topic must not be empty".into()));
    }

    let request = ReportRequest {
        topic: topic.to_string(),
        author: body.author.unwrap_or_else(|| "Anonymous".to_string()),
        dataset: body.csv,
    };

    let pdf = generate_report(&state.config, &state.generator, &request).await?;

    let disposition = format!(
        "attachment; filename=\"{}_report.pdf\"",
        sanitize_filename(topic)
    );

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/pdf"),
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&disposition)
            .map_err(|e| AppError::Internal(format!("invalid disposition header: {e}")))?,
    );

    Ok((headers, pdf))
}

/// Keeps the download filename header-safe: anything outside a conservative
/// character set becomes an underscore.
fn sanitize_filename(topic: &str) -> String {
    topic
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == ' ' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_report_body_deserialize() {
        let body: CreateReportBody = serde_json::from_str(
            r#"{"topic": "Solar Energy", "author": "Ada", "csv": "a,b\n1,2\n"}"#,
        )
        .unwrap();
        assert_eq!(body.topic, "Solar Energy");
        assert_eq!(body.author.as_deref(), Some("Ada"));
        assert!(body.csv.is_some());
    }

    #[test]
    fn test_create_report_body_optional_fields() {
        let body: CreateReportBody = serde_json::from_str(r#"{"topic": "Solar"}"#).unwrap();
        assert_eq!(body.topic, "Solar");
        assert!(body.author.is_none());
        assert!(body.csv.is_none());
    }

    #[test]
    fn test_sanitize_filename_passthrough() {
        assert_eq!(sanitize_filename("Solar Energy-2025"), "Solar Energy-2025");
    }

    #[test]
    fn test_sanitize_filename_replaces_unsafe_chars() {
        assert_eq!(sanitize_filename("a/b\"c\nd"), "a_b_c_d");
    }
}
