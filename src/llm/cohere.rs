use std::time::Instant;

use opentelemetry::KeyValue;
use serde::Serialize;
use serde_json::Value;
use tracing::Instrument;

use super::{GenerateOutcome, GenerateRequest, TextGenerator};
use crate::telemetry::metrics::{GEN_AI_ERROR_COUNT, GEN_AI_OPERATION_DURATION};

/// The legacy generate endpoint has returned its candidates under several
/// different keys over time. Checked in priority order.
const CANDIDATE_KEYS: [&str; 3] = ["generations", "generation", "choices"];

pub struct CohereClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl CohereClient {
    pub fn new(api_url: &str, api_key: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.to_string(),
            api_key: api_key.to_string(),
        }
    }
}

#[derive(Serialize)]
struct CohereRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
    temperature: f32,
}

#[async_trait::async_trait]
impl TextGenerator for CohereClient {
    async fn generate(&self, req: &GenerateRequest) -> GenerateOutcome {
        let span = tracing::info_span!(
            "gen_ai.chat",
            otel.name = %format!("gen_ai.chat {}", req.model),
            gen_ai.operation.name = "chat",
            gen_ai.provider.name = "cohere",
            gen_ai.request.model = %req.model,
            gen_ai.request.temperature = req.temperature,
            gen_ai.request.max_tokens = req.max_tokens as i64,
            otel.status_code = tracing::field::Empty,
            error.type = tracing::field::Empty,
        );

        let start = Instant::now();
        let outcome = self.generate_inner(req).instrument(span.clone()).await;

        GEN_AI_OPERATION_DURATION.record(
            start.elapsed().as_secs_f64(),
            &[
                KeyValue::new("gen_ai.operation.name", "chat"),
                KeyValue::new("gen_ai.provider.name", "cohere"),
                KeyValue::new("gen_ai.request.model", req.model.clone()),
            ],
        );

        if let Some(error_type) = classify_outcome(&outcome) {
            span.record("otel.status_code", "ERROR");
            span.record("error.type", error_type);

            GEN_AI_ERROR_COUNT.add(
                1,
                &[
                    KeyValue::new("gen_ai.provider.name", "cohere"),
                    KeyValue::new("gen_ai.request.model", req.model.clone()),
                    KeyValue::new("error.type", error_type),
                ],
            );
        }

        outcome
    }

    fn name(&self) -> &str {
        "cohere"
    }
}

impl CohereClient {
    async fn generate_inner(&self, req: &GenerateRequest) -> GenerateOutcome {
        let body = CohereRequest {
            model: &req.model,
            prompt: &req.prompt,
            max_tokens: req.max_tokens,
            temperature: req.temperature,
        };

        let response = match self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => return GenerateOutcome::Transport(e.to_string()),
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return GenerateOutcome::HttpFailure {
                status: status.as_u16(),
                body,
            };
        }

        match response.json::<Value>().await {
            Ok(value) => extract_generation(&value),
            Err(e) => GenerateOutcome::Transport(e.to_string()),
        }
    }
}

/// Pulls the first generated candidate out of a successful response body,
/// trying each known shape in order and falling back to a raw dump.
pub(crate) fn extract_generation(value: &Value) -> GenerateOutcome {
    if let Some(error) = value.get("error") {
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .or_else(|| error.as_str())
            .unwrap_or("Unknown error");
        return GenerateOutcome::ApiError(message.to_string());
    }

    for key in CANDIDATE_KEYS {
        if let Some(text) = value
            .get(key)
            .and_then(|candidates| candidates.get(0))
            .and_then(|first| first.get("text"))
            .and_then(Value::as_str)
        {
            return GenerateOutcome::Text(text.trim().to_string());
        }
    }

    GenerateOutcome::Text(value.to_string())
}

fn classify_outcome(outcome: &GenerateOutcome) -> Option<&'static str> {
    match outcome {
        GenerateOutcome::Text(_) => None,
        GenerateOutcome::ApiError(_) => Some("api_error"),
        GenerateOutcome::HttpFailure { status, .. } => Some(match status {
            429 => "rate_limit",
            401 | 403 => "auth_error",
            400..=499 => "invalid_request",
            _ => "server_error",
        }),
        GenerateOutcome::Transport(_) => Some("network_error"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_generations_shape() {
        let value = json!({"generations": [{"text": "  Hello  "}]});
        assert_eq!(
            extract_generation(&value),
            GenerateOutcome::Text("Hello".to_string())
        );
    }

    #[test]
    fn test_extract_generation_shape() {
        let value = json!({"generation": [{"text": "singular shape"}]});
        assert_eq!(
            extract_generation(&value),
            GenerateOutcome::Text("singular shape".to_string())
        );
    }

    #[test]
    fn test_extract_choices_shape() {
        let value = json!({"choices": [{"text": "choice text"}]});
        assert_eq!(
            extract_generation(&value),
            GenerateOutcome::Text("choice text".to_string())
        );
    }

    #[test]
    fn test_extract_priority_order() {
        let value = json!({
            "choices": [{"text": "lower priority"}],
            "generations": [{"text": "wins"}],
        });
        assert_eq!(
            extract_generation(&value),
            GenerateOutcome::Text("wins".to_string())
        );
    }

    #[test]
    fn test_extract_error_object() {
        let value = json!({"error": {"message": "model overloaded"}});
        assert_eq!(
            extract_generation(&value),
            GenerateOutcome::ApiError("model overloaded".to_string())
        );
    }

    #[test]
    fn test_extract_error_string() {
        let value = json!({"error": "bad prompt"});
        assert_eq!(
            extract_generation(&value),
            GenerateOutcome::ApiError("bad prompt".to_string())
        );
    }

    #[test]
    fn test_extract_error_without_message() {
        let value = json!({"error": {"code": 17}});
        assert_eq!(
            extract_generation(&value),
            GenerateOutcome::ApiError("Unknown error".to_string())
        );
    }

    #[test]
    fn test_extract_unknown_shape_dumps_raw() {
        let value = json!({"completions": ["nothing recognizable"]});
        match extract_generation(&value) {
            GenerateOutcome::Text(text) => assert!(text.contains("completions")),
            other => panic!("expected raw dump, got {other:?}"),
        }
    }

    #[test]
    fn test_extract_empty_candidates_falls_through() {
        let value = json!({"generations": []});
        match extract_generation(&value) {
            GenerateOutcome::Text(text) => assert!(text.contains("generations")),
            other => panic!("expected raw dump, got {other:?}"),
        }
    }

    #[test]
    fn test_classify_outcome() {
        assert_eq!(classify_outcome(&GenerateOutcome::Text("ok".into())), None);
        assert_eq!(
            classify_outcome(&GenerateOutcome::ApiError("x".into())),
            Some("api_error")
        );
        assert_eq!(
            classify_outcome(&GenerateOutcome::HttpFailure {
                status: 429,
                body: String::new()
            }),
            Some("rate_limit")
        );
        assert_eq!(
            classify_outcome(&GenerateOutcome::HttpFailure {
                status: 401,
                body: String::new()
            }),
            Some("auth_error")
        );
        assert_eq!(
            classify_outcome(&GenerateOutcome::HttpFailure {
                status: 500,
                body: String::new()
            }),
            Some("server_error")
        );
        assert_eq!(
            classify_outcome(&GenerateOutcome::Transport("reset".into())),
            Some("network_error")
        );
    }
}
