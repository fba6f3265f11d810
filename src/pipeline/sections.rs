use std::sync::Arc;

use crate::llm::{GenerateOutcome, GenerateRequest, TextGenerator};

/// Report sections, rendered in this order.
pub const SECTION_NAMES: [&str; 5] = [
    "Abstract",
    "Introduction",
    "Problem Statement",
    "Literature Survey",
    "Conclusion",
];

/// Section added when the request carries a dataset.
pub const DATA_SECTION: &str = "Data Analysis";

/// Builds the ordered section list for a report. The data-analysis section,
/// when present, goes immediately before the final section.
pub fn plan_sections(with_dataset: bool) -> Vec<&'static str> {
    let mut names = SECTION_NAMES.to_vec();
    if with_dataset {
        names.insert(names.len() - 1, DATA_SECTION);
    }
    names
}

/// Produces the text for one report section. Every failure mode of the
/// generation service is rendered into the section body, so callers always
/// get a string back.
pub struct SectionGenerator {
    provider: Arc<dyn TextGenerator>,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl SectionGenerator {
    pub fn new(
        provider: Arc<dyn TextGenerator>,
        model: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Self {
        Self {
            provider,
            model: model.to_string(),
            temperature,
            max_tokens,
        }
    }

    #[tracing::instrument(
        name = "generate section",
        skip(self, topic),
        fields(report.section = %section)
    )]
    pub async fn generate(&self, section: &str, topic: &str) -> String {
        let req = GenerateRequest {
            model: self.model.clone(),
            prompt: format!(
                "Write a detailed {section} section for a project report on the topic: {topic}"
            ),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let outcome = self.provider.generate(&req).await;

        if !matches!(outcome, GenerateOutcome::Text(_)) {
            tracing::warn!(
                provider = self.provider.name(),
                section = section,
                outcome = ?outcome,
                "generation failed, embedding error text in section"
            );
        }

        render_outcome(outcome)
    }
}

fn render_outcome(outcome: GenerateOutcome) -> String {
    match outcome {
        GenerateOutcome::Text(text) => text,
        GenerateOutcome::ApiError(message) => format!("API error: {message}"),
        GenerateOutcome::HttpFailure { status, body } => {
            format!("API request failed with status code {status}: {body}")
        }
        GenerateOutcome::Transport(message) => {
            format!("API request error: {message}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubGenerator {
        outcome: GenerateOutcome,
    }

    #[async_trait::async_trait]
    impl TextGenerator for StubGenerator {
        async fn generate(&self, _req: &GenerateRequest) -> GenerateOutcome {
            self.outcome.clone()
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    fn generator_with(outcome: GenerateOutcome) -> SectionGenerator {
        SectionGenerator::new(Arc::new(StubGenerator { outcome }), "test-model", 0.7, 600)
    }

    #[test]
    fn test_plan_without_dataset() {
        let names = plan_sections(false);
        assert_eq!(
            names,
            vec![
                "Abstract",
                "Introduction",
                "Problem Statement",
                "Literature Survey",
                "Conclusion",
            ]
        );
    }

    #[test]
    fn test_plan_with_dataset_inserts_before_conclusion() {
        let names = plan_sections(true);
        assert_eq!(names.len(), 6);
        assert_eq!(names[names.len() - 2], DATA_SECTION);
        assert_eq!(*names.last().unwrap(), "Conclusion");
    }

    #[tokio::test]
    async fn test_generate_passes_through_text() {
        let generator = generator_with(GenerateOutcome::Text("Hello".to_string()));
        let body = generator.generate("Abstract", "solar power").await;
        assert_eq!(body, "Hello");
    }

    #[tokio::test]
    async fn test_generate_embeds_status_code_on_http_failure() {
        let generator = generator_with(GenerateOutcome::HttpFailure {
            status: 500,
            body: "internal server error".to_string(),
        });
        let body = generator.generate("Introduction", "solar power").await;
        assert!(body.contains("500"), "body should reference the status code");
        assert!(body.contains("internal server error"));
    }

    #[tokio::test]
    async fn test_generate_embeds_api_error() {
        let generator = generator_with(GenerateOutcome::ApiError("quota exhausted".to_string()));
        let body = generator.generate("Conclusion", "solar power").await;
        assert_eq!(body, "API error: quota exhausted");
    }

    #[tokio::test]
    async fn test_generate_embeds_transport_error() {
        let generator = generator_with(GenerateOutcome::Transport("connection refused".into()));
        let body = generator.generate("Abstract", "solar power").await;
        assert!(body.starts_with("API request error:"));
        assert!(body.contains("connection refused"));
    }
}
