pub mod cohere;

pub use cohere::CohereClient;

#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Outcome of a single generation call. Service and transport failures are
/// carried as data so callers can surface them as report content instead of
/// aborting the request.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerateOutcome {
    /// Text extracted from one of the known response shapes, trimmed.
    Text(String),
    /// HTTP 200 with an `error` field in the body.
    ApiError(String),
    /// Non-success HTTP status.
    HttpFailure { status: u16, body: String },
    /// Request never produced a parseable response.
    Transport(String),
}

#[async_trait::async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, req: &GenerateRequest) -> GenerateOutcome;
    fn name(&self) -> &str;
}
