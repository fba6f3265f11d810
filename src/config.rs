use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub environment: String,
    pub generation_api_url: String,
    pub generation_api_key: Option<String>,
    pub generation_model: String,
    pub default_temperature: f32,
    pub default_max_tokens: u32,
    pub wkhtmltopdf_path: String,
    pub otel_service_name: String,
    pub otel_exporter_endpoint: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            port: env::var("APP_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .expect("APP_PORT must be a number"),
            environment: env::var("AUTODOC_ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
            generation_api_url: env::var("GENERATION_API_URL")
                .unwrap_or_else(|_| "https://api.cohere.ai/generate".to_string()),
            generation_api_key: env::var("GENERATION_API_KEY").ok(),
            generation_model: env::var("GENERATION_MODEL")
                .unwrap_or_else(|_| "command-xlarge".to_string()),
            default_temperature: env::var("DEFAULT_TEMPERATURE")
                .unwrap_or_else(|_| "0.7".to_string())
                .parse()
                .expect("DEFAULT_TEMPERATURE must be a number"),
            default_max_tokens: env::var("DEFAULT_MAX_TOKENS")
                .unwrap_or_else(|_| "600".to_string())
                .parse()
                .expect("DEFAULT_MAX_TOKENS must be a number"),
            wkhtmltopdf_path: env::var("WKHTMLTOPDF_PATH")
                .unwrap_or_else(|_| "wkhtmltopdf".to_string()),
            otel_service_name: env::var("OTEL_SERVICE_NAME")
                .unwrap_or_else(|_| "autodoc".to_string()),
            otel_exporter_endpoint: env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
                .unwrap_or_else(|_| "http://localhost:4317".to_string()),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
