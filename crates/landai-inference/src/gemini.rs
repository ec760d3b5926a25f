//! Gemini generation backend implementation.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::{debug, instrument, warn};

use landai_core::{defaults, Error, GenerationBackend, Result};

use crate::error::{to_core_error, GeminiErrorCode};

/// Default generation model.
pub const DEFAULT_MODEL: &str = defaults::GEMINI_MODEL;

/// Default API endpoint.
pub const DEFAULT_BASE_URL: &str = defaults::GEMINI_BASE_URL;

/// Gemini inference backend.
///
/// An explicitly constructed client object: callers build one and pass it
/// down, so tests substitute a fake [`GenerationBackend`] without touching
/// process-wide state.
pub struct GeminiBackend {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    timeout_secs: u64,
}

impl GeminiBackend {
    /// Create a backend for the public API with default model settings.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_config(
            DEFAULT_BASE_URL.to_string(),
            api_key.into(),
            DEFAULT_MODEL.to_string(),
        )
    }

    /// Create a backend with a custom endpoint and model.
    pub fn with_config(base_url: String, api_key: String, model: String) -> Self {
        let timeout_secs = std::env::var("LANDAI_GEN_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults::GEN_TIMEOUT_SECS);

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url,
            api_key,
            model,
            timeout_secs,
        }
    }

    /// Create from environment variables.
    ///
    /// `GEMINI_API_KEY` is required; `GEMINI_MODEL` and `GEMINI_BASE_URL`
    /// override the defaults.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .map_err(|_| Error::Config("GEMINI_API_KEY is not set".to_string()))?;
        let model = std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let base_url =
            std::env::var("GEMINI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        Ok(Self::with_config(base_url, api_key, model))
    }

    /// Internal generation shared by the free-form and JSON variants.
    async fn generate_internal(&self, prompt: &str, json_output: bool) -> Result<String> {
        if prompt.trim().is_empty() {
            return Err(Error::InvalidInput(
                "Prompt must be a non-empty string".to_string(),
            ));
        }

        let start = Instant::now();

        let request = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![Part {
                    text: prompt.trim().to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.7,
                max_output_tokens: defaults::REPORT_MAX_OUTPUT_TOKENS,
                response_mime_type: json_output.then(|| "application/json".to_string()),
            },
        };

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .timeout(Duration::from_secs(self.timeout_secs))
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Unavailable(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let code = GeminiErrorCode::from_response(status.as_u16(), &body);
            warn!(
                subsystem = "inference",
                component = "gemini",
                status = status.as_u16(),
                code = ?code,
                "Gemini call failed"
            );
            return Err(to_core_error(
                code,
                &format!("Gemini returned {}: {}", status, body),
            ));
        }

        let result: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| Error::Internal(format!("Failed to parse response: {}", e)))?;

        let content = result
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| Error::Internal("Gemini response contained no candidates".to_string()))?;

        debug!(
            subsystem = "inference",
            component = "gemini",
            op = "generate",
            model = %self.model,
            json_output,
            prompt_len = prompt.len(),
            response_len = content.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Generation complete"
        );

        Ok(content)
    }
}

/// Request payload for `models/{model}:generateContent`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<RequestContent>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct RequestContent {
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f64,
    max_output_tokens: u32,
    /// `application/json` enforces constrained JSON output.
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[async_trait]
impl GenerationBackend for GeminiBackend {
    #[instrument(skip(self, prompt), fields(subsystem = "inference", component = "gemini", op = "generate", model = %self.model))]
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.generate_internal(prompt, false).await
    }

    #[instrument(skip(self, prompt), fields(subsystem = "inference", component = "gemini", op = "generate_json", model = %self.model))]
    async fn generate_json(&self, prompt: &str) -> Result<JsonValue> {
        let text = self.generate_internal(prompt, true).await?;
        let value: JsonValue = serde_json::from_str(text.trim())?;
        Ok(value)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn backend_for(server: &MockServer) -> GeminiBackend {
        GeminiBackend::with_config(
            server.uri(),
            "test-key".to_string(),
            "gemini-1.5-flash".to_string(),
        )
    }

    fn completion_body(text: &str) -> serde_json::Value {
        serde_json::json!({
            "candidates": [
                { "content": { "parts": [ { "text": text } ], "role": "model" } }
            ]
        })
    }

    #[tokio::test]
    async fn test_generate_returns_candidate_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-1.5-flash:generateContent"))
            .and(query_param("key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("A report.")))
            .mount(&server)
            .await;

        let backend = backend_for(&server);
        let text = backend.generate("Analyze this lease").await.unwrap();
        assert_eq!(text, "A report.");
    }

    #[tokio::test]
    async fn test_generate_json_parses_object() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-1.5-flash:generateContent"))
            .and(body_partial_json(serde_json::json!({
                "generationConfig": { "responseMimeType": "application/json" }
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(completion_body(r#"{"acreage": 160}"#)),
            )
            .mount(&server)
            .await;

        let backend = backend_for(&server);
        let value = backend.generate_json("Extract terms").await.unwrap();
        assert_eq!(value["acreage"], 160);
    }

    #[tokio::test]
    async fn test_generate_json_rejects_non_json_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(completion_body("Sorry, I cannot.")),
            )
            .mount(&server)
            .await;

        let backend = backend_for(&server);
        let err = backend.generate_json("Extract terms").await.unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
    }

    #[tokio::test]
    async fn test_quota_status_maps_to_rate_limited() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("RESOURCE_EXHAUSTED"))
            .mount(&server)
            .await;

        let backend = backend_for(&server);
        let err = backend.generate("prompt").await.unwrap_err();
        assert!(err.is_quota());
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn test_server_error_maps_to_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let backend = backend_for(&server);
        let err = backend.generate("prompt").await.unwrap_err();
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_empty_prompt_rejected_without_call() {
        let server = MockServer::start().await;
        let backend = backend_for(&server);
        let err = backend.generate("   ").await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_candidates_is_internal_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"candidates": []})),
            )
            .mount(&server)
            .await;

        let backend = backend_for(&server);
        let err = backend.generate("prompt").await.unwrap_err();
        assert!(matches!(err, Error::Internal(_)));
    }

    #[test]
    fn test_model_name() {
        let backend = GeminiBackend::with_config(
            "http://localhost".to_string(),
            "k".to_string(),
            "gemini-1.5-flash".to_string(),
        );
        assert_eq!(backend.model_name(), "gemini-1.5-flash");
    }
}
