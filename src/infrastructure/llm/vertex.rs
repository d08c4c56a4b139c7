use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

use super::credentials::AccessTokenSource;
use super::http_client::HttpClientTrait;
use crate::domain::llm::{classify_call_error, extract_answer, GenerateContentRequest};
use crate::domain::{
    DomainError, GenerateContentResponse, GenerationError, GenerationRequest, ModelSettings,
    TextGenerator,
};

const PUBLISHER: &str = "google";

/// Vertex AI Gemini client bound to one project, region and model
#[derive(Debug)]
pub struct VertexAiClient<C: HttpClientTrait> {
    client: C,
    settings: ModelSettings,
    base_url: Option<String>,
    token_source: Arc<dyn AccessTokenSource>,
}

impl<C: HttpClientTrait> VertexAiClient<C> {
    pub fn new(
        client: C,
        settings: ModelSettings,
        token_source: Arc<dyn AccessTokenSource>,
    ) -> Self {
        Self {
            client,
            settings,
            base_url: None,
            token_source,
        }
    }

    /// Send requests to `base_url` instead of the regional endpoint
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into().trim_end_matches('/').to_string());
        self
    }

    pub fn settings(&self) -> &ModelSettings {
        &self.settings
    }

    fn base_url(&self) -> String {
        match &self.base_url {
            Some(url) => url.clone(),
            None => format!("https://{}-aiplatform.googleapis.com", self.settings.location),
        }
    }

    fn generate_content_url(&self) -> String {
        format!(
            "{}/v1/projects/{}/locations/{}/publishers/{}/models/{}:generateContent",
            self.base_url(),
            self.settings.project_id,
            self.settings.location,
            PUBLISHER,
            self.settings.text_model
        )
    }

    async fn call(
        &self,
        request: &GenerationRequest,
    ) -> Result<Option<GenerateContentResponse>, DomainError> {
        let token = self.token_source.access_token().await?;
        let authorization = format!("Bearer {}", token);

        let url = self.generate_content_url();
        let body = serde_json::to_value(GenerateContentRequest::from(request)).map_err(|e| {
            DomainError::internal(format!("Failed to serialize request: {}", e))
        })?;

        let headers = vec![
            ("Authorization", authorization.as_str()),
            ("Content-Type", "application/json"),
        ];

        let response = self.client.post_json(&url, headers, &body).await?;

        serde_json::from_value(response).map_err(|e| {
            DomainError::provider("vertex_ai", format!("Failed to parse response: {}", e))
        })
    }
}

#[async_trait]
impl<C: HttpClientTrait> TextGenerator for VertexAiClient<C> {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        info!(
            project_id = %self.settings.project_id,
            location = %self.settings.location,
            model_name = %self.settings.text_model,
            "Calling generateContent"
        );

        let response = self.call(request).await.map_err(|e| {
            error!(error = %e, "Error during generateContent API call");
            classify_call_error(&e.to_string())
        })?;

        extract_answer(response)
    }

    fn provider_name(&self) -> &'static str {
        "vertex_ai"
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::domain::{ErrorCode, MapEnv};
    use crate::infrastructure::llm::credentials::{EnvAccessTokenSource, StaticAccessTokenSource};
    use crate::infrastructure::llm::http_client::mock::MockHttpClient;

    use super::*;

    const TEST_URL: &str = "https://us-central1-aiplatform.googleapis.com/v1/projects/my-project/locations/us-central1/publishers/google/models/gemini-1.0-pro:generateContent";

    fn settings() -> ModelSettings {
        ModelSettings {
            project_id: "my-project".to_string(),
            location: "us-central1".to_string(),
            text_model: "gemini-1.0-pro".to_string(),
        }
    }

    fn client(http: MockHttpClient) -> VertexAiClient<MockHttpClient> {
        VertexAiClient::new(http, settings(), Arc::new(StaticAccessTokenSource::new("test-token")))
    }

    fn stop_response(parts: &[&str]) -> serde_json::Value {
        let parts: Vec<_> = parts.iter().map(|text| json!({"text": text})).collect();
        json!({
            "candidates": [{
                "content": {"role": "model", "parts": parts},
                "finishReason": "STOP"
            }]
        })
    }

    #[test]
    fn test_regional_endpoint() {
        let client = client(MockHttpClient::new());
        assert_eq!(client.generate_content_url(), TEST_URL);
    }

    #[test]
    fn test_base_url_override() {
        let client = client(MockHttpClient::new()).with_base_url("http://localhost:9000/");

        assert_eq!(
            client.generate_content_url(),
            "http://localhost:9000/v1/projects/my-project/locations/us-central1/publishers/google/models/gemini-1.0-pro:generateContent"
        );
    }

    #[tokio::test]
    async fn test_generate_success() {
        let http = MockHttpClient::new().with_response(TEST_URL, stop_response(&["Hi", " there"]));
        let client = client(http);

        let answer = client
            .generate(&GenerationRequest::new("Hello"))
            .await
            .unwrap();

        assert_eq!(answer, "Hi there");
    }

    #[tokio::test]
    async fn test_generate_sends_prompt_and_token() {
        let http = MockHttpClient::new().with_response(TEST_URL, stop_response(&["ok"]));
        let client = client(http);

        let request = GenerationRequest::new("Hello").with_option("temperature", 0.5);
        client.generate(&request).await.unwrap();

        let recorded = client.client.requests();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].body["contents"][0]["parts"][0]["text"], "Hello");
        assert_eq!(recorded[0].body["generationConfig"]["temperature"], 0.5);
        assert!(recorded[0]
            .headers
            .contains(&("Authorization".to_string(), "Bearer test-token".to_string())));
    }

    #[tokio::test]
    async fn test_generate_permission_denied() {
        let http = MockHttpClient::new().with_error(
            TEST_URL,
            r#"HTTP 403 Forbidden: {"error": {"code": 403, "status": "PERMISSION_DENIED"}}"#,
        );

        let err = client(http)
            .generate(&GenerationRequest::new("Hello"))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::PermissionDenied);
        assert_eq!(err.status, 403);
    }

    #[tokio::test]
    async fn test_generate_without_token_is_unauthenticated() {
        let http = MockHttpClient::new().with_response(TEST_URL, stop_response(&["never"]));
        let token_source = Arc::new(EnvAccessTokenSource::new(Arc::new(MapEnv::new())));
        let client = VertexAiClient::new(http, settings(), token_source);

        let err = client
            .generate(&GenerationRequest::new("Hello"))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::Unauthenticated);
        assert_eq!(err.status, 401);
        assert!(client.client.requests().is_empty());
    }

    #[tokio::test]
    async fn test_generate_other_failure_keeps_message() {
        let http = MockHttpClient::new().with_error(TEST_URL, "HTTP 503: backend unavailable");

        let err = client(http)
            .generate(&GenerationRequest::new("Hello"))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::ProviderError);
        assert_eq!(err.status, 500);
        assert!(err.message.contains("HTTP 503: backend unavailable"));
    }

    #[tokio::test]
    async fn test_generate_null_body_is_no_response() {
        let http = MockHttpClient::new().with_response(TEST_URL, serde_json::Value::Null);

        let err = client(http)
            .generate(&GenerationRequest::new("Hello"))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::NoResponse);
    }

    #[tokio::test]
    async fn test_generate_unparseable_body_is_provider_error() {
        let http = MockHttpClient::new().with_response(TEST_URL, json!({"candidates": "nope"}));

        let err = client(http)
            .generate(&GenerationRequest::new("Hello"))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::ProviderError);
        assert_eq!(err.status, 500);
    }

    #[tokio::test]
    async fn test_generate_blocked_prompt() {
        let http = MockHttpClient::new().with_response(
            TEST_URL,
            json!({"promptFeedback": {"blockReason": "SAFETY"}}),
        );

        let err = client(http)
            .generate(&GenerationRequest::new("Hello"))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::InvalidRequest);
        assert_eq!(err.status, 400);
    }

    #[test]
    fn test_provider_name() {
        assert_eq!(client(MockHttpClient::new()).provider_name(), "vertex_ai");
    }
}
