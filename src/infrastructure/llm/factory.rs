use std::sync::Arc;
use std::time::Duration;

use super::adc::AdcTokenSource;
use super::credentials::AccessTokenSource;
use super::http_client::HttpClient;
use super::vertex::VertexAiClient;
use crate::config::ProviderConfig;
use crate::domain::{DomainError, EnvSource, ModelSettings, TextGenerator, TextGeneratorFactory};

/// Factory for creating Vertex AI clients, one per request
#[derive(Debug, Clone)]
pub struct VertexAiClientFactory {
    timeout: Duration,
    base_url: Option<String>,
    token_source: Arc<dyn AccessTokenSource>,
}

impl VertexAiClientFactory {
    pub fn new(timeout: Duration, token_source: Arc<dyn AccessTokenSource>) -> Self {
        Self {
            timeout,
            base_url: None,
            token_source,
        }
    }

    /// Create a factory from provider configuration, authenticating through
    /// Application Default Credentials read from `env`
    pub fn from_config(config: &ProviderConfig, env: Arc<dyn EnvSource>) -> Self {
        let token_source = match &config.metadata_url {
            Some(url) => AdcTokenSource::new(env).with_metadata_url(url),
            None => AdcTokenSource::new(env),
        };
        let factory = Self::new(
            Duration::from_secs(config.timeout_secs),
            Arc::new(token_source),
        );

        match &config.endpoint {
            Some(endpoint) => factory.with_base_url(endpoint),
            None => factory,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    fn build(&self, settings: &ModelSettings) -> Result<VertexAiClient<HttpClient>, DomainError> {
        let http_client = HttpClient::with_timeout(self.timeout)?;
        let client = VertexAiClient::new(http_client, settings.clone(), self.token_source.clone());

        Ok(match &self.base_url {
            Some(base_url) => client.with_base_url(base_url),
            None => client,
        })
    }
}

impl TextGeneratorFactory for VertexAiClientFactory {
    fn create(&self, settings: &ModelSettings) -> Result<Arc<dyn TextGenerator>, DomainError> {
        Ok(Arc::new(self.build(settings)?))
    }
}
