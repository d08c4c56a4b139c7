use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::GenerationRequest;
use crate::domain::error::{DomainError, GenerationError};
use crate::domain::settings::ModelSettings;

/// A client that turns a prompt into generated text
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TextGenerator: Send + Sync + Debug {
    /// Generate text, classifying every failure
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;
}

/// Builds a fresh text generator for the given settings
#[cfg_attr(test, automock)]
pub trait TextGeneratorFactory: Send + Sync + Debug {
    fn create(&self, settings: &ModelSettings) -> Result<Arc<dyn TextGenerator>, DomainError>;
}
