//! OAuth bearer tokens for Vertex AI

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{DomainError, EnvSource};

pub const ACCESS_TOKEN_VAR: &str = "GOOGLE_ACCESS_TOKEN";

/// Source of access tokens, queried before every provider call
#[async_trait]
pub trait AccessTokenSource: Send + Sync + std::fmt::Debug {
    async fn access_token(&self) -> Result<String, DomainError>;
}

/// Reads `GOOGLE_ACCESS_TOKEN` on every call
#[derive(Debug, Clone)]
pub struct EnvAccessTokenSource {
    env: Arc<dyn EnvSource>,
}

impl EnvAccessTokenSource {
    pub fn new(env: Arc<dyn EnvSource>) -> Self {
        Self { env }
    }

    /// The trimmed token, if one is set
    pub fn lookup(&self) -> Option<String> {
        self.env
            .var(ACCESS_TOKEN_VAR)
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
    }
}

#[async_trait]
impl AccessTokenSource for EnvAccessTokenSource {
    async fn access_token(&self) -> Result<String, DomainError> {
        self.lookup().ok_or_else(|| {
            DomainError::authentication(format!(
                "environment variable '{}' does not hold an access token",
                ACCESS_TOKEN_VAR
            ))
        })
    }
}

/// Fixed token
#[derive(Debug, Clone)]
pub struct StaticAccessTokenSource {
    token: String,
}

impl StaticAccessTokenSource {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl AccessTokenSource for StaticAccessTokenSource {
    async fn access_token(&self) -> Result<String, DomainError> {
        Ok(self.token.clone())
    }
}
