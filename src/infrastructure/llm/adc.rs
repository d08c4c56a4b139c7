//! Application Default Credentials for Vertex AI
//!
//! Tokens are looked up in this order:
//! 1. `GOOGLE_ACCESS_TOKEN`
//! 2. the service account key file named by `GOOGLE_APPLICATION_CREDENTIALS`
//! 3. the GCE / Cloud Run metadata server
//!
//! Tokens obtained from the last two are cached until shortly before expiry.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::credentials::{AccessTokenSource, EnvAccessTokenSource, ACCESS_TOKEN_VAR};
use crate::domain::{DomainError, EnvSource};

pub const CREDENTIALS_FILE_VAR: &str = "GOOGLE_APPLICATION_CREDENTIALS";
pub const METADATA_TOKEN_URL: &str =
    "http://169.254.169.254/computeMetadata/v1/instance/service-accounts/default/token";

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
const EXPIRY_MARGIN_SECS: i64 = 300;
const TOKEN_ENDPOINT_TIMEOUT: Duration = Duration::from_secs(10);
const METADATA_TIMEOUT: Duration = Duration::from_secs(2);

/// The fields of a service account key file needed for the JWT bearer grant
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub token_uri: Option<String>,
}

impl ServiceAccountKey {
    pub fn from_json(json: &str) -> Result<Self, DomainError> {
        serde_json::from_str(json).map_err(|e| {
            DomainError::authentication(format!("invalid service account key file: {}", e))
        })
    }

    fn token_uri(&self) -> &str {
        self.token_uri.as_deref().unwrap_or(DEFAULT_TOKEN_URI)
    }

    /// RS256-signed assertion exchanged for an access token
    fn sign_assertion(&self, now: i64) -> Result<String, DomainError> {
        let claims = Claims {
            iss: &self.client_email,
            scope: CLOUD_PLATFORM_SCOPE,
            aud: self.token_uri(),
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECS,
        };

        let key = EncodingKey::from_rsa_pem(self.private_key.as_bytes()).map_err(|e| {
            DomainError::authentication(format!("invalid service account private key: {}", e))
        })?;

        encode(&Header::new(Algorithm::RS256), &claims, &key)
            .map_err(|e| DomainError::authentication(format!("failed to sign assertion: {}", e)))
    }
}

#[derive(Debug, Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Debug, Clone)]
struct CachedToken {
    token: String,
    expires_at: i64,
}

impl CachedToken {
    fn is_fresh(&self) -> bool {
        self.expires_at - EXPIRY_MARGIN_SECS > Utc::now().timestamp()
    }
}

impl From<TokenResponse> for CachedToken {
    fn from(response: TokenResponse) -> Self {
        Self {
            token: response.access_token,
            expires_at: Utc::now().timestamp() + response.expires_in,
        }
    }
}

/// Access tokens resolved through the Application Default Credentials chain
#[derive(Debug)]
pub struct AdcTokenSource {
    env: Arc<dyn EnvSource>,
    env_token: EnvAccessTokenSource,
    http: reqwest::Client,
    metadata_url: String,
    // held across the refresh so concurrent callers share one lookup
    cache: Mutex<Option<CachedToken>>,
}

impl AdcTokenSource {
    pub fn new(env: Arc<dyn EnvSource>) -> Self {
        Self {
            env_token: EnvAccessTokenSource::new(env.clone()),
            env,
            http: reqwest::Client::new(),
            metadata_url: METADATA_TOKEN_URL.to_string(),
            cache: Mutex::new(None),
        }
    }

    pub fn with_metadata_url(mut self, url: impl Into<String>) -> Self {
        self.metadata_url = url.into();
        self
    }

    async fn service_account_token(&self) -> Result<Option<CachedToken>, DomainError> {
        let Some(path) = self
            .env
            .var(CREDENTIALS_FILE_VAR)
            .map(|path| path.trim().to_string())
            .filter(|path| !path.is_empty())
        else {
            return Ok(None);
        };

        let json = tokio::fs::read_to_string(&path).await.map_err(|e| {
            DomainError::authentication(format!(
                "cannot read {} file {}: {}",
                CREDENTIALS_FILE_VAR, path, e
            ))
        })?;
        let key = ServiceAccountKey::from_json(&json)?;
        let assertion = key.sign_assertion(Utc::now().timestamp())?;

        let response = self
            .http
            .post(key.token_uri())
            .timeout(TOKEN_ENDPOINT_TIMEOUT)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| {
                DomainError::authentication(format!("token endpoint request failed: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DomainError::authentication(format!(
                "token endpoint returned {}: {}",
                status, body
            )));
        }

        let token: TokenResponse = response.json().await.map_err(|e| {
            DomainError::authentication(format!("invalid token endpoint response: {}", e))
        })?;

        info!(client_email = %key.client_email, "Obtained access token for service account");
        Ok(Some(token.into()))
    }

    // Off Google Cloud the metadata server is unreachable; that is not an error here.
    async fn metadata_token(&self) -> Option<CachedToken> {
        let response = match self
            .http
            .get(&self.metadata_url)
            .header("Metadata-Flavor", "Google")
            .timeout(METADATA_TIMEOUT)
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                debug!(status = %response.status(), "Metadata server refused token request");
                return None;
            }
            Err(e) => {
                debug!(error = %e, "Metadata server unavailable");
                return None;
            }
        };

        match response.json::<TokenResponse>().await {
            Ok(token) => {
                info!("Obtained access token from metadata server");
                Some(token.into())
            }
            Err(e) => {
                warn!(error = %e, "Invalid metadata server token response");
                None
            }
        }
    }
}

#[async_trait]
impl AccessTokenSource for AdcTokenSource {
    async fn access_token(&self) -> Result<String, DomainError> {
        if let Some(token) = self.env_token.lookup() {
            return Ok(token);
        }

        let mut cache = self.cache.lock().await;
        if let Some(cached) = cache.as_ref().filter(|cached| cached.is_fresh()) {
            return Ok(cached.token.clone());
        }

        let fetched = match self.service_account_token().await? {
            Some(token) => token,
            None => self.metadata_token().await.ok_or_else(|| {
                DomainError::authentication(format!(
                    "no access token in {}, no {} file and no metadata server token",
                    ACCESS_TOKEN_VAR,
                    CREDENTIALS_FILE_VAR
                ))
            })?,
        };

        let token = fetched.token.clone();
        *cache = Some(fetched);
        Ok(token)
    }
}
