use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Leading text of every credential failure. Call errors containing it classify
/// as `UNAUTHENTICATED`.
pub const AUTHENTICATION_FAILURE: &str = "Unable to authenticate your request";

/// Machine-readable error codes returned to API clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Authentication
    Unauthenticated,
    PermissionDenied,

    // Request
    InvalidRequest,
    ValidationError,

    // Provider
    ProviderError,
    NoResponse,
    NoCandidate,
    MissingContent,

    // Internal
    ConfigValidationError,
    InternalServerError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::PermissionDenied => "PERMISSION_DENIED",
            Self::InvalidRequest => "INVALID_REQUEST",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::ProviderError => "PROVIDER_ERROR",
            Self::NoResponse => "NO_RESPONSE",
            Self::NoCandidate => "NO_CANDIDATE",
            Self::MissingContent => "MISSING_CONTENT",
            Self::ConfigValidationError => "CONFIG_VALIDATION_ERROR",
            Self::InternalServerError => "INTERNAL_SERVER_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified failure of the generation pipeline.
///
/// Created where the failure is detected and carried unchanged to the HTTP
/// boundary, which renders `code` and `message` with `status`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {message}")]
pub struct GenerationError {
    pub code: ErrorCode,
    pub message: String,
    pub status: u16,
}

impl GenerationError {
    pub fn new(code: ErrorCode, message: impl Into<String>, status: u16) -> Self {
        Self {
            code,
            message: message.into(),
            status,
        }
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthenticated, message, 401)
    }

    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::PermissionDenied, message, 403)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message, 400)
    }

    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ProviderError, message, 500)
    }

    pub fn no_response(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NoResponse, message, 500)
    }

    pub fn no_candidate(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NoCandidate, message, 500)
    }

    pub fn missing_content(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::MissingContent, message, 500)
    }
}

/// Errors raised while resolving model settings from the environment
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("Environment variable {name} must not be empty")]
    Empty { name: &'static str },

    #[error("Environment variable {name} is not set")]
    NotSet { name: &'static str },
}

/// Infrastructure errors that are not part of the classified taxonomy
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Provider error: {provider} - {message}")]
    Provider { provider: String, message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Credential lookup failed or the provider rejected the bearer token
    pub fn authentication(detail: impl fmt::Display) -> Self {
        Self::Provider {
            provider: "google-auth".to_string(),
            message: format!("{}: {}", AUTHENTICATION_FAILURE, detail),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_serialization() {
        assert_eq!(
            serde_json::to_string(&ErrorCode::Unauthenticated).unwrap(),
            "\"UNAUTHENTICATED\""
        );
        assert_eq!(
            serde_json::to_string(&ErrorCode::ConfigValidationError).unwrap(),
            "\"CONFIG_VALIDATION_ERROR\""
        );
        assert_eq!(
            serde_json::to_string(&ErrorCode::InternalServerError).unwrap(),
            "\"INTERNAL_SERVER_ERROR\""
        );
    }

    #[test]
    fn test_error_code_display_matches_wire_format() {
        for code in [
            ErrorCode::PermissionDenied,
            ErrorCode::NoCandidate,
            ErrorCode::MissingContent,
            ErrorCode::ValidationError,
        ] {
            let wire = serde_json::to_string(&code).unwrap();
            assert_eq!(wire, format!("\"{}\"", code));
        }
    }

    #[test]
    fn test_generation_error_statuses() {
        assert_eq!(GenerationError::unauthenticated("").status, 401);
        assert_eq!(GenerationError::permission_denied("").status, 403);
        assert_eq!(GenerationError::invalid_request("").status, 400);
        assert_eq!(GenerationError::provider("").status, 500);
        assert_eq!(GenerationError::no_response("").status, 500);
        assert_eq!(GenerationError::no_candidate("").status, 500);
        assert_eq!(GenerationError::missing_content("").status, 500);
    }

    #[test]
    fn test_generation_error_display() {
        let error = GenerationError::no_candidate("nothing came back");
        assert_eq!(error.to_string(), "NO_CANDIDATE: nothing came back");
    }

    #[test]
    fn test_settings_error_display() {
        let error = SettingsError::Empty { name: "PROJECT_ID" };
        assert_eq!(
            error.to_string(),
            "Environment variable PROJECT_ID must not be empty"
        );
    }

    #[test]
    fn test_provider_domain_error() {
        let error = DomainError::provider("http", "HTTP 500");
        assert_eq!(error.to_string(), "Provider error: http - HTTP 500");
    }

    #[test]
    fn test_authentication_error_classifies_as_unauthenticated() {
        let error = DomainError::authentication("token expired");

        assert!(error.to_string().contains(AUTHENTICATION_FAILURE));
        let classified = crate::domain::llm::classify_call_error(&error.to_string());
        assert_eq!(classified.code, ErrorCode::Unauthenticated);
        assert_eq!(classified.status, 401);
    }
}
