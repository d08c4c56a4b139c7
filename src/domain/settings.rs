//! Model settings resolved from the process environment on every request

use std::collections::HashMap;
use std::env;
use std::fmt::Debug;

use serde::Serialize;
use tracing::error;

use super::error::SettingsError;

pub const PROJECT_ID_VAR: &str = "PROJECT_ID";
pub const LOCATION_VAR: &str = "LOCATION";
pub const TEXT_MODEL_VAR: &str = "TEXT_MODEL";

pub const PROJECT_ID_NOT_SET: &str = "PROJECT_ID_NOT_SET";
pub const LOCATION_NOT_SET: &str = "LOCATION_NOT_SET";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-1.0-pro";

/// Read access to environment variables
pub trait EnvSource: Send + Sync + Debug {
    fn var(&self, name: &str) -> Option<String>;
}

/// Reads the real process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        env::var(name).ok()
    }
}

/// Fixed set of variables, used when the process environment must not leak in
#[derive(Debug, Clone, Default)]
pub struct MapEnv {
    vars: HashMap<String, String>,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }
}

impl EnvSource for MapEnv {
    fn var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

/// Project, region and model used for a single generation call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelSettings {
    pub project_id: String,
    pub location: String,
    pub text_model: String,
}

impl ModelSettings {
    /// Resolve settings from `env`.
    ///
    /// Unset project or location fall back to their `*_NOT_SET` sentinels, which
    /// are rejected together with empty values.
    pub fn resolve(env: &dyn EnvSource) -> Result<Self, SettingsError> {
        let project_id = env
            .var(PROJECT_ID_VAR)
            .unwrap_or_else(|| PROJECT_ID_NOT_SET.to_string());
        let location = env
            .var(LOCATION_VAR)
            .unwrap_or_else(|| LOCATION_NOT_SET.to_string());
        let text_model = env
            .var(TEXT_MODEL_VAR)
            .unwrap_or_else(|| DEFAULT_TEXT_MODEL.to_string());

        let settings = Self {
            project_id,
            location,
            text_model,
        };

        settings.validate().inspect_err(|e| {
            error!(error = %e, "Environment variable validation error");
        })?;

        Ok(settings)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        check_required(PROJECT_ID_VAR, &self.project_id, PROJECT_ID_NOT_SET)?;
        check_required(LOCATION_VAR, &self.location, LOCATION_NOT_SET)
    }
}

fn check_required(
    name: &'static str,
    value: &str,
    sentinel: &str,
) -> Result<(), SettingsError> {
    if value.is_empty() {
        return Err(SettingsError::Empty { name });
    }

    if value == sentinel {
        return Err(SettingsError::NotSet { name });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_env() -> MapEnv {
        MapEnv::new()
            .with_var(PROJECT_ID_VAR, "my-project")
            .with_var(LOCATION_VAR, "us-central1")
            .with_var(TEXT_MODEL_VAR, "gemini-1.5-flash")
    }

    #[test]
    fn test_resolve_all_values() {
        let settings = ModelSettings::resolve(&full_env()).unwrap();

        assert_eq!(settings.project_id, "my-project");
        assert_eq!(settings.location, "us-central1");
        assert_eq!(settings.text_model, "gemini-1.5-flash");
    }

    #[test]
    fn test_default_text_model() {
        let env = MapEnv::new()
            .with_var(PROJECT_ID_VAR, "my-project")
            .with_var(LOCATION_VAR, "asia-northeast1");

        let settings = ModelSettings::resolve(&env).unwrap();
        assert_eq!(settings.text_model, "gemini-1.0-pro");
    }

    #[test]
    fn test_empty_project_id_fails() {
        let env = full_env().with_var(PROJECT_ID_VAR, "");

        let err = ModelSettings::resolve(&env).unwrap_err();
        assert_eq!(err, SettingsError::Empty { name: "PROJECT_ID" });
    }

    #[test]
    fn test_empty_location_fails() {
        let env = full_env().with_var(LOCATION_VAR, "");

        let err = ModelSettings::resolve(&env).unwrap_err();
        assert_eq!(err, SettingsError::Empty { name: "LOCATION" });
    }

    #[test]
    fn test_unset_values_fail() {
        let env = MapEnv::new().with_var(LOCATION_VAR, "us-central1");
        let err = ModelSettings::resolve(&env).unwrap_err();
        assert_eq!(err, SettingsError::NotSet { name: "PROJECT_ID" });

        let env = MapEnv::new().with_var(PROJECT_ID_VAR, "my-project");
        let err = ModelSettings::resolve(&env).unwrap_err();
        assert_eq!(err, SettingsError::NotSet { name: "LOCATION" });
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let env = full_env();

        let first = ModelSettings::resolve(&env).unwrap();
        let second = ModelSettings::resolve(&env).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_process_env_reads_variables() {
        // SAFETY: variable name is unique to this test
        unsafe { env::set_var("VERTEX_LLM_BACKEND_TEST_VAR", "value") };

        assert_eq!(
            ProcessEnv.var("VERTEX_LLM_BACKEND_TEST_VAR"),
            Some("value".to_string())
        );
        assert_eq!(ProcessEnv.var("VERTEX_LLM_BACKEND_MISSING_VAR"), None);

        unsafe { env::remove_var("VERTEX_LLM_BACKEND_TEST_VAR") };
    }
}
