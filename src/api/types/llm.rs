//! Request and response bodies of the `/llm` endpoint

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::{GenerationRequest, ModelSettings};

/// `POST /llm` body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextInput {
    pub prompt: String,
    /// Forwarded to the provider as generation options
    #[serde(default)]
    pub generation_config: Option<Map<String, Value>>,
}

impl From<TextInput> for GenerationRequest {
    fn from(input: TextInput) -> Self {
        GenerationRequest::new(input.prompt)
            .with_generation_config(input.generation_config.unwrap_or_default())
    }
}

/// `POST /llm` success body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextOutput {
    pub answer: String,
}

/// `GET /llm` body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmInfo {
    pub project_id: String,
    pub location: String,
    pub text_model: String,
}

impl From<ModelSettings> for LlmInfo {
    fn from(settings: ModelSettings) -> Self {
        Self {
            project_id: settings.project_id,
            location: settings.location,
            text_model: settings.text_model,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_input_without_options() {
        let input: TextInput = serde_json::from_value(json!({"prompt": "Hello"})).unwrap();
        let request = GenerationRequest::from(input);

        assert_eq!(request.prompt, "Hello");
        assert!(request.generation_config.is_empty());
    }

    #[test]
    fn test_text_input_with_options() {
        let input: TextInput = serde_json::from_value(json!({
            "prompt": "Hello",
            "generation_config": {"temperature": 0.2}
        }))
        .unwrap();
        let request = GenerationRequest::from(input);

        assert_eq!(request.generation_config["temperature"], json!(0.2));
    }

    #[test]
    fn test_llm_info_serialization() {
        let info = LlmInfo::from(ModelSettings {
            project_id: "p".to_string(),
            location: "l".to_string(),
            text_model: "m".to_string(),
        });

        assert_eq!(
            serde_json::to_value(info).unwrap(),
            json!({"project_id": "p", "location": "l", "text_model": "m"})
        );
    }
}
