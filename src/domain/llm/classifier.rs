//! Maps provider failures and response anomalies onto the error taxonomy

use tracing::{info, warn};

use super::response::{FinishReason, GenerateContentResponse};
use crate::domain::error::{ErrorCode, GenerationError};

const PERMISSION_DENIED_SIGNAL: &str = "PERMISSION_DENIED";
const UNABLE_TO_AUTHENTICATE_SIGNAL: &str = "Unable to authenticate your request";
const UNABLE_TO_IMPERSONATE_SIGNAL: &str = "unable to impersonate";
const AUTHENTICATION_SIGNAL: &str = "Unable to authenticate";

/// Classify the text of a failed provider call.
///
/// Matching is by substring. Authentication wins over permission when both
/// signals are present.
pub fn classify_call_error(error_text: &str) -> GenerationError {
    let is_auth_failure = error_text.contains(PERMISSION_DENIED_SIGNAL)
        || error_text.contains(UNABLE_TO_AUTHENTICATE_SIGNAL)
        || error_text.contains(UNABLE_TO_IMPERSONATE_SIGNAL);

    if !is_auth_failure {
        return GenerationError::provider(error_text);
    }

    if error_text.contains(AUTHENTICATION_SIGNAL) {
        GenerationError::unauthenticated("Authentication failed")
    } else {
        GenerationError::permission_denied("Permission Denied")
    }
}

/// Extract the answer text from a provider response.
///
/// Checks run in a fixed order: missing response, prompt feedback, candidates,
/// finish reason of the first candidate, then its content.
pub fn extract_answer(
    response: Option<GenerateContentResponse>,
) -> Result<String, GenerationError> {
    let Some(response) = response else {
        return Err(GenerationError::no_response(
            "No response received from Vertex AI.",
        ));
    };

    if let Some(feedback) = response.prompt_feedback.as_ref().filter(|f| !f.is_empty()) {
        warn!(prompt_feedback = ?feedback, "Prompt was blocked by the provider");
        return Err(GenerationError::invalid_request(
            "Prompt was blocked due to safety concerns.",
        ));
    }

    let Some(candidate) = response.candidates.into_iter().next() else {
        return Err(GenerationError::no_candidate(
            "No candidate responses received from Vertex AI.",
        ));
    };

    match candidate.finish_reason {
        Some(FinishReason::Stop) => {}
        Some(FinishReason::Safety) => {
            return Err(GenerationError::new(
                ErrorCode::ProviderError,
                "Candidate was blocked due to safety concerns.",
                400,
            ));
        }
        other => warn!(finish_reason = ?other, "Candidate finished without STOP"),
    }

    let Some(content) = candidate.content else {
        return Err(GenerationError::missing_content(
            "Candidate response is missing content.",
        ));
    };

    if content.parts.is_empty() {
        return Err(GenerationError::missing_content(
            "Candidate response is missing content parts.",
        ));
    }

    let answer: String = content
        .parts
        .into_iter()
        .filter_map(|part| part.text)
        .collect();

    info!(answer_len = answer.len(), "Generated answer text");
    Ok(answer)
}
