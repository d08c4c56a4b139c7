//! `/llm` endpoint handlers

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{error, info};

use crate::api::middleware::truncate_for_log;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, LlmInfo, TextInput, TextOutput};
use crate::domain::{GenerationRequest, ModelSettings};

const PROMPT_LOG_CHARS: usize = 200;

/// POST /llm
pub async fn generate_text(
    State(state): State<AppState>,
    Json(input): Json<TextInput>,
) -> Result<Json<TextOutput>, ApiError> {
    info!(
        prompt = %truncate_for_log(&input.prompt, PROMPT_LOG_CHARS),
        "Incoming request to /llm"
    );

    let settings = ModelSettings::resolve(state.env.as_ref())?;
    let generator = state.generator_factory.create(&settings).map_err(|e| {
        error!(error = %e, "Failed to create text generator");
        ApiError::from(e)
    })?;

    let request = GenerationRequest::from(input);
    let answer = generator.generate(&request).await.map_err(|e| {
        error!(
            code = %e.code,
            status = e.status,
            message = %e.message,
            provider = generator.provider_name(),
            "Error in /llm endpoint"
        );
        ApiError::from(e)
    })?;

    Ok(Json(TextOutput { answer }))
}

/// GET /llm
pub async fn get_llm_info(State(state): State<AppState>) -> Response {
    match ModelSettings::resolve(state.env.as_ref()) {
        Ok(settings) => (StatusCode::OK, Json(LlmInfo::from(settings))).into_response(),
        Err(e) => {
            error!(error = %e, "Error in /llm endpoint");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}
