//! Domain layer - Core business logic and entities

pub mod error;
pub mod llm;
pub mod settings;

pub use error::{
    DomainError, ErrorCode, GenerationError, SettingsError, AUTHENTICATION_FAILURE,
};
pub use llm::{
    Candidate, Content, FinishReason, GenerateContentResponse, GenerationRequest, Part,
    PromptFeedback, TextGenerator, TextGeneratorFactory,
};
pub use settings::{EnvSource, MapEnv, ModelSettings, ProcessEnv};
