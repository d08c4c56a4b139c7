//! Text generation domain models and traits

mod classifier;
mod provider;
mod request;
mod response;

pub use classifier::{classify_call_error, extract_answer};
pub use provider::{TextGenerator, TextGeneratorFactory};
pub use request::{GenerateContentRequest, GenerationRequest, RequestContent, RequestPart};
pub use response::{
    Candidate, Content, FinishReason, GenerateContentResponse, Part, PromptFeedback, UsageMetadata,
};

#[cfg(test)]
pub use provider::{MockTextGenerator, MockTextGeneratorFactory};
