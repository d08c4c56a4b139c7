//! HTTP request/response types

pub mod error;
pub mod json;
pub mod llm;

pub use error::{ApiError, ErrorResponse};
pub use json::Json;
pub use llm::{LlmInfo, TextInput, TextOutput};
