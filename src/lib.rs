//! Vertex LLM backend
//!
//! A small HTTP service that forwards a prompt to a Vertex AI Gemini model and
//! returns the generated text, mapping provider failures to a fixed set of
//! error codes.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use api::{create_router, AppState};
pub use cli::serve::create_app_state;
pub use config::AppConfig;
