//! Application state shared by the handlers

use std::sync::Arc;

use crate::domain::{EnvSource, TextGeneratorFactory};

/// Immutable handles shared across requests.
///
/// Settings and generators are not cached here; handlers resolve and build
/// them on every request.
#[derive(Clone)]
pub struct AppState {
    pub env: Arc<dyn EnvSource>,
    pub generator_factory: Arc<dyn TextGeneratorFactory>,
}

impl AppState {
    pub fn new(env: Arc<dyn EnvSource>, generator_factory: Arc<dyn TextGeneratorFactory>) -> Self {
        Self {
            env,
            generator_factory,
        }
    }
}
