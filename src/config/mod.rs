//! Process configuration, loaded once at startup

mod app_config;

pub use app_config::{AppConfig, LogFormat, LoggingConfig, ProviderConfig, ServerConfig};
