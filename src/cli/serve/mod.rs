//! Serve command - runs the HTTP server

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};

use crate::api::{create_router, AppState};
use crate::config::AppConfig;
use crate::domain::{EnvSource, ModelSettings, ProcessEnv};
use crate::infrastructure::llm::VertexAiClientFactory;
use crate::infrastructure::logging;

/// Run the server until Ctrl+C or SIGTERM
pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    logging::init_logging(&config.logging);

    let state = create_app_state(&config, Arc::new(ProcessEnv));
    report_model_settings(&state);

    let app = create_router(state);

    let addr = build_socket_addr(&config)?;
    info!("Starting server on {}", addr);

    let listener = TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");

    Ok(())
}

/// Wire the state used by the router
pub fn create_app_state(config: &AppConfig, env: Arc<dyn EnvSource>) -> AppState {
    let factory = VertexAiClientFactory::from_config(&config.provider, env.clone());
    AppState::new(env, Arc::new(factory))
}

// Settings are resolved again on every request; this only surfaces problems early.
fn report_model_settings(state: &AppState) {
    match ModelSettings::resolve(state.env.as_ref()) {
        Ok(settings) => info!(
            project_id = %settings.project_id,
            location = %settings.location,
            text_model = %settings.text_model,
            "Model settings resolved"
        ),
        Err(e) => warn!(error = %e, "Model settings are invalid; /llm will fail until fixed"),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}

fn build_socket_addr(config: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    )))
}
