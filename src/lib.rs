use anyhow::{Context, Result};
use log::info;

pub mod grading;
pub mod progress; // Pet levels, performance alerts and volunteer badges
pub mod providers; // Hosted vision models used for grading
pub mod radar; // Skills radar chart geometry and SVG rendering
pub mod server;
pub mod settings;

use grading::GradingGateway;
use server::AppState;
use settings::Settings;

/// Serve the grading API until the process is stopped.
pub async fn run(settings: Settings) -> Result<()> {
    info!("Dr. Owl starting...");
    settings.log_status();

    let gateway = GradingGateway::from_settings(&settings);
    let app = server::router(AppState::new(gateway), settings.max_body_bytes());

    let listener = tokio::net::TcpListener::bind(&settings.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", settings.bind_addr))?;

    info!("🚀 Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Dr. Owl stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
