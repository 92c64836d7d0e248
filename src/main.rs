//! # EduAdvise Server
//!
//! Backend for the EduAdvise counseling platform.
//!
//! This is the application entry point that initializes:
//! - Tracing/logging subsystem
//! - Configuration loading
//! - Database connection pool and migrations
//! - HTTP API, WebSocket realtime layer, and the reminder scheduler

use anyhow::Result;
use tracing::info;

use eduadvise_server::config::Settings;
use eduadvise_server::startup::Application;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber for structured logging
    eduadvise_server::telemetry::init_tracing();

    info!("Starting EduAdvise Server...");

    // Load configuration from environment and config files
    let settings = Settings::load()?;
    info!(
        host = %settings.server.host,
        port = %settings.server.port,
        environment = %settings.environment,
        "Configuration loaded"
    );

    // Build and run the application
    let application = Application::build(settings).await?;

    info!("Server ready to accept connections");
    application.run_until_stopped().await?;

    Ok(())
}
