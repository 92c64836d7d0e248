//! Application Startup
//!
//! Application building, background tasks, and server initialization.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::Router;
use sqlx::PgPool;
use tokio::net::TcpListener;

use crate::application::services::{EmailNotificationService, ReminderService};
use crate::config::Settings;
use crate::infrastructure::database;
use crate::infrastructure::repositories::{
    PgEmailLogRepository, PgReminderRepository, PgUserRepository,
};
use crate::presentation::http::routes;
use crate::presentation::middleware::{cors, logging};
use crate::presentation::websocket::{EventRouter, PresenceRegistry, RoomTable};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub router: Arc<EventRouter>,
    pub settings: Arc<Settings>,
}

/// Application instance
pub struct Application {
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application from settings
    pub async fn build(settings: Settings) -> Result<Self> {
        // Create database pool
        let db = database::create_pool(&settings.database).await?;
        tracing::info!("Database connection pool created");

        database::run_migrations(&db).await?;
        tracing::info!("Database migrations applied");

        // Upload directory must exist before the first multipart request.
        tokio::fs::create_dir_all(&settings.upload.dir).await?;

        // Realtime core: presence registry, room table, event router
        let presence = Arc::new(PresenceRegistry::new());
        let rooms = Arc::new(RoomTable::new());
        let event_router = Arc::new(EventRouter::new(presence, rooms));

        let state = AppState {
            db,
            router: Arc::clone(&event_router),
            settings: Arc::new(settings.clone()),
        };

        spawn_reminder_scheduler(&state);

        // Build router with middleware
        let router = routes::create_router(state)
            .layer(logging::create_trace_layer())
            .layer(cors::create_cors_layer(&settings.cors));

        // Bind to address
        let addr = SocketAddr::from(([0, 0, 0, 0], settings.server.port));
        let listener = TcpListener::bind(addr).await?;
        tracing::info!("Listening on {}", addr);

        Ok(Self { listener, router })
    }

    /// Run the server until stopped
    pub async fn run_until_stopped(self) -> Result<()> {
        axum::serve(self.listener, self.router).await?;
        Ok(())
    }

    /// Get the bound address
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }
}

/// Spawn the background task that delivers due reminders.
fn spawn_reminder_scheduler(state: &AppState) {
    let poll_interval = Duration::from_secs(state.settings.reminders.poll_interval_secs);
    let router = Arc::clone(&state.router);

    let service = ReminderService::new(
        Arc::new(PgReminderRepository::new(state.db.clone())),
        Arc::new(PgUserRepository::new(state.db.clone())),
        Arc::new(EmailNotificationService::new(Arc::new(
            PgEmailLogRepository::new(state.db.clone()),
        ))),
    );

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(poll_interval);
        loop {
            interval.tick().await;
            match service.process_due(&router).await {
                Ok(0) => {}
                Ok(count) => tracing::info!(count, "Delivered due reminders"),
                Err(e) => tracing::error!(error = %e, "Reminder poll failed"),
            }
        }
    });

    tracing::info!(
        interval_secs = poll_interval.as_secs(),
        "Reminder scheduler started"
    );
}
