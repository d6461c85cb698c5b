use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use waypoint_db::{PgStore, RecordStore};
use waypoint_events::{configured_mailer, EmailConfig, ReminderBranding, ReminderRenderer};
use waypoint_services::Services;
use waypoint_worker::{ReminderSweeper, WorkerConfig};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "waypoint_worker=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = WorkerConfig::from_env();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = waypoint_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    waypoint_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    let store: Arc<dyn RecordStore> = Arc::new(PgStore::new(pool));

    let mailer = configured_mailer(EmailConfig::from_env().as_ref())
        .expect("Invalid SMTP configuration");
    let renderer = Arc::new(
        ReminderRenderer::new(ReminderBranding::from_env())
            .expect("Failed to compile reminder templates"),
    );
    let services = Services::new(store, mailer, renderer);

    let sweeper = ReminderSweeper::new(services.reminders, config.sweep_interval);
    let cancel = CancellationToken::new();
    let handle = tokio::spawn({
        let cancel = cancel.clone();
        async move { sweeper.run(cancel).await }
    });

    shutdown_signal().await;
    cancel.cancel();
    if let Err(e) = handle.await {
        tracing::error!(error = %e, "Reminder sweeper task panicked");
    }
    tracing::info!("Worker stopped");
}

/// Resolve on SIGINT (Ctrl-C) or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received SIGINT (Ctrl-C), shutting down"),
        () = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
