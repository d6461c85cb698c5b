use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use waypoint_api::config::ServerConfig;
use waypoint_api::router::build_app_router;
use waypoint_api::state::AppState;
use waypoint_db::{PgStore, RecordStore};
use waypoint_events::{configured_mailer, EmailConfig, ReminderBranding, ReminderRenderer};
use waypoint_services::Services;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "waypoint_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = waypoint_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    waypoint_db::health_check(&pool)
        .await
        .expect("Database health check failed");

    waypoint_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    let store: Arc<dyn RecordStore> = Arc::new(PgStore::new(pool));

    // --- Mail ---
    let mailer = configured_mailer(EmailConfig::from_env().as_ref())
        .expect("Invalid SMTP configuration");
    let renderer = Arc::new(
        ReminderRenderer::new(ReminderBranding::from_env())
            .expect("Failed to compile reminder templates"),
    );

    // --- App ---
    let state = AppState {
        config: Arc::new(config.clone()),
        services: Services::new(Arc::clone(&store), mailer, renderer),
        store,
    };
    let app = build_app_router(state, &config);

    let addr: SocketAddr = config
        .bind_addr()
        .parse()
        .expect("HOST:PORT must form a valid socket address");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    tracing::info!(%addr, "Waypoint API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Server stopped");
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
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
