use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::info;

use barshift_api::app::create_app;
use barshift_api::config::Config;
use barshift_api::jobs::{JobScheduler, PoolMetricsJob, ReminderDispatchJob};
use barshift_api::middleware;
use barshift_api::services::{EmailService, ReminderService};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::load()?;

    // Initialize logging
    middleware::logging::init_logging(&config.logging);

    info!("Starting Barshift API v{}", env!("CARGO_PKG_VERSION"));

    // Create database pool
    let pool = persistence::db::create_pool(&config.database.pool_config()).await?;

    // Run migrations
    info!("Running database migrations...");
    sqlx::migrate!("../persistence/src/migrations")
        .run(&pool)
        .await?;
    info!("Migrations completed");

    middleware::init_metrics();

    // Background jobs: pool gauges and the reminder dispatcher
    let mut scheduler = JobScheduler::new();
    scheduler.register(PoolMetricsJob::new(pool.clone()));
    if config.reminders.enabled {
        let email_service = EmailService::new(config.email.clone());
        let reminder_service =
            ReminderService::new(pool.clone(), Arc::new(email_service), config.email.clone());
        scheduler.register(ReminderDispatchJob::new(
            reminder_service,
            config.reminders.check_interval_minutes,
        ));
    } else {
        info!("Reminder dispatch job is disabled");
    }
    scheduler.start();

    // Build application
    let app = create_app(config.clone(), pool);

    // Start server
    let addr = config.socket_addr();
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    scheduler.shutdown();
    scheduler.wait_for_shutdown(Duration::from_secs(10)).await;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install terminate signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
