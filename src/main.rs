//!
//! Table reservation service for a single-site restaurant.
//! Reads configuration from TOML file (~/.config/tablebook/config.toml).

use std::sync::Arc;

use tracing::{error, info};

use tablebook::application::booking::{
    start_expiry_task, AvailabilityService, ExpirySweeper, LoggingCustomerStats,
    ReservationService,
};
use tablebook::config::AppConfig;
use tablebook::notifications::EventBusNotificationScheduler;
use tablebook::support::shutdown::ShutdownCoordinator;
use tablebook::{
    create_api_router, create_event_bus, default_config_path, AppContext,
    InMemoryRepositoryProvider,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = std::env::var("TABLEBOOK_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| default_config_path());
    let app_cfg = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            // Initialize logging with configured level
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.logging.level)),
                )
                .init();
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
                .init();
            error!("Failed to load config: {}. Using defaults.", e);
            AppConfig::default()
        }
    };

    info!("Starting Tablebook Reservation Service...");

    // ── Prometheus metrics recorder (must be installed before any metrics calls) ──
    let prometheus_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus metrics recorder");
    info!("📊 Prometheus metrics recorder installed");

    // ── Booking policy ─────────────────────────────────────────
    let policy = match app_cfg.booking.policy() {
        Ok(policy) => policy,
        Err(e) => {
            error!("Invalid booking configuration: {}", e);
            return Err(e.into());
        }
    };
    info!(
        opening = %policy.opening.format("%H:%M"),
        closing = %policy.closing.format("%H:%M"),
        booking_window_days = policy.booking_window_days,
        "Booking policy loaded"
    );

    // ── Repositories & services ────────────────────────────────
    let repos: Arc<dyn tablebook::domain::RepositoryProvider> =
        Arc::new(InMemoryRepositoryProvider::new());

    let event_bus = create_event_bus();
    info!("🔔 Event bus initialized for real-time notifications");

    let notifier = Arc::new(EventBusNotificationScheduler::new(event_bus.clone()));
    let stats = Arc::new(LoggingCustomerStats);

    let reservations = Arc::new(ReservationService::new(
        repos.clone(),
        policy.clone(),
        notifier,
        stats,
        event_bus.clone(),
    ));
    let availability = Arc::new(AvailabilityService::new(repos.clone(), policy));

    // Initialize shutdown coordinator
    let shutdown = ShutdownCoordinator::new(app_cfg.server.shutdown_timeout);
    let shutdown_signal = shutdown.signal();

    // Start listening for shutdown signals (SIGTERM, SIGINT)
    shutdown.start_signal_listener();

    // Periodic expiry sweep as a staleness bound; reads correct lazily anyway
    let sweeper = Arc::new(ExpirySweeper::new(repos.clone()).with_event_bus(event_bus.clone()));
    start_expiry_task(
        sweeper,
        shutdown_signal.clone(),
        app_cfg.booking.expiry_check_interval_secs,
    );

    // ── REST API server ────────────────────────────────────────
    let api_router = create_api_router(AppContext {
        repos,
        reservations,
        availability,
        prometheus: Some(prometheus_handle),
    });

    let api_addr = format!("{}:{}", app_cfg.server.api_host, app_cfg.server.api_port);
    let listener = tokio::net::TcpListener::bind(&api_addr).await?;
    info!("REST API server listening on http://{}", api_addr);

    let api_shutdown = shutdown_signal.clone();
    let api_server = axum::serve(listener, api_router).with_graceful_shutdown(async move {
        api_shutdown.wait().await;
        info!("🛑 REST API server received shutdown signal");
    });

    info!("🚀 Server started. Press Ctrl+C to shutdown gracefully.");

    if let Err(e) = api_server.await {
        error!("REST API server error: {}", e);
    }

    info!("👋 Tablebook Reservation Service shutdown complete");
    Ok(())
}
