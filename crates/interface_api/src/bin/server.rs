//! Hearth - API Server Binary
//!
//! This binary starts the HTTP API server for the household ledger.
//!
//! # Usage
//!
//! ```bash
//! # Run with default configuration
//! cargo run --bin hearth-api
//!
//! # Run against process memory instead of PostgreSQL
//! API_STORAGE=memory cargo run --bin hearth-api
//! ```
//!
//! In-memory storage seeds a demo household and logs a bearer token for
//! each of its members.
//!
//! # Environment Variables
//!
//! * `API_HOST` - Server host (default: 0.0.0.0)
//! * `API_PORT` - Server port (default: 8080)
//! * `API_JWT_SECRET` - JWT signing secret (required in production)
//! * `API_STORAGE` - `postgres` or `memory` (default: postgres)
//! * `API_DATABASE_URL` - PostgreSQL connection string
//! * `API_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)
//! * `API_LOG_JSON` - Emit JSON log lines (default: false)
//! * `API_LEDGER__SETTLE_TOLERANCE` - Owed amount at or below which settle-up is refused

use anyhow::Context;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use domain_ledger::{
    ActivitySink, InMemoryLedger, InMemoryRooms, LedgerService, LedgerStore,
    RecordingActivitySink, RoomDirectory,
};
use infra_db::{create_pool, run_migrations, DatabaseConfig, PostgresLedgerAdapter};
use interface_api::config::{ApiConfig, StorageBackend};
use interface_api::demo::seed_demo_household;
use interface_api::notifications::{BroadcastingActivitySink, RoomBroadcaster};
use interface_api::{create_router, AppState};

/// Main entry point for the API server.
///
/// Initializes logging, loads configuration, wires the storage backend,
/// and starts the HTTP server.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = ApiConfig::from_env().context("invalid configuration")?;
    init_tracing(&config.log_level, config.log_json);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        storage = ?config.storage,
        "Starting Hearth API Server"
    );

    let broadcaster = Arc::new(RoomBroadcaster::new());
    let (rooms, store, activity) = build_ports(&config).await?;
    let activity: Arc<dyn ActivitySink> =
        Arc::new(BroadcastingActivitySink::new(activity, broadcaster.clone()));

    let service = Arc::new(LedgerService::new(
        rooms,
        store,
        activity,
        config.ledger.clone(),
    ));

    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .with_context(|| format!("invalid server address {}", config.server_addr()))?;

    let app = create_router(AppState::new(service, broadcaster, config));

    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

type Ports = (
    Arc<dyn RoomDirectory>,
    Arc<dyn LedgerStore>,
    Arc<dyn ActivitySink>,
);

/// Connects the configured storage backend
async fn build_ports(config: &ApiConfig) -> anyhow::Result<Ports> {
    match config.storage {
        StorageBackend::Postgres => {
            let db_config = DatabaseConfig::new(config.database_url.clone())
                .max_connections(config.database_max_connections);
            let pool = create_pool(db_config)
                .await
                .context("failed to connect to database")?;
            run_migrations(&pool)
                .await
                .context("failed to run database migrations")?;

            let adapter = Arc::new(PostgresLedgerAdapter::new(pool));
            let rooms: Arc<dyn RoomDirectory> = adapter.clone();
            let store: Arc<dyn LedgerStore> = adapter.clone();
            let activity: Arc<dyn ActivitySink> = adapter;
            Ok((rooms, store, activity))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; nothing survives a restart");
            let directory = Arc::new(InMemoryRooms::new());
            let demo = seed_demo_household(&directory, config)
                .await
                .context("failed to seed demo household")?;
            for seeded in &demo.members {
                tracing::info!(
                    room_id = %demo.room.id,
                    member = %seeded.member.name,
                    member_id = %seeded.member.id,
                    token = %seeded.token,
                    "Demo member ready"
                );
            }

            let rooms: Arc<dyn RoomDirectory> = directory;
            let store: Arc<dyn LedgerStore> = Arc::new(InMemoryLedger::new());
            let activity: Arc<dyn ActivitySink> = Arc::new(RecordingActivitySink::new());
            Ok((rooms, store, activity))
        }
    }
}

/// Initializes the tracing subscriber for structured logging.
fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .init();
    }
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
