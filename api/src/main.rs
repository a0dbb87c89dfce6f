//! Fuel Ledger API Server
//!
//! Daily sales ledger for a fuel station: readings, payments and customer credit
//! go in, sales, received totals and profit or loss come out.
//! Uses hexagonal (ports & adapters) architecture for clean separation of concerns.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    middleware,
    routing::{delete, get, post},
    Json, Router,
};
use sea_orm::Database;
use serde::Serialize;
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::key_extractor::PeerIpKeyExtractor;
use tower_governor::GovernorLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod adapters;
mod app;
mod config;
mod domain;
mod entity;
mod error;
mod handlers;

#[cfg(test)]
mod test_utils;


use adapters::{ensure_schema, PostgresLedgerRepository};
use app::LedgerService;
use config::Config;
use domain::ports::LedgerRepository;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub ledger_service: Arc<LedgerService<dyn LedgerRepository>>,
    pub config: Config,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Build the HTTP router
pub fn router(state: AppState) -> Router {
    // Writes: entry creation, deletion and marking credit paid
    let writes = Router::new()
        .route("/entries", post(handlers::create_entry))
        .route("/entries/:id", delete(handlers::delete_entry))
        .route(
            "/entries/:id/credit-lines/:customer/paid",
            post(handlers::mark_credit_line_paid),
        );

    // Uses PeerIpKeyExtractor, so the server must be started with connect info
    let writes = if state.config.rate_limit_enabled() {
        match GovernorConfigBuilder::default()
            .key_extractor(PeerIpKeyExtractor)
            .per_second(state.config.rate_limit_per_second)
            .burst_size(state.config.rate_limit_burst)
            .finish()
        {
            Some(governor_config) => writes.layer(GovernorLayer {
                config: Arc::new(governor_config),
            }),
            None => {
                tracing::warn!(
                    burst = state.config.rate_limit_burst,
                    "Invalid rate limit settings, write routes are not rate limited"
                );
                writes
            }
        }
    } else {
        writes
    };

    Router::new()
        .route("/health", get(health))
        .route("/entries", get(handlers::list_entries))
        .route("/entries/preview", post(handlers::preview_entry))
        .route("/entries/:id", get(handlers::get_entry))
        .route("/credit-lines", get(handlers::list_credit_lines))
        .route("/summary", get(handlers::summary))
        .merge(writes)
        // Middleware
        .layer(middleware::map_response_with_state(
            state.config.expose_error_details,
            error::expose_error_details,
        ))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
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
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,fuel_ledger_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Fuel Ledger API...");

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!(
        app_env = %config.app_env,
        expose_error_details = config.expose_error_details,
        "Configuration loaded"
    );

    // Connect to PostgreSQL
    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");

    if config.auto_migrate {
        ensure_schema(&db)
            .await
            .context("Failed to create database schema")?;
    }

    // Create adapters and services
    let ledger_repo: Arc<dyn LedgerRepository> =
        Arc::new(PostgresLedgerRepository::new(db.clone()));
    let ledger_service = Arc::new(LedgerService::new(ledger_repo));

    let port = config.port;
    let state = AppState {
        ledger_service,
        config,
    };
    let app = router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Server error")?;

    db.close().await.context("Failed to close database")?;
    tracing::info!("Database connection closed");

    Ok(())
}
