use anyhow::Context;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rust_leads_api::config::Config;
use rust_leads_api::db::Database;
use rust_leads_api::db_storage::LeadStore;
use rust_leads_api::handlers::AppState;
use rust_leads_api::routes::{build_router, RateLimit};
use rust_leads_api::services::SubmissionService;

/// Main entry point for the application.
///
/// Initializes logging, configuration, the database pool and the leads
/// schema, then starts the Axum server.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rust_leads_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize database connection pool
    let db = Database::new(&config).await?;
    tracing::info!("Database connection pool established");

    let store = LeadStore::new(db.pool.clone());
    store
        .ensure_schema()
        .await
        .context("failed to initialize leads schema")?;
    tracing::info!("Leads schema ready");

    let app_state = Arc::new(AppState {
        submissions: SubmissionService::new(&config, store),
    });

    let app = build_router(
        app_state,
        Some(RateLimit {
            replenish_ms: config.rate_limit_replenish_ms,
            burst: config.rate_limit_burst,
        }),
    )?;

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
