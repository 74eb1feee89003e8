//! Divvy API Server
//!
//! Main entry point for the Divvy backend service.

use divvy_api::{AppState, create_router};
use divvy_core::balance::BalanceCache;
use divvy_db::{Migrator, connect_with_pool};
use divvy_shared::AppConfig;
use sea_orm_migration::MigratorTrait;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "divvy=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load()?;

    let db = connect_with_pool(
        &config.database.url,
        config.database.max_connections,
        config.database.min_connections,
    )
    .await?;
    info!("Connected to database");

    if config.database.run_migrations {
        Migrator::up(&db, None).await?;
        info!("Migrations applied");
    }

    let cache = BalanceCache::with_config(
        config.cache.balance_max_capacity,
        config.cache.balance_ttl_secs,
    );
    info!(
        ttl_secs = config.cache.balance_ttl_secs,
        max_capacity = config.cache.balance_max_capacity,
        "Balance cache configured"
    );

    let state = AppState::new(db, cache);
    let app = create_router(state, &config.api.prefix);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
