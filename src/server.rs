//! HTTP server initialization and runtime setup.
//!
//! Handles database and cache connections, migrations, service wiring, and
//! the Axum server lifecycle.

use crate::config::Config;
use crate::infrastructure::cache::{CacheService, RedisCache};
use crate::infrastructure::persistence::{PgUrlRepository, pool};
use crate::routes::app_router;
use crate::state::AppState;
use crate::utils::code_generator::RandomCodeGenerator;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool (with the configured consistency policy)
/// - Apply migrations
/// - Redis cache
/// - Shortening and resolution services
/// - Axum HTTP server
///
/// # Errors
///
/// Returns an error if:
/// - Database or Redis connection fails after all startup attempts
/// - Migrations fail
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = connect_database(&config).await?;
    tracing::info!(
        consistency = config.store_consistency.as_str(),
        "Connected to database"
    );

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    let cache: Arc<dyn CacheService> = Arc::new(connect_cache(&config).await?);
    tracing::info!("Cache enabled (Redis)");

    let repository = Arc::new(PgUrlRepository::new(Arc::new(pool)));
    let state = AppState::new(
        repository,
        cache,
        Arc::new(RandomCodeGenerator),
        config.service_settings(),
    );

    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Backoff between startup connection attempts; yields `attempts - 1` delays.
fn startup_backoff(attempts: usize) -> impl Iterator<Item = Duration> {
    ExponentialBackoff::from_millis(2)
        .factor(100)
        .max_delay(Duration::from_secs(5))
        .map(jitter)
        .take(attempts.saturating_sub(1))
}

async fn connect_database(config: &Config) -> Result<PgPool> {
    let settings = &config.pool_settings();

    Retry::spawn(startup_backoff(config.startup_connect_attempts), || async move {
        pool::connect(settings).await.inspect_err(|e| {
            tracing::warn!(error = %e, "Database connection attempt failed");
        })
    })
    .await
    .context("Failed to connect to database")
}

async fn connect_cache(config: &Config) -> Result<RedisCache> {
    Retry::spawn(startup_backoff(config.startup_connect_attempts), || async move {
        RedisCache::connect(&config.redis_url)
            .await
            .inspect_err(|e| {
                tracing::warn!(error = %e, "Redis connection attempt failed");
            })
    })
    .await
    .context("Failed to connect to Redis")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
