//! PostgreSQL pool construction and the store-wide consistency policy.

use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Executor;

/// Acknowledgement policy applied to every store operation.
///
/// Applied per connection via `synchronous_commit`, so it covers reads that
/// follow a write on any pooled connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreConsistency {
    /// Commits wait until the quorum of synchronous standbys configured in
    /// `synchronous_standby_names` has applied them.
    #[default]
    Quorum,
    /// Commits are acknowledged once flushed on the primary.
    Local,
}

impl StoreConsistency {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreConsistency::Quorum => "quorum",
            StoreConsistency::Local => "local",
        }
    }

    /// Session statement that enforces this policy.
    pub fn session_statement(&self) -> &'static str {
        match self {
            StoreConsistency::Quorum => "SET synchronous_commit = 'remote_apply'",
            StoreConsistency::Local => "SET synchronous_commit = 'local'",
        }
    }
}

/// Connection pool settings, taken from [`crate::config::Config`].
#[derive(Debug, Clone)]
pub struct PoolSettings {
    pub database_url: String,
    pub max_connections: u32,
    pub connect_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
    pub consistency: StoreConsistency,
}

/// Opens a pool whose every connection runs under `settings.consistency`.
///
/// # Errors
///
/// Returns the underlying [`sqlx::Error`] if no connection can be established.
pub async fn connect(settings: &PoolSettings) -> Result<PgPool, sqlx::Error> {
    let statement = settings.consistency.session_statement();

    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(settings.connect_timeout)
        .idle_timeout(settings.idle_timeout)
        .max_lifetime(settings.max_lifetime)
        .after_connect(move |conn, _meta| {
            Box::pin(async move {
                conn.execute(statement).await?;
                Ok(())
            })
        })
        .connect(&settings.database_url)
        .await
}
