//! PostgreSQL implementation of the URL repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{InsertOutcome, NewUrlRecord, UrlRecord};
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;

/// PostgreSQL repository for URL records.
///
/// Statements are bound at runtime, so building the crate does not need a
/// live database.
pub struct PgUrlRepository {
    pool: Arc<PgPool>,
}

impl PgUrlRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UrlRow {
    short_code: String,
    long_url: String,
    alias: Option<String>,
    created_at: DateTime<Utc>,
    access_count: i64,
}

impl From<UrlRow> for UrlRecord {
    fn from(row: UrlRow) -> Self {
        UrlRecord::new(
            row.short_code,
            row.long_url,
            row.alias,
            row.created_at,
            row.access_count,
        )
    }
}

#[async_trait]
impl UrlRepository for PgUrlRepository {
    async fn find_by_code(&self, short_code: &str) -> Result<Option<UrlRecord>, AppError> {
        let row = sqlx::query_as::<_, UrlRow>(
            r#"
            SELECT short_code, long_url, alias, created_at, access_count
            FROM urls
            WHERE short_code = $1
            "#,
        )
        .bind(short_code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(UrlRecord::from))
    }

    async fn insert_if_absent(&self, new_record: NewUrlRecord) -> Result<InsertOutcome, AppError> {
        let inserted = sqlx::query_as::<_, UrlRow>(
            r#"
            INSERT INTO urls (short_code, long_url, alias, access_count)
            VALUES ($1, $2, $3, 0)
            ON CONFLICT (short_code) DO NOTHING
            RETURNING short_code, long_url, alias, created_at, access_count
            "#,
        )
        .bind(&new_record.short_code)
        .bind(&new_record.long_url)
        .bind(&new_record.alias)
        .fetch_optional(self.pool.as_ref())
        .await?;

        if let Some(row) = inserted {
            return Ok(InsertOutcome::Created(row.into()));
        }

        // Conflict: the row is there and is never deleted, so read it back.
        self.find_by_code(&new_record.short_code)
            .await?
            .map(InsertOutcome::Existing)
            .ok_or_else(|| {
                AppError::internal(
                    "Conflicting record disappeared",
                    json!({ "short_code": new_record.short_code }),
                )
            })
    }

    async fn get_access_count(&self, short_code: &str) -> Result<Option<i64>, AppError> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT access_count FROM urls WHERE short_code = $1")
                .bind(short_code)
                .fetch_optional(self.pool.as_ref())
                .await?;

        Ok(count)
    }

    async fn set_access_count(&self, short_code: &str, count: i64) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE urls SET access_count = $2 WHERE short_code = $1")
            .bind(short_code)
            .bind(count)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn increment_access_count(&self, short_code: &str) -> Result<Option<i64>, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            UPDATE urls
            SET access_count = access_count + 1
            WHERE short_code = $1
            RETURNING access_count
            "#,
        )
        .bind(short_code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(count)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(self.pool.as_ref()).await?;
        Ok(())
    }
}
