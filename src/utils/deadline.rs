//! Per-call timeouts for store and cache operations.

use std::future::Future;
use std::time::Duration;

use serde_json::json;
use tracing::error;

use crate::error::AppError;

/// Awaits `fut` for at most `limit`, without logging.
///
/// Expiry becomes [`AppError::StoreUnavailable`]. For calls whose failure the
/// caller reports itself, at its own level.
pub async fn deadline<T, E, F>(
    limit: Duration,
    operation: &'static str,
    key: &str,
    fut: F,
) -> Result<T, AppError>
where
    F: Future<Output = Result<T, E>>,
    E: Into<AppError>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result.map_err(Into::into),
        Err(_) => Err(AppError::store_unavailable(
            "Store operation timed out",
            json!({ "operation": operation, "key": key }),
        )),
    }
}

/// Like [`deadline`], but logs every failure at `error` with the operation
/// name and key before returning it. Used on the primary request path.
pub async fn within<T, E, F>(
    limit: Duration,
    operation: &'static str,
    key: &str,
    fut: F,
) -> Result<T, AppError>
where
    F: Future<Output = Result<T, E>>,
    E: Into<AppError>,
{
    deadline(limit, operation, key, fut).await.inspect_err(|err| {
        error!(operation, key, error = %err, details = ?err_details(err), "Store operation failed");
    })
}

fn err_details(err: &AppError) -> &serde_json::Value {
    match err {
        AppError::InvalidInput { details, .. }
        | AppError::NotFound { details, .. }
        | AppError::StoreUnavailable { details, .. }
        | AppError::Internal { details, .. } => details,
    }
}
