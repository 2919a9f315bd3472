//! Detached access-count accounting.
//!
//! Each [`AccessEvent`] is applied on its own tokio task. The task's output is
//! `()`: failures are logged and counted, never returned to the request that
//! produced the event. Because the task is spawned rather than awaited inline,
//! it keeps running if the HTTP client disconnects.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::domain::access_event::AccessEvent;
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;
use crate::utils::deadline::deadline;

/// How the counter is advanced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccountingMode {
    /// Read the counter, then write `count + 1`.
    ///
    /// Two concurrent updates of the same code can both read `n` and both
    /// write `n + 1`; one increment is lost.
    #[default]
    ReadModifyWrite,
    /// Single `count = count + 1` statement in the store. No lost updates.
    Atomic,
}

impl AccountingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountingMode::ReadModifyWrite => "read_modify_write",
            AccountingMode::Atomic => "atomic",
        }
    }
}

/// Applies access events to the durable store in the background.
#[derive(Clone)]
pub struct AccessRecorder {
    repository: Arc<dyn UrlRepository>,
    mode: AccountingMode,
    store_timeout: Duration,
}

impl AccessRecorder {
    pub fn new(
        repository: Arc<dyn UrlRepository>,
        mode: AccountingMode,
        store_timeout: Duration,
    ) -> Self {
        Self {
            repository,
            mode,
            store_timeout,
        }
    }

    pub fn mode(&self) -> AccountingMode {
        self.mode
    }

    /// Spawns the count update for `event`.
    ///
    /// The returned handle may be awaited or dropped; dropping it does not
    /// cancel the update.
    pub fn record(&self, event: AccessEvent) -> JoinHandle<()> {
        let recorder = self.clone();

        tokio::spawn(async move {
            match recorder.apply(&event).await {
                Ok(count) => {
                    metrics::counter!("shortlink_access_updates_total").increment(1);
                    debug!(
                        short_code = %event.short_code,
                        access_count = count,
                        mode = recorder.mode.as_str(),
                        "Access count updated"
                    );
                }
                Err(e) => {
                    metrics::counter!("shortlink_access_update_failures_total").increment(1);
                    warn!(
                        short_code = %event.short_code,
                        mode = recorder.mode.as_str(),
                        error = %e,
                        "Failed to update access count"
                    );
                }
            }
        })
    }

    /// Advances the counter for one event and returns the value written.
    async fn apply(&self, event: &AccessEvent) -> Result<i64, AppError> {
        let code = event.short_code.as_str();

        match self.mode {
            AccountingMode::Atomic => deadline(
                self.store_timeout,
                "increment_access_count",
                code,
                self.repository.increment_access_count(code),
            )
            .await?
            .ok_or_else(|| vanished(code)),

            AccountingMode::ReadModifyWrite => {
                let current = match event.observed_count {
                    Some(count) => count,
                    None => deadline(
                        self.store_timeout,
                        "get_access_count",
                        code,
                        self.repository.get_access_count(code),
                    )
                    .await?
                    .ok_or_else(|| vanished(code))?,
                };

                let next = current + 1;
                let updated = deadline(
                    self.store_timeout,
                    "set_access_count",
                    code,
                    self.repository.set_access_count(code, next),
                )
                .await?;

                if updated { Ok(next) } else { Err(vanished(code)) }
            }
        }
    }
}

fn vanished(short_code: &str) -> AppError {
    AppError::not_found(
        "Record missing during access accounting",
        json!({ "short_code": short_code }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockUrlRepository;
    use serde_json::Value;

    const TIMEOUT: Duration = Duration::from_secs(1);

    fn recorder(repo: MockUrlRepository, mode: AccountingMode) -> AccessRecorder {
        AccessRecorder::new(Arc::new(repo), mode, TIMEOUT)
    }

    #[tokio::test]
    async fn test_cache_hit_reads_then_writes() {
        let mut repo = MockUrlRepository::new();
        repo.expect_get_access_count()
            .withf(|code| code == "abc123def")
            .times(1)
            .returning(|_| Ok(Some(4)));
        repo.expect_set_access_count()
            .withf(|code, count| code == "abc123def" && *count == 5)
            .times(1)
            .returning(|_, _| Ok(true));
        repo.expect_increment_access_count().times(0);

        let recorder = recorder(repo, AccountingMode::ReadModifyWrite);
        let count = recorder
            .apply(&AccessEvent::cache_hit("abc123def"))
            .await
            .unwrap();

        assert_eq!(count, 5);
    }

    #[tokio::test]
    async fn test_store_read_skips_extra_read() {
        let mut repo = MockUrlRepository::new();
        repo.expect_get_access_count().times(0);
        repo.expect_set_access_count()
            .withf(|code, count| code == "abc123def" && *count == 10)
            .times(1)
            .returning(|_, _| Ok(true));

        let recorder = recorder(repo, AccountingMode::ReadModifyWrite);
        let count = recorder
            .apply(&AccessEvent::store_read("abc123def", 9))
            .await
            .unwrap();

        assert_eq!(count, 10);
    }

    #[tokio::test]
    async fn test_atomic_mode_uses_single_increment() {
        let mut repo = MockUrlRepository::new();
        repo.expect_get_access_count().times(0);
        repo.expect_set_access_count().times(0);
        repo.expect_increment_access_count()
            .withf(|code| code == "abc123def")
            .times(2)
            .returning(|_| Ok(Some(3)));

        let recorder = recorder(repo, AccountingMode::Atomic);

        assert_eq!(
            recorder
                .apply(&AccessEvent::cache_hit("abc123def"))
                .await
                .unwrap(),
            3
        );
        // The observed count is irrelevant in atomic mode.
        assert_eq!(
            recorder
                .apply(&AccessEvent::store_read("abc123def", 100))
                .await
                .unwrap(),
            3
        );
    }

    #[tokio::test]
    async fn test_missing_record_is_an_error() {
        let mut repo = MockUrlRepository::new();
        repo.expect_get_access_count().returning(|_| Ok(None));
        repo.expect_set_access_count().times(0);

        let recorder = recorder(repo, AccountingMode::ReadModifyWrite);
        let result = recorder.apply(&AccessEvent::cache_hit("gone12345")).await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_record_swallows_store_failure() {
        let mut repo = MockUrlRepository::new();
        repo.expect_set_access_count()
            .times(1)
            .returning(|_, _| Err(AppError::store_unavailable("down", Value::Null)));

        let recorder = recorder(repo, AccountingMode::ReadModifyWrite);
        let handle = recorder.record(AccessEvent::store_read("abc123def", 0));

        // The task finishes normally; the failure never escapes it.
        assert!(handle.await.is_ok());
    }

    #[tokio::test]
    async fn test_record_runs_after_handle_is_dropped() {
        let mut repo = MockUrlRepository::new();
        let (tx, rx) = tokio::sync::oneshot::channel::<i64>();
        let tx = std::sync::Mutex::new(Some(tx));
        repo.expect_set_access_count()
            .times(1)
            .returning(move |_, count| {
                if let Some(tx) = tx.lock().unwrap().take() {
                    let _ = tx.send(count);
                }
                Ok(true)
            });

        let recorder = recorder(repo, AccountingMode::ReadModifyWrite);
        drop(recorder.record(AccessEvent::store_read("abc123def", 1)));

        assert_eq!(rx.await.unwrap(), 2);
    }
}
