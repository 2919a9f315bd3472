//! Short code resolution service (cache-aside read path).

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::domain::access_event::AccessEvent;
use crate::domain::access_recorder::AccessRecorder;
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;
use crate::utils::code_generator::is_well_formed;
use crate::utils::deadline::{deadline, within};
use crate::utils::url_validator::is_valid_url;

/// Where a resolution was answered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionSource {
    Cache,
    Store,
}

impl ResolutionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionSource::Cache => "cache",
            ResolutionSource::Store => "store",
        }
    }
}

/// A successful resolution.
#[derive(Debug)]
pub struct Resolution {
    pub long_url: String,
    pub source: ResolutionSource,
    /// The detached access-count update. Awaiting it is optional; dropping
    /// it leaves the update running.
    pub accounting: JoinHandle<()>,
}

/// Resolves short codes to long URLs and schedules access accounting.
///
/// # Request Flow
///
/// 1. Look the code up in the cache
/// 2. **Hit**: answer at once; accounting reads the current count from the
///    store and writes `count + 1` in the background
/// 3. **Miss**: read the full record from the store; unknown code or a stored
///    URL that no longer validates is "not found"
/// 4. Accounting writes `stored_count + 1`, reusing the count from step 3
/// 5. Write the URL back to the cache with the configured TTL
pub struct ResolutionService {
    repository: Arc<dyn UrlRepository>,
    cache: Arc<dyn CacheService>,
    recorder: AccessRecorder,
    cache_ttl_seconds: u64,
    store_timeout: Duration,
}

impl ResolutionService {
    /// Creates a new resolution service.
    pub fn new(
        repository: Arc<dyn UrlRepository>,
        cache: Arc<dyn CacheService>,
        recorder: AccessRecorder,
        cache_ttl_seconds: u64,
        store_timeout: Duration,
    ) -> Self {
        Self {
            repository,
            cache,
            recorder,
            cache_ttl_seconds,
            store_timeout,
        }
    }

    /// Resolves `short_code` to its long URL.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code is unknown, cannot be a
    /// generated code, or maps to a URL that fails validation. Nothing is
    /// cached or counted in that case.
    ///
    /// Returns [`AppError::StoreUnavailable`] if the cache read or the store
    /// read fails or times out.
    ///
    /// Failures of the cache write-back and of accounting are logged only.
    pub async fn resolve(&self, short_code: &str) -> Result<Resolution, AppError> {
        if !is_well_formed(short_code) {
            debug!("Rejecting malformed short code {:?}", short_code);
            return Err(AppError::resource_not_found(short_code));
        }

        let cached = within(
            self.store_timeout,
            "cache.get_url",
            short_code,
            self.cache.get_url(short_code),
        )
        .await?;

        if let Some(long_url) = cached {
            debug!("Cache HIT for {}", short_code);
            let accounting = self.recorder.record(AccessEvent::cache_hit(short_code));
            return Ok(answer(long_url, ResolutionSource::Cache, accounting));
        }

        debug!("Cache MISS for {}", short_code);

        let record = within(
            self.store_timeout,
            "find_by_code",
            short_code,
            self.repository.find_by_code(short_code),
        )
        .await?
        .ok_or_else(|| AppError::resource_not_found(short_code))?;

        if !is_valid_url(&record.long_url) {
            warn!(
                short_code,
                long_url = %record.long_url,
                "Stored URL failed validation"
            );
            return Err(AppError::resource_not_found(short_code));
        }

        // Spawned before the write-back so an aborted request is still counted.
        let accounting = self.recorder.record(AccessEvent::store_read(
            record.short_code.clone(),
            record.access_count,
        ));

        if let Err(e) = deadline(
            self.store_timeout,
            "cache.set_url",
            short_code,
            self.cache
                .set_url(short_code, &record.long_url, self.cache_ttl_seconds),
        )
        .await
        {
            warn!(short_code, error = %e, "Cache write-back failed, continuing");
        }

        Ok(answer(record.long_url, ResolutionSource::Store, accounting))
    }
}

fn answer(long_url: String, source: ResolutionSource, accounting: JoinHandle<()>) -> Resolution {
    metrics::counter!("shortlink_resolutions_total", "source" => source.as_str()).increment(1);

    Resolution {
        long_url,
        source,
        accounting,
    }
}
