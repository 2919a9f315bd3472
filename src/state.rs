use std::sync::Arc;
use std::time::Duration;

use crate::application::services::{CollisionPolicy, ResolutionService, ShorteningService};
use crate::domain::access_recorder::{AccessRecorder, AccountingMode};
use crate::domain::repositories::UrlRepository;
use crate::infrastructure::cache::CacheService;
use crate::utils::code_generator::CodeGenerator;

/// Tunables shared by the services, taken from [`crate::config::Config`].
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub base_url: String,
    pub cache_ttl_seconds: u64,
    pub store_timeout: Duration,
    pub collision_policy: CollisionPolicy,
    pub accounting_mode: AccountingMode,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            cache_ttl_seconds: 86_400,
            store_timeout: Duration::from_millis(2_000),
            collision_policy: CollisionPolicy::default(),
            accounting_mode: AccountingMode::default(),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub shortening_service: Arc<ShorteningService>,
    pub resolution_service: Arc<ResolutionService>,
    pub repository: Arc<dyn UrlRepository>,
    pub cache: Arc<dyn CacheService>,
}

impl AppState {
    /// Wires both services over one store and one cache.
    pub fn new(
        repository: Arc<dyn UrlRepository>,
        cache: Arc<dyn CacheService>,
        generator: Arc<dyn CodeGenerator>,
        settings: ServiceSettings,
    ) -> Self {
        let shortening_service = Arc::new(ShorteningService::new(
            repository.clone(),
            generator,
            settings.base_url,
            settings.collision_policy,
            settings.store_timeout,
        ));

        let recorder = AccessRecorder::new(
            repository.clone(),
            settings.accounting_mode,
            settings.store_timeout,
        );

        let resolution_service = Arc::new(ResolutionService::new(
            repository.clone(),
            cache.clone(),
            recorder,
            settings.cache_ttl_seconds,
            settings.store_timeout,
        ));

        Self {
            shortening_service,
            resolution_service,
            repository,
            cache,
        }
    }
}
