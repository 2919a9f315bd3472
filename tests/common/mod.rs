#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use shortlink::prelude::*;
use shortlink::routes::api_router;
use shortlink::utils::code_generator::{CodeGenerator, RandomCodeGenerator};

pub const BASE_URL: &str = "https://sho.rt";

/// Always hands out the same code.
pub struct FixedCodeGenerator(pub &'static str);

impl CodeGenerator for FixedCodeGenerator {
    fn generate(&self) -> String {
        self.0.to_string()
    }
}

pub struct TestApp {
    pub server: TestServer,
    pub repository: Arc<MemoryUrlRepository>,
    pub cache: Arc<MemoryCache>,
}

pub fn test_settings() -> ServiceSettings {
    ServiceSettings {
        base_url: BASE_URL.to_string(),
        ..ServiceSettings::default()
    }
}

pub fn create_test_app() -> TestApp {
    create_test_app_with(Arc::new(RandomCodeGenerator))
}

pub fn create_test_app_with(generator: Arc<dyn CodeGenerator>) -> TestApp {
    let repository = Arc::new(MemoryUrlRepository::new());
    let cache = Arc::new(MemoryCache::new());

    let state = AppState::new(repository.clone(), cache.clone(), generator, test_settings());
    let server = TestServer::new(api_router(state)).unwrap();

    TestApp {
        server,
        repository,
        cache,
    }
}

/// App over a store that fails every call.
pub fn create_failing_app() -> TestServer {
    let state = AppState::new(
        Arc::new(FailingRepository),
        Arc::new(MemoryCache::new()),
        Arc::new(RandomCodeGenerator),
        test_settings(),
    );
    TestServer::new(api_router(state)).unwrap()
}

pub async fn shorten(server: &TestServer, url: &str) -> Value {
    let response = server
        .post("/url")
        .json(&serde_json::json!({ "url": url }))
        .await;
    response.json::<Value>()
}

pub async fn insert_record(repository: &MemoryUrlRepository, code: &str, url: &str) -> UrlRecord {
    repository
        .insert_if_absent(NewUrlRecord {
            short_code: code.to_string(),
            long_url: url.to_string(),
            alias: None,
        })
        .await
        .unwrap()
        .into_record()
}

/// Polls until the background update lands, or panics after ~2s.
pub async fn wait_for_access_count(repository: &MemoryUrlRepository, code: &str, expected: i64) {
    for _ in 0..200 {
        if repository.get_access_count(code).await.unwrap() == Some(expected) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    panic!(
        "access count for {} never reached {} (last seen {:?})",
        code,
        expected,
        repository.get_access_count(code).await.unwrap()
    );
}

pub struct FailingRepository;

fn unavailable() -> AppError {
    AppError::store_unavailable("Database error", Value::Null)
}

#[async_trait]
impl UrlRepository for FailingRepository {
    async fn find_by_code(&self, _short_code: &str) -> Result<Option<UrlRecord>, AppError> {
        Err(unavailable())
    }

    async fn insert_if_absent(&self, _new_record: NewUrlRecord) -> Result<InsertOutcome, AppError> {
        Err(unavailable())
    }

    async fn get_access_count(&self, _short_code: &str) -> Result<Option<i64>, AppError> {
        Err(unavailable())
    }

    async fn set_access_count(&self, _short_code: &str, _count: i64) -> Result<bool, AppError> {
        Err(unavailable())
    }

    async fn increment_access_count(&self, _short_code: &str) -> Result<Option<i64>, AppError> {
        Err(unavailable())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Err(unavailable())
    }
}
