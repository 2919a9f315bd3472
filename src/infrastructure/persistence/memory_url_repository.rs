//! In-memory implementation of the URL repository.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::entities::{InsertOutcome, NewUrlRecord, UrlRecord};
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;

/// A `HashMap`-backed [`UrlRepository`].
///
/// Each call takes the lock once, so a single call is atomic, but nothing
/// spans two calls: a read-modify-write built from `get_access_count` and
/// `set_access_count` races exactly like it does against PostgreSQL.
#[derive(Debug, Default)]
pub struct MemoryUrlRepository {
    records: RwLock<HashMap<String, UrlRecord>>,
}

impl MemoryUrlRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl UrlRepository for MemoryUrlRepository {
    async fn find_by_code(&self, short_code: &str) -> Result<Option<UrlRecord>, AppError> {
        Ok(self.records.read().await.get(short_code).cloned())
    }

    async fn insert_if_absent(&self, new_record: NewUrlRecord) -> Result<InsertOutcome, AppError> {
        let mut records = self.records.write().await;

        match records.entry(new_record.short_code.clone()) {
            Entry::Occupied(existing) => Ok(InsertOutcome::Existing(existing.get().clone())),
            Entry::Vacant(slot) => {
                let record = UrlRecord::new(
                    new_record.short_code,
                    new_record.long_url,
                    new_record.alias,
                    Utc::now(),
                    0,
                );
                slot.insert(record.clone());
                Ok(InsertOutcome::Created(record))
            }
        }
    }

    async fn get_access_count(&self, short_code: &str) -> Result<Option<i64>, AppError> {
        Ok(self
            .records
            .read()
            .await
            .get(short_code)
            .map(|r| r.access_count))
    }

    async fn set_access_count(&self, short_code: &str, count: i64) -> Result<bool, AppError> {
        match self.records.write().await.get_mut(short_code) {
            Some(record) => {
                record.access_count = count;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn increment_access_count(&self, short_code: &str) -> Result<Option<i64>, AppError> {
        Ok(self
            .records
            .write()
            .await
            .get_mut(short_code)
            .map(|record| {
                record.access_count += 1;
                record.access_count
            }))
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_record(code: &str, url: &str) -> NewUrlRecord {
        NewUrlRecord {
            short_code: code.to_string(),
            long_url: url.to_string(),
            alias: None,
        }
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let repo = MemoryUrlRepository::new();

        let outcome = repo
            .insert_if_absent(new_record("abc123def", "https://example.com"))
            .await
            .unwrap();
        assert!(outcome.is_created());

        let record = repo.find_by_code("abc123def").await.unwrap().unwrap();
        assert_eq!(record.long_url, "https://example.com");
        assert_eq!(record.access_count, 0);
    }

    #[tokio::test]
    async fn test_insert_never_overwrites() {
        let repo = MemoryUrlRepository::new();
        repo.insert_if_absent(new_record("abc123def", "https://first.example"))
            .await
            .unwrap();

        let outcome = repo
            .insert_if_absent(new_record("abc123def", "https://second.example"))
            .await
            .unwrap();

        match outcome {
            InsertOutcome::Existing(record) => {
                assert_eq!(record.long_url, "https://first.example")
            }
            InsertOutcome::Created(_) => panic!("existing record was overwritten"),
        }
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_counters() {
        let repo = MemoryUrlRepository::new();
        repo.insert_if_absent(new_record("abc123def", "https://example.com"))
            .await
            .unwrap();

        assert!(repo.set_access_count("abc123def", 5).await.unwrap());
        assert_eq!(repo.get_access_count("abc123def").await.unwrap(), Some(5));
        assert_eq!(
            repo.increment_access_count("abc123def").await.unwrap(),
            Some(6)
        );
    }

    #[tokio::test]
    async fn test_counters_on_unknown_code() {
        let repo = MemoryUrlRepository::new();

        assert!(!repo.set_access_count("nope", 1).await.unwrap());
        assert_eq!(repo.get_access_count("nope").await.unwrap(), None);
        assert_eq!(repo.increment_access_count("nope").await.unwrap(), None);
        assert!(repo.is_empty().await);
    }
}
