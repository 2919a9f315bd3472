//! Durable record store implementations.
//!
//! - [`PgUrlRepository`] - PostgreSQL storage via SQLx
//! - [`MemoryUrlRepository`] - In-process storage for tests
//! - [`pool`] - Pool construction and the [`StoreConsistency`] policy

pub mod memory_url_repository;
pub mod pg_url_repository;
pub mod pool;

pub use memory_url_repository::MemoryUrlRepository;
pub use pg_url_repository::PgUrlRepository;
pub use pool::{PoolSettings, StoreConsistency};
