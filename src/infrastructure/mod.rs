//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer.
//!
//! # Modules
//!
//! - [`cache`] - Resolution cache (Redis and in-memory implementations)
//! - [`persistence`] - Durable record store (PostgreSQL and in-memory implementations)

pub mod cache;
pub mod persistence;
