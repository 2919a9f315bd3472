//! Application layer services implementing business logic.
//!
//! Services orchestrate the code generator, the durable store and the cache.
//! They consume repository and cache traits and provide a clean API for HTTP
//! handlers.
//!
//! # Available Services
//!
//! - [`services::shortening_service::ShorteningService`] - Short URL creation and collision handling
//! - [`services::resolution_service::ResolutionService`] - Cache-aside resolution and access accounting

pub mod services;
