//! Business logic services for the application layer.

pub mod resolution_service;
pub mod shortening_service;

pub use resolution_service::{Resolution, ResolutionService, ResolutionSource};
pub use shortening_service::{CollisionPolicy, ShortenedUrl, ShorteningService};
