//! Domain layer containing business entities and logic.
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`access_event`] - Access accounting event model
//! - [`access_recorder`] - Detached access-count updates
//!
//! # Access Accounting Flow
//!
//! 1. Resolution service answers a short code (cache hit or store read)
//! 2. An [`access_event::AccessEvent`] is built for it
//! 3. [`access_recorder::AccessRecorder::record`] spawns the count update
//! 4. Failures are logged and counted; the redirect is unaffected

pub mod access_event;
pub mod access_recorder;
pub mod entities;
pub mod repositories;
