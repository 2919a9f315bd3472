//! Core domain entities.
//!
//! - [`UrlRecord`] - A persisted short code mapping
//! - [`NewUrlRecord`] - Input for inserting a record
//! - [`InsertOutcome`] - Result of a conditional insert

pub mod url_record;

pub use url_record::{InsertOutcome, NewUrlRecord, UrlRecord};
