//! Utility functions shared across layers.
//!
//! - [`code_generator`] - Short code generation
//! - [`url_validator`] - Absolute URL validation
//! - [`deadline`] - Per-call timeouts for store and cache operations

pub mod code_generator;
pub mod deadline;
pub mod url_validator;
