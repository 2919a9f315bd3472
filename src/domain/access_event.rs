//! Access event model for detached access-count accounting.

/// One successful resolution that still has to be counted.
///
/// Built by the resolution service and handed to
/// [`crate::domain::access_recorder::AccessRecorder`], which applies it on its
/// own task so the redirect never waits on the count update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessEvent {
    pub short_code: String,
    /// Counter value already read on the cache-miss path. `None` on a cache
    /// hit, where the recorder has to read it first.
    pub observed_count: Option<i64>,
}

impl AccessEvent {
    /// Event for a cache hit: the current count is unknown.
    pub fn cache_hit(short_code: impl Into<String>) -> Self {
        Self {
            short_code: short_code.into(),
            observed_count: None,
        }
    }

    /// Event for a cache miss: the store lookup already returned the count.
    pub fn store_read(short_code: impl Into<String>, observed_count: i64) -> Self {
        Self {
            short_code: short_code.into(),
            observed_count: Some(observed_count),
        }
    }
}
