//! Syntactic URL validation.
//!
//! A long URL is accepted if it parses as an absolute URL. The input string
//! itself is what gets stored and redirected to; nothing is normalized.

use url::Url;

/// Errors produced by [`parse_absolute_url`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UrlValidationError {
    #[error("URL is empty")]
    Empty,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),
}

/// Parses `input` as an absolute URL.
///
/// Relative references (`/path`, `example.com`) have no scheme and are rejected.
///
/// # Errors
///
/// Returns [`UrlValidationError::Empty`] for blank input and
/// [`UrlValidationError::InvalidFormat`] for anything `url` cannot parse.
pub fn parse_absolute_url(input: &str) -> Result<Url, UrlValidationError> {
    if input.trim().is_empty() {
        return Err(UrlValidationError::Empty);
    }

    Url::parse(input).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))
}

pub fn is_valid_url(input: &str) -> bool {
    parse_absolute_url(input).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_https() {
        assert!(is_valid_url("https://example.com/page"));
    }

    #[test]
    fn test_accepts_query_and_fragment() {
        assert!(is_valid_url("http://example.com:8080/a/b?q=rust&x=1#top"));
    }

    #[test]
    fn test_accepts_other_schemes() {
        assert!(is_valid_url("ftp://files.example.com/readme.txt"));
        assert!(is_valid_url("mailto:someone@example.com"));
    }

    #[test]
    fn test_rejects_relative() {
        assert!(matches!(
            parse_absolute_url("/just/a/path"),
            Err(UrlValidationError::InvalidFormat(_))
        ));
        assert!(!is_valid_url("example.com"));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(!is_valid_url("not-a-url"));
        assert!(!is_valid_url("http://"));
        assert!(!is_valid_url("https://exa mple.com"));
    }

    #[test]
    fn test_rejects_empty() {
        assert_eq!(parse_absolute_url(""), Err(UrlValidationError::Empty));
        assert_eq!(parse_absolute_url("   "), Err(UrlValidationError::Empty));
    }
}
