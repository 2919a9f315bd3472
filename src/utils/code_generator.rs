//! Short code generation.
//!
//! Codes are [`CODE_LENGTH`] characters drawn uniformly from a 64-symbol
//! URL-safe alphabet using the operating system's CSPRNG.

/// Length of every generated short code.
pub const CODE_LENGTH: usize = 9;

/// URL-safe alphabet. Its size (64) divides 256, so masking a random byte
/// with `0x3f` picks each symbol with equal probability.
pub const ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

/// Source of candidate short codes.
///
/// The shortening service only depends on this trait, so tests can inject
/// fixed codes to force collisions.
#[cfg_attr(test, mockall::automock)]
pub trait CodeGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Production generator backed by [`generate_code`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomCodeGenerator;

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> String {
        generate_code()
    }
}

/// Generates a cryptographically secure random short code.
///
/// # Panics
///
/// Panics if the system random number generator fails. An exhausted entropy
/// source is not something the service can recover from.
///
/// # Examples
///
/// ```ignore
/// let code = generate_code();
/// assert_eq!(code.len(), 9);
/// assert!(code.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
/// ```
pub fn generate_code() -> String {
    let mut buffer = [0u8; CODE_LENGTH];

    getrandom::fill(&mut buffer).expect("Failed to generate random bytes");

    buffer
        .iter()
        .map(|byte| ALPHABET[(byte & 0x3f) as usize] as char)
        .collect()
}

/// Returns true if `code` could have been produced by [`generate_code`].
pub fn is_well_formed(code: &str) -> bool {
    code.len() == CODE_LENGTH && code.bytes().all(|b| ALPHABET.contains(&b))
}
