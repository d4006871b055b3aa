use std::collections::HashSet;

use rand::{rng, Rng};

use crate::errors::RepositoryError;

/// Symbols a generated short code is drawn from (base62)
pub const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

pub const DEFAULT_CODE_LENGTH: usize = 6;
pub const DEFAULT_MAX_ATTEMPTS: usize = 100;

/// Length and retry bound applied when resolving a new short code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShortCodePolicy {
    pub length: usize,
    pub max_attempts: usize,
}

impl Default for ShortCodePolicy {
    fn default() -> Self {
        Self {
            length: DEFAULT_CODE_LENGTH,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// Generates a random base62 short code using the thread-local RNG
pub fn generate_short_code(length: usize) -> String {
    generate_short_code_with(&mut rng(), length, ALPHABET)
}

/// Uniformly samples `length` symbols from `alphabet`. An empty alphabet
/// yields an empty string.
///
/// Codes are identifiers, not secrets, so any `Rng` will do.
pub fn generate_short_code_with<R: Rng + ?Sized>(
    rng: &mut R,
    length: usize,
    alphabet: &[u8],
) -> String {
    if alphabet.is_empty() {
        return String::new();
    }

    (0..length)
        .map(|_| alphabet[rng.random_range(0..alphabet.len())] as char)
        .collect()
}

/// Picks the short code for a new link.
///
/// A custom alias becomes the lower-cased code and must not be in `taken`.
/// Without an alias, `next_code` is sampled until a free code turns up or
/// `policy.max_attempts` samples have all collided.
pub fn resolve_short_code<F>(
    custom_alias: Option<&str>,
    taken: &HashSet<String>,
    policy: &ShortCodePolicy,
    mut next_code: F,
) -> Result<String, RepositoryError>
where
    F: FnMut() -> String,
{
    if let Some(alias) = custom_alias {
        let code = alias.to_lowercase();
        if taken.contains(&code) {
            return Err(RepositoryError::Conflict(format!(
                "Custom alias '{}' is already in use",
                code
            )));
        }
        return Ok(code);
    }

    for _ in 0..policy.max_attempts {
        let code = next_code();
        if !taken.contains(&code) {
            return Ok(code);
        }
    }

    Err(RepositoryError::Generation(format!(
        "Failed to generate a unique short code after {} attempts",
        policy.max_attempts
    )))
}
