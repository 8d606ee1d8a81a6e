use crate::CodeGenerator;
use curtail_core::error::CoreError;
use curtail_core::{base62, shortcode, ShortCode};
use sha2::{Digest, Sha256};

/// Default generated code length. At 7 base62 digits the keyspace holds
/// roughly 3.5e12 codes.
pub const DEFAULT_LENGTH: usize = 7;

/// Deterministic hash-based candidate generator.
///
/// The candidate is derived from SHA-256 over the URL and the attempt
/// counter: the first 8 digest bytes, read big-endian, reduced to a
/// fixed-width base62 code. The same `(url, attempt)` pair always yields the
/// same candidate, so retries are reproducible, and bumping `attempt`
/// re-salts the digest to escape a collision.
#[derive(Debug, Clone)]
pub struct HashedGenerator {
    length: usize,
}

impl HashedGenerator {
    /// Creates a generator producing codes of [`DEFAULT_LENGTH`].
    pub fn new() -> Self {
        Self {
            length: DEFAULT_LENGTH,
        }
    }

    /// Creates a generator producing codes of exactly `length` characters.
    ///
    /// `length` must lie within the short code bounds (1-10).
    pub fn with_length(length: usize) -> Result<Self, CoreError> {
        if !(shortcode::MIN_LENGTH..=shortcode::MAX_LENGTH).contains(&length) {
            return Err(CoreError::InvalidShortCode(format!(
                "generator length must be between {} and {}, got {}",
                shortcode::MIN_LENGTH,
                shortcode::MAX_LENGTH,
                length
            )));
        }
        Ok(Self { length })
    }

    /// The length of the codes this generator produces.
    pub fn length(&self) -> usize {
        self.length
    }
}

impl Default for HashedGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeGenerator for HashedGenerator {
    fn candidate(&self, url: &str, attempt: u32) -> ShortCode {
        let mut hasher = Sha256::new();
        hasher.update(url.as_bytes());
        hasher.update(b"\n");
        hasher.update(attempt.to_be_bytes());
        let digest = hasher.finalize();

        let mut prefix = [0u8; 8];
        prefix.copy_from_slice(&digest[..8]);
        let value = u64::from_be_bytes(prefix);

        ShortCode::new_unchecked(base62::encode_fixed(value, self.length))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidate_is_deterministic() {
        let generator = HashedGenerator::new();

        let first = generator.candidate("https://example.com/a", 0);
        let second = generator.candidate("https://example.com/a", 0);

        assert_eq!(first, second);
    }

    #[test]
    fn attempts_yield_different_candidates() {
        let generator = HashedGenerator::new();

        let first = generator.candidate("https://example.com/a", 0);
        let second = generator.candidate("https://example.com/a", 1);
        let third = generator.candidate("https://example.com/a", 2);

        assert_ne!(first, second);
        assert_ne!(second, third);
        assert_ne!(first, third);
    }

    #[test]
    fn urls_yield_different_candidates() {
        let generator = HashedGenerator::new();

        let a = generator.candidate("https://example.com/a", 0);
        let b = generator.candidate("https://example.com/b", 0);

        assert_ne!(a, b);
    }

    #[test]
    fn candidate_has_configured_length_and_alphabet() {
        for length in [1, 4, 7, 10] {
            let generator = HashedGenerator::with_length(length).unwrap();
            let code = generator.candidate("https://example.com", 3);

            assert_eq!(code.as_str().len(), length);
            assert!(code.as_str().bytes().all(base62::is_alphabet_byte));
        }
    }

    #[test]
    fn with_length_rejects_out_of_bounds() {
        assert!(HashedGenerator::with_length(0).is_err());
        assert!(HashedGenerator::with_length(11).is_err());
        assert!(HashedGenerator::with_length(10).is_ok());
    }

    #[test]
    fn empty_url_still_produces_a_valid_candidate() {
        let generator = HashedGenerator::new();
        let code = generator.candidate("", 0);

        assert_eq!(code.as_str().len(), DEFAULT_LENGTH);
    }

    #[test]
    fn generator_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<HashedGenerator>();
    }
}
