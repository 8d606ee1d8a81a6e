use async_trait::async_trait;
use curtail_core::error::{ShortenError, StorageError};
use curtail_core::{Repository, ShortCode, Shortener, UrlMapping};
use curtail_generator::CodeGenerator;
use std::sync::Arc;
use tracing::{debug, warn};

/// Default bound on insert attempts before a shorten request is failed.
///
/// Exceeding it means the generator's candidate space around this URL is
/// saturated; that is an operational signal to enlarge the code length, not
/// something to retry silently.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 8;

/// A concrete implementation of the `Shortener` trait.
///
/// This service wraps a `Repository` and a `CodeGenerator` and runs the
/// allocation protocol:
/// - an existing mapping for the URL is returned unchanged,
/// - otherwise candidates are inserted until one commits, bounded by
///   `max_attempts`,
/// - a lost race on the URL constraint falls back to the winner's mapping.
///
/// No lock is held across the lookup, insert, and fallback steps; each is
/// its own atomic storage operation and the backend's unique constraints
/// arbitrate every race.
#[derive(Debug)]
pub struct ShortenerService<R, G> {
    repository: Arc<R>,
    generator: Arc<G>,
    max_attempts: u32,
}

impl<R, G> Clone for ShortenerService<R, G> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            generator: Arc::clone(&self.generator),
            max_attempts: self.max_attempts,
        }
    }
}

impl<R: Repository, G: CodeGenerator> ShortenerService<R, G> {
    /// Creates a new `ShortenerService` with the default retry budget.
    pub fn new(repository: R, generator: G) -> Self {
        Self {
            repository: Arc::new(repository),
            generator: Arc::new(generator),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Overrides the insert retry budget.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }
}

#[async_trait]
impl<R: Repository, G: CodeGenerator> Shortener for ShortenerService<R, G> {
    async fn shorten(&self, url: &str) -> Result<UrlMapping, ShortenError> {
        // Idempotency fast path.
        if let Some(existing) = self.repository.get_by_url(url).await? {
            return Ok(existing);
        }

        for attempt in 0..self.max_attempts {
            let candidate = self.generator.candidate(url, attempt);

            match self.repository.insert(url, &candidate).await {
                Ok(mapping) => {
                    debug!(code = %mapping.short_code, attempt, "allocated short code");
                    return Ok(mapping);
                }
                Err(StorageError::DuplicateCode(taken)) => {
                    debug!(code = %taken, attempt, "candidate collision, regenerating");
                }
                Err(StorageError::DuplicateUrl(_)) => {
                    // A concurrent request for the same URL committed first;
                    // its mapping is the one to return.
                    match self.repository.get_by_url(url).await? {
                        Some(existing) => {
                            debug!(code = %existing.short_code, attempt, "lost create race, returning winner");
                            return Ok(existing);
                        }
                        // The winner vanished between the conflict and the
                        // fetch, which only an out-of-core deletion can
                        // cause. The slot is free again; keep trying.
                        None => warn!(attempt, "conflicting mapping disappeared before fetch"),
                    }
                }
                Err(other) => return Err(other.into()),
            }
        }

        warn!(url, attempts = self.max_attempts, "short code space exhausted");
        Err(ShortenError::AllocationExhausted {
            url: url.to_owned(),
            attempts: self.max_attempts,
        })
    }

    async fn resolve(&self, code: &str) -> Result<Option<UrlMapping>, ShortenError> {
        // Codes outside the alphabet or length bounds can never have been
        // issued; they are not found rather than an error.
        let Ok(code) = ShortCode::new(code) else {
            return Ok(None);
        };

        Ok(self.repository.get_by_code(&code).await?)
    }

    async fn lookup_by_url(&self, url: &str) -> Result<Option<UrlMapping>, ShortenError> {
        Ok(self.repository.get_by_url(url).await?)
    }
}
