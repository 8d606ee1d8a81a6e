use async_trait::async_trait;
use curtail_core::error::StorageResult;
use curtail_core::{ReadRepository, Repository, ShortCode, UrlMapping};
use moka::future::Cache;
use std::time::Duration;
use tracing::{debug, trace};
use typed_builder::TypedBuilder;

const DEFAULT_CAPACITY: u64 = 10_000;

/// A repository decorator that caches resolutions by short code.
///
/// `get_by_code` goes through a moka cache with single-flight semantics:
/// concurrent misses for the same code coalesce into one fetch from the
/// inner repository. Successful inserts write through, so within one
/// process the cache can never serve a code that contradicts the store.
///
/// URL lookups pass through uncached: they are one half of the idempotent
/// create race and must observe the store directly.
#[derive(Debug, Clone)]
pub struct CachedRepository<R> {
    inner: R,
    cache: Cache<ShortCode, Option<UrlMapping>>,
}

impl<R> CachedRepository<R> {
    /// Creates a cached decorator with the default capacity and no TTL.
    pub fn new(inner: R) -> Self {
        Self::with_config(inner, CacheConfig::builder().build())
    }

    /// Creates a cached decorator from an explicit [`CacheConfig`].
    pub fn with_config(inner: R, config: CacheConfig) -> Self {
        let mut builder = Cache::builder().max_capacity(config.max_capacity);

        if let Some(ttl) = config.ttl {
            builder = builder.time_to_live(ttl);
        }

        if let Some(tti) = config.tti {
            builder = builder.time_to_idle(tti);
        }

        Self {
            inner,
            cache: builder.build(),
        }
    }

    /// Returns a reference to the inner repository.
    pub fn inner(&self) -> &R {
        &self.inner
    }

    /// Drops a cached entry so the next read fetches fresh data.
    pub async fn invalidate(&self, code: &ShortCode) {
        trace!(code = %code, "invalidating cache entry");
        self.cache.invalidate(code).await;
    }
}

#[async_trait]
impl<R: ReadRepository> ReadRepository for CachedRepository<R> {
    async fn get_by_code(&self, code: &ShortCode) -> StorageResult<Option<UrlMapping>> {
        self.cache
            .try_get_with(code.clone(), async {
                trace!(code = %code, "cache miss, fetching from inner repository");
                self.inner.get_by_code(code).await
            })
            .await
            .map_err(|e| e.as_ref().clone())
    }

    async fn get_by_url(&self, url: &str) -> StorageResult<Option<UrlMapping>> {
        self.inner.get_by_url(url).await
    }
}

#[async_trait]
impl<R: Repository> Repository for CachedRepository<R> {
    async fn insert(&self, url: &str, code: &ShortCode) -> StorageResult<UrlMapping> {
        let mapping = self.inner.insert(url, code).await?;

        // Write through, replacing a possibly cached negative entry.
        self.cache.insert(code.clone(), Some(mapping.clone())).await;
        debug!(code = %code, "cached newly inserted mapping");

        Ok(mapping)
    }
}

/// Configuration for the short code read cache.
#[derive(Debug, TypedBuilder)]
pub struct CacheConfig {
    /// Maximum number of entries the cache can hold.
    #[builder(default = DEFAULT_CAPACITY)]
    max_capacity: u64,
    /// Time-to-live for cache entries.
    #[builder(default, setter(strip_option))]
    ttl: Option<Duration>,
    /// Time-to-idle for cache entries.
    #[builder(default, setter(strip_option))]
    tti: Option<Duration>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryRepository;

    fn code(s: &str) -> ShortCode {
        ShortCode::new_unchecked(s)
    }

    fn cached() -> CachedRepository<InMemoryRepository> {
        CachedRepository::new(InMemoryRepository::new())
    }

    #[tokio::test]
    async fn miss_fetches_from_inner_and_populates() {
        let repo = cached();

        repo.inner()
            .insert("https://example.com", &code("abc123"))
            .await
            .unwrap();

        let first = repo.get_by_code(&code("abc123")).await.unwrap().unwrap();
        let second = repo.get_by_code(&code("abc123")).await.unwrap().unwrap();
        assert_eq!(first, second);
        assert_eq!(first.original_url, "https://example.com");
    }

    #[tokio::test]
    async fn insert_writes_through() {
        let repo = cached();

        // Prime a negative entry for the code.
        assert!(repo.get_by_code(&code("abc123")).await.unwrap().is_none());

        let inserted = repo
            .insert("https://example.com", &code("abc123"))
            .await
            .unwrap();

        // The stale negative entry must have been replaced.
        let got = repo.get_by_code(&code("abc123")).await.unwrap().unwrap();
        assert_eq!(got, inserted);
    }

    #[tokio::test]
    async fn url_lookups_bypass_the_cache() {
        let repo = cached();

        repo.inner()
            .insert("https://example.com", &code("abc123"))
            .await
            .unwrap();

        let got = repo.get_by_url("https://example.com").await.unwrap();
        assert!(got.is_some());
    }

    #[tokio::test]
    async fn invalidate_drops_entry() {
        let repo = cached();

        assert!(repo.get_by_code(&code("abc123")).await.unwrap().is_none());

        // Insert behind the cache's back, as another process would.
        repo.inner()
            .insert("https://example.com", &code("abc123"))
            .await
            .unwrap();

        // Cached negative entry still wins until invalidated.
        assert!(repo.get_by_code(&code("abc123")).await.unwrap().is_none());

        repo.invalidate(&code("abc123")).await;
        assert!(repo.get_by_code(&code("abc123")).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn invalidate_is_idempotent() {
        let repo = cached();

        repo.invalidate(&code("abc123")).await;
        repo.invalidate(&code("abc123")).await;
    }

    #[tokio::test]
    async fn single_flight_coalesces_concurrent_misses() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        // Counts fetches by wrapping the inner repository.
        struct Counting {
            inner: InMemoryRepository,
            fetches: Arc<AtomicUsize>,
        }

        #[async_trait]
        impl ReadRepository for Counting {
            async fn get_by_code(&self, code: &ShortCode) -> StorageResult<Option<UrlMapping>> {
                self.fetches.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(20)).await;
                self.inner.get_by_code(code).await
            }

            async fn get_by_url(&self, url: &str) -> StorageResult<Option<UrlMapping>> {
                self.inner.get_by_url(url).await
            }
        }

        let fetches = Arc::new(AtomicUsize::new(0));
        let inner = Counting {
            inner: InMemoryRepository::new(),
            fetches: Arc::clone(&fetches),
        };
        inner
            .inner
            .insert("https://example.com", &code("abc123"))
            .await
            .unwrap();

        let repo = Arc::new(CachedRepository::new(inner));

        let mut handles = vec![];
        for _ in 0..10 {
            let repo = Arc::clone(&repo);
            handles.push(tokio::spawn(async move {
                repo.get_by_code(&code("abc123")).await.unwrap()
            }));
        }

        for handle in handles {
            assert!(handle.await.unwrap().is_some());
        }

        assert_eq!(fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn ttl_expires_entries() {
        let config = CacheConfig::builder()
            .max_capacity(100)
            .ttl(Duration::from_millis(50))
            .build();
        let repo = CachedRepository::with_config(InMemoryRepository::new(), config);

        // Prime a negative entry, then let it expire.
        assert!(repo.get_by_code(&code("abc123")).await.unwrap().is_none());

        repo.inner()
            .insert("https://example.com", &code("abc123"))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(repo.get_by_code(&code("abc123")).await.unwrap().is_some());
    }
}
