use crate::error::ShortenError;
use crate::mapping::UrlMapping;
use async_trait::async_trait;

type Result<T> = std::result::Result<T, ShortenError>;

/// The core-facing API of the allocation and mapping store.
///
/// Implementations must be safe for concurrent callers; no operation holds a
/// lock across the multi-step create path.
#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Returns the mapping for `url`, creating one if absent.
    ///
    /// Repeated calls with the same byte-exact URL return the same stored
    /// mapping. Callers wanting URL normalization must normalize before
    /// calling.
    async fn shorten(&self, url: &str) -> Result<UrlMapping>;

    /// Resolves a short code to its mapping by exact, case-sensitive match.
    /// Returns `None` for unknown codes, including syntactically invalid
    /// ones that can never have been issued.
    async fn resolve(&self, code: &str) -> Result<Option<UrlMapping>>;

    /// Looks up the mapping for a byte-exact original URL.
    async fn lookup_by_url(&self, url: &str) -> Result<Option<UrlMapping>>;
}
