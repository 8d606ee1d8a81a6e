use crate::error::StorageResult;
use crate::mapping::UrlMapping;
use crate::shortcode::ShortCode;
use async_trait::async_trait;
use std::sync::Arc;

/// A read-only view of the mapping store.
///
/// This trait provides only the read operations from [`Repository`], for
/// components that resolve codes but never allocate them.
#[async_trait]
pub trait ReadRepository: Send + Sync + 'static {
    /// Retrieves the mapping for an exact short code match.
    /// Returns `None` if the code was never issued.
    async fn get_by_code(&self, code: &ShortCode) -> StorageResult<Option<UrlMapping>>;

    /// Retrieves the mapping for a byte-exact original URL.
    /// Returns `None` if the URL has not been shortened.
    async fn get_by_url(&self, url: &str) -> StorageResult<Option<UrlMapping>>;
}

#[async_trait]
pub trait Repository: ReadRepository {
    /// Atomically inserts a new mapping and returns it with its
    /// server-assigned `id` and `created_at`.
    ///
    /// Fails with [`DuplicateUrl`](crate::error::StorageError::DuplicateUrl)
    /// when a mapping for `url` already exists, or
    /// [`DuplicateCode`](crate::error::StorageError::DuplicateCode) when
    /// `code` is taken. Both report a lost race, not a broken store; the
    /// caller decides whether to fall back or regenerate.
    async fn insert(&self, url: &str, code: &ShortCode) -> StorageResult<UrlMapping>;
}

#[async_trait]
impl<T: ReadRepository> ReadRepository for Arc<T> {
    async fn get_by_code(&self, code: &ShortCode) -> StorageResult<Option<UrlMapping>> {
        (**self).get_by_code(code).await
    }

    async fn get_by_url(&self, url: &str) -> StorageResult<Option<UrlMapping>> {
        (**self).get_by_url(url).await
    }
}

#[async_trait]
impl<T: Repository> Repository for Arc<T> {
    async fn insert(&self, url: &str, code: &ShortCode) -> StorageResult<UrlMapping> {
        (**self).insert(url, code).await
    }
}
