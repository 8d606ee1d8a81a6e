use thiserror::Error;

/// Result type for repository operations.
pub type StorageResult<T> = std::result::Result<T, StorageError>;

#[derive(Debug, Clone, Error)]
pub enum CoreError {
    #[error("invalid short code: {0}")]
    InvalidShortCode(String),
}

/// Errors surfaced by the mapping store backends.
///
/// `DuplicateUrl` and `DuplicateCode` report which unique constraint lost an
/// insert race. They are expected outcomes of the allocation protocol and are
/// absorbed by the shortener; the remaining variants are genuine storage
/// failures and propagate unchanged.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("a mapping already exists for url: {0}")]
    DuplicateUrl(String),
    #[error("short code already taken: {0}")]
    DuplicateCode(String),
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage operation timed out: {0}")]
    Timeout(String),
    #[error("storage query failed: {0}")]
    Query(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
}

/// Errors that cross the shortener boundary.
///
/// Uniqueness conflicts never appear here; `shorten` either recovers from
/// them or converts an unbroken run of code collisions into
/// `AllocationExhausted`.
#[derive(Debug, Clone, Error)]
pub enum ShortenError {
    #[error("short code space exhausted for '{url}' after {attempts} attempts")]
    AllocationExhausted { url: String, attempts: u32 },
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}
