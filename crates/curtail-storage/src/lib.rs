//! Mapping store backends.
//!
//! Every backend enforces the same two uniqueness invariants (one mapping
//! per original URL, one per short code) and reports a lost insert race as
//! [`DuplicateUrl`](curtail_core::StorageError::DuplicateUrl) or
//! [`DuplicateCode`](curtail_core::StorageError::DuplicateCode) so the
//! allocation protocol can branch on which constraint fired.

pub mod cached;
pub mod memory;
pub mod postgres;

pub use cached::{CacheConfig, CachedRepository};
pub use memory::InMemoryRepository;
pub use postgres::PgRepository;
