use async_trait::async_trait;
use curtail_core::error::{StorageError, StorageResult};
use curtail_core::{ReadRepository, Repository, ShortCode, UrlMapping};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use jiff::Timestamp;
use std::sync::atomic::{AtomicI64, Ordering};

/// In-memory implementation of the mapping store using DashMap.
///
/// Two sharded indexes mirror the two unique constraints of the durable
/// schema: one keyed by original URL, one by short code. Inserts linearize
/// on the URL entry first, then reserve the code entry, so a losing writer
/// observes the same `DuplicateUrl`/`DuplicateCode` outcomes the SQL
/// backend reports. Lock order is always URL shard, then code shard.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    by_url: DashMap<String, UrlMapping>,
    by_code: DashMap<ShortCode, UrlMapping>,
    next_id: AtomicI64,
}

impl InMemoryRepository {
    /// Creates a new in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new in-memory repository with the specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            by_url: DashMap::with_capacity(capacity),
            by_code: DashMap::with_capacity(capacity),
            next_id: AtomicI64::new(0),
        }
    }

    /// Number of stored mappings.
    pub fn len(&self) -> usize {
        self.by_url.len()
    }

    /// Returns `true` if no mapping has been stored.
    pub fn is_empty(&self) -> bool {
        self.by_url.is_empty()
    }
}

#[async_trait]
impl ReadRepository for InMemoryRepository {
    async fn get_by_code(&self, code: &ShortCode) -> StorageResult<Option<UrlMapping>> {
        Ok(self.by_code.get(code).map(|entry| entry.clone()))
    }

    async fn get_by_url(&self, url: &str) -> StorageResult<Option<UrlMapping>> {
        Ok(self.by_url.get(url).map(|entry| entry.clone()))
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn insert(&self, url: &str, code: &ShortCode) -> StorageResult<UrlMapping> {
        match self.by_url.entry(url.to_owned()) {
            Entry::Occupied(_) => Err(StorageError::DuplicateUrl(url.to_owned())),
            Entry::Vacant(url_slot) => match self.by_code.entry(code.clone()) {
                Entry::Occupied(_) => Err(StorageError::DuplicateCode(code.to_string())),
                Entry::Vacant(code_slot) => {
                    let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
                    let mapping = UrlMapping {
                        id,
                        original_url: url.to_owned(),
                        short_code: code.clone(),
                        created_at: Timestamp::now(),
                    };
                    code_slot.insert(mapping.clone());
                    url_slot.insert(mapping.clone());
                    Ok(mapping)
                }
            },
        }
    }
}
