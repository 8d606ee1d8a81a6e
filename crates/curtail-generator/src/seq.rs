use crate::CodeGenerator;
use curtail_core::{base62, ShortCode};
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter-based candidate generator.
///
/// Base62-encodes a monotonically increasing counter, so candidates are
/// collision-free by construction within a single instance and the retry
/// `attempt` is ignored. Codes grow from one character upward as the counter
/// advances.
///
/// Uniqueness holds per instance only. Multi-instance deployments must
/// either partition counter ranges via [`CounterGenerator::with_offset`] or
/// derive codes from the storage-assigned id instead (the two-phase
/// strategy), using [`base62::encode`] directly.
#[derive(Debug)]
pub struct CounterGenerator {
    counter: AtomicU64,
}

impl Clone for CounterGenerator {
    fn clone(&self) -> Self {
        Self {
            counter: AtomicU64::new(self.counter.load(Ordering::SeqCst)),
        }
    }
}

impl CounterGenerator {
    /// Creates a generator starting from zero.
    pub fn new() -> Self {
        Self {
            counter: AtomicU64::new(0),
        }
    }

    /// Creates a generator starting from a specific counter value.
    ///
    /// Useful for resuming from a known state or distributing counter
    /// ranges across nodes (node 1 starts at 0, node 2 at 1_000_000).
    pub fn with_offset(offset: u64) -> Self {
        Self {
            counter: AtomicU64::new(offset),
        }
    }
}

impl Default for CounterGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeGenerator for CounterGenerator {
    fn candidate(&self, _url: &str, _attempt: u32) -> ShortCode {
        let count = self.counter.fetch_add(1, Ordering::SeqCst);
        ShortCode::new_unchecked(base62::encode(count))
    }
}
