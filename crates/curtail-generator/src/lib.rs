//! Short code candidate generation.
//!
//! Generators are pure: they never touch storage and hold no state the
//! caller must synchronize on. Collision handling belongs to the shortener
//! service, which retries with an incremented attempt counter.

pub mod hashed;
pub mod seq;

use curtail_core::ShortCode;

/// Trait for producing short code candidates.
///
/// `candidate` must be cheap, side-effect free, and safe to call from any
/// number of threads. How `attempt` feeds into the candidate is up to the
/// implementation; callers bump it to escape collisions, so consecutive
/// attempt values should yield different candidates.
pub trait CodeGenerator: Send + Sync + 'static {
    /// Produces the candidate short code for `url` at the given retry
    /// `attempt`.
    ///
    /// Never returns an empty code or one outside the configured length and
    /// alphabet bounds.
    fn candidate(&self, url: &str, attempt: u32) -> ShortCode;
}

pub use hashed::HashedGenerator;
pub use seq::CounterGenerator;
