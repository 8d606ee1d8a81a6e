//! The short code allocation protocol.
//!
//! [`ShortenerService`] drives the idempotent create path over a
//! `Repository` and a `CodeGenerator`. Storage-level uniqueness violations
//! are its branching signal, not errors: a duplicate code triggers a
//! regenerate-and-retry, a duplicate URL falls back to the mapping the
//! concurrent winner created.

pub mod service;

pub use service::{ShortenerService, DEFAULT_MAX_ATTEMPTS};
