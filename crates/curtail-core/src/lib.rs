//! Core types and traits for the curtail URL shortener.
//!
//! This crate provides the shared domain types and trait seams used by the
//! code generator, the storage backends, and the shortener service.

pub mod base62;
pub mod error;
pub mod mapping;
pub mod repository;
pub mod shortcode;
pub mod shortener;

pub use error::{CoreError, ShortenError, StorageError};
pub use mapping::UrlMapping;
pub use repository::{ReadRepository, Repository};
pub use shortcode::ShortCode;
pub use shortener::Shortener;
