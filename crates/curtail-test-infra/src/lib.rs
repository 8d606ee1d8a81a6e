//! Disposable infrastructure fixtures for integration tests.
//!
//! These fixtures require a running Docker daemon; the tests that use them
//! are ignored by default and run with `cargo test -- --ignored`.

pub mod error;
pub mod postgres;

pub use error::{Result, TestInfraError};
pub use postgres::{PostgresConfig, PostgresServer};
