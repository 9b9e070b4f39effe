//! Mock provider implementations for testing.
//!
//! In-memory implementations of the provider traits for unit tests,
//! integration tests and offline demos.

pub mod identity;

pub use identity::{CallCounts, InMemoryIdentityProvider};
