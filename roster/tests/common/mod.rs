//! Common test utilities and infrastructure
//!
//! Fixtures, builders and assertions shared by the roster test suites.

pub mod fixtures;
pub mod helpers;

// Re-export commonly used items for convenience
pub use fixtures::TestFixtures;
pub use helpers::{StoreBuilder, TestHelpers};
