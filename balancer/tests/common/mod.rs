//! Common test utilities and infrastructure
//!
//! Shared engines, fixtures and helpers used across the balancer test suites.

pub mod fixtures;
pub mod helpers;

// Re-export commonly used items for convenience
pub use fixtures::TestFixtures;
pub use helpers::{ScriptedEngine, TestHelpers};
