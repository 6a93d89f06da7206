//! Common test utilities and infrastructure
//!
//! Shared fixtures, a file-backed store builder and mock-site helpers used
//! across the instabot test suites.

pub mod fixtures;
pub mod helpers;

// Re-export commonly used items for convenience
pub use fixtures::TestFixtures;
pub use helpers::{StoreBuilder, TestHelpers, TestStore};
