//! Core business logic modules
//!
//! Pure logic with no knowledge of pages or selectors. I/O happens only
//! through the traits in [`crate::traits`], so everything here is testable
//! with mocks and a fixed clock.

pub mod cooldown;
pub mod discovery;
pub mod scroll;
pub mod store;

pub use cooldown::{day_interval, CooldownPolicy};
pub use discovery::{Candidate, CandidateDiscoveryQueue, CandidatePool, DiscoveryPlan};
pub use store::{Account, RelationshipStatus, RelationshipStore, StoreDocument};
