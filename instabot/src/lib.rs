//! Follow/unfollow automation engine
//!
//! This library keeps a durable record of which accounts the operator has
//! followed and unfollowed, enforces a cooldown between those actions, and
//! runs bounded follow and unfollow passes against a social site driven
//! through a browser.

pub mod core;
pub mod error;
pub mod orchestrator;
pub mod services;
pub mod traits;

// Re-export commonly used types
pub use core::{Candidate, CandidateDiscoveryQueue, CandidatePool, CooldownPolicy, RelationshipStatus, RelationshipStore};
pub use error::{InstabotError, InstabotResult};
pub use orchestrator::{CommentPolicy, FollowOrchestrator, RunReport, UnfollowOrchestrator};
pub use traits::{Clock, Credentials, PageDriver, SocialSite, StateStorage};
