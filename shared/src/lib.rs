//! Shared types for the instabot workspace
//!
//! Holds the pieces that are not specific to the follow/unfollow engine:
//! run phase identification, logging setup, configuration and its errors.

pub mod config;
pub mod errors;
pub mod logging;
pub mod types;

pub use config::{BotConfig, RunOverrides};
pub use errors::*;
pub use types::*;
