//! Follow and unfollow runs
//!
//! Each orchestrator drives a [`SocialSite`](crate::traits::SocialSite)
//! against the [`RelationshipStore`](crate::core::RelationshipStore) for one
//! bounded run and reports how far it got.

use std::fmt;

use crate::error::InstabotError;

pub mod follow;
pub mod unfollow;

pub use follow::{CommentPolicy, FollowOrchestrator};
pub use unfollow::{unfollow_order, UnfollowOrchestrator};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunAction {
    Follow,
    Unfollow,
}

impl fmt::Display for RunAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunAction::Follow => write!(f, "follow run"),
            RunAction::Unfollow => write!(f, "unfollow run"),
        }
    }
}

/// Outcome of a run: how many actions completed out of how many requested
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    pub action: RunAction,
    pub completed: usize,
    pub requested: usize,
}

impl RunReport {
    pub fn follow(completed: usize, requested: usize) -> Self {
        Self {
            action: RunAction::Follow,
            completed,
            requested,
        }
    }

    pub fn unfollow(completed: usize, requested: usize) -> Self {
        Self {
            action: RunAction::Unfollow,
            completed,
            requested,
        }
    }

    /// `(completed, requested)`
    pub fn counts(&self) -> (usize, usize) {
        (self.completed, self.requested)
    }

    /// Wrap a fatal error so the progress reached so far survives it
    pub fn abort(self, source: InstabotError) -> InstabotError {
        InstabotError::RunAborted {
            action: self.action.to_string(),
            completed: self.completed,
            requested: self.requested,
            source: Box::new(source),
        }
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.action {
            RunAction::Follow => write!(f, "Following {}/{} new users", self.completed, self.requested),
            RunAction::Unfollow => write!(f, "Unfollowed {}/{} users", self.completed, self.requested),
        }
    }
}
