//! Core types used throughout the bot

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Global phase singleton - set once at startup
static PHASE: OnceLock<Phase> = OnceLock::new();

/// Phase reported before `init` has been called
static STARTUP: Phase = Phase::Startup;

/// Which operation the current process is running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Argument parsing and wiring, before an operation is chosen
    Startup,
    /// Persisting credentials and tunables
    Configure,
    /// Discovering and following new accounts
    Follow,
    /// Unfollowing accounts past their cooldown
    Unfollow,
}

impl Phase {
    /// Initialize the global phase. Later calls keep the first value.
    pub fn init(phase: Phase) -> &'static Phase {
        PHASE.get_or_init(|| phase)
    }

    /// Get the global phase, or `Startup` if it was never initialized
    pub fn current() -> &'static Phase {
        PHASE.get().unwrap_or(&STARTUP)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Startup => write!(f, "startup"),
            Phase::Configure => write!(f, "configure"),
            Phase::Follow => write!(f, "follow"),
            Phase::Unfollow => write!(f, "unfollow"),
        }
    }
}

impl Default for Phase {
    fn default() -> Self {
        Phase::Startup
    }
}
