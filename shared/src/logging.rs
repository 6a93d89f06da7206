//! Shared logging utilities for consistent tracing across the bot

use crate::types::Phase;
use chrono::{DateTime, Local};
use tracing::{error, info};

/// Build the env-filter directive used for every phase
pub fn filter_directive(log_level: Option<&str>) -> String {
    let base_level = log_level.unwrap_or("info");
    format!("instabot={base_level},shared={base_level},reqwest=warn")
}

/// Initialize tracing subscriber with an optional log level
pub fn init_tracing_with_level(log_level: Option<&str>) {
    use tracing_subscriber::{EnvFilter, fmt};

    let directive = filter_directive(log_level);

    // A subscriber may already be installed (tests, embedding); keep it.
    let _ = fmt()
        .with_env_filter(EnvFilter::new(&directive))
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init();
}

/// Initialize tracing subscriber at the default level
pub fn init_tracing() {
    init_tracing_with_level(None);
}

/// Get formatted timestamp for consistent logging
pub fn format_timestamp() -> String {
    let now: DateTime<Local> = Local::now();
    now.format("%H:%M:%S%.3f").to_string()
}

/// Macro for phase-aware info logging
#[macro_export]
macro_rules! phase_info {
    ($phase:expr, $($arg:tt)*) => {
        tracing::info!(
            phase = %$phase,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for phase-aware warning logging
#[macro_export]
macro_rules! phase_warn {
    ($phase:expr, $($arg:tt)*) => {
        tracing::warn!(
            phase = %$phase,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for phase-aware error logging
#[macro_export]
macro_rules! phase_error {
    ($phase:expr, $($arg:tt)*) => {
        tracing::error!(
            phase = %$phase,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for phase-aware debug logging
#[macro_export]
macro_rules! phase_debug {
    ($phase:expr, $($arg:tt)*) => {
        tracing::debug!(
            phase = %$phase,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Contextual logging helper for startup messages
pub fn log_startup(phase: &Phase, details: &str) {
    info!(
        phase = %phase,
        timestamp = format_timestamp(),
        "🚀 Starting {}",
        details
    );
}

/// Contextual logging helper for error conditions
pub fn log_error(phase: &Phase, context: &str, error: &dyn std::fmt::Display) {
    error!(
        phase = %phase,
        timestamp = format_timestamp(),
        error = %error,
        "❌ {} failed: {}",
        context,
        error
    );
}

/// Contextual logging helper for success conditions
pub fn log_success(phase: &Phase, message: &str) {
    info!(
        phase = %phase,
        timestamp = format_timestamp(),
        "✅ {}",
        message
    );
}

/// Contextual logging helper for progress updates
pub fn log_progress(phase: &Phase, action: &str, details: &str) {
    info!(
        phase = %phase,
        timestamp = format_timestamp(),
        "📋 {}: {}",
        action,
        details
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_display() {
        assert_eq!(Phase::Follow.to_string(), "follow");
        assert_eq!(Phase::Unfollow.to_string(), "unfollow");
        assert_eq!(Phase::Configure.to_string(), "configure");
        assert_eq!(Phase::Startup.to_string(), "startup");
    }

    #[test]
    fn test_filter_directive_uses_level() {
        assert_eq!(
            filter_directive(Some("debug")),
            "instabot=debug,shared=debug,reqwest=warn"
        );
        assert!(filter_directive(None).starts_with("instabot=info"));
    }

    #[test]
    fn test_macros_work_without_phase_init() {
        init_tracing();
        crate::phase_info!(Phase::current(), "logging before init: {}", 1);
        crate::phase_debug!(Phase::current(), "debug line");
    }
}
