//! Service-specific tests
//!
//! Each service has its own test file with dedicated fixtures and helpers.

mod state_file;

// Common test utilities for services
pub mod common {
    use chrono::NaiveDate;

    /// Date every service test treats as today
    pub fn test_today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 20).expect("valid test date")
    }
}
