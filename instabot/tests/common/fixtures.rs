//! Test fixtures and data for instabot tests
//!
//! Consistent dates, tunables and account names used across all test suites.

use chrono::{Duration, NaiveDate};

/// Standard test data and fixtures
pub struct TestFixtures;

impl TestFixtures {
    /// Standard tunables
    pub const COOLDOWN_DAYS: i64 = 15;
    pub const SEED: u64 = 42;

    /// Accounts used across scenarios
    pub const ALICE: &'static str = "alice";
    pub const BOB: &'static str = "bob";
    pub const CAROL: &'static str = "carol";

    /// Date every test treats as today
    pub fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 20).unwrap()
    }

    pub fn days_ago(days: i64) -> NaiveDate {
        Self::today() - Duration::days(days)
    }

    /// Post URLs in the shape the site layer produces
    pub fn post(id: &str) -> String {
        format!("https://www.instagram.com/p/{id}/")
    }

    pub fn tags() -> Vec<String> {
        vec!["travel".to_string(), "food".to_string()]
    }

    pub fn comment_phrases() -> Vec<String> {
        vec!["Great shot!".to_string(), "Love this".to_string()]
    }
}
