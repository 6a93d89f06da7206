//! Day-granularity date arithmetic for follow/unfollow cooldowns

use chrono::NaiveDate;

/// Serialized date layout, e.g. `2024/03/20`
pub const DATE_FORMAT: &str = "%Y/%m/%d";

/// Absolute number of whole days between two calendar dates
pub fn day_interval(d1: NaiveDate, d2: NaiveDate) -> i64 {
    (d2 - d1).num_days().abs()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, DATE_FORMAT).ok()
}

/// Minimum elapsed whole days before a relationship may change again.
///
/// Zero or negative thresholds are always satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CooldownPolicy {
    days: i64,
}

impl CooldownPolicy {
    pub fn new(days: i64) -> Self {
        Self { days }
    }

    /// True once at least `days` whole days separate `since` and `today`
    pub fn has_elapsed(&self, since: NaiveDate, today: NaiveDate) -> bool {
        day_interval(since, today) >= self.days
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_interval_is_symmetric_and_zero_on_same_day() {
        let a = date(2024, 1, 31);
        let b = date(2024, 3, 1);

        assert_eq!(day_interval(a, b), 30); // 2024 is a leap year
        assert_eq!(day_interval(b, a), 30);
        assert_eq!(day_interval(a, a), 0);
    }

    #[test]
    fn test_interval_across_year_boundary() {
        assert_eq!(day_interval(date(2023, 12, 25), date(2024, 1, 9)), 15);
    }

    #[test]
    fn test_date_codec() {
        let d = date(2024, 3, 5);
        assert_eq!(format_date(d), "2024/03/05");
        assert_eq!(parse_date("2024/03/05"), Some(d));
        assert_eq!(parse_date("2024-03-05"), None);
        assert_eq!(parse_date("2024/02/30"), None);
    }

    #[test]
    fn test_policy_threshold_is_inclusive() {
        let policy = CooldownPolicy::new(15);
        let since = date(2024, 3, 1);

        assert!(!policy.has_elapsed(since, date(2024, 3, 15)));
        assert!(policy.has_elapsed(since, date(2024, 3, 16)));
    }

    #[test]
    fn test_non_positive_policy_always_elapsed() {
        let today = date(2024, 3, 20);
        for days in [-5, -1, 0] {
            assert!(CooldownPolicy::new(days).has_elapsed(today, today));
        }
    }
}
