//! Expansion windows.

use almanac_core::config::ExpansionConfig;
use almanac_core::error::CoreError;
use chrono::{Days, NaiveDateTime, NaiveTime};
use serde::Serialize;

use crate::error::ServiceResult;

/// An inclusive range of wall-clock instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Window {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Window {
    /// Creates a window from inclusive bounds.
    ///
    /// ## Errors
    /// Returns `CoreError::InvalidInput` if `end` precedes `start`.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> ServiceResult<Self> {
        if end < start {
            return Err(CoreError::InvalidInput(format!(
                "window end {end} precedes start {start}"
            ))
            .into());
        }
        Ok(Self { start, end })
    }
}

/// Lookback/lookahead policy turning a reference instant into a window.
///
/// The window starts at midnight `lookback_days` before the reference date
/// and ends at 23:59:59 `lookahead_days` after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowPolicy {
    pub lookback_days: u64,
    pub lookahead_days: u64,
}

impl WindowPolicy {
    /// ## Summary
    /// Builds a policy from the expansion settings.
    ///
    /// ## Errors
    /// Returns `CoreError::InvalidConfiguration` for negative day counts.
    pub fn from_config(config: &ExpansionConfig) -> ServiceResult<Self> {
        config.validate()?;
        Ok(Self {
            lookback_days: config.lookback_days.unsigned_abs(),
            lookahead_days: config.lookahead_days.unsigned_abs(),
        })
    }

    /// ## Summary
    /// Returns the window around `now`.
    ///
    /// ## Errors
    /// Returns `CoreError::InvalidInput` if a bound leaves the supported
    /// calendar range.
    pub fn window_at(&self, now: NaiveDateTime) -> ServiceResult<Window> {
        let today = now.date();
        let out_of_range = || CoreError::InvalidInput(format!("window around {now} is out of range"));

        let first = today
            .checked_sub_days(Days::new(self.lookback_days))
            .ok_or_else(out_of_range)?;
        let last = today
            .checked_add_days(Days::new(self.lookahead_days))
            .ok_or_else(out_of_range)?;
        let end_of_day = NaiveTime::from_hms_opt(23, 59, 59).ok_or_else(out_of_range)?;

        Window::new(first.and_time(NaiveTime::MIN), last.and_time(end_of_day))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceError;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn default_policy_window() {
        let policy = WindowPolicy::from_config(&ExpansionConfig::default()).unwrap();
        let window = policy.window_at(at(2024, 2, 10, 15, 42, 7)).unwrap();
        assert_eq!(window.start, at(2024, 2, 9, 0, 0, 0));
        assert_eq!(window.end, at(2024, 3, 11, 23, 59, 59));
    }

    #[test]
    fn zero_days_covers_today() {
        let policy = WindowPolicy {
            lookback_days: 0,
            lookahead_days: 0,
        };
        let window = policy.window_at(at(2024, 2, 10, 15, 0, 0)).unwrap();
        assert_eq!(window.start, at(2024, 2, 10, 0, 0, 0));
        assert_eq!(window.end, at(2024, 2, 10, 23, 59, 59));
    }

    #[test]
    fn negative_config_rejected() {
        let config = ExpansionConfig {
            lookahead_days: -3,
            ..ExpansionConfig::default()
        };
        let err = WindowPolicy::from_config(&config).unwrap_err();
        assert!(matches!(err, ServiceError::CoreError(_)));
    }

    #[test]
    fn inverted_window_rejected() {
        let err = Window::new(at(2024, 1, 2, 0, 0, 0), at(2024, 1, 1, 0, 0, 0)).unwrap_err();
        assert!(err.to_string().contains("precedes"));
    }

    #[test]
    fn out_of_range_window_rejected() {
        let policy = WindowPolicy {
            lookback_days: 0,
            lookahead_days: u64::MAX,
        };
        assert!(policy.window_at(at(2024, 1, 1, 0, 0, 0)).is_err());
    }
}
