//! Parsed recurrence rule (RFC 5545 §3.3.10, restricted subset).

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDateTime, Weekday};

use crate::error::{RfcError, RfcResult};

/// Recurrence frequency.
///
/// Only the four calendar-level frequencies are supported; sub-daily
/// frequencies are rejected at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "DAILY",
            Self::Weekly => "WEEKLY",
            Self::Monthly => "MONTHLY",
            Self::Yearly => "YEARLY",
        }
    }

    /// Parses a frequency from a string (case-insensitive).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s.to_ascii_uppercase().as_str() {
            "DAILY" => Self::Daily,
            "WEEKLY" => Self::Weekly,
            "MONTHLY" => Self::Monthly,
            "YEARLY" => Self::Yearly,
            _ => return None,
        })
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Returns the two-letter iCalendar code for a weekday.
#[must_use]
pub const fn weekday_code(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "MO",
        Weekday::Tue => "TU",
        Weekday::Wed => "WE",
        Weekday::Thu => "TH",
        Weekday::Fri => "FR",
        Weekday::Sat => "SA",
        Weekday::Sun => "SU",
    }
}

/// Parses a two-letter weekday code (case-insensitive).
#[must_use]
pub fn parse_weekday_code(s: &str) -> Option<Weekday> {
    Some(match s.to_ascii_uppercase().as_str() {
        "MO" => Weekday::Mon,
        "TU" => Weekday::Tue,
        "WE" => Weekday::Wed,
        "TH" => Weekday::Thu,
        "FR" => Weekday::Fri,
        "SA" => Weekday::Sat,
        "SU" => Weekday::Sun,
        _ => return None,
    })
}

/// Weekday with optional occurrence number.
///
/// Used in BYDAY rule part. Examples:
/// - `MO` - every Monday
/// - `1MO` - first Monday of the month
/// - `-1FR` - last Friday of the month
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekdaySelector {
    /// Optional occurrence number (never 0).
    pub ordinal: Option<i8>,
    /// The day of the week.
    pub weekday: Weekday,
}

impl WeekdaySelector {
    /// Creates a selector matching every occurrence of `weekday`.
    #[must_use]
    pub const fn every(weekday: Weekday) -> Self {
        Self {
            ordinal: None,
            weekday,
        }
    }

    /// Creates a selector for the nth (or nth-from-last) `weekday`.
    ///
    /// Returns `None` for an ordinal of zero.
    #[must_use]
    pub const fn nth(ordinal: i8, weekday: Weekday) -> Option<Self> {
        if ordinal == 0 {
            return None;
        }
        Some(Self {
            ordinal: Some(ordinal),
            weekday,
        })
    }
}

impl fmt::Display for WeekdaySelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(n) = self.ordinal {
            write!(f, "{n}")?;
        }
        write!(f, "{}", weekday_code(self.weekday))
    }
}

/// A parsed recurrence rule.
///
/// Immutable once parsed. Lists are empty when the corresponding rule part
/// was absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurrenceRule {
    /// Recurrence frequency.
    pub frequency: Frequency,

    /// How many periods to step per iteration (at least 1).
    pub interval: u32,

    /// Inclusive absolute cutoff, as wall-clock fields.
    pub until: Option<NaiveDateTime>,

    /// Maximum number of in-series occurrences (at least 1).
    pub count: Option<u32>,

    /// By-day list with optional occurrence numbers.
    pub by_day: Vec<WeekdaySelector>,

    /// By-monthday list (-31 to 31, excluding 0).
    pub by_month_day: Vec<i8>,

    /// By-month list, zero-based (0 = January).
    pub by_month0: Vec<u32>,
}

impl RecurrenceRule {
    /// Creates a rule with the given frequency and every other part defaulted.
    #[must_use]
    pub const fn new(frequency: Frequency) -> Self {
        Self {
            frequency,
            interval: 1,
            until: None,
            count: None,
            by_day: Vec::new(),
            by_month_day: Vec::new(),
            by_month0: Vec::new(),
        }
    }

    /// Sets the interval (floored at 1).
    #[must_use]
    pub fn with_interval(mut self, interval: u32) -> Self {
        self.interval = interval.max(1);
        self
    }

    /// Sets the occurrence-count cap.
    #[must_use]
    pub const fn with_count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }

    /// Sets the cutoff.
    #[must_use]
    pub const fn with_until(mut self, until: NaiveDateTime) -> Self {
        self.until = Some(until);
        self
    }

    /// Sets the by-day list.
    #[must_use]
    pub fn with_by_day(mut self, days: Vec<WeekdaySelector>) -> Self {
        self.by_day = days;
        self
    }

    /// Sets the by-monthday list.
    #[must_use]
    pub fn with_by_month_day(mut self, days: Vec<i8>) -> Self {
        self.by_month_day = days;
        self
    }

    /// Sets the by-month list from one-based month numbers.
    #[must_use]
    pub fn with_by_month(mut self, months: &[u32]) -> Self {
        self.by_month0 = months
            .iter()
            .filter(|m| (1..=12).contains(*m))
            .map(|m| m - 1)
            .collect();
        self
    }
}

impl FromStr for RecurrenceRule {
    type Err = RfcError;

    fn from_str(s: &str) -> RfcResult<Self> {
        crate::rfc::ical::parse::parse_rule(s)
            .ok_or_else(|| RfcError::UnsupportedRule(s.to_string()))
    }
}

impl fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = vec![format!("FREQ={}", self.frequency)];

        if self.interval != 1 {
            parts.push(format!("INTERVAL={}", self.interval));
        }

        if let Some(until) = self.until {
            parts.push(format!("UNTIL={}", until.format("%Y%m%dT%H%M%S")));
        }

        if let Some(count) = self.count {
            parts.push(format!("COUNT={count}"));
        }

        if !self.by_day.is_empty() {
            let s: Vec<_> = self.by_day.iter().map(ToString::to_string).collect();
            parts.push(format!("BYDAY={}", s.join(",")));
        }

        if !self.by_month_day.is_empty() {
            let s: Vec<_> = self.by_month_day.iter().map(ToString::to_string).collect();
            parts.push(format!("BYMONTHDAY={}", s.join(",")));
        }

        if !self.by_month0.is_empty() {
            let s: Vec<_> = self.by_month0.iter().map(|m| (m + 1).to_string()).collect();
            parts.push(format!("BYMONTH={}", s.join(",")));
        }

        write!(f, "{}", parts.join(";"))
    }
}
