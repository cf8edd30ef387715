//! iCalendar DATE and DATE-TIME values (RFC 5545 §3.3.4, §3.3.5).

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use serde::Serialize;

/// Form of a date or date-time value.
///
/// iCalendar values come in four mutually exclusive forms. All of them carry
/// wall-clock fields; none is converted across zones.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DateTimeForm {
    /// Calendar date with no time of day.
    ///
    /// Example: `VALUE=DATE:19970714`
    Date,

    /// UTC time - absolute instant, indicated by 'Z' suffix.
    ///
    /// Example: `19980119T070000Z`
    Utc,

    /// Floating time - same wall-clock time in any timezone.
    ///
    /// Example: `19980118T230000`
    Floating,

    /// Local time with a TZID reference. The zone is recorded, not applied.
    ///
    /// Example: `TZID=America/New_York:19980119T020000`
    Zoned {
        /// The timezone identifier as written in the feed.
        tzid: String,
    },
}

/// A decoded date or date-time value.
///
/// `wall` holds the calendar fields exactly as written; for [`DateTimeForm::Date`]
/// the time of day is midnight. Equality, ordering and exclusion matching are
/// all done on `wall`, so arithmetic is calendar-field arithmetic and never
/// instant arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DateTimeValue {
    /// Wall-clock calendar fields.
    pub wall: NaiveDateTime,
    /// How the value was written.
    pub form: DateTimeForm,
}

impl DateTimeValue {
    /// Creates an all-day value.
    #[must_use]
    pub fn date(date: NaiveDate) -> Self {
        Self {
            wall: date.and_time(NaiveTime::MIN),
            form: DateTimeForm::Date,
        }
    }

    /// Creates a UTC value.
    #[must_use]
    pub const fn utc(wall: NaiveDateTime) -> Self {
        Self {
            wall,
            form: DateTimeForm::Utc,
        }
    }

    /// Creates a floating value.
    #[must_use]
    pub const fn floating(wall: NaiveDateTime) -> Self {
        Self {
            wall,
            form: DateTimeForm::Floating,
        }
    }

    /// Creates a zoned value. The zone is kept as a hint only.
    #[must_use]
    pub fn zoned(wall: NaiveDateTime, tzid: impl Into<String>) -> Self {
        Self {
            wall,
            form: DateTimeForm::Zoned { tzid: tzid.into() },
        }
    }

    /// Returns whether this is an all-day value.
    #[must_use]
    pub fn is_date(&self) -> bool {
        matches!(self.form, DateTimeForm::Date)
    }

    /// Returns whether this is a UTC value.
    #[must_use]
    pub fn is_utc(&self) -> bool {
        matches!(self.form, DateTimeForm::Utc)
    }

    /// Returns the timezone ID if this is a zoned value.
    #[must_use]
    pub fn tzid(&self) -> Option<&str> {
        match &self.form {
            DateTimeForm::Zoned { tzid } => Some(tzid),
            _ => None,
        }
    }

    /// Returns a value with the same form at a different wall-clock time.
    #[must_use]
    pub fn with_wall(&self, wall: NaiveDateTime) -> Self {
        Self {
            wall,
            form: self.form.clone(),
        }
    }

    /// Returns this value shifted by `delta` in wall-clock terms.
    ///
    /// Returns `None` if the result leaves chrono's supported range.
    #[must_use]
    pub fn checked_add(&self, delta: TimeDelta) -> Option<Self> {
        Some(self.with_wall(self.wall.checked_add_signed(delta)?))
    }
}

impl fmt::Display for DateTimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_date() {
            return write!(f, "{}", self.wall.format("%Y%m%d"));
        }
        write!(f, "{}", self.wall.format("%Y%m%dT%H%M%S"))?;
        if self.is_utc() {
            write!(f, "Z")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wall(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn datetime_display() {
        let dt = DateTimeValue::utc(wall(2026, 1, 23, 12, 0));
        assert_eq!(dt.to_string(), "20260123T120000Z");

        let dt = DateTimeValue::floating(wall(2026, 1, 23, 12, 0));
        assert_eq!(dt.to_string(), "20260123T120000");

        let dt = DateTimeValue::date(NaiveDate::from_ymd_opt(2026, 1, 23).unwrap());
        assert_eq!(dt.to_string(), "20260123");
    }

    #[test]
    fn zoned_keeps_tzid_without_conversion() {
        let dt = DateTimeValue::zoned(wall(2026, 3, 29, 2, 30), "Europe/Berlin");
        assert_eq!(dt.tzid(), Some("Europe/Berlin"));
        assert_eq!(dt.wall, wall(2026, 3, 29, 2, 30));
        assert!(!dt.is_utc());
    }

    #[test]
    fn checked_add_is_wall_clock() {
        // Crosses the 2026 EU spring-forward date; the hour is unchanged.
        let dt = DateTimeValue::zoned(wall(2026, 3, 28, 9, 0), "Europe/Berlin");
        let next = dt.checked_add(TimeDelta::days(1)).unwrap();
        assert_eq!(next.wall, wall(2026, 3, 29, 9, 0));
        assert_eq!(next.tzid(), Some("Europe/Berlin"));
    }

    #[test]
    fn date_value_is_midnight() {
        let dt = DateTimeValue::date(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert!(dt.is_date());
        assert_eq!(dt.wall, wall(2024, 2, 29, 0, 0));
    }
}
