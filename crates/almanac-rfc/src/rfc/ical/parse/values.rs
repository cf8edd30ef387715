//! Value type parsers for iCalendar (RFC 5545 §3.3).
//!
//! Error sources from chrono and integer parsing are discarded; the
//! positional `ParseError` is all the decoder reports.
#![expect(
    clippy::map_err_ignore,
    reason = "Value parsers report positional errors only"
)]

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};

use super::error::{ParseError, ParseErrorKind, ParseResult};
use crate::rfc::ical::core::DateTimeValue;

/// Layouts tried, in order, when a value matches none of the RFC forms.
const FALLBACK_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y%m%dT%H%M",
];

/// Parses a DATE value (RFC 5545 §3.3.4).
///
/// Format: YYYYMMDD (e.g., "19970714")
///
/// ## Errors
/// Returns an error if the string is not a valid 8-digit calendar date.
pub fn parse_date(s: &str, line: usize, col: usize) -> ParseResult<NaiveDate> {
    if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::new(ParseErrorKind::InvalidDate, line, col));
    }

    NaiveDate::parse_from_str(s, "%Y%m%d")
        .map_err(|_| ParseError::new(ParseErrorKind::InvalidDate, line, col))
}

/// Parses a TIME value (RFC 5545 §3.3.12).
///
/// Format: HHMMSS[Z] (e.g., "133000", "133000Z"). Returns the time and
/// whether the UTC suffix was present.
///
/// ## Errors
/// Returns an error if the string is not a valid 6-digit time.
pub fn parse_time(s: &str, line: usize, col: usize) -> ParseResult<(NaiveTime, bool)> {
    let (time_str, is_utc) = s.strip_suffix('Z').map_or((s, false), |t| (t, true));

    if time_str.len() != 6 || !time_str.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::new(ParseErrorKind::InvalidTime, line, col));
    }

    let time = NaiveTime::parse_from_str(time_str, "%H%M%S")
        .map_err(|_| ParseError::new(ParseErrorKind::InvalidTime, line, col))?;
    Ok((time, is_utc))
}

/// Parses a DATE-TIME value (RFC 5545 §3.3.5).
///
/// Format: YYYYMMDD"T"HHMMSS[Z] (e.g., "19970714T133000Z")
///
/// The zone identifier comes from the property's TZID parameter; it only
/// labels the value and is never applied.
///
/// ## Errors
/// Returns an error if the string is not a valid datetime format.
pub fn parse_datetime(
    s: &str,
    tzid: Option<&str>,
    line: usize,
    col: usize,
) -> ParseResult<DateTimeValue> {
    let (date_str, time_str) = s
        .split_once('T')
        .ok_or_else(|| ParseError::new(ParseErrorKind::InvalidDateTime, line, col))?;

    let date = parse_date(date_str, line, col)?;
    let (time, is_utc) = parse_time(time_str, line, col + date_str.len() + 1)?;
    let wall = date.and_time(time);

    Ok(if is_utc {
        DateTimeValue::utc(wall)
    } else if let Some(tz) = tzid {
        DateTimeValue::zoned(wall, tz)
    } else {
        DateTimeValue::floating(wall)
    })
}

/// Decodes a DTSTART/DTEND/EXDATE/RECURRENCE-ID value.
///
/// Tries, in order: an explicit or implied DATE, an RFC 5545 DATE-TIME, then
/// a handful of common non-RFC layouts (RFC 3339 with offset, ISO 8601 with
/// separators, a bare ISO date). Returns `None` when nothing matches.
#[must_use]
pub fn parse_date_time_value(raw: &str, date_only: bool, tzid: Option<&str>) -> Option<DateTimeValue> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if date_only || (s.len() == 8 && s.bytes().all(|b| b.is_ascii_digit())) {
        // VALUE=DATE on a date-time value keeps only the date part
        let date_part = s.split_once('T').map_or(s, |(d, _)| d);
        return parse_date(date_part, 0, 0).ok().map(DateTimeValue::date);
    }

    if let Ok(value) = parse_datetime(s, tzid, 0, 0) {
        return Some(value);
    }

    parse_fallback(s, tzid)
}

/// Best-effort parsing of values that are not RFC 5545 shaped.
fn parse_fallback(s: &str, tzid: Option<&str>) -> Option<DateTimeValue> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(DateTimeValue::utc(dt.naive_utc()));
    }

    for format in FALLBACK_DATETIME_FORMATS {
        if let Ok(wall) = NaiveDateTime::parse_from_str(s, format) {
            return Some(match tzid {
                Some(tz) => DateTimeValue::zoned(wall, tz),
                None => DateTimeValue::floating(wall),
            });
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(DateTimeValue::date)
}

/// Parses a DATE or DATE-TIME used as a recurrence cutoff.
///
/// A bare date covers the whole day, so it maps to 23:59:59 of that day.
#[must_use]
pub fn parse_until(raw: &str) -> Option<NaiveDateTime> {
    let value = parse_date_time_value(raw, false, None)?;
    if value.is_date() {
        return value.wall.date().and_hms_opt(23, 59, 59);
    }
    Some(value.wall)
}

/// Parses a DURATION value (RFC 5545 §3.3.6).
///
/// Format: [+|-]P[nW] or [+|-]P[nD][T[nH][nM][nS]]
///
/// ## Errors
/// Returns an error if the string is not a valid duration format.
pub fn parse_duration(s: &str, line: usize, col: usize) -> ParseResult<TimeDelta> {
    let invalid = || ParseError::new(ParseErrorKind::InvalidDuration, line, col);

    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let body = rest.strip_prefix('P').ok_or_else(invalid)?;
    if body.is_empty() || body.ends_with('T') {
        return Err(invalid());
    }

    let mut total = TimeDelta::zero();
    let mut in_time = false;
    let mut saw_component = false;
    let mut digits = String::new();

    for c in body.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }

        if c == 'T' {
            if in_time || !digits.is_empty() {
                return Err(invalid());
            }
            in_time = true;
            continue;
        }

        let n: i64 = digits.parse().map_err(|_| invalid())?;
        digits.clear();

        let component = match (c, in_time) {
            ('W', false) => TimeDelta::try_weeks(n),
            ('D', false) => TimeDelta::try_days(n),
            ('H', true) => TimeDelta::try_hours(n),
            ('M', true) => TimeDelta::try_minutes(n),
            ('S', true) => TimeDelta::try_seconds(n),
            _ => None,
        }
        .ok_or_else(invalid)?;

        total = total.checked_add(&component).ok_or_else(invalid)?;
        saw_component = true;
    }

    if !digits.is_empty() || !saw_component {
        return Err(invalid());
    }

    Ok(if negative { -total } else { total })
}

/// Unescapes text values (RFC 5545 §3.3.11).
///
/// Escape sequences: \\ \, \; \n \N
#[must_use]
pub fn unescape_text(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();

    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n' | 'N') => result.push('\n'),
                Some(',') => result.push(','),
                Some(';') => result.push(';'),
                Some('\\') | None => result.push('\\'),
                Some(other) => {
                    // Unknown escape, keep both characters
                    result.push('\\');
                    result.push(other);
                }
            }
        } else {
            result.push(c);
        }
    }

    result
}

/// Escapes text for a TEXT value; the inverse of [`unescape_text`].
#[must_use]
pub fn escape_text(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            ';' => result.push_str("\\;"),
            ',' => result.push_str("\\,"),
            '\n' => result.push_str("\\n"),
            _ => result.push(c),
        }
    }
    result
}

#[cfg(test)]
#[path = "values_tests.rs"]
mod tests;
