//! Lenient RRULE parser (RFC 5545 §3.3.10, restricted subset).
//!
//! Unlike the strict value parsers, this never fails on a single bad part:
//! malformed tokens and invalid list entries are dropped one by one. Only a
//! missing or unsupported FREQ rejects the whole rule.

use chrono::Weekday;

use super::values::parse_until;
use crate::rfc::ical::core::{Frequency, RecurrenceRule, WeekdaySelector, parse_weekday_code};

/// Parses a raw RRULE value.
///
/// Returns `None` when FREQ is absent or not one of DAILY, WEEKLY, MONTHLY or
/// YEARLY. The caller treats that as a template with no occurrences.
#[must_use]
pub fn parse_rule(raw: &str) -> Option<RecurrenceRule> {
    let mut frequency = None;
    let mut rule = RecurrenceRule::new(Frequency::Daily);

    for part in raw.trim().split(';') {
        let Some((key, value)) = part.split_once('=') else {
            if !part.trim().is_empty() {
                tracing::trace!(part, "Skipping malformed rule part");
            }
            continue;
        };
        let value = value.trim();

        match key.trim().to_ascii_uppercase().as_str() {
            "FREQ" => frequency = Frequency::parse(value),
            "INTERVAL" => {
                rule.interval = value.parse::<u32>().map_or(1, |n| n.max(1));
            }
            "UNTIL" => {
                rule.until = parse_until(value);
                if rule.until.is_none() {
                    tracing::warn!(value, "Ignoring unparseable UNTIL");
                }
            }
            "COUNT" => rule.count = value.parse::<u32>().ok().filter(|&n| n > 0),
            "BYDAY" => rule.by_day = parse_by_day(value),
            "BYMONTHDAY" => rule.by_month_day = parse_by_month_day(value),
            "BYMONTH" => rule.by_month0 = parse_by_month(value),
            _ => {} // Unsupported rule part - ignore
        }
    }

    rule.frequency = frequency?;
    Some(rule)
}

/// Parses BYDAY entries, dropping any that do not match `[+-]n?XX`.
fn parse_by_day(value: &str) -> Vec<WeekdaySelector> {
    value
        .split(',')
        .filter_map(|entry| {
            let selector = parse_weekday_selector(entry.trim());
            if selector.is_none() {
                tracing::trace!(entry, "Dropping invalid BYDAY entry");
            }
            selector
        })
        .collect()
}

/// Parses a single weekday with optional ordinal (e.g., "MO", "1MO", "-1FR").
fn parse_weekday_selector(s: &str) -> Option<WeekdaySelector> {
    if s.len() < 2 || !s.is_char_boundary(s.len() - 2) {
        return None;
    }

    let (ordinal_str, code) = s.split_at(s.len() - 2);
    let weekday: Weekday = parse_weekday_code(code)?;

    if ordinal_str.is_empty() {
        return Some(WeekdaySelector::every(weekday));
    }

    let digits = ordinal_str.trim_start_matches(['+', '-']);
    if digits.is_empty()
        || ordinal_str.len() - digits.len() > 1
        || !digits.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }

    let ordinal: i8 = ordinal_str.parse().ok()?;
    WeekdaySelector::nth(ordinal, weekday)
}

/// Parses BYMONTHDAY entries in `-31..=31`, excluding 0.
fn parse_by_month_day(value: &str) -> Vec<i8> {
    value
        .split(',')
        .filter_map(|v| v.trim().parse::<i8>().ok())
        .filter(|d| *d != 0 && (-31..=31).contains(d))
        .collect()
}

/// Parses BYMONTH entries in `1..=12` into zero-based months.
fn parse_by_month(value: &str) -> Vec<u32> {
    value
        .split(',')
        .filter_map(|v| v.trim().parse::<u32>().ok())
        .filter(|m| (1..=12).contains(m))
        .map(|m| m - 1)
        .collect()
}
