//! Tests for value parsers.

use super::*;
use crate::rfc::ical::core::DateTimeForm;

fn wall(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, s)
        .unwrap()
}

#[test]
fn parse_date_valid() {
    let date = parse_date("20260123", 1, 1).unwrap();
    assert_eq!(date, NaiveDate::from_ymd_opt(2026, 1, 23).unwrap());
}

#[test]
fn parse_date_invalid() {
    assert!(parse_date("2026012", 1, 1).is_err()); // Too short
    assert!(parse_date("20261301", 1, 1).is_err()); // Invalid month
    assert!(parse_date("20230229", 1, 1).is_err()); // Not a leap year
    assert!(parse_date("2026-1-3", 1, 1).is_err());
}

#[test]
fn parse_time_utc() {
    let (time, is_utc) = parse_time("120000Z", 1, 1).unwrap();
    assert_eq!(time, NaiveTime::from_hms_opt(12, 0, 0).unwrap());
    assert!(is_utc);
}

#[test]
fn parse_time_local() {
    let (time, is_utc) = parse_time("133000", 1, 1).unwrap();
    assert_eq!(time, NaiveTime::from_hms_opt(13, 30, 0).unwrap());
    assert!(!is_utc);
}

#[test]
fn parse_time_invalid() {
    let err = parse_time("250000", 4, 9).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::InvalidTime);
    assert_eq!((err.line, err.column), (4, 9));
}

#[test]
fn parse_datetime_forms() {
    let dt = parse_datetime("20260123T120000Z", None, 1, 1).unwrap();
    assert!(dt.is_utc());
    assert_eq!(dt.wall, wall(2026, 1, 23, 12, 0, 0));

    let dt = parse_datetime("20260123T120000", None, 1, 1).unwrap();
    assert_eq!(dt.form, DateTimeForm::Floating);

    let dt = parse_datetime("20260123T120000", Some("America/New_York"), 1, 1).unwrap();
    assert_eq!(dt.tzid(), Some("America/New_York"));
    assert_eq!(dt.wall, wall(2026, 1, 23, 12, 0, 0));
}

#[test]
fn utc_suffix_wins_over_tzid() {
    let dt = parse_datetime("20260123T120000Z", Some("Europe/Paris"), 1, 1).unwrap();
    assert!(dt.is_utc());
}

#[test]
fn value_date_only_flag() {
    let dt = parse_date_time_value("20240704", true, None).unwrap();
    assert!(dt.is_date());

    // VALUE=DATE with a time part keeps the date
    let dt = parse_date_time_value("20240704T100000", true, None).unwrap();
    assert!(dt.is_date());
    assert_eq!(dt.wall, wall(2024, 7, 4, 0, 0, 0));
}

#[test]
fn value_bare_eight_digits_is_date() {
    let dt = parse_date_time_value("20240704", false, Some("Europe/Paris")).unwrap();
    assert!(dt.is_date());
}

#[test]
fn value_fallbacks() {
    let dt = parse_date_time_value("2024-07-04T10:00:00+02:00", false, None).unwrap();
    assert!(dt.is_utc());
    assert_eq!(dt.wall, wall(2024, 7, 4, 8, 0, 0));

    let dt = parse_date_time_value("2024-07-04T10:00:00", false, None).unwrap();
    assert_eq!(dt.form, DateTimeForm::Floating);
    assert_eq!(dt.wall, wall(2024, 7, 4, 10, 0, 0));

    let dt = parse_date_time_value("2024-07-04 10:00:00", false, Some("UTC")).unwrap();
    assert_eq!(dt.tzid(), Some("UTC"));

    let dt = parse_date_time_value("20240704T1000", false, None).unwrap();
    assert_eq!(dt.wall, wall(2024, 7, 4, 10, 0, 0));

    let dt = parse_date_time_value("2024-07-04", false, None).unwrap();
    assert!(dt.is_date());
}

#[test]
fn value_garbage_is_none() {
    assert!(parse_date_time_value("", false, None).is_none());
    assert!(parse_date_time_value("tomorrow", false, None).is_none());
    assert!(parse_date_time_value("20241345", false, None).is_none());
}

#[test]
fn until_bare_date_covers_whole_day() {
    assert_eq!(parse_until("20240131"), Some(wall(2024, 1, 31, 23, 59, 59)));
    assert_eq!(
        parse_until("20240131T090000Z"),
        Some(wall(2024, 1, 31, 9, 0, 0))
    );
    assert_eq!(parse_until("never"), None);
}

#[test]
fn parse_duration_weeks() {
    assert_eq!(parse_duration("P2W", 1, 1).unwrap(), TimeDelta::weeks(2));
}

#[test]
fn parse_duration_days_time() {
    let dur = parse_duration("P1DT2H30M", 1, 1).unwrap();
    assert_eq!(
        dur,
        TimeDelta::days(1) + TimeDelta::hours(2) + TimeDelta::minutes(30)
    );
}

#[test]
fn parse_duration_signs() {
    assert_eq!(parse_duration("-PT15M", 1, 1).unwrap(), TimeDelta::minutes(-15));
    assert_eq!(parse_duration("+PT45S", 1, 1).unwrap(), TimeDelta::seconds(45));
}

#[test]
fn parse_duration_invalid() {
    for input in ["", "P", "PT", "1D", "P1H", "PT1D", "P1DT", "PT5", "P1D2"] {
        let result = parse_duration(input, 1, 1);
        assert!(result.is_err(), "{input:?} should be rejected");
    }
}

#[test]
fn unescape_sequences() {
    assert_eq!(unescape_text("a\\, b\\; c"), "a, b; c");
    assert_eq!(unescape_text("line1\\nline2\\Nline3"), "line1\nline2\nline3");
    assert_eq!(unescape_text("C:\\\\path"), "C:\\path");
    assert_eq!(unescape_text("keep\\x"), "keep\\x");
    assert_eq!(unescape_text("trailing\\"), "trailing\\");
}

#[test]
fn unescape_inverts_escape() {
    let samples = [
        "Planning, review; retro",
        "Room 4\\B",
        "First line\nSecond line",
        "\\n is not a newline",
        "",
    ];
    for text in samples {
        assert_eq!(unescape_text(&escape_text(text)), text);
    }
}
