//! Candidate generation per frequency.
//!
//! An anchor is the first day of its period: the day itself (daily), the
//! Monday of the week (weekly), the 1st of the month (monthly) or January 1st
//! (yearly). Each frequency turns one anchor into the sorted set of candidate
//! instants for that period, all at the template's time of day.
//!
//! Days that do not exist in a month are dropped, never clamped.

use std::collections::BTreeSet;

use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime, NaiveTime, Weekday};

use crate::rfc::ical::core::{Frequency, RecurrenceRule, WeekdaySelector};

/// Returns the number of days in `month` (1-12) of `year`.
#[must_use]
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map_or(28, |last| last.day())
}

/// Resolves a BYMONTHDAY entry; negative values count back from the last day.
///
/// Returns `None` when the day does not exist in that month.
#[must_use]
pub fn month_day(year: i32, month: u32, day: i8) -> Option<NaiveDate> {
    let last = i32::try_from(days_in_month(year, month)).ok()?;
    let resolved = if day > 0 {
        i32::from(day)
    } else {
        last + 1 + i32::from(day)
    };
    if !(1..=last).contains(&resolved) {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, u32::try_from(resolved).ok()?)
}

/// Returns the `ordinal`-th `weekday` of the month, counting from the end
/// when `ordinal` is negative.
///
/// Returns `None` when the month has no such occurrence (e.g. a 5th Monday).
#[must_use]
pub fn nth_weekday(year: i32, month: u32, ordinal: i8, weekday: Weekday) -> Option<NaiveDate> {
    if ordinal == 0 {
        return None;
    }

    if ordinal > 0 {
        return NaiveDate::from_weekday_of_month_opt(year, month, weekday, u8::try_from(ordinal).ok()?);
    }

    let matches = every_weekday(year, month, weekday);
    let from_end = usize::from(ordinal.unsigned_abs());
    matches
        .len()
        .checked_sub(from_end)
        .and_then(|idx| matches.get(idx).copied())
}

/// Returns every `weekday` in the month, in ascending order.
#[must_use]
pub fn every_weekday(year: i32, month: u32, weekday: Weekday) -> Vec<NaiveDate> {
    (1..=days_in_month(year, month))
        .filter_map(|day| NaiveDate::from_ymd_opt(year, month, day))
        .filter(|date| date.weekday() == weekday)
        .collect()
}

/// Returns the first day of the period containing `date`.
#[must_use]
pub fn period_start(frequency: Frequency, date: NaiveDate) -> NaiveDate {
    match frequency {
        Frequency::Daily => date,
        Frequency::Weekly => date
            .checked_sub_days(Days::new(u64::from(date.weekday().num_days_from_monday())))
            .unwrap_or(date),
        Frequency::Monthly => date.with_day(1).unwrap_or(date),
        Frequency::Yearly => date.with_ordinal(1).unwrap_or(date),
    }
}

/// Steps an anchor forward by `periods` whole periods using calendar fields.
///
/// Returns `None` once the result leaves chrono's supported range.
#[must_use]
pub fn advance(frequency: Frequency, anchor: NaiveDate, periods: u32) -> Option<NaiveDate> {
    match frequency {
        Frequency::Daily => anchor.checked_add_days(Days::new(u64::from(periods))),
        Frequency::Weekly => anchor.checked_add_days(Days::new(u64::from(periods) * 7)),
        Frequency::Monthly => anchor.checked_add_months(Months::new(periods)),
        Frequency::Yearly => anchor.checked_add_months(Months::new(periods.checked_mul(12)?)),
    }
}

/// Counts whole periods from the anchor's period to the one containing `target`.
///
/// Returns 0 when `target` is not after `anchor`.
#[must_use]
pub fn periods_between(frequency: Frequency, anchor: NaiveDate, target: NaiveDate) -> u32 {
    if target <= anchor {
        return 0;
    }

    let span = match frequency {
        Frequency::Daily => target.signed_duration_since(anchor).num_days(),
        Frequency::Weekly => target.signed_duration_since(anchor).num_days() / 7,
        Frequency::Monthly => {
            i64::from(target.year() - anchor.year()) * 12 + i64::from(target.month())
                - i64::from(anchor.month())
        }
        Frequency::Yearly => i64::from(target.year() - anchor.year()),
    };

    u32::try_from(span.max(0)).unwrap_or(u32::MAX)
}

/// Generates the sorted candidate instants of the period starting at `anchor`.
///
/// `template_start` supplies the time of day and the fallback weekday,
/// month and day-of-month when the rule lists none.
#[must_use]
pub fn candidates(
    rule: &RecurrenceRule,
    template_start: NaiveDateTime,
    anchor: NaiveDate,
) -> Vec<NaiveDateTime> {
    let days = match rule.frequency {
        Frequency::Daily => daily(anchor),
        Frequency::Weekly => weekly(rule, template_start.date(), anchor),
        Frequency::Monthly => monthly(rule, template_start.date(), anchor.year(), anchor.month()),
        Frequency::Yearly => yearly(rule, template_start.date(), anchor.year()),
    };

    let time: NaiveTime = template_start.time();
    days.into_iter().map(|day| day.and_time(time)).collect()
}

/// One candidate: the anchor day itself.
fn daily(anchor: NaiveDate) -> BTreeSet<NaiveDate> {
    BTreeSet::from([anchor])
}

/// One candidate per selected weekday within the anchor's Monday-start week.
fn weekly(rule: &RecurrenceRule, template_date: NaiveDate, week_start: NaiveDate) -> BTreeSet<NaiveDate> {
    let weekdays: Vec<Weekday> = if rule.by_day.is_empty() {
        vec![template_date.weekday()]
    } else {
        rule.by_day.iter().map(|sel| sel.weekday).collect()
    };

    weekdays
        .into_iter()
        .filter_map(|wd| {
            week_start.checked_add_days(Days::new(u64::from(wd.num_days_from_monday())))
        })
        .collect()
}

/// Month-level selection shared by MONTHLY and YEARLY.
///
/// BYMONTHDAY takes precedence over BYDAY; with neither, the template's own
/// day-of-month is used.
fn monthly(
    rule: &RecurrenceRule,
    template_date: NaiveDate,
    year: i32,
    month: u32,
) -> BTreeSet<NaiveDate> {
    if !rule.by_month_day.is_empty() {
        return rule
            .by_month_day
            .iter()
            .filter_map(|&day| month_day(year, month, day))
            .collect();
    }

    if !rule.by_day.is_empty() {
        return rule
            .by_day
            .iter()
            .flat_map(|sel| weekday_in_month(*sel, year, month))
            .collect();
    }

    NaiveDate::from_ymd_opt(year, month, template_date.day())
        .into_iter()
        .collect()
}

/// Resolves one BYDAY selector within a month.
fn weekday_in_month(selector: WeekdaySelector, year: i32, month: u32) -> Vec<NaiveDate> {
    match selector.ordinal {
        Some(n) => nth_weekday(year, month, n, selector.weekday)
            .into_iter()
            .collect(),
        None => every_weekday(year, month, selector.weekday),
    }
}

/// Monthly selection applied to each BYMONTH month (or the template's month).
fn yearly(rule: &RecurrenceRule, template_date: NaiveDate, year: i32) -> BTreeSet<NaiveDate> {
    let months: Vec<u32> = if rule.by_month0.is_empty() {
        vec![template_date.month()]
    } else {
        rule.by_month0.iter().map(|m0| m0 + 1).collect()
    };

    months
        .into_iter()
        .flat_map(|month| monthly(rule, template_date, year, month))
        .collect()
}
