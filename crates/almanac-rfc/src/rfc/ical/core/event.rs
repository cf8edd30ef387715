//! Event records decoded from VEVENT components.

use chrono::TimeDelta;
use serde::Serialize;

use super::DateTimeValue;

/// A decoded event.
///
/// One type covers the three shapes a feed can hold:
/// - a one-off event (neither `rrule` nor `override_of`),
/// - a recurrence template (`rrule` set),
/// - an override of one template occurrence (`override_of` set).
///
/// Occurrences produced by expansion use the same type with `rrule` cleared
/// and `exclusions` empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventRecord {
    /// Identifier shared by a template and its overrides.
    pub uid: String,
    /// Display title.
    pub summary: String,
    pub description: Option<String>,
    pub location: Option<String>,
    /// Start value; an occurrence's concrete instant after expansion.
    pub start: DateTimeValue,
    /// End value; absent means zero duration.
    pub end: Option<DateTimeValue>,
    /// Whether `start`/`end` are calendar dates.
    pub all_day: bool,
    /// Free-form status token (e.g. `CANCELLED`).
    pub status: Option<String>,
    /// Raw recurrence rule text, present only on templates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rrule: Option<String>,
    /// Occurrences of this template to suppress.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exclusions: Vec<DateTimeValue>,
    /// Original occurrence instant replaced by this override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub override_of: Option<DateTimeValue>,
}

impl EventRecord {
    /// Returns whether this record carries a recurrence rule.
    #[must_use]
    pub const fn is_template(&self) -> bool {
        self.rrule.is_some()
    }

    /// Returns whether this record replaces one occurrence of a template.
    #[must_use]
    pub const fn is_override(&self) -> bool {
        self.override_of.is_some()
    }

    /// Returns whether this record is neither a template nor an override.
    #[must_use]
    pub const fn is_one_off(&self) -> bool {
        !self.is_template() && !self.is_override()
    }

    /// Returns `end - start` in wall-clock terms, if the record has an end.
    #[must_use]
    pub fn duration(&self) -> Option<TimeDelta> {
        self.end
            .as_ref()
            .map(|end| end.wall.signed_duration_since(self.start.wall))
    }

    /// Returns whether the status token marks the record as cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.status
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case(almanac_core::constants::STATUS_CANCELLED))
    }

    /// Returns whether `[start, end]` touches the inclusive window.
    ///
    /// A record without an end is treated as an instant.
    #[must_use]
    pub fn overlaps(
        &self,
        window_start: chrono::NaiveDateTime,
        window_end: chrono::NaiveDateTime,
    ) -> bool {
        let end = self.end.as_ref().map_or(self.start.wall, |e| e.wall);
        end >= window_start && self.start.wall <= window_end
    }

    /// Projects this template onto one concrete start.
    ///
    /// Descriptive fields are copied, `end` keeps the template's duration and
    /// the recurrence fields are cleared.
    #[must_use]
    pub fn occurrence_at(&self, start: DateTimeValue, end: Option<DateTimeValue>) -> Self {
        Self {
            uid: self.uid.clone(),
            summary: self.summary.clone(),
            description: self.description.clone(),
            location: self.location.clone(),
            start,
            end,
            all_day: self.all_day,
            status: self.status.clone(),
            rrule: None,
            exclusions: Vec::new(),
            override_of: None,
        }
    }
}

/// Accumulates properties of one VEVENT until its END line.
///
/// `build` enforces the record invariants: identifier, title and start must
/// all be present and non-empty, and at most one of rule/override is kept.
#[derive(Debug, Default, Clone)]
pub struct EventBuilder {
    pub uid: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub status: Option<String>,
    pub start: Option<DateTimeValue>,
    pub end: Option<DateTimeValue>,
    pub duration: Option<TimeDelta>,
    pub rrule: Option<String>,
    pub exclusions: Vec<DateTimeValue>,
    pub override_of: Option<DateTimeValue>,
}

impl EventBuilder {
    /// Adds an exclusion unless one with the same wall-clock instant exists.
    pub fn add_exclusion(&mut self, value: DateTimeValue) {
        if !self.exclusions.iter().any(|e| e.wall == value.wall) {
            self.exclusions.push(value);
        }
    }

    /// Builds the record, or returns `None` if a required field is missing.
    #[must_use]
    pub fn build(self) -> Option<EventRecord> {
        let uid = self.uid.filter(|s| !s.is_empty())?;
        let summary = self.summary.filter(|s| !s.is_empty())?;
        let start = self.start?;

        let end = self.end.or_else(|| {
            self.duration
                .and_then(|duration| start.checked_add(duration))
        });

        let rrule = if self.override_of.is_some() {
            if self.rrule.is_some() {
                tracing::debug!(uid = %uid, "Override carries RRULE; dropping the rule");
            }
            None
        } else {
            self.rrule.filter(|r| !r.is_empty())
        };

        Some(EventRecord {
            uid,
            summary,
            description: self.description,
            location: self.location,
            all_day: start.is_date(),
            start,
            end,
            status: self.status,
            rrule,
            exclusions: self.exclusions,
            override_of: self.override_of,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn wall(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn builder() -> EventBuilder {
        EventBuilder {
            uid: Some("uid-1".to_string()),
            summary: Some("Standup".to_string()),
            start: Some(DateTimeValue::floating(wall(2024, 1, 1, 9, 0))),
            ..EventBuilder::default()
        }
    }

    #[test]
    fn build_requires_uid_summary_start() {
        assert!(builder().build().is_some());

        let mut b = builder();
        b.uid = None;
        assert!(b.build().is_none());

        let mut b = builder();
        b.summary = Some(String::new());
        assert!(b.build().is_none());

        let mut b = builder();
        b.start = None;
        assert!(b.build().is_none());
    }

    #[test]
    fn override_drops_rule() {
        let mut b = builder();
        b.rrule = Some("FREQ=DAILY".to_string());
        b.override_of = Some(DateTimeValue::floating(wall(2024, 1, 3, 9, 0)));
        let record = b.build().unwrap();
        assert!(record.is_override());
        assert!(!record.is_template());
    }

    #[test]
    fn duration_fills_missing_end() {
        let mut b = builder();
        b.duration = Some(TimeDelta::minutes(45));
        let record = b.build().unwrap();
        assert_eq!(record.end.unwrap().wall, wall(2024, 1, 1, 9, 45));
    }

    #[test]
    fn explicit_end_wins_over_duration() {
        let mut b = builder();
        b.end = Some(DateTimeValue::floating(wall(2024, 1, 1, 10, 0)));
        b.duration = Some(TimeDelta::minutes(45));
        let record = b.build().unwrap();
        assert_eq!(record.duration(), Some(TimeDelta::hours(1)));
    }

    #[test]
    fn exclusions_dedupe_on_wall_clock() {
        let mut b = builder();
        b.add_exclusion(DateTimeValue::floating(wall(2024, 1, 8, 9, 0)));
        b.add_exclusion(DateTimeValue::utc(wall(2024, 1, 8, 9, 0)));
        b.add_exclusion(DateTimeValue::floating(wall(2024, 1, 15, 9, 0)));
        assert_eq!(b.exclusions.len(), 2);
    }

    #[test]
    fn overlap_is_inclusive() {
        let record = builder().build().unwrap();
        assert!(record.overlaps(wall(2024, 1, 1, 9, 0), wall(2024, 1, 1, 9, 0)));
        assert!(!record.overlaps(wall(2024, 1, 1, 9, 1), wall(2024, 1, 2, 0, 0)));
    }

    #[test]
    fn cancelled_status_is_case_insensitive() {
        let mut b = builder();
        b.status = Some("cancelled".to_string());
        assert!(b.build().unwrap().is_cancelled());
    }
}
