//! Windowed recurrence expansion.

use std::collections::HashSet;

use almanac_core::constants::DEFAULT_MAX_ITERATIONS;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};

use super::candidates::{advance, candidates, period_start, periods_between};
use crate::rfc::ical::core::{EventRecord, Occurrence, RecurrenceRule};
use crate::rfc::ical::parse::parse_rule;

/// Whole periods kept between the fast-forwarded anchor and the window.
const FAST_FORWARD_MARGIN: u32 = 2;

/// Expands one recurring template into concrete occurrences.
///
/// Stateless apart from its inputs: the same template, rule, window and
/// exclusion set always produce the same occurrences.
#[derive(Debug, Clone)]
pub struct RecurrenceExpander<'a> {
    template: &'a EventRecord,
    rule: RecurrenceRule,
    max_iterations: usize,
}

impl<'a> RecurrenceExpander<'a> {
    /// Creates an expander for `template` using an already parsed `rule`.
    #[must_use]
    pub const fn new(template: &'a EventRecord, rule: RecurrenceRule) -> Self {
        Self {
            template,
            rule,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    /// Creates an expander from the template's own RRULE text.
    ///
    /// Returns `None` if the record has no rule or the rule does not parse;
    /// such a template has no occurrences.
    #[must_use]
    pub fn from_template(template: &'a EventRecord) -> Option<Self> {
        let rule = parse_rule(template.rrule.as_deref()?)?;
        Some(Self::new(template, rule))
    }

    /// Overrides the iteration ceiling (floored at 1).
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations.max(1);
        self
    }

    /// Returns the rule being expanded.
    #[must_use]
    pub const fn rule(&self) -> &RecurrenceRule {
        &self.rule
    }

    /// ## Summary
    /// Returns the occurrences overlapping the inclusive window
    /// `[window_start, window_end]`, in ascending order.
    ///
    /// `excluded` holds wall-clock instants to suppress. An excluded
    /// candidate still counts toward COUNT. COUNT and UNTIL bound the whole
    /// series, so the window only decides which occurrences are returned,
    /// never which exist.
    #[tracing::instrument(
        skip(self, excluded),
        fields(uid = %self.template.uid, rule = %self.rule, excluded = excluded.len())
    )]
    #[must_use]
    pub fn expand(
        &self,
        window_start: NaiveDateTime,
        window_end: NaiveDateTime,
        excluded: &HashSet<NaiveDateTime>,
    ) -> Vec<Occurrence> {
        let mut occurrences = Vec::new();
        if window_end < window_start {
            return occurrences;
        }

        let series_start = self.template.start.wall;
        let duration = self.template.duration();
        let rule = &self.rule;

        let mut anchor = period_start(rule.frequency, series_start.date());
        if rule.count.is_none() {
            anchor = self.fast_forward(anchor, window_start, duration);
        }

        let mut series_total: u32 = 0;
        let mut iterations = 0;

        loop {
            if iterations >= self.max_iterations {
                tracing::warn!(
                    iterations,
                    "Iteration ceiling reached; truncating expansion"
                );
                break;
            }
            iterations += 1;

            let anchor_instant = anchor.and_time(NaiveTime::MIN);
            if anchor_instant > window_end {
                break;
            }
            if rule.until.is_some_and(|until| anchor_instant > until) {
                break;
            }

            for candidate in candidates(rule, series_start, anchor) {
                if candidate < series_start {
                    continue;
                }
                if rule.until.is_some_and(|until| candidate > until) {
                    return occurrences;
                }

                series_total += 1;
                if rule.count.is_some_and(|count| series_total > count) {
                    return occurrences;
                }

                if candidate > window_end {
                    return occurrences;
                }
                if excluded.contains(&candidate) {
                    tracing::trace!(%candidate, "Skipping excluded occurrence");
                    continue;
                }

                if let Some(occurrence) = self.occurrence(candidate, duration, window_start) {
                    occurrences.push(occurrence);
                }
            }

            let Some(next) = advance(rule.frequency, anchor, rule.interval) else {
                break;
            };
            anchor = next;
        }

        tracing::debug!(count = occurrences.len(), "Expanded occurrences");
        occurrences
    }

    /// Moves the anchor close to the window without passing it.
    ///
    /// Steps a whole number of intervals so the anchor stays on the series'
    /// period grid, aiming at `window_start - duration` so events already in
    /// progress at the window start are still found.
    fn fast_forward(
        &self,
        anchor: NaiveDate,
        window_start: NaiveDateTime,
        duration: Option<TimeDelta>,
    ) -> NaiveDate {
        let target = duration
            .and_then(|d| window_start.checked_sub_signed(d))
            .unwrap_or(window_start)
            .date();

        let frequency = self.rule.frequency;
        let intervals = periods_between(frequency, anchor, target) / self.rule.interval;
        let skip = intervals.saturating_sub(FAST_FORWARD_MARGIN);
        if skip == 0 {
            return anchor;
        }

        match skip
            .checked_mul(self.rule.interval)
            .and_then(|periods| advance(frequency, anchor, periods))
        {
            Some(next) => {
                tracing::trace!(from = %anchor, to = %next, "Fast-forwarded anchor");
                next
            }
            None => anchor,
        }
    }

    /// Builds the occurrence at `start` if its span reaches the window.
    fn occurrence(
        &self,
        start: NaiveDateTime,
        duration: Option<TimeDelta>,
        window_start: NaiveDateTime,
    ) -> Option<Occurrence> {
        let end = match duration {
            Some(d) => Some(start.checked_add_signed(d)?),
            None => None,
        };

        if end.unwrap_or(start) < window_start {
            return None;
        }

        let template = self.template;
        Some(template.occurrence_at(
            template.start.with_wall(start),
            template
                .end
                .as_ref()
                .zip(end)
                .map(|(template_end, wall)| template_end.with_wall(wall)),
        ))
    }
}

#[cfg(test)]
#[path = "expander_tests.rs"]
mod tests;
