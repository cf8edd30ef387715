//! Feed-level expansion: templates, overrides and one-off events merged into
//! one chronological list.

use std::collections::HashSet;

use almanac_core::config::ExpansionConfig;
use almanac_core::constants::DEFAULT_MAX_ITERATIONS;
use almanac_rfc::rfc::ical::core::{EventRecord, Occurrence, RecurrenceRule};
use almanac_rfc::rfc::ical::expand::RecurrenceExpander;
use chrono::NaiveDateTime;

use crate::error::ServiceResult;
use crate::window::Window;

/// Knobs applied to every template in a feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpandOptions {
    /// Iteration ceiling passed to each expander.
    pub max_iterations: usize,
    /// Drop records and occurrences whose status is `CANCELLED`.
    pub skip_cancelled: bool,
}

impl Default for ExpandOptions {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            skip_cancelled: true,
        }
    }
}

impl From<&ExpansionConfig> for ExpandOptions {
    fn from(config: &ExpansionConfig) -> Self {
        Self {
            max_iterations: config.max_iterations,
            skip_cancelled: config.skip_cancelled,
        }
    }
}

/// ## Summary
/// Collects the instants a template must not produce.
///
/// The union of the template's own exclusion list and the replaced instant
/// of every override sharing its UID.
#[must_use]
pub fn excluded_instants(template: &EventRecord, records: &[EventRecord]) -> HashSet<NaiveDateTime> {
    let mut excluded: HashSet<NaiveDateTime> =
        template.exclusions.iter().map(|value| value.wall).collect();

    excluded.extend(
        records
            .iter()
            .filter(|record| record.uid == template.uid)
            .filter_map(|record| record.override_of.as_ref())
            .map(|value| value.wall),
    );

    excluded
}

/// ## Summary
/// Expands one template against its siblings in `records`.
///
/// ## Errors
/// Returns `RfcError::UnsupportedRule` if the template's RRULE does not
/// parse. A record without an RRULE yields no occurrences.
pub fn expand_template(
    template: &EventRecord,
    records: &[EventRecord],
    window: Window,
    options: &ExpandOptions,
) -> ServiceResult<Vec<Occurrence>> {
    let Some(raw) = template.rrule.as_deref() else {
        return Ok(Vec::new());
    };

    let rule: RecurrenceRule = raw.parse()?;
    let excluded = excluded_instants(template, records);

    Ok(RecurrenceExpander::new(template, rule)
        .with_max_iterations(options.max_iterations)
        .expand(window.start, window.end, &excluded))
}

/// ## Summary
/// Returns every occurrence in the window, sorted by start then UID.
///
/// Templates contribute their expansions, overrides and one-off events
/// contribute themselves when they overlap the window. A template whose rule
/// does not parse contributes nothing and does not affect the others.
#[tracing::instrument(skip(records, options), fields(records = records.len()))]
#[must_use]
pub fn expand_feed(
    records: &[EventRecord],
    window: Window,
    options: &ExpandOptions,
) -> Vec<Occurrence> {
    let mut occurrences = Vec::new();

    for record in records {
        if record.is_template() {
            match expand_template(record, records, window, options) {
                Ok(expanded) => occurrences.extend(expanded),
                Err(error) => {
                    tracing::warn!(uid = %record.uid, %error, "Skipping template");
                }
            }
        } else if record.overlaps(window.start, window.end) {
            let mut occurrence = record.clone();
            occurrence.exclusions.clear();
            occurrences.push(occurrence);
        } else {
            tracing::trace!(uid = %record.uid, "Record outside window");
        }
    }

    if options.skip_cancelled {
        let before = occurrences.len();
        occurrences.retain(|occurrence| !occurrence.is_cancelled());
        let dropped = before - occurrences.len();
        if dropped > 0 {
            tracing::debug!(dropped, "Dropped cancelled occurrences");
        }
    }

    occurrences.sort_by(|a, b| {
        a.start
            .wall
            .cmp(&b.start.wall)
            .then_with(|| a.uid.cmp(&b.uid))
    });

    tracing::debug!(count = occurrences.len(), "Expanded feed");
    occurrences
}
