//! Decode a feed, then expand its templates.

use std::collections::HashSet;

use chrono::{NaiveDate, NaiveDateTime};

use super::fixtures::{FOLDED_FEED, MESSY_FEED, TEAM_FEED};
use crate::rfc::ical::core::{DateTimeForm, EventRecord};
use crate::rfc::ical::expand::RecurrenceExpander;
use crate::rfc::ical::parse::decode;

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, 0)
        .unwrap()
}

fn find<'a>(records: &'a [EventRecord], uid: &str, is_template: bool) -> &'a EventRecord {
    records
        .iter()
        .find(|r| r.uid == uid && r.is_template() == is_template)
        .unwrap()
}

#[test_log::test]
fn team_feed_decodes_events_only() {
    let records = decode(TEAM_FEED);

    let uids: Vec<_> = records.iter().map(|r| r.uid.as_str()).collect();
    assert_eq!(
        uids,
        vec![
            "standup@example.com",
            "standup@example.com",
            "offsite@example.com"
        ]
    );

    let template = find(&records, "standup@example.com", true);
    assert_eq!(
        template.description.as_deref(),
        Some("Yesterday, today, blockers.\nKeep it short.")
    );
    assert_eq!(template.location.as_deref(), Some("Room 3; 2nd floor"));
    assert_eq!(template.exclusions.len(), 1);
    assert_eq!(template.start.tzid(), Some("Europe/Berlin"));

    let moved = find(&records, "standup@example.com", false);
    assert!(moved.is_override());
    assert_eq!(moved.start.wall, at(2024, 3, 7, 11, 0));

    let offsite = find(&records, "offsite@example.com", false);
    assert!(offsite.all_day);
    assert!(offsite.is_one_off());
}

#[test_log::test]
fn team_feed_expands_with_exclusions_and_overrides() {
    let records = decode(TEAM_FEED);
    let template = find(&records, "standup@example.com", true);

    let mut excluded: HashSet<NaiveDateTime> =
        template.exclusions.iter().map(|e| e.wall).collect();
    excluded.extend(
        records
            .iter()
            .filter(|r| r.uid == template.uid)
            .filter_map(|r| r.override_of.as_ref().map(|o| o.wall)),
    );

    let occurrences = RecurrenceExpander::from_template(template).unwrap().expand(
        at(2024, 3, 4, 0, 0),
        at(2024, 3, 10, 23, 59),
        &excluded,
    );

    let starts: Vec<_> = occurrences.iter().map(|o| o.start.wall).collect();
    assert_eq!(
        starts,
        vec![
            at(2024, 3, 4, 9, 30),
            at(2024, 3, 5, 9, 30),
            at(2024, 3, 8, 9, 30),
        ]
    );
    assert!(occurrences.iter().all(|o| o.start.tzid() == Some("Europe/Berlin")));
    assert!(occurrences.iter().all(|o| o.rrule.is_none() && o.exclusions.is_empty()));
    assert_eq!(occurrences[2].end.as_ref().unwrap().wall, at(2024, 3, 8, 9, 45));
}

#[test]
fn folded_feed_quarterly_first_tuesday() {
    let records = decode(FOLDED_FEED);
    assert_eq!(records.len(), 1);

    let template = &records[0];
    assert_eq!(template.summary, "Quarterly planning review");
    assert_eq!(
        template.description.as_deref(),
        Some("Agenda: budget, hiring; roadmap. Bring the notes from last quarter.")
    );

    let occurrences = RecurrenceExpander::from_template(template).unwrap().expand(
        at(2024, 1, 1, 0, 0),
        at(2024, 12, 31, 23, 59),
        &HashSet::new(),
    );

    let starts: Vec<_> = occurrences.iter().map(|o| o.start.wall).collect();
    assert_eq!(
        starts,
        vec![
            at(2024, 1, 2, 15, 0),
            at(2024, 4, 2, 15, 0),
            at(2024, 7, 2, 15, 0),
            at(2024, 10, 1, 15, 0),
        ]
    );
    assert!(occurrences.iter().all(|o| o.start.form == DateTimeForm::Utc));
    assert_eq!(occurrences[3].end.as_ref().unwrap().wall, at(2024, 10, 1, 17, 0));
}

#[test_log::test]
fn messy_feed_keeps_what_it_can() {
    let records = decode(MESSY_FEED);

    let uids: Vec<_> = records.iter().map(|r| r.uid.as_str()).collect();
    assert_eq!(uids, vec!["bad-rule@example.com", "ok@example.com"]);

    // An unsupported rule degrades to a template without occurrences
    let bad = &records[0];
    assert!(bad.is_template());
    assert!(RecurrenceExpander::from_template(bad).is_none());

    // Non-RFC start layouts go through the fallback parser
    assert_eq!(records[1].start.wall, at(2024, 1, 5, 10, 0));
}
