//! Event feed decoder.
//!
//! Turns iCalendar feed text into [`EventRecord`]s. Decoding never fails:
//! malformed lines, unparseable values and incomplete events are skipped and
//! the rest of the feed is still read.

use super::lexer::{parse_content_line, split_lines};
use super::values::{parse_date_time_value, parse_duration, unescape_text};
use crate::rfc::ical::core::{ComponentKind, ContentLine, DateTimeValue, EventBuilder, EventRecord};

/// One open component on the nesting stack.
#[derive(Debug)]
enum Frame {
    /// A VEVENT whose properties are being collected.
    Event(Box<EventBuilder>),
    /// Any other component; its properties are never read.
    Other(String),
}

impl Frame {
    fn open(name: String) -> Self {
        match ComponentKind::parse(&name) {
            ComponentKind::Event => Self::Event(Box::default()),
            ComponentKind::Other => Self::Other(name),
        }
    }

    fn closes_with(&self, name: &str) -> bool {
        match self {
            Self::Event(_) => ComponentKind::parse(name) == ComponentKind::Event,
            Self::Other(open) => open == name,
        }
    }
}

/// Decodes feed text into event records.
///
/// Records come out in the order their `END:VEVENT` lines appear. Only
/// events carrying a UID, a SUMMARY and a parseable DTSTART are emitted.
#[tracing::instrument(skip(input), fields(input_len = input.len()))]
#[must_use]
pub fn decode(input: &str) -> Vec<EventRecord> {
    let lines = split_lines(input);
    tracing::trace!(count = lines.len(), "Split lines");

    let mut stack: Vec<Frame> = Vec::new();
    let mut records = Vec::new();

    for (line_num, line) in lines {
        let content_line = match parse_content_line(&line, line_num) {
            Ok(cl) => cl,
            Err(error) => {
                tracing::trace!(%error, "Skipping malformed content line");
                continue;
            }
        };

        match content_line.name.as_str() {
            "BEGIN" => {
                let name = content_line.raw_value.trim().to_ascii_uppercase();
                stack.push(Frame::open(name));
            }
            "END" => {
                let name = content_line.raw_value.trim().to_ascii_uppercase();
                close_component(&mut stack, &name, line_num, &mut records);
            }
            _ => {
                if let Some(Frame::Event(builder)) = stack.last_mut() {
                    apply_property(builder, &content_line, line_num);
                }
            }
        }
    }

    let unclosed = stack
        .iter()
        .filter(|frame| matches!(frame, Frame::Event(_)))
        .count();
    if unclosed > 0 {
        tracing::debug!(unclosed, "Discarding events without END:VEVENT");
    }

    tracing::debug!(count = records.len(), "Decoded event records");
    records
}

/// Pops the stack down to the frame `name` closes, emitting the event if the
/// closed frame is one.
///
/// An END with no matching open component is ignored. Frames above the match
/// were never closed and are discarded.
fn close_component(
    stack: &mut Vec<Frame>,
    name: &str,
    line_num: usize,
    records: &mut Vec<EventRecord>,
) {
    let Some(depth) = stack.iter().rposition(|frame| frame.closes_with(name)) else {
        tracing::trace!(line = line_num, name, "Ignoring unmatched END");
        return;
    };

    if stack.len() - depth > 1 {
        tracing::trace!(
            line = line_num,
            discarded = stack.len() - depth - 1,
            "Closing component with unclosed children"
        );
    }

    stack.truncate(depth + 1);
    if let Some(Frame::Event(builder)) = stack.pop() {
        match (*builder).build() {
            Some(record) => records.push(record),
            None => tracing::debug!(
                line = line_num,
                "Discarding event missing UID, SUMMARY or DTSTART"
            ),
        }
    }
}

/// Maps one recognized VEVENT property onto the builder.
///
/// Unrecognized names are ignored. For single-valued properties the last
/// line wins.
fn apply_property(builder: &mut EventBuilder, cl: &ContentLine, line_num: usize) {
    let raw = cl.raw_value.as_str();

    match cl.name.as_str() {
        "UID" => builder.uid = Some(raw.trim().to_string()),
        "SUMMARY" => builder.summary = Some(unescape_text(raw)),
        "DESCRIPTION" => builder.description = Some(unescape_text(raw)),
        "LOCATION" => builder.location = Some(unescape_text(raw)),
        "STATUS" => builder.status = Some(raw.trim().to_string()),
        "RRULE" => builder.rrule = Some(raw.trim().to_string()),
        "DTSTART" => {
            if let Some(value) = date_time_property(cl, raw, line_num) {
                builder.start = Some(value);
            }
        }
        "DTEND" => {
            if let Some(value) = date_time_property(cl, raw, line_num) {
                builder.end = Some(value);
            }
        }
        "RECURRENCE-ID" => {
            if let Some(value) = date_time_property(cl, raw, line_num) {
                builder.override_of = Some(value);
            }
        }
        "EXDATE" => {
            for item in raw.split(',').filter(|s| !s.trim().is_empty()) {
                if let Some(value) = date_time_property(cl, item, line_num) {
                    builder.add_exclusion(value);
                }
            }
        }
        "DURATION" => match parse_duration(raw.trim(), line_num, cl.name.len() + 2) {
            Ok(duration) => builder.duration = Some(duration),
            Err(error) => tracing::trace!(%error, "Ignoring unparseable DURATION"),
        },
        _ => {}
    }
}

/// Decodes a date or date-time using the line's VALUE and TZID parameters.
fn date_time_property(
    cl: &ContentLine,
    raw: &str,
    line_num: usize,
) -> Option<DateTimeValue> {
    let value = parse_date_time_value(raw, cl.is_date_only(), cl.tzid());
    if value.is_none() {
        tracing::trace!(
            line = line_num,
            property = %cl.name,
            raw,
            "Ignoring unparseable date-time"
        );
    }
    value
}

#[cfg(test)]
#[path = "decoder_tests.rs"]
mod tests;
