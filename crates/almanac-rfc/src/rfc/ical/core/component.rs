//! iCalendar component kinds (RFC 5545 §3.4-3.6).

/// Component kind for iCalendar.
///
/// Only events contribute records. Every other component (VCALENDAR, VTODO,
/// VJOURNAL, VALARM, VTIMEZONE, X-components) is tracked for nesting and
/// otherwise skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// VEVENT component.
    Event,
    /// Anything else.
    Other,
}

impl ComponentKind {
    /// Parses a component kind from a string (case-insensitive).
    #[must_use]
    pub fn parse(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("VEVENT") {
            Self::Event
        } else {
            Self::Other
        }
    }
}
