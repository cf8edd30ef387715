//! iCalendar core models.
//!
//! Plain value types: no back-references, no shared state. An occurrence is
//! an owned copy derived from its template.

mod component;
mod datetime;
mod event;
mod parameter;
mod property;
mod rrule;

pub use component::ComponentKind;
pub use datetime::{DateTimeForm, DateTimeValue};
pub use event::{EventBuilder, EventRecord};
pub use parameter::Parameter;
pub use property::ContentLine;
pub use rrule::{
    Frequency, RecurrenceRule, WeekdaySelector, parse_weekday_code, weekday_code,
};

/// Occurrences share the event record shape, with recurrence fields cleared.
pub type Occurrence = EventRecord;
