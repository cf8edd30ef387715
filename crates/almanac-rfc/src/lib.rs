//! iCalendar feed decoding and recurrence expansion.
//!
//! [`rfc::ical::parse::decode`] turns feed text into event records, and
//! [`rfc::ical::expand::RecurrenceExpander`] turns one recurring record into
//! the concrete occurrences overlapping a window. Neither performs I/O or
//! caching.

pub mod error;
pub mod rfc;
