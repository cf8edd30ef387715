//! iCalendar (RFC 5545) event feeds.
//!
//! - `core`: event records, date-time values and parsed recurrence rules
//! - `parse`: line unfolding, content-line lexing and the event decoder
//! - `expand`: windowed recurrence expansion

pub mod core;
pub mod expand;
pub mod parse;

#[cfg(test)]
mod tests;
