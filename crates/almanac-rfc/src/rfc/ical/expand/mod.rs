//! Recurrence expansion.
//!
//! All stepping is done on wall-clock calendar fields. Zone hints are carried
//! through to occurrences unchanged.

mod candidates;
mod expander;

pub use candidates::{days_in_month, month_day, nth_weekday};
pub use expander::RecurrenceExpander;
