//! iCalendar feed parsing.

mod decoder;
mod error;
mod lexer;
mod rrule;
mod values;

pub use decoder::decode;
pub use error::{ParseError, ParseErrorKind, ParseResult};
pub use lexer::{parse_content_line, split_lines};
pub use rrule::parse_rule;
pub use values::{
    escape_text, parse_date, parse_date_time_value, parse_datetime, parse_duration, parse_time,
    parse_until, unescape_text,
};
