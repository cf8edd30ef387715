//! iCalendar parameter types (RFC 5545 §3.2).

use std::fmt;

/// A single iCalendar property parameter.
///
/// Parameters modify or provide metadata for a property value.
/// For example: `DTSTART;TZID=America/New_York:20260123T120000`
///
/// The `TZID` is a parameter with name `TZID` and value `America/New_York`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Parameter name (normalized to uppercase).
    pub name: String,
    /// Parameter values. Most parameters have one value, but some
    /// (like MEMBER) can have multiple comma-separated values.
    pub values: Vec<String>,
}

impl Parameter {
    /// Creates a new parameter with a single value.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into().to_ascii_uppercase(),
            values: vec![value.into()],
        }
    }

    /// Creates a new parameter with multiple values.
    #[must_use]
    pub fn with_values(name: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            name: name.into().to_ascii_uppercase(),
            values,
        }
    }

    /// Returns the first (and usually only) value.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.values.first().map(String::as_str)
    }

    /// Returns whether the parameter has the specified value (case-insensitive).
    #[must_use]
    pub fn has_value(&self, value: &str) -> bool {
        self.values.iter().any(|v| v.eq_ignore_ascii_case(value))
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.values.join(","))
    }
}
