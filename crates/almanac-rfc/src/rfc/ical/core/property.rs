//! iCalendar content lines (RFC 5545 §3.1).

use super::Parameter;

/// A raw content line as parsed from iCalendar text.
///
/// This is the low-level representation before the decoder maps a recognised
/// property onto an event field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentLine {
    /// Property name (normalized to uppercase).
    pub name: String,
    /// Parameters in order of appearance.
    pub params: Vec<Parameter>,
    /// Raw value string (after unfolding, before unescaping).
    pub raw_value: String,
}

impl ContentLine {
    /// Creates a new content line.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into().to_ascii_uppercase(),
            params: Vec::new(),
            raw_value: value.into(),
        }
    }

    /// Creates a content line with parameters.
    #[must_use]
    pub fn with_params(
        name: impl Into<String>,
        params: Vec<Parameter>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into().to_ascii_uppercase(),
            params,
            raw_value: value.into(),
        }
    }

    /// Returns the parameter with the given name.
    #[must_use]
    pub fn get_param(&self, name: &str) -> Option<&Parameter> {
        let name_upper = name.to_ascii_uppercase();
        self.params.iter().find(|p| p.name == name_upper)
    }

    /// Returns the value of a parameter.
    #[must_use]
    pub fn get_param_value(&self, name: &str) -> Option<&str> {
        self.get_param(name)?.value()
    }

    /// Returns whether `VALUE=DATE` marks this line as date-only.
    #[must_use]
    pub fn is_date_only(&self) -> bool {
        self.get_param("VALUE").is_some_and(|p| p.has_value("DATE"))
    }

    /// Returns the TZID parameter if present.
    #[must_use]
    pub fn tzid(&self) -> Option<&str> {
        self.get_param_value("TZID")
    }
}
