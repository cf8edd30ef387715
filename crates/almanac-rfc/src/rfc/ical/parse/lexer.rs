//! Content line lexer for iCalendar (RFC 5545 §3.1).
//!
//! Handles line unfolding and tokenization of content lines.

use std::iter::Peekable;
use std::str::CharIndices;

use super::error::{ParseError, ParseErrorKind, ParseResult};
use crate::rfc::ical::core::{ContentLine, Parameter};

/// Splits input into logical content lines, merging folded continuations.
///
/// Handles both CRLF and bare LF line endings. A physical line starting with
/// exactly one SP/HTAB continues the previous line: the line break and that
/// single whitespace character are removed, nothing is inserted. An empty
/// physical line ends the current logical line, so nothing folds across it.
/// Lines that are empty after unfolding are dropped.
///
/// Each logical line is returned with the 1-based number of the physical
/// line it started on.
#[must_use]
pub fn split_lines(input: &str) -> Vec<(usize, String)> {
    let mut lines: Vec<(usize, String)> = Vec::new();
    let mut open = false;

    for (i, raw_line) in input.lines().enumerate() {
        let line = raw_line.trim_end_matches('\r');
        if line.is_empty() {
            open = false;
            continue;
        }

        let stripped = line.strip_prefix([' ', '\t']);
        if let (true, Some(continuation)) = (open, stripped) {
            if let Some((_, prev)) = lines.last_mut() {
                prev.push_str(continuation);
            }
        } else {
            lines.push((i + 1, stripped.unwrap_or(line).to_string()));
        }
        open = true;
    }

    lines.retain(|(_, line)| !line.trim().is_empty());
    lines
}

/// Parses a single content line.
///
/// Format: `name *(";" param) ":" value`
///
/// The name is normalized to uppercase. The value starts after the first
/// colon that is not inside a quoted parameter value.
///
/// ## Errors
/// Returns an error if the line is malformed or contains invalid characters.
pub fn parse_content_line(line: &str, line_num: usize) -> ParseResult<ContentLine> {
    let mut chars = line.char_indices().peekable();
    let mut separator = None;

    // Find the property name (ends at ';' or ':')
    while let Some(&(i, c)) = chars.peek() {
        if c == ';' || c == ':' {
            separator = Some((i, c));
            break;
        }
        if !c.is_ascii_alphanumeric() && c != '-' {
            return Err(ParseError::new(
                ParseErrorKind::InvalidPropertyName,
                line_num,
                i + 1,
            ));
        }
        chars.next();
    }

    let Some((name_end, sep)) = separator else {
        return Err(ParseError::new(
            ParseErrorKind::MissingColon,
            line_num,
            line.len(),
        ));
    };

    if name_end == 0 {
        return Err(ParseError::new(
            ParseErrorKind::MissingPropertyName,
            line_num,
            1,
        ));
    }

    let name = line[..name_end].to_ascii_uppercase();
    chars.next(); // consume the separator

    let mut params = Vec::new();
    let colon_pos = if sep == ':' {
        name_end
    } else {
        loop {
            let (param, colon) = parse_parameter(&mut chars, line, line_num)?;
            params.push(param);
            if let Some(pos) = colon {
                break pos;
            }
        }
    };

    Ok(ContentLine {
        name,
        params,
        raw_value: line[colon_pos + 1..].to_string(),
    })
}

/// Parses a single parameter from the character stream.
///
/// Returns the parameter and, if the parameter list ended, the byte position
/// of the colon that starts the value.
fn parse_parameter(
    chars: &mut Peekable<CharIndices<'_>>,
    line: &str,
    line_num: usize,
) -> ParseResult<(Parameter, Option<usize>)> {
    let start = chars.peek().map_or(line.len(), |&(i, _)| i);

    // Parse parameter name (up to '=')
    let mut name_end = start;
    while let Some(&(i, c)) = chars.peek() {
        if c == '=' {
            name_end = i;
            chars.next(); // consume '='
            break;
        }
        if !c.is_ascii_alphanumeric() && c != '-' {
            return Err(ParseError::new(
                ParseErrorKind::InvalidParameter,
                line_num,
                i + 1,
            ));
        }
        chars.next();
    }

    if name_end == start {
        return Err(ParseError::new(
            ParseErrorKind::InvalidParameter,
            line_num,
            start + 1,
        ));
    }

    let param_name = line[start..name_end].to_ascii_uppercase();

    // Parse parameter values (comma-separated, may be quoted)
    let mut values = Vec::new();
    loop {
        values.push(parse_param_value(chars, line, line_num)?);

        match chars.next() {
            Some((_, ',')) => {}
            Some((_, ';')) => return Ok((Parameter::with_values(param_name, values), None)),
            Some((i, ':')) => {
                return Ok((Parameter::with_values(param_name, values), Some(i)));
            }
            Some((i, c)) => {
                return Err(
                    ParseError::new(ParseErrorKind::InvalidParameter, line_num, i + 1)
                        .with_context(format!("unexpected character '{c}'")),
                );
            }
            None => {
                return Err(ParseError::new(
                    ParseErrorKind::MissingColon,
                    line_num,
                    line.len(),
                ));
            }
        }
    }
}

/// Parses a parameter value (possibly quoted).
fn parse_param_value(
    chars: &mut Peekable<CharIndices<'_>>,
    line: &str,
    line_num: usize,
) -> ParseResult<String> {
    let Some(&(start, first)) = chars.peek() else {
        return Err(ParseError::new(
            ParseErrorKind::MissingColon,
            line_num,
            line.len(),
        ));
    };

    if first != '"' {
        // Unquoted value (ends at ',' ';' or ':')
        let mut end = start;
        while let Some(&(i, c)) = chars.peek() {
            if c == ',' || c == ';' || c == ':' {
                break;
            }
            end = i + c.len_utf8();
            chars.next();
        }
        return Ok(line[start..end].to_string());
    }

    chars.next(); // consume opening quote
    let mut value = String::new();
    for (_, c) in chars.by_ref() {
        if c == '"' {
            return Ok(value);
        }
        value.push(c);
    }

    Err(ParseError::new(
        ParseErrorKind::UnclosedQuote,
        line_num,
        start + 1,
    ))
}
