//! CSV line parsing and field escaping
//!
//! The parser is strictly line-oriented: a quoted field cannot contain a
//! line break, because part reading already split on `\n`. Field content is
//! otherwise preserved byte-for-byte; no whitespace trimming.

use std::borrow::Cow;

/// Split one CSV line into its fields.
///
/// Fields are comma-separated and may be wrapped in double quotes; inside a
/// quoted field, `""` is a literal quote and commas do not terminate the
/// field. An unterminated quote runs to end of line.
pub fn parse_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    field.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut field));
            }
            _ => field.push(c),
        }
    }

    fields.push(field);
    fields
}

/// Quote a field for CSV output when its content requires it.
///
/// A field is quoted if it contains a comma, a quote, or a line break;
/// embedded quotes are doubled. Everything else passes through unchanged.
pub fn escape_field(field: &str) -> Cow<'_, str> {
    if !field.contains(['"', ',', '\n', '\r']) {
        return Cow::Borrowed(field);
    }
    let mut escaped = String::with_capacity(field.len() + 2);
    escaped.push('"');
    for c in field.chars() {
        if c == '"' {
            escaped.push('"');
        }
        escaped.push(c);
    }
    escaped.push('"');
    Cow::Owned(escaped)
}

/// Join fields into one CSV line (no trailing newline).
pub fn join_row<S: AsRef<str>>(fields: &[S]) -> String {
    let mut line = String::new();
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            line.push(',');
        }
        line.push_str(&escape_field(field.as_ref()));
    }
    line
}
