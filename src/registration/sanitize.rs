//! Normalizes raw input before it reaches the draft.

use super::fields::Field;

/// Result of sanitizing one raw input value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Sanitized {
    /// Whitespace-free value to write into the draft.
    Accepted(String),
    /// The stripped value is longer than the field allows; keep the prior value.
    Rejected { len: usize, max: usize },
}

const BYTE_ORDER_MARK: char = '\u{feff}';

fn is_blank(c: char) -> bool {
    c.is_whitespace() || c == BYTE_ORDER_MARK
}

/// Strips every whitespace character (and U+FEFF) and applies the field's
/// length bound.
#[must_use]
pub fn sanitize(field: Field, raw: &str) -> Sanitized {
    let stripped: String = raw.chars().filter(|c| !is_blank(*c)).collect();

    match field.max_len() {
        Some(max) => {
            let len = stripped.chars().count();
            if len > max {
                Sanitized::Rejected { len, max }
            } else {
                Sanitized::Accepted(stripped)
            }
        }
        None => Sanitized::Accepted(stripped),
    }
}

/// Same as [`sanitize`] keyed by form name; unknown names yield `None`.
#[must_use]
pub fn sanitize_named(name: &str, raw: &str) -> Option<(Field, Sanitized)> {
    let field = name.parse::<Field>().ok()?;
    Some((field, sanitize(field, raw)))
}
