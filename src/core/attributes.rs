//! Raw attribute parsing
//!
//! Parses attributes out of raw tag content. Templates are HTML-ish, so the
//! grammar is permissive: valueless (boolean) attributes, single-quoted and
//! unquoted values are all accepted. Entity references in values are decoded.

use super::entities::decode_text;
use super::scanner::{is_name_char, is_name_start_char, is_whitespace};
use std::borrow::Cow;

/// A raw attribute sliced out of a tag
#[derive(Debug, Clone)]
pub struct Attribute<'a> {
    /// Attribute name
    pub name: Cow<'a, [u8]>,
    /// Attribute value (entities decoded; empty for boolean attributes)
    pub value: Cow<'a, [u8]>,
}

impl<'a> Attribute<'a> {
    pub fn new(name: &'a [u8], value: Cow<'a, [u8]>) -> Self {
        Attribute {
            name: Cow::Borrowed(name),
            value,
        }
    }

    /// Get the name as a string
    pub fn name_str(&self) -> Option<&str> {
        std::str::from_utf8(self.name.as_ref()).ok()
    }

    /// Get the value as a string
    pub fn value_str(&self) -> Option<&str> {
        std::str::from_utf8(self.value.as_ref()).ok()
    }
}

/// Parse attributes from raw tag content (everything between the element
/// name and the closing '>' or '/>')
pub fn parse_attributes(input: &[u8]) -> Vec<Attribute<'_>> {
    let mut attrs = Vec::new();
    let mut pos = 0;

    while pos < input.len() {
        while pos < input.len() && is_whitespace(input[pos]) {
            pos += 1;
        }
        if pos >= input.len() {
            break;
        }
        if input[pos] == b'/' || input[pos] == b'>' {
            break;
        }

        // Attribute name
        let name_start = pos;
        if !is_name_start_char(input[pos]) {
            pos += 1;
            continue;
        }
        while pos < input.len() && is_name_char(input[pos]) {
            pos += 1;
        }
        if pos == name_start {
            pos += 1;
            continue;
        }
        let name = &input[name_start..pos];

        // Skip whitespace around '='
        while pos < input.len() && is_whitespace(input[pos]) {
            pos += 1;
        }

        if pos >= input.len() || input[pos] != b'=' {
            // Boolean attribute (no value)
            attrs.push(Attribute::new(name, Cow::Borrowed(b"")));
            continue;
        }

        pos += 1; // Skip '='
        while pos < input.len() && is_whitespace(input[pos]) {
            pos += 1;
        }
        if pos >= input.len() {
            attrs.push(Attribute::new(name, Cow::Borrowed(b"")));
            break;
        }

        let quote = input[pos];
        if quote != b'"' && quote != b'\'' {
            // Unquoted value
            let value_start = pos;
            while pos < input.len()
                && !is_whitespace(input[pos])
                && input[pos] != b'/'
                && input[pos] != b'>'
            {
                pos += 1;
            }
            let value = decode_text(&input[value_start..pos]);
            attrs.push(Attribute::new(name, value));
            continue;
        }

        pos += 1; // Skip opening quote
        let value_start = pos;
        while pos < input.len() && input[pos] != quote {
            pos += 1;
        }
        let value = decode_text(&input[value_start..pos]);
        attrs.push(Attribute::new(name, value));

        if pos < input.len() {
            pos += 1; // Skip closing quote
        }
    }

    attrs
}
