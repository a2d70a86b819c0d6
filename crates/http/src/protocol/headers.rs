//! Case-insensitive header collection with line-level parsing.
//!
//! Header names are folded to lowercase ascii before use as map keys, so
//! lookups are case-insensitive. Inserting a name that is already present
//! merges the values with `", "` instead of overwriting, which is the rule
//! required for repeated fields such as `Set-Cookie`-style headers.
//!
//! A field line is valid only if, ignoring surrounding spaces, it decomposes
//! into a whitespace-free key, a colon, and a whitespace-free value (the
//! value may be empty). In particular a space between the key and the colon
//! is invalid: `"Host : v"` is rejected while `"Host: v"` is accepted.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use crate::ensure;
use crate::protocol::{CRLF, ParseError, find_crlf};

/// A case-insensitive mapping from header name to value.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Headers {
    fields: BTreeMap<String, String>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attempts to parse one CRLF-terminated field line from `data`.
    ///
    /// Returns `(consumed, done)`:
    ///
    /// - `(0, false)` if no CRLF is present yet (need more data)
    /// - `(0, true)` if `data` starts with a bare CRLF, which marks the end
    ///   of the header section; the collection is not mutated and the
    ///   terminator itself is not consumed
    /// - `(n, false)` after validating and storing one line of `n` bytes,
    ///   including its CRLF
    ///
    /// A line that fails validation is a hard error: a single bad header
    /// fails the whole message.
    pub fn parse(&mut self, data: &[u8]) -> Result<(usize, bool), ParseError> {
        let Some(line_end) = find_crlf(data) else {
            return Ok((0, false));
        };

        if line_end == 0 {
            return Ok((0, true));
        }

        let line = std::str::from_utf8(&data[..line_end])
            .map_err(|_| ParseError::malformed_header_line("field line is not valid utf-8"))?;

        let (key, value) = split_field_line(line)?;
        self.insert(key, value);

        Ok((line_end + CRLF.len(), false))
    }

    /// Adds a field, merging with `", "` when the name is already present.
    pub fn insert(&mut self, name: &str, value: &str) {
        match self.fields.entry(fold(name)) {
            Entry::Occupied(mut entry) => {
                let merged = entry.get_mut();
                merged.push_str(", ");
                merged.push_str(value);
            }
            Entry::Vacant(entry) => {
                entry.insert(value.to_owned());
            }
        }
    }

    /// Sets a field, overwriting any existing value.
    pub fn set(&mut self, name: &str, value: &str) {
        self.fields.insert(fold(name), value.to_owned());
    }

    pub fn remove(&mut self, name: &str) {
        self.fields.remove(&fold(name));
    }

    /// Case-insensitive lookup. Absence and an empty value are distinct at
    /// this layer; callers wanting the looser reading use `.unwrap_or("")`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(&fold(name)).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

fn fold(name: &str) -> String {
    name.to_ascii_lowercase()
}

/// Splits a field line (without its CRLF) into key and value, enforcing the
/// validation rule from the module docs.
fn split_field_line(line: &str) -> Result<(&str, &str), ParseError> {
    let trimmed = line.trim_matches(' ');

    let Some((key, rest)) = trimmed.split_once(':') else {
        return Err(ParseError::malformed_header_line(format!("missing colon in {line:?}")));
    };

    ensure!(!key.is_empty(), ParseError::malformed_header_line(format!("empty field name in {line:?}")));
    ensure!(
        !key.chars().any(char::is_whitespace),
        ParseError::malformed_header_line(format!("whitespace before colon in {line:?}"))
    );

    let value = rest.trim_start_matches(' ');
    ensure!(
        !value.chars().any(char::is_whitespace),
        ParseError::malformed_header_line(format!("whitespace in field value of {line:?}"))
    );

    Ok((key, value))
}
