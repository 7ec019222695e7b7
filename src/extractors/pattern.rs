// src/extractors/pattern.rs

// --- Imports ---
use crate::utils::error::MatchError;

// --- Constants ---
/// The placeholder token splitting a pattern into its two delimiters.
pub const WILDCARD: char = '*';

/// Byte offset into the scanned text. A failed match carries no cursor,
/// which is how "no further position" is expressed.
pub type Cursor = usize;

// --- Data Structures ---

/// A wildcard pattern decomposed into its literal prefix and suffix,
/// e.g. `<a href="*"` becomes (`<a href="`, `"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pattern<'p> {
    prefix: &'p str,
    suffix: &'p str,
}

/// A successful extraction: the text strictly between the delimiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match<'t> {
    pub value: &'t str,
    /// Offset where the prefix occurrence begins.
    pub start: Cursor,
    /// Offset just past the suffix; resume here for the next match.
    pub next: Cursor,
}

impl<'p> Pattern<'p> {
    /// Splits `pattern` on its single wildcard. Zero or several wildcards,
    /// or an empty prefix/suffix, make the pattern invalid.
    pub fn parse(pattern: &'p str) -> Result<Self, MatchError> {
        let mut parts = pattern.split(WILDCARD);
        match (parts.next(), parts.next(), parts.next()) {
            (Some(prefix), Some(suffix), None) if !prefix.is_empty() && !suffix.is_empty() => {
                Ok(Self { prefix, suffix })
            }
            _ => Err(MatchError::InvalidPattern(pattern.to_string())),
        }
    }

    /// Finds the first prefix at or after `from`, then the first suffix after
    /// that prefix, and returns what lies between them.
    pub fn find<'t>(&self, text: &'t str, from: Cursor) -> Result<Match<'t>, MatchError> {
        let tail = text
            .get(from..)
            .ok_or_else(|| MatchError::NotFound(self.prefix.to_string()))?;

        let start = from
            + tail
                .find(self.prefix)
                .ok_or_else(|| MatchError::NotFound(self.prefix.to_string()))?;
        let value_start = start + self.prefix.len();

        let value_len = text[value_start..]
            .find(self.suffix)
            .ok_or_else(|| MatchError::NotFound(self.suffix.to_string()))?;
        if value_len == 0 {
            return Err(MatchError::EmptyMatch);
        }

        let value_end = value_start + value_len;
        Ok(Match {
            value: &text[value_start..value_end],
            start,
            next: value_end + self.suffix.len(),
        })
    }

    /// Every non-overlapping match in document order.
    pub fn find_all<'t>(&self, text: &'t str) -> Matches<'p, 't> {
        Matches { pattern: *self, text, cursor: 0 }
    }
}

/// Iterator over successive matches, each resuming at the previous `next`.
pub struct Matches<'p, 't> {
    pattern: Pattern<'p>,
    text: &'t str,
    cursor: Cursor,
}

impl<'t> Iterator for Matches<'_, 't> {
    type Item = Match<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.pattern.find(self.text, self.cursor) {
                Ok(found) => {
                    self.cursor = found.next;
                    return Some(found);
                }
                // Adjacent delimiters: skip past them and keep scanning.
                Err(MatchError::EmptyMatch) => {
                    let prefix_at = self.text.get(self.cursor..)?.find(self.pattern.prefix)?;
                    self.cursor += prefix_at + self.pattern.prefix.len();
                }
                Err(_) => return None,
            }
        }
    }
}

/// Parses `pattern` and matches it against `text` starting at `from`.
/// An invalid pattern is a configuration defect and is logged as such.
pub fn match_pattern<'t>(pattern: &str, text: &'t str, from: Cursor) -> Result<Match<'t>, MatchError> {
    let parsed = Pattern::parse(pattern).map_err(|e| {
        tracing::error!("{}", e);
        e
    })?;
    parsed.find(text, from)
}
