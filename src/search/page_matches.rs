//! Per-page match index.
//!
//! Holds the normalized text of one page and computes the positions of a
//! compiled query in original (extracted) text space.

use crate::search::interfaces::TextItem;
use crate::search::query::CompiledQuery;
use crate::text::char_type::{character_type, is_combining_mark, is_diacritic_exception};
use crate::text::{normalize, NormalizedText};
use serde::Serialize;

/// A match in original text space, counted in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageMatch {
    /// Offset of the first matched character
    pub offset: usize,
    /// Number of matched characters
    pub length: usize,
}

impl PageMatch {
    /// Offset one past the last matched character.
    pub fn end(&self) -> usize {
        self.offset + self.length
    }
}

/// Text of one page, ready for searching.
#[derive(Debug, Clone, Default)]
pub struct PageText {
    original: String,
    normalized: NormalizedText,
    /// Byte offset of every character of the normalized text.
    char_starts: Vec<usize>,
}

impl PageText {
    /// Build the searchable text of a page from extracted text items.
    ///
    /// Items flagged with an end of line are followed by a line break, which
    /// the normalizer either joins away or turns into a space. Line breaks do
    /// not count in original space.
    pub fn from_items(items: &[TextItem]) -> Self {
        let mut raw = String::new();
        for item in items {
            raw.push_str(&item.text);
            if item.has_eol {
                raw.push('\n');
            }
        }
        Self::from_raw(&raw)
    }

    /// Build the searchable text of a page from raw text.
    pub fn from_raw(raw: &str) -> Self {
        let original = raw.chars().filter(|&c| c != '\n').collect();
        let normalized = normalize(raw);
        let char_starts = normalized.text.char_indices().map(|(i, _)| i).collect();
        Self {
            original,
            normalized,
            char_starts,
        }
    }

    /// Page text used when extraction failed.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The extracted text without line breaks; match offsets index into it.
    pub fn original(&self) -> &str {
        &self.original
    }

    /// The normalized search text.
    pub fn normalized(&self) -> &NormalizedText {
        &self.normalized
    }

    /// Whether the page contains combining marks.
    pub fn has_diacritics(&self) -> bool {
        self.normalized.has_diacritics
    }

    /// The original text covered by `m`.
    pub fn original_slice(&self, m: &PageMatch) -> String {
        self.original.chars().skip(m.offset).take(m.length).collect()
    }

    fn char_index(&self, byte: usize) -> usize {
        self.char_starts.partition_point(|&start| start < byte)
    }

    /// Whether the match at `start..end` (bytes) is not glued to a neighbour
    /// of the same character type. Marks are skipped when looking for the
    /// neighbour.
    fn is_entire_word(&self, start: usize, end: usize) -> bool {
        let text = self.normalized.text.as_str();

        let before = text[..start].chars().rev().find(|&c| !is_combining_mark(c));
        if let (Some(limit), Some(first)) = (before, text[start..end].chars().next()) {
            if character_type(first) == character_type(limit) {
                return false;
            }
        }

        let after = text[end..].chars().find(|&c| !is_combining_mark(c));
        if let (Some(limit), Some(last)) = (after, text[start..end].chars().next_back()) {
            if character_type(last) == character_type(limit) {
                return false;
            }
        }

        true
    }

    fn followed_by_diacritic(&self, end: usize) -> bool {
        self.normalized.text[end..]
            .chars()
            .next()
            .is_some_and(|c| is_combining_mark(c) && !is_diacritic_exception(c))
    }

    /// End of the first phrase that matches at `start` and is not followed by
    /// a significant mark.
    fn fallback_end(&self, query: &CompiledQuery, start: usize) -> Option<usize> {
        let rest = &self.normalized.text[start..];
        query
            .alternatives()
            .iter()
            .filter_map(|alternative| alternative.find(rest))
            .map(|found| start + found.end())
            .find(|&end| end > start && !self.followed_by_diacritic(end))
    }

    /// Find every non-overlapping occurrence of `query`.
    ///
    /// Results are in original text space, ascending and non-overlapping.
    pub fn compute_matches(&self, query: &CompiledQuery, entire_word: bool) -> Vec<PageMatch> {
        let Some(regex) = query.regex() else {
            return Vec::new();
        };
        let text = self.normalized.text.as_str();
        let mut matches: Vec<PageMatch> = Vec::new();
        let mut pos = 0;

        while pos <= text.len() {
            let Some(found) = regex.find_at(text, pos) else {
                break;
            };
            let (start, mut end) = (found.start(), found.end());

            let rejected = start < end
                && query.rejects_trailing_diacritic()
                && self.followed_by_diacritic(end);
            if rejected {
                // A shorter phrase may still match here.
                if let Some(fallback) = self.fallback_end(query, start) {
                    end = fallback;
                }
            }
            if start == end || (rejected && self.followed_by_diacritic(end)) {
                // Retry one character further on.
                pos = text[start..]
                    .chars()
                    .next()
                    .map_or(text.len() + 1, |c| start + c.len_utf8());
                continue;
            }
            pos = end;

            if entire_word && !self.is_entire_word(start, end) {
                continue;
            }

            let char_start = self.char_index(start);
            let char_len = self.char_index(end) - char_start;
            let (offset, length) = self.normalized.diffs.original_span(char_start, char_len);
            if length == 0 {
                continue;
            }
            if matches.last().is_some_and(|prev| offset < prev.end()) {
                log::trace!("Dropping match at {} overlapping the previous one", offset);
                continue;
            }
            matches.push(PageMatch { offset, length });
        }

        matches
    }
}
