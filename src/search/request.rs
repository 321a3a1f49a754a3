//! Find requests as sent by the host (find bar, keyboard shortcuts, scripts).

use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

/// What to search for.
///
/// A plain string is searched literally (modulo normalization). A list of
/// phrases matches any of them, longer overlapping phrases winning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Query {
    /// A single literal query
    Text(String),
    /// Any of several phrases
    Phrases(Vec<String>),
}

impl Default for Query {
    fn default() -> Self {
        Query::Text(String::new())
    }
}

impl From<&str> for Query {
    fn from(text: &str) -> Self {
        Query::Text(text.to_string())
    }
}

impl From<String> for Query {
    fn from(text: String) -> Self {
        Query::Text(text)
    }
}

impl From<Vec<String>> for Query {
    fn from(phrases: Vec<String>) -> Self {
        Query::Phrases(phrases)
    }
}

impl Query {
    /// The non-empty search terms of this query.
    pub fn terms(&self) -> Vec<&str> {
        match self {
            Query::Text(text) if text.is_empty() => Vec::new(),
            Query::Text(text) => vec![text.as_str()],
            Query::Phrases(phrases) => phrases
                .iter()
                .map(String::as_str)
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    /// Whether the query has nothing to search for.
    pub fn is_empty(&self) -> bool {
        self.terms().is_empty()
    }
}

/// Explicit operation carried by a request.
///
/// Requests without one are treated as typing in the find field and are
/// debounced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationType {
    /// Find the next (or previous) match of the current query
    Again,
    /// The highlight-all toggle changed
    HighlightAllChange,
    /// The case-sensitivity toggle changed
    CaseSensitivityChange,
    /// The entire-word toggle changed
    EntireWordChange,
    /// The diacritics toggle changed
    DiacriticMatchingChange,
}

impl FromStr for OperationType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "again" => Ok(OperationType::Again),
            "highlightallchange" => Ok(OperationType::HighlightAllChange),
            "casesensitivitychange" => Ok(OperationType::CaseSensitivityChange),
            "entirewordchange" => Ok(OperationType::EntireWordChange),
            "diacriticmatchingchange" => Ok(OperationType::DiacriticMatchingChange),
            other => Err(Error::MalformedQuery(format!("unknown operation type '{}'", other))),
        }
    }
}

/// Hosts send `"type": ""` for plain typing; treat it like a missing type.
fn deserialize_operation<'de, D>(deserializer: D) -> std::result::Result<Option<OperationType>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref() {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// A find request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FindRequest {
    /// Text or phrases to search for
    pub query: Query,
    /// Explicit operation, `None` for typing in the find field
    #[serde(
        rename = "type",
        deserialize_with = "deserialize_operation",
        skip_serializing_if = "Option::is_none"
    )]
    pub operation: Option<OperationType>,
    /// Match letter case exactly
    pub case_sensitive: bool,
    /// Only match whole words
    pub entire_word: bool,
    /// Highlight every match, not just the selected one
    pub highlight_all: bool,
    /// Navigate backwards
    pub find_previous: bool,
    /// Distinguish accented from unaccented letters
    pub match_diacritics: bool,
    /// Removed flag; `false` used to mean "search for any of the words"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phrase_search: Option<bool>,
}

impl FindRequest {
    /// Create a request for `query` with default options.
    pub fn new(query: impl Into<Query>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    /// Decode a request from its JSON form.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set the operation type.
    pub fn with_operation(mut self, operation: OperationType) -> Self {
        self.operation = Some(operation);
        self
    }

    /// Set case sensitivity.
    pub fn with_case_sensitive(mut self, value: bool) -> Self {
        self.case_sensitive = value;
        self
    }

    /// Match whole words only.
    pub fn with_entire_word(mut self, value: bool) -> Self {
        self.entire_word = value;
        self
    }

    /// Highlight all matches.
    pub fn with_highlight_all(mut self, value: bool) -> Self {
        self.highlight_all = value;
        self
    }

    /// Search backwards.
    pub fn with_find_previous(mut self, value: bool) -> Self {
        self.find_previous = value;
        self
    }

    /// Distinguish diacritics.
    pub fn with_match_diacritics(mut self, value: bool) -> Self {
        self.match_diacritics = value;
        self
    }

    /// Rewrite the removed `phraseSearch: false` form into a phrase list.
    ///
    /// Returns the diagnostic to report when a rewrite happened.
    pub(crate) fn coerce_phrase_search(&mut self) -> Option<Error> {
        if self.phrase_search != Some(false) {
            return None;
        }
        self.phrase_search = None;
        if let Query::Text(text) = &self.query {
            let words = text.split_whitespace().map(str::to_string).collect();
            self.query = Query::Phrases(words);
        }
        Some(Error::MalformedQuery(
            "the `phraseSearch` parameter was removed, provide a list of strings in `query` instead"
                .to_string(),
        ))
    }
}
