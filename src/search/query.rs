//! Query compilation.
//!
//! A query is normalized with the same rules as page text and then turned
//! into a regular expression over normalized text. The expression tolerates
//! extraction noise: whitespace runs match one or more spaces and punctuation
//! may be padded with spaces. Diacritics are either matched literally or
//! ignored, depending on the request.

use crate::error::Result;
use crate::search::request::Query;
use crate::text::char_type::is_diacritic_exception;
use crate::text::normalize;
use lazy_static::lazy_static;
use regex::{Captures, Regex, RegexBuilder};

lazy_static! {
    /// Regex metacharacters, punctuation, whitespace, marks and letters, in that order.
    static ref SPECIAL_CHARS: Regex =
        Regex::new(r"([.*+?^${}()|\[\]\\])|(\p{P})|(\s+)|(\p{M})|(\p{L})").unwrap();
}

const TRAILING_SPACES: &str = "[ ]*";

/// Matching options that affect the compiled pattern.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchOptions {
    /// Match letter case exactly
    pub case_sensitive: bool,
    /// Distinguish accented from unaccented letters
    pub match_diacritics: bool,
}

/// A query compiled for pages with or without diacritics.
#[derive(Debug, Clone)]
pub struct CompiledQuery {
    regex: Option<Regex>,
    reject_trailing_diacritic: bool,
    /// Each phrase anchored at the start of the haystack, in priority order.
    /// Only built when trailing diacritics are rejected.
    alternatives: Vec<Regex>,
}

impl CompiledQuery {
    /// A query that never matches.
    pub fn empty() -> Self {
        Self {
            regex: None,
            reject_trailing_diacritic: false,
            alternatives: Vec::new(),
        }
    }

    /// The compiled expression, `None` for an empty query.
    pub fn regex(&self) -> Option<&Regex> {
        self.regex.as_ref()
    }

    /// Whether the query matches nothing.
    pub fn is_empty(&self) -> bool {
        self.regex.is_none()
    }

    /// Whether a match directly followed by a combining mark (outside the
    /// exception set) must be rejected.
    ///
    /// Without this, an unaccented query would match the base letter of an
    /// accented one while diacritics are supposed to be significant.
    pub fn rejects_trailing_diacritic(&self) -> bool {
        self.reject_trailing_diacritic
    }

    /// The phrases of a phrase list, each anchored to match only at the
    /// start of the haystack and tried in the same order as the alternation.
    ///
    /// Empty unless [`rejects_trailing_diacritic`](Self::rejects_trailing_diacritic)
    /// holds for a phrase list: when the preferred phrase is rejected, a
    /// lower-priority one may still match at the same position.
    pub fn alternatives(&self) -> &[Regex] {
        &self.alternatives
    }

    /// The pattern source, for diagnostics.
    pub fn as_str(&self) -> &str {
        self.regex.as_ref().map_or("", Regex::as_str)
    }
}

/// Convert one normalized term into a pattern fragment.
fn convert_to_pattern(term: &str, options: MatchOptions, has_diacritics: bool) -> String {
    let converted = SPECIAL_CHARS.replace_all(term, |caps: &Captures| {
        if let Some(meta) = caps.get(1) {
            return format!("[ ]*\\{}[ ]*", meta.as_str());
        }
        if let Some(punct) = caps.get(2) {
            return format!("[ ]*{}[ ]*", regex::escape(punct.as_str()));
        }
        if caps.get(3).is_some() {
            return "[ ]+".to_string();
        }
        if let Some(mark) = caps.get(4) {
            let keep = options.match_diacritics
                || mark.as_str().chars().next().is_some_and(is_diacritic_exception);
            return if keep { mark.as_str().to_string() } else { String::new() };
        }
        let letter = caps.get(5).map_or("", |m| m.as_str());
        if !options.match_diacritics && has_diacritics {
            format!("{}\\p{{M}}*", letter)
        } else {
            letter.to_string()
        }
    });

    let mut pattern = converted.into_owned();
    if pattern.ends_with(TRAILING_SPACES) {
        pattern.truncate(pattern.len() - TRAILING_SPACES.len());
    }
    pattern
}

/// A query normalized once and compiled lazily per diacritics flavour.
#[derive(Debug, Clone)]
pub struct PreparedQuery {
    terms: Vec<String>,
    phrase_list: bool,
    options: MatchOptions,
    compiled: [Option<CompiledQuery>; 2],
}

impl PreparedQuery {
    /// Normalize the terms of `query`.
    pub fn new(query: &Query, options: MatchOptions) -> Self {
        let terms = query
            .terms()
            .into_iter()
            .map(|term| normalize(term).text)
            .collect();
        Self {
            terms,
            phrase_list: matches!(query, Query::Phrases(_)),
            options,
            compiled: [None, None],
        }
    }

    /// Whether there is nothing to search for.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// The normalized search terms.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// The pattern to run against a page, compiling it on first use.
    pub fn pattern(&mut self, has_diacritics: bool) -> Result<&CompiledQuery> {
        let idx = usize::from(has_diacritics);
        let compiled = match self.compiled[idx].take() {
            Some(compiled) => compiled,
            None => self.build(has_diacritics)?,
        };
        Ok(&*self.compiled[idx].insert(compiled))
    }

    fn build(&self, has_diacritics: bool) -> Result<CompiledQuery> {
        let fragments: Vec<String> = if self.phrase_list {
            let mut terms = self.terms.clone();
            terms.sort();
            terms.reverse();
            terms
                .iter()
                .map(|term| convert_to_pattern(term, self.options, has_diacritics))
                .collect()
        } else {
            self.terms
                .first()
                .map(|term| convert_to_pattern(term, self.options, has_diacritics))
                .into_iter()
                .collect()
        };

        if fragments.iter().all(String::is_empty) {
            return Ok(CompiledQuery::empty());
        }

        let source = if self.phrase_list {
            fragments
                .iter()
                .map(|fragment| format!("({})", fragment))
                .collect::<Vec<_>>()
                .join("|")
        } else {
            fragments.concat()
        };

        let regex = RegexBuilder::new(&source)
            .case_insensitive(!self.options.case_sensitive)
            .build()?;
        log::debug!("Compiled search pattern: {}", regex.as_str());

        let reject_trailing_diacritic = self.options.match_diacritics && has_diacritics;
        let mut alternatives = Vec::new();
        if reject_trailing_diacritic && self.phrase_list && fragments.len() > 1 {
            for fragment in fragments.iter().filter(|f| !f.is_empty()) {
                alternatives.push(
                    RegexBuilder::new(&format!(r"\A(?:{})", fragment))
                        .case_insensitive(!self.options.case_sensitive)
                        .build()?,
                );
            }
        }

        Ok(CompiledQuery {
            regex: Some(regex),
            reject_trailing_diacritic,
            alternatives,
        })
    }
}

/// Compile `query` for a page with the given diacritics flag.
pub fn compile(query: &Query, options: MatchOptions, has_diacritics: bool) -> Result<CompiledQuery> {
    let mut prepared = PreparedQuery::new(query, options);
    prepared.pattern(has_diacritics).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(term: &str, options: MatchOptions, has_diacritics: bool) -> String {
        convert_to_pattern(term, options, has_diacritics)
    }

    #[test]
    fn test_plain_letters_pass_through() {
        assert_eq!(pattern("hello", MatchOptions::default(), false), "hello");
    }

    #[test]
    fn test_whitespace_becomes_one_or_more_spaces() {
        assert_eq!(pattern("hello  world", MatchOptions::default(), false), "hello[ ]+world");
    }

    #[test]
    fn test_metacharacters_are_escaped_and_padded() {
        assert_eq!(pattern("a.b", MatchOptions::default(), false), r"a[ ]*\.[ ]*b");
        assert_eq!(pattern("f(x)", MatchOptions::default(), false), r"f[ ]*\([ ]*x[ ]*\)");
    }

    #[test]
    fn test_trailing_padding_is_trimmed() {
        assert_eq!(pattern("end,", MatchOptions::default(), false), "end[ ]*,");
    }

    #[test]
    fn test_letters_tolerate_marks_when_page_has_diacritics() {
        assert_eq!(pattern("ab", MatchOptions::default(), true), r"a\p{M}*b\p{M}*");
    }

    #[test]
    fn test_marks_dropped_unless_exception() {
        let options = MatchOptions::default();
        assert_eq!(pattern("e\u{0301}", options, false), "e");
        assert_eq!(pattern("\u{0915}\u{094D}", options, false), "\u{0915}\u{094D}");
    }

    #[test]
    fn test_marks_kept_when_matching_diacritics() {
        let options = MatchOptions {
            match_diacritics: true,
            ..Default::default()
        };
        assert_eq!(pattern("e\u{0301}", options, true), "e\u{0301}");
    }

    #[test]
    fn test_query_is_normalized_first() {
        let compiled = compile(&Query::from("\u{201C}hi\u{201D}"), MatchOptions::default(), false)
            .unwrap();
        assert!(compiled.regex().unwrap().is_match("say \"hi\""));
    }

    #[test]
    fn test_case_insensitive_by_default() {
        let compiled = compile(&Query::from("hello"), MatchOptions::default(), false).unwrap();
        assert!(compiled.regex().unwrap().is_match("HeLLo"));

        let sensitive = MatchOptions {
            case_sensitive: true,
            ..Default::default()
        };
        let compiled = compile(&Query::from("hello"), sensitive, false).unwrap();
        assert!(!compiled.regex().unwrap().is_match("HeLLo"));
    }

    #[test]
    fn test_phrase_list_longest_first() {
        let query = Query::Phrases(vec!["foo".to_string(), "foo bar".to_string()]);
        let compiled = compile(&query, MatchOptions::default(), false).unwrap();
        assert_eq!(compiled.as_str(), "(foo[ ]+bar)|(foo)");
        let found = compiled.regex().unwrap().find("a foo bar").unwrap();
        assert_eq!(found.as_str(), "foo bar");
    }

    #[test]
    fn test_empty_query_compiles_to_empty_pattern() {
        let compiled = compile(&Query::from(""), MatchOptions::default(), false).unwrap();
        assert!(compiled.is_empty());
        let compiled = compile(&Query::Phrases(Vec::new()), MatchOptions::default(), true).unwrap();
        assert!(compiled.is_empty());
    }

    #[test]
    fn test_query_of_dropped_marks_is_empty() {
        let compiled = compile(&Query::from("\u{0301}"), MatchOptions::default(), false).unwrap();
        assert!(compiled.is_empty());
    }

    #[test]
    fn test_trailing_diacritic_rejection_flag() {
        let options = MatchOptions {
            match_diacritics: true,
            ..Default::default()
        };
        assert!(compile(&Query::from("cafe"), options, true)
            .unwrap()
            .rejects_trailing_diacritic());
        assert!(!compile(&Query::from("cafe"), options, false)
            .unwrap()
            .rejects_trailing_diacritic());
        assert!(!compile(&Query::from("cafe"), MatchOptions::default(), true)
            .unwrap()
            .rejects_trailing_diacritic());
    }

    #[test]
    fn test_phrase_alternatives_follow_alternation_order() {
        let options = MatchOptions {
            match_diacritics: true,
            ..Default::default()
        };
        let query = Query::Phrases(vec!["caf".to_string(), "cafe".to_string()]);
        let compiled = compile(&query, options, true).unwrap();
        assert_eq!(compiled.as_str(), "(cafe)|(caf)");
        let sources: Vec<&str> = compiled.alternatives().iter().map(Regex::as_str).collect();
        assert_eq!(sources, vec![r"\A(?:cafe)", r"\A(?:caf)"]);

        // Not needed when marks are ignored or the page has none.
        assert!(compile(&query, options, false).unwrap().alternatives().is_empty());
        assert!(compile(&query, MatchOptions::default(), true)
            .unwrap()
            .alternatives()
            .is_empty());
    }

    #[test]
    fn test_prepared_query_caches_per_flavour() {
        let mut prepared = PreparedQuery::new(&Query::from("ab"), MatchOptions::default());
        assert_eq!(prepared.pattern(false).unwrap().as_str(), "ab");
        assert_eq!(prepared.pattern(true).unwrap().as_str(), r"a\p{M}*b\p{M}*");
        assert_eq!(prepared.terms(), &["ab".to_string()]);
    }
}
