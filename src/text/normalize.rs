//! Search-text normalization with reversible offsets.
//!
//! Extracted page text is rewritten into a canonical form before matching:
//! characters are canonically decomposed, typographic quotes and fraction
//! glyphs are replaced, compatibility characters take their NFKC form, and
//! line breaks are either joined away or turned into spaces. Every output
//! character remembers the original character it came from, which yields a
//! [`DiffTable`] for mapping match positions back to the extracted text.
//!
//! # Offsets
//!
//! Offsets are counted in `char`s. Line feeds mark the end of a text item and
//! occupy no width in original space: `"a\nb"` normalizes to `"a b"` and the
//! `b` is at original offset 1.
//!
//! # Example
//!
//! ```
//! use pdf_find::text::normalize;
//!
//! let normalized = normalize("½ cup");
//! assert_eq!(normalized.text, "1/2 cup");
//! assert_eq!(normalized.diffs.original_span(4, 3), (2, 3));
//! ```

use super::char_type::{
    compatibility_form, is_cjk, is_combining_mark, is_kana_sound_mark, needs_compatibility_form,
};
use super::diff::DiffTable;
use unicode_normalization::UnicodeNormalization;

/// Text in canonical search form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NormalizedText {
    /// The normalized text.
    pub text: String,
    /// Mapping from offsets in `text` back to the raw text.
    pub diffs: DiffTable,
    /// Whether the text contains combining marks.
    pub has_diacritics: bool,
}

impl NormalizedText {
    /// Normalized text of an empty page.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Fixed replacements applied before anything else.
fn substitution(c: char) -> Option<&'static str> {
    let replacement = match c {
        '\u{2010}' => "-",
        '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{201B}' => "'",
        '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{201F}' => "\"",
        '\u{00BC}' => "1/4",
        '\u{00BD}' => "1/2",
        '\u{00BE}' => "3/4",
        _ => return None,
    };
    Some(replacement)
}

/// Whether `c` can be copied through unchanged with no further inspection.
#[inline]
fn is_plain(c: char) -> bool {
    c.is_ascii() && c != '\n'
}

/// Canonically decompose `raw`, pairing each character with its original offset.
fn decompose(raw: &str) -> Vec<(char, usize)> {
    let mut decomposed = Vec::with_capacity(raw.len());
    let mut origin = 0;
    for c in raw.chars() {
        if c == '\n' {
            decomposed.push((c, origin));
            continue;
        }
        if is_plain(c) {
            decomposed.push((c, origin));
        } else {
            decomposed.extend(std::iter::once(c).nfd().map(|d| (d, origin)));
        }
        origin += 1;
    }
    decomposed
}

/// Convert raw page text into its canonical search form.
///
/// Rules, first match wins at each position:
///
/// 1. quote, hyphen and fraction substitutions
/// 2. compatibility characters take their NFKC form
/// 3. a Japanese sound mark before a line break swallows the break
/// 4. runs of combining marks are kept (and swallow a following `-\n`)
/// 5. a non-space character followed by `-\n` swallows both
/// 6. a CJK character before a line break swallows the break
/// 7. any other line break becomes a space
///
/// Hangul syllables are split into jamo by the canonical decomposition; each
/// jamo maps back to its syllable.
pub fn normalize(raw: &str) -> NormalizedText {
    if raw.chars().all(is_plain) {
        return NormalizedText {
            text: raw.to_string(),
            diffs: DiffTable::identity(),
            has_diacritics: false,
        };
    }

    let src = decompose(raw);
    let at = |i: usize| src.get(i).map(|&(c, _)| c);

    let mut out: Vec<(char, usize)> = Vec::with_capacity(src.len());
    let mut has_diacritics = false;
    let mut i = 0;

    while i < src.len() {
        let (c, origin) = src[i];

        if let Some(replacement) = substitution(c) {
            out.extend(replacement.chars().map(|r| (r, origin)));
            i += 1;
            continue;
        }

        if needs_compatibility_form(c) {
            out.extend(compatibility_form(c).chars().map(|r| (r, origin)));
            i += 1;
            continue;
        }

        if is_kana_sound_mark(c) && at(i + 1) == Some('\n') {
            has_diacritics = true;
            out.push((c, origin));
            i += 2;
            continue;
        }

        if is_combining_mark(c) {
            has_diacritics = true;
            while let Some(&(mark, mark_origin)) = src.get(i) {
                if !is_combining_mark(mark) {
                    break;
                }
                out.push((mark, mark_origin));
                i += 1;
            }
            if at(i) == Some('-') && at(i + 1) == Some('\n') {
                i += 2;
            }
            continue;
        }

        if !c.is_whitespace() && at(i + 1) == Some('-') && at(i + 2) == Some('\n') {
            out.push((c, origin));
            i += 3;
            continue;
        }

        if is_cjk(c) && at(i + 1) == Some('\n') {
            out.push((c, origin));
            i += 2;
            continue;
        }

        if c == '\n' {
            out.push((' ', origin));
        } else {
            out.push((c, origin));
        }
        i += 1;
    }

    NormalizedText {
        text: out.iter().map(|&(c, _)| c).collect(),
        diffs: DiffTable::from_origins(out.iter().map(|&(_, origin)| origin)),
        has_diacritics,
    }
}
