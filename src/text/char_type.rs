//! Character classification shared by normalization, query compilation and
//! the entire-word filter.
//!
//! The classes here are deliberately coarse: an entire-word match only needs
//! to know whether two neighbouring characters belong to the same kind of
//! run (latin letters, ideographs, kana, punctuation, ...).

use unicode_normalization::UnicodeNormalization;

/// Combining marks that carry meaning in their script (viramas, Japanese
/// sound marks, Tibetan vowel signs, ...). They are never dropped when
/// diacritics are ignored. Sorted for binary search.
const DIACRITICS_EXCEPTION: &[char] = &[
    '\u{094D}', '\u{09CD}', '\u{0A4D}', '\u{0ACD}', '\u{0B4D}', '\u{0BCD}', '\u{0C4D}', '\u{0C56}',
    '\u{0CCD}', '\u{0D3B}', '\u{0D3C}', '\u{0D4D}', '\u{0DCA}', '\u{0E3A}', '\u{0EBA}', '\u{0F71}',
    '\u{0F72}', '\u{0F74}', '\u{0F7A}', '\u{0F7B}', '\u{0F7C}', '\u{0F7D}', '\u{0F80}', '\u{0F84}',
    '\u{1039}', '\u{103A}', '\u{1714}', '\u{1734}', '\u{17D2}', '\u{1A60}', '\u{1B44}', '\u{1BAA}',
    '\u{1BAB}', '\u{1BF2}', '\u{1BF3}', '\u{2D7F}', '\u{3099}', '\u{309A}', '\u{A806}', '\u{A82C}',
    '\u{A8C4}', '\u{A953}', '\u{A9C0}', '\u{AAF6}', '\u{ABED}',
];

/// Character type used by the entire-word check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharacterType {
    /// ASCII whitespace and no-break space
    Space,
    /// Letters, digits and underscore of alphabetic scripts
    AlphaLetter,
    /// ASCII punctuation and symbols
    Punct,
    /// CJK unified and compatibility ideographs
    HanLetter,
    /// Full-width katakana
    KatakanaLetter,
    /// Hiragana
    HiraganaLetter,
    /// Half-width katakana
    HalfwidthKatakanaLetter,
    /// Thai script
    ThaiLetter,
}

/// Classify a character for word boundary purposes.
pub fn character_type(c: char) -> CharacterType {
    let code = c as u32;
    // Everything below the CJK radicals block is treated as an alphabetic script.
    if code < 0x2E80 {
        if c.is_ascii() {
            if matches!(c, ' ' | '\t' | '\r' | '\n') {
                return CharacterType::Space;
            }
            if c.is_ascii_alphanumeric() || c == '_' {
                return CharacterType::AlphaLetter;
            }
            return CharacterType::Punct;
        }
        if (code & 0xFF80) == 0x0E00 {
            return CharacterType::ThaiLetter;
        }
        if code == 0xA0 {
            return CharacterType::Space;
        }
        return CharacterType::AlphaLetter;
    }

    if is_han(code) {
        CharacterType::HanLetter
    } else if (0x30A0..=0x30FF).contains(&code) {
        CharacterType::KatakanaLetter
    } else if (0x3040..=0x309F).contains(&code) {
        CharacterType::HiraganaLetter
    } else if (0xFF60..=0xFF9F).contains(&code) {
        CharacterType::HalfwidthKatakanaLetter
    } else {
        CharacterType::AlphaLetter
    }
}

fn is_han(code: u32) -> bool {
    (0x3400..=0x9FFF).contains(&code) || (0xF900..=0xFAFF).contains(&code)
}

/// Whether `c` has general category Mark (Mn, Mc, Me).
#[inline]
pub fn is_combining_mark(c: char) -> bool {
    unicode_normalization::char::is_combining_mark(c)
}

/// Whether `c` is a mark that must be preserved even when diacritics are ignored.
#[inline]
pub fn is_diacritic_exception(c: char) -> bool {
    DIACRITICS_EXCEPTION.binary_search(&c).is_ok()
}

/// Japanese voiced and semi-voiced sound marks.
#[inline]
pub fn is_kana_sound_mark(c: char) -> bool {
    matches!(c, '\u{3099}' | '\u{309A}')
}

/// Ideographic characters plus hiragana and katakana.
///
/// A line break after one of these is an artefact of layout, not a word
/// separator, so it is deleted rather than turned into a space.
pub fn is_cjk(c: char) -> bool {
    let code = c as u32;
    matches!(
        code,
        0x3006..=0x3007
            | 0x3021..=0x3029
            | 0x3038..=0x303A
            | 0x3040..=0x30FF
            | 0x3400..=0x4DBF
            | 0x4E00..=0x9FFF
            | 0xF900..=0xFAFF
            | 0x16FE4
            | 0x17000..=0x18CFF
            | 0x18D00..=0x18D08
            | 0x1B170..=0x1B2FB
            | 0x20000..=0x2FA1F
            | 0x30000..=0x323AF
    )
}

/// Whether `c` is changed by compatibility normalization (NFKC).
///
/// Ligatures, full-width letters, super- and subscripts and the no-break
/// space are replaced by their NFKC equivalent so that a query typed with
/// plain characters finds them. Marks are excluded; they are handled by the
/// diacritics rules.
pub fn needs_compatibility_form(c: char) -> bool {
    if c.is_ascii() || is_combining_mark(c) {
        return false;
    }
    let mut nfkc = std::iter::once(c).nfkc();
    !(nfkc.next() == Some(c) && nfkc.next().is_none())
}

/// Compatibility form of a single character.
pub fn compatibility_form(c: char) -> String {
    std::iter::once(c).nfkc().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exception_table_is_sorted() {
        assert!(DIACRITICS_EXCEPTION.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(DIACRITICS_EXCEPTION.len(), 45);
    }

    #[test]
    fn test_diacritic_exception() {
        assert!(is_diacritic_exception('\u{094D}')); // Devanagari virama
        assert!(is_diacritic_exception('\u{3099}'));
        assert!(!is_diacritic_exception('\u{0301}')); // combining acute
    }

    #[test]
    fn test_combining_mark() {
        assert!(is_combining_mark('\u{0301}'));
        assert!(is_combining_mark('\u{094D}'));
        assert!(!is_combining_mark('e'));
        assert!(!is_combining_mark('-'));
    }

    #[test]
    fn test_character_type_ascii() {
        assert_eq!(character_type(' '), CharacterType::Space);
        assert_eq!(character_type('\n'), CharacterType::Space);
        assert_eq!(character_type('a'), CharacterType::AlphaLetter);
        assert_eq!(character_type('Z'), CharacterType::AlphaLetter);
        assert_eq!(character_type('7'), CharacterType::AlphaLetter);
        assert_eq!(character_type('_'), CharacterType::AlphaLetter);
        assert_eq!(character_type('.'), CharacterType::Punct);
        assert_eq!(character_type('-'), CharacterType::Punct);
    }

    #[test]
    fn test_character_type_non_ascii() {
        assert_eq!(character_type('\u{00A0}'), CharacterType::Space);
        assert_eq!(character_type('é'), CharacterType::AlphaLetter);
        assert_eq!(character_type('ж'), CharacterType::AlphaLetter);
        assert_eq!(character_type('ก'), CharacterType::ThaiLetter);
        assert_eq!(character_type('中'), CharacterType::HanLetter);
        assert_eq!(character_type('カ'), CharacterType::KatakanaLetter);
        assert_eq!(character_type('か'), CharacterType::HiraganaLetter);
        assert_eq!(character_type('ｶ'), CharacterType::HalfwidthKatakanaLetter);
        assert_eq!(character_type('한'), CharacterType::AlphaLetter);
    }

    #[test]
    fn test_is_cjk() {
        assert!(is_cjk('中'));
        assert!(is_cjk('か'));
        assert!(is_cjk('カ'));
        assert!(!is_cjk('a'));
        assert!(!is_cjk('한'));
    }

    #[test]
    fn test_needs_compatibility_form() {
        assert!(needs_compatibility_form('\u{FB01}')); // fi ligature
        assert!(needs_compatibility_form('\u{00A0}'));
        assert!(needs_compatibility_form('\u{00B2}')); // superscript two
        assert!(needs_compatibility_form('\u{FF21}')); // full-width A
        assert!(!needs_compatibility_form('a'));
        assert!(!needs_compatibility_form('é'));
        assert!(!needs_compatibility_form('한'));
        assert!(!needs_compatibility_form('\u{0301}'));
    }

    #[test]
    fn test_compatibility_form() {
        assert_eq!(compatibility_form('\u{FB01}'), "fi");
        assert_eq!(compatibility_form('\u{00A0}'), " ");
        assert_eq!(compatibility_form('\u{FF21}'), "A");
    }
}
