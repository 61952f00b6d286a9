//! Locale-aware string comparison.
//!
//! Approximates a Spanish collation in three levels:
//!
//! 1. **Primary**: base characters. Whitespace < punctuation < symbols <
//!    digits < letters; `ñ` is its own letter between `n` and `o`.
//! 2. **Secondary**: accents, only consulted when primaries tie.
//! 3. **Tertiary**: case, lowercase before uppercase.
//!
//! Strings equal on all three levels compare [`Ordering::Equal`], so a
//! stable sort keeps their input order.

use core::cmp::Ordering;

use smallvec::SmallVec;
use unicode_normalization::UnicodeNormalization;

use super::normalizer::is_diacritic;

const CLASS_SPACE: u32 = 1 << 24;
const CLASS_PUNCT: u32 = 2 << 24;
const CLASS_SYMBOL: u32 = 3 << 24;
const CLASS_DIGIT: u32 = 4 << 24;
const CLASS_LETTER: u32 = 5 << 24;

/// Weight of a non-Latin letter starts after the 27 Latin slots.
const NON_LATIN_BASE: u32 = 0x100;

const COMBINING_TILDE: char = '\u{0303}';

#[derive(Default)]
struct CollationKey {
    primary: SmallVec<[u32; 32]>,
    secondary: SmallVec<[u32; 32]>,
    tertiary: SmallVec<[u8; 32]>,
}

impl CollationKey {
    fn build(s: &str) -> Self {
        let mut key = CollationKey::default();

        for ch in s.nfd() {
            if is_diacritic(ch) && !key.primary.is_empty() {
                let last = key.primary.len() - 1;
                if ch == COMBINING_TILDE && key.primary[last] == letter_weight('n') {
                    key.primary[last] = enye_weight();
                } else {
                    key.secondary[last] = key.secondary[last].wrapping_add(ch as u32);
                }
                continue;
            }

            key.primary.push(primary_weight(ch));
            key.secondary.push(0);
            key.tertiary.push(u8::from(ch.is_uppercase()));
        }

        key
    }
}

#[inline]
fn letter_weight(lower: char) -> u32 {
    CLASS_LETTER | ((lower as u32 - 'a' as u32) * 2)
}

#[inline]
fn enye_weight() -> u32 {
    letter_weight('n') + 1
}

fn primary_weight(ch: char) -> u32 {
    if ch.is_whitespace() {
        return CLASS_SPACE | ch as u32;
    }
    if let Some(d) = ch.to_digit(10) {
        return CLASS_DIGIT | d;
    }
    if ch.is_alphabetic() {
        let lower = ch.to_lowercase().next().unwrap_or(ch);
        if lower.is_ascii_lowercase() {
            return letter_weight(lower);
        }
        if lower == 'ñ' {
            return enye_weight();
        }
        return CLASS_LETTER | (NON_LATIN_BASE + lower as u32);
    }
    if ch.is_ascii_punctuation() && !matches!(ch, '$' | '+' | '<' | '=' | '>' | '^' | '`' | '|' | '~')
    {
        return CLASS_PUNCT | ch as u32;
    }
    if matches!(ch, '¡' | '¿' | '«' | '»' | '—' | '–' | '…' | '“' | '”' | '‘' | '’') {
        return CLASS_PUNCT | ch as u32;
    }
    CLASS_SYMBOL | ch as u32
}

/// Compares two strings the way a Spanish-locale `localeCompare` would.
///
/// # Examples
///
/// ```
/// use core::cmp::Ordering;
/// use shelf_core::analyzer::locale_cmp;
///
/// assert_eq!(locale_cmp("nube", "ñu"), Ordering::Less);
/// assert_eq!(locale_cmp("ñu", "oso"), Ordering::Less);
/// assert_eq!(locale_cmp("Ávila", "avila"), Ordering::Greater);
/// ```
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }

    let ka = CollationKey::build(a);
    let kb = CollationKey::build(b);

    ka.primary
        .cmp(&kb.primary)
        .then_with(|| ka.secondary.cmp(&kb.secondary))
        .then_with(|| ka.tertiary.cmp(&kb.tertiary))
}
