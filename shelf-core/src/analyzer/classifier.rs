//! Index section classification.

use shelf_types::Bucket;
use unicode_normalization::UnicodeNormalization;

use super::normalizer::is_diacritic;

/// Maps a title or name to its index section.
///
/// Text is composed (NFC) first. Leading punctuation and whitespace are
/// skipped. If the first alphanumeric character is a letter, it is
/// upper-cased: `Ñ` keeps its own section, any other letter is stripped of
/// accents and lands in its A–Z section. Digits-first text, non-Latin scripts and text with no letters
/// go to [`Bucket::OTHER`].
///
/// # Examples
///
/// ```
/// use shelf_core::analyzer::classify;
/// use shelf_types::Bucket;
///
/// assert_eq!(classify("Úrsula").symbol(), "U");
/// assert_eq!(classify("Ñandú"), Bucket::ENYE);
/// assert_eq!(classify("2001: A Space Odyssey"), Bucket::OTHER);
/// ```
pub fn classify(text: &str) -> Bucket {
    let Some(first) = text
        .nfc()
        .find(|&c| c.is_alphanumeric() && !is_diacritic(c))
    else {
        return Bucket::OTHER;
    };

    if !first.is_alphabetic() {
        return Bucket::OTHER;
    }

    let mut upper = first.to_uppercase();
    let (Some(head), None) = (upper.next(), upper.next()) else {
        // Expands on upper-casing (ß -> SS): not a single Latin letter.
        return Bucket::OTHER;
    };

    if head == 'Ñ' {
        return Bucket::ENYE;
    }

    let mut base = core::iter::once(head).nfd().filter(|&c| !is_diacritic(c));
    match (base.next(), base.next()) {
        (Some(letter), None) => Bucket::latin(letter).unwrap_or(Bucket::OTHER),
        _ => Bucket::OTHER,
    }
}
