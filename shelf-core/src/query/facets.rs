//! Option lists for the search form's select inputs.

use rustc_hash::FxHashSet;
use shelf_types::{Author, Book, FilterField};
use unicode_normalization::UnicodeNormalization;

use super::fields::descriptor;
use crate::analyzer::{list_items, locale_cmp};

/// Every distinct theme across `books`, sorted.
pub fn theme_options<'b>(books: impl IntoIterator<Item = &'b Book>) -> Vec<&'b str> {
    let mut seen = FxHashSet::default();
    let mut out: Vec<&str> = books
        .into_iter()
        .flat_map(|book| list_items(&book.themes))
        .filter(|theme| seen.insert(*theme))
        .collect();
    out.sort_unstable();
    out
}

/// Distinct values of a single-valued column, sorted.
///
/// Values are deduplicated by their composed, trimmed, lower-cased form;
/// the first trimmed spelling seen is the one listed. A blank cell yields
/// an empty option, which the form renders as "any".
pub fn field_options<'b>(
    books: impl IntoIterator<Item = &'b Book>,
    field: FilterField,
) -> Vec<&'b str> {
    let read = descriptor(field).accessor;
    let mut seen: FxHashSet<String> = FxHashSet::default();
    let mut out = Vec::new();

    for book in books {
        let value = read(book).trim();
        let key: String = value.nfc().flat_map(char::to_lowercase).collect();
        if seen.insert(key) {
            out.push(value);
        }
    }

    out.sort_unstable();
    out
}

/// Distinct non-empty author sex values, in first-seen order.
pub fn sex_options(authors: &[Author]) -> Vec<&str> {
    let mut seen = FxHashSet::default();
    authors
        .iter()
        .map(|a| a.sex.as_str())
        .filter(|s| !s.is_empty() && seen.insert(*s))
        .collect()
}

/// Distinct non-empty countries, locale-sorted.
pub fn country_options(authors: &[Author]) -> Vec<&str> {
    let mut seen = FxHashSet::default();
    let mut out: Vec<&str> = authors
        .iter()
        .map(|a| a.country.as_str())
        .filter(|c| !c.is_empty() && seen.insert(*c))
        .collect();
    out.sort_by(|a, b| locale_cmp(a, b));
    out
}
