//! Saga volume ordinals.
//!
//! Volumes carry their position in the title as a parenthesized marker:
//! `"Dune (#2)"`. Only the first well-formed marker counts; a title with
//! none is volume 0 and sorts before every numbered volume.

use memchr::memmem;

const MARKER: &[u8] = b"(#";

/// Extracts the `(#N)` ordinal from a title, or 0 if there is none.
///
/// Overlong numbers saturate at `u64::MAX`.
///
/// # Examples
///
/// ```
/// use shelf_core::grouping::saga_ordinal;
///
/// assert_eq!(saga_ordinal("Dune (#2)"), 2);
/// assert_eq!(saga_ordinal("Dune (#10) (#3)"), 10);
/// assert_eq!(saga_ordinal("Dune"), 0);
/// assert_eq!(saga_ordinal("Dune (#)"), 0);
/// ```
pub fn saga_ordinal(title: &str) -> u64 {
    let bytes = title.as_bytes();

    for start in memmem::find_iter(bytes, MARKER) {
        let digits = &bytes[start + MARKER.len()..];
        let len = digits.iter().take_while(|b| b.is_ascii_digit()).count();
        if len == 0 || digits.get(len) != Some(&b')') {
            continue;
        }
        return digits[..len].iter().fold(0u64, |acc, &d| {
            acc.saturating_mul(10).saturating_add(u64::from(d - b'0'))
        });
    }

    0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_markers() {
        assert_eq!(saga_ordinal("Foo (#1)"), 1);
        assert_eq!(saga_ordinal("Foo (#10)"), 10);
        assert_eq!(saga_ordinal("(#7) Foo"), 7);
        assert_eq!(saga_ordinal("Foo (#007)"), 7);
    }

    #[test]
    fn missing_or_malformed_markers_are_zero() {
        assert_eq!(saga_ordinal(""), 0);
        assert_eq!(saga_ordinal("Foo #3"), 0);
        assert_eq!(saga_ordinal("Foo (3)"), 0);
        assert_eq!(saga_ordinal("Foo (#3"), 0);
        assert_eq!(saga_ordinal("Foo (#3a)"), 0);
        assert_eq!(saga_ordinal("Foo (# 3)"), 0);
    }

    #[test]
    fn first_well_formed_marker_wins() {
        assert_eq!(saga_ordinal("Foo (#x) (#4)"), 4);
        assert_eq!(saga_ordinal("Foo (#(#5)"), 5);
    }

    #[test]
    fn overlong_numbers_saturate() {
        assert_eq!(saga_ordinal("Foo (#99999999999999999999999)"), u64::MAX);
    }

    #[test]
    fn non_ascii_titles() {
        assert_eq!(saga_ordinal("Canción de hielo y fuego (#2)"), 2);
    }
}
