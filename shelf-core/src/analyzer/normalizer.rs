use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Configuration options for text normalization.
#[derive(Clone, Copy, Debug)]
pub struct NormalizerConfig {
    /// When enabled, decomposes text and drops diacritical marks.
    /// For example, "Canción" becomes "cancion".
    pub strip_diacritics: bool,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            strip_diacritics: true,
        }
    }
}

/// Case and diacritic folding for comparisons and sort keys.
///
/// Performs the following operations:
/// - Decomposes text (NFD) and removes diacritical marks, when enabled
/// - Converts all characters to lowercase (Unicode-aware)
///
/// ASCII input takes a byte-wise fast path; anything else goes through the
/// full Unicode pipeline.
///
/// # Examples
///
/// ```
/// use shelf_core::analyzer::TextNormalizer;
///
/// let normalizer = TextNormalizer::default();
/// assert_eq!(normalizer.normalize("Canción"), "cancion");
/// assert_eq!(normalizer.sort_key("¡El Aleph!"), "elaleph");
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct TextNormalizer {
    config: NormalizerConfig,
}

impl TextNormalizer {
    /// Creates a new normalizer with the specified configuration.
    pub const fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    /// Lower-casing only. Accents are kept, so "é" and "e" stay distinct.
    pub const fn case_only() -> Self {
        Self::new(NormalizerConfig {
            strip_diacritics: false,
        })
    }

    /// Normalizes text into an existing String buffer.
    ///
    /// Clears the buffer before writing and reuses its capacity.
    pub fn normalize_into(&self, input: &str, out: &mut String) {
        out.clear();
        out.reserve(input.len());

        if input.is_ascii() {
            let strip = self.config.strip_diacritics;
            out.extend(
                input
                    .bytes()
                    .filter(|&b| !(strip && matches!(b, b'^' | b'`')))
                    .map(|b| b.to_ascii_lowercase() as char),
            );
            return;
        }

        if self.config.strip_diacritics {
            for ch in input.nfd() {
                if is_diacritic(ch) {
                    continue;
                }
                out.extend(ch.to_lowercase());
            }
        } else {
            for ch in input.chars() {
                out.extend(ch.to_lowercase());
            }
        }
    }

    /// Normalizes text and returns a new String.
    #[inline]
    pub fn normalize(&self, input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        self.normalize_into(input, &mut out);
        out
    }

    /// Builds the ordering key for `input` into `out`.
    ///
    /// The key is the normalized text with everything but ASCII letters,
    /// digits and `ñ` removed.
    pub fn sort_key_into(&self, input: &str, out: &mut String) {
        self.normalize_into(input, out);
        out.retain(is_key_char);
    }

    /// Builds the ordering key for `input`.
    #[inline]
    pub fn sort_key(&self, input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        self.sort_key_into(input, &mut out);
        out
    }

    /// Returns `true` if `a` and `b` normalize to the same text.
    pub fn same(&self, a: &str, b: &str) -> bool {
        self.normalize(a) == self.normalize(b)
    }
}

/// Folds `input` with the default (diacritic-stripping) normalizer.
#[inline]
pub fn normalize(input: &str) -> String {
    TextNormalizer::default().normalize(input)
}

/// Sort key of `input` with the default normalizer.
#[inline]
pub fn sort_key(input: &str) -> String {
    TextNormalizer::default().sort_key(input)
}

#[inline(always)]
fn is_key_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == 'ñ'
}

/// Combining marks plus the spacing accents that survive decomposition.
#[inline]
pub(crate) fn is_diacritic(c: char) -> bool {
    if is_combining_mark(c) {
        return true;
    }
    matches!(
        c,
        '^' | '`' | '\u{00A8}' | '\u{00AF}' | '\u{00B4}' | '\u{00B7}' | '\u{00B8}'
            | '\u{02B0}'..='\u{02FF}'
    )
}
