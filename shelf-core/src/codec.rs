//! Query-string codec for the search form.
//!
//! ```text
//! FilterState { title: "cien años", themes: ["Drama", "Historia"], .. }
//!     <-> t%C3%ADtulo=cien%20a%C3%B1os&temas=Drama,Historia
//! ```
//!
//! Keys and values are percent-encoded; themes are comma-joined under one
//! key. Fields are written in canonical order and empty fields are left
//! out, so an empty state encodes to the empty string.
//!
//! Decoding is lenient: unknown keys, pairs without `=` and malformed
//! escapes are tolerated, never rejected.

use std::borrow::Cow;

use shelf_types::{FilterField, FilterState, FilterValue, ViewMode};

/// Query key selecting the index view mode.
pub const VIEW_KEY: &str = "vista";

/// Decodes one `application/x-www-form-urlencoded` component.
///
/// `+` is a space. Escapes that do not form UTF-8 are replaced with U+FFFD.
fn decode_component(raw: &str) -> Cow<'_, str> {
    let spaced: Cow<'_, str> = if raw.contains('+') {
        Cow::Owned(raw.replace('+', " "))
    } else {
        Cow::Borrowed(raw)
    };

    if !spaced.contains('%') {
        return spaced;
    }
    match urlencoding::decode(&spaced) {
        Ok(decoded) => Cow::Owned(decoded.into_owned()),
        Err(_) => {
            let bytes = urlencoding::decode_binary(spaced.as_bytes());
            Cow::Owned(String::from_utf8_lossy(&bytes).into_owned())
        }
    }
}

/// Iterates decoded `(key, value)` pairs. A leading `?` is ignored.
pub fn pairs(query: &str) -> impl Iterator<Item = (Cow<'_, str>, Cow<'_, str>)> {
    let query = query.strip_prefix('?').unwrap_or(query);
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode_component(key), decode_component(value))
        })
}

/// Decodes a query string into a filter state.
///
/// Only recognized keys are applied and only their first occurrence
/// counts. Blank values leave the field empty; themes are comma-split and
/// trimmed.
///
/// # Examples
///
/// ```
/// use shelf_core::codec::decode;
///
/// let state = decode("?autor=Borges&temas=Drama,+Historia&orden=desc");
/// assert_eq!(state.author, "Borges");
/// assert_eq!(state.themes, vec!["Drama", "Historia"]);
/// ```
pub fn decode(query: &str) -> FilterState {
    let mut state = FilterState::new();
    let mut seen = [false; FilterField::ALL.len()];

    for (key, value) in pairs(query) {
        let Some(field) = FilterField::from_key(&key) else {
            continue;
        };
        if std::mem::replace(&mut seen[field as usize], true) {
            continue;
        }
        if value.trim().is_empty() {
            continue;
        }
        state.set(field, value.into_owned());
    }

    state
}

/// Encodes a filter state as a query string, without the leading `?`.
///
/// # Examples
///
/// ```
/// use shelf_core::codec::encode;
/// use shelf_types::{FilterField, FilterState};
///
/// let mut state = FilterState::new();
/// assert_eq!(encode(&state), "");
///
/// state.set(FilterField::Year, "198");
/// state.set(FilterField::Themes, "Drama,Historia");
/// assert_eq!(encode(&state), "publicaci%C3%B3n=198&temas=Drama,Historia");
/// ```
pub fn encode(state: &FilterState) -> String {
    let mut out = String::new();

    for field in FilterField::ALL {
        let value = match field {
            FilterField::Themes => {
                if state.themes.is_empty() {
                    continue;
                }
                state
                    .themes
                    .iter()
                    .map(|t| urlencoding::encode(t))
                    .collect::<Vec<_>>()
                    .join(",")
            }
            _ => {
                let text = match state.get(field) {
                    FilterValue::Text(text) => text,
                    FilterValue::List(_) => continue,
                };
                if text.trim().is_empty() {
                    continue;
                }
                urlencoding::encode(text).into_owned()
            }
        };

        if !out.is_empty() {
            out.push('&');
        }
        out.push_str(&urlencoding::encode(field.key()));
        out.push('=');
        out.push_str(&value);
    }

    out
}

/// Canonical form of a query string: `encode(decode(query))`.
///
/// Two queries that decode to the same state normalize identically, which
/// is how redundant address-bar writes are detected.
#[inline]
pub fn normalize_query(query: &str) -> String {
    encode(&decode(query))
}

/// Reads the index view mode. A missing or unknown value is by-work.
pub fn decode_view(query: &str) -> ViewMode {
    pairs(query)
        .find(|(key, _)| key == VIEW_KEY)
        .map_or(ViewMode::ByWork, |(_, value)| ViewMode::parse(&value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_state() -> FilterState {
        FilterState {
            title: "cien años".into(),
            author: "García Márquez".into(),
            year: "-5".into(),
            kind: "Novela".into(),
            themes: vec!["Realismo mágico".into(), "Drama".into()],
            language: "Español".into(),
            original: "Español".into(),
            saga: "a&b=c".into(),
            edited: "true".into(),
            sex: "Hombre".into(),
            country: "Colombia".into(),
        }
    }

    #[test]
    fn empty_state_encodes_to_empty_string() {
        assert_eq!(encode(&FilterState::new()), "");
        assert_eq!(decode(""), FilterState::new());
        assert_eq!(decode("?"), FilterState::new());
    }

    #[test]
    fn round_trip_full_state() {
        let state = full_state();
        assert_eq!(decode(&encode(&state)), state);
    }

    #[test]
    fn round_trip_single_fields() {
        for field in FilterField::ALL {
            let mut state = FilterState::new();
            state.set(field, "Ciencia ficción, Humor");
            assert_eq!(decode(&encode(&state)), state, "field {field}");
        }
    }

    #[test]
    fn canonical_key_order() {
        let mut state = FilterState::new();
        state.set(FilterField::AuthorCountry, "Chile");
        state.set(FilterField::Title, "Sol");
        state.set(FilterField::Kind, "Poesía");
        assert_eq!(encode(&state), "t%C3%ADtulo=Sol&tipo=Poes%C3%ADa&pa%C3%ADs=Chile");
    }

    #[test]
    fn blank_fields_are_omitted() {
        let mut state = FilterState::new();
        state.title = "   ".into();
        state.set(FilterField::Saga, "Dune");
        assert_eq!(encode(&state), "saga=Dune");
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let state = decode("orden=desc&T%C3%ADtulo=x&tipo=Ensayo&&=oops&solo");
        let mut expected = FilterState::new();
        expected.set(FilterField::Kind, "Ensayo");
        assert_eq!(state, expected);
    }

    #[test]
    fn unencoded_keys_and_plus_spaces() {
        let state = decode("título=el+túnel&país=Perú");
        assert_eq!(state.title, "el túnel");
        assert_eq!(state.country, "Perú");
    }

    #[test]
    fn first_occurrence_wins() {
        assert_eq!(decode("autor=A&autor=B").author, "A");
        assert_eq!(decode("autor=&autor=B").author, "");
    }

    #[test]
    fn blank_values_stay_empty() {
        let state = decode("autor=%20%20&temas=,+,");
        assert!(state.is_empty());
    }

    #[test]
    fn malformed_escapes_do_not_fail() {
        assert_eq!(decode("saga=100%25").saga, "100%");
        assert_eq!(decode("saga=%FF%FEx").saga, "\u{FFFD}\u{FFFD}x");
        assert_eq!(decode("saga=50%").saga, "50%");
    }

    #[test]
    fn themes_accept_encoded_commas() {
        let state = decode("temas=Drama%2CHistoria");
        assert_eq!(state.themes, vec!["Drama", "Historia"]);
        assert_eq!(encode(&state), "temas=Drama,Historia");
    }

    #[test]
    fn normalization_is_canonical() {
        let q = "tipo=Novela&utm=1&t%C3%ADtulo=Sol";
        assert_eq!(normalize_query(q), "t%C3%ADtulo=Sol&tipo=Novela");
        assert_eq!(normalize_query(&normalize_query(q)), normalize_query(q));
    }

    #[test]
    fn view_mode_param() {
        assert_eq!(decode_view("vista=autor"), ViewMode::ByAuthor);
        assert_eq!(decode_view("?vista=obra"), ViewMode::ByWork);
        assert_eq!(decode_view("vista=autores"), ViewMode::ByWork);
        assert_eq!(decode_view(""), ViewMode::ByWork);
    }
}
