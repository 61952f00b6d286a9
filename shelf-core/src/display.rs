//! Presentation helpers shared by the table and index views.

use std::borrow::Cow;

use shelf_types::Book;

/// Renders a publication year for display.
///
/// A leading `-` marks a year before the common era; leading zeros are
/// padding and dropped.
///
/// # Examples
///
/// ```
/// use shelf_core::display::format_year;
///
/// assert_eq!(format_year("-700"), "700 a. C.");
/// assert_eq!(format_year("0800"), "800");
/// assert_eq!(format_year("1963"), "1963");
/// ```
pub fn format_year(year: &str) -> Cow<'_, str> {
    if let Some(bce) = year.strip_prefix('-') {
        return Cow::Owned(format!("{bce} a. C."));
    }
    if year.starts_with('0') {
        let stripped = year.trim_start_matches('0');
        return Cow::Borrowed(if stripped.is_empty() { "0" } else { stripped });
    }
    Cow::Borrowed(year)
}

/// Colour family of a book type in the results table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeFamily {
    /// Novels, stories, poetry, drama and dialogues.
    Narrative,
    /// Essays, reference works, biographies and diaries.
    NonFiction,
    /// Manga, comics and art books.
    Graphic,
}

impl TypeFamily {
    /// Family of an exact type name, if it has one.
    pub fn of(kind: &str) -> Option<Self> {
        match kind {
            "Novela" | "Cuento" | "Poesía" | "Teatro" | "Diálogo" => Some(TypeFamily::Narrative),
            "Ensayo" | "Consulta" | "Biografía" | "Diario" => Some(TypeFamily::NonFiction),
            "Manga" | "Cómic" | "Arte" => Some(TypeFamily::Graphic),
            _ => None,
        }
    }

    /// Style class of the type badge.
    pub const fn css_class(self) -> &'static str {
        match self {
            TypeFamily::Narrative => "estilo_tipo_morado",
            TypeFamily::NonFiction => "estilo_tipo_azul",
            TypeFamily::Graphic => "estilo_tipo_verde",
        }
    }
}

/// `"1 resultado"`, `"N resultados"`.
pub fn result_count_label(count: usize) -> String {
    if count == 1 {
        "1 resultado".to_owned()
    } else {
        format!("{count} resultados")
    }
}

/// The index's `(en inglés)` note for books not in `home_language`.
pub fn language_note(book: &Book, home_language: &str) -> Option<String> {
    (book.language != home_language).then(|| format!("(en {})", book.language.to_lowercase()))
}
