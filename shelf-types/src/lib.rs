//! Core types for the Shelf catalog engine.
//!
//! This crate holds the records and value types shared by the engine and
//! its front-ends. Keeping them separate ensures:
//!
//! - **Stable wire shape**: the JSON column names of the exported dataset
//!   live in exactly one place
//! - **Cross-crate compatibility**: core and CLI share the same types
//! - **Clean boundaries**: no engine logic leaks into the data model

#![warn(missing_docs)]

use core::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// A single catalog entry as exported from the spreadsheet.
///
/// Every field is a string. Missing, `null`, boolean and numeric cells are
/// coerced on load (see [`lenient_string`]) so a sparse export never fails
/// to deserialize.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Display title. Saga volumes carry a `(#N)` ordinal marker.
    #[serde(rename = "Título", default, deserialize_with = "lenient_string")]
    pub title: String,
    /// One or more authors, comma-joined.
    #[serde(rename = "Autor", default, deserialize_with = "lenient_string")]
    pub author: String,
    /// Publication year. A leading `-` marks BCE, a leading zero pads
    /// early years.
    #[serde(rename = "Publicación", default, deserialize_with = "lenient_string")]
    pub year: String,
    /// Category ("Novela", "Ensayo", ...).
    #[serde(rename = "Tipo", default, deserialize_with = "lenient_string")]
    pub kind: String,
    /// Zero or more comma-joined themes.
    #[serde(rename = "Tema", default, deserialize_with = "lenient_string")]
    pub themes: String,
    /// Language of this edition.
    #[serde(rename = "Idioma", default, deserialize_with = "lenient_string")]
    pub language: String,
    /// Original language of the work.
    #[serde(rename = "Original", default, deserialize_with = "lenient_string")]
    pub original: String,
    /// Saga name, empty for standalone works.
    #[serde(rename = "Saga", default, deserialize_with = "lenient_string")]
    pub saga: String,
    /// Free-form note about other editions.
    #[serde(rename = "Otros", default, deserialize_with = "lenient_string")]
    pub other_editions: String,
    /// Upload date, encoded as `Date(Y,M,D)` with a zero-based month.
    #[serde(rename = "Subido", default, deserialize_with = "lenient_string")]
    pub uploaded: String,
    /// File format of the uploaded copy.
    #[serde(rename = "Formato", default, deserialize_with = "lenient_string")]
    pub format: String,
    /// Boolean-as-string flag for in-house editions.
    #[serde(rename = "Editado", default, deserialize_with = "lenient_string")]
    pub edited: String,
    /// External link to the copy.
    #[serde(rename = "Enlace", default, deserialize_with = "lenient_string")]
    pub link: String,
    /// Stable identifier. Records without one cannot be reported.
    #[serde(rename = "ID", default, deserialize_with = "lenient_string")]
    pub id: String,
}

impl Book {
    /// Returns `true` if the book belongs to a saga.
    #[inline]
    pub fn in_saga(&self) -> bool {
        !self.saga.is_empty()
    }

    /// Returns `true` if the book is flagged as an in-house edition.
    #[inline]
    pub fn is_edited(&self) -> bool {
        !self.edited.is_empty()
    }
}

/// An author record, joined to books by case-insensitive name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Full name as it appears in the book's author list.
    #[serde(rename = "Nombre", default, deserialize_with = "lenient_string")]
    pub name: String,
    /// Sex category.
    #[serde(rename = "Sexo", default, deserialize_with = "lenient_string")]
    pub sex: String,
    /// Country of birth.
    #[serde(rename = "País", default, deserialize_with = "lenient_string")]
    pub country: String,
}

/// Deserializes any scalar JSON cell into a `String`.
///
/// - strings pass through
/// - `true` becomes `"true"`, `false` and `null` become `""`
/// - numbers use their decimal text (`2001.0` becomes `"2001"`)
///
/// Arrays and objects are rejected.
pub fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(LenientVisitor)
}

struct LenientVisitor;

impl<'de> serde::de::Visitor<'de> for LenientVisitor {
    type Value = String;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string, number, boolean or null")
    }

    fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<String, E> {
        Ok(v.to_owned())
    }

    fn visit_string<E: serde::de::Error>(self, v: String) -> Result<String, E> {
        Ok(v)
    }

    fn visit_bool<E: serde::de::Error>(self, v: bool) -> Result<String, E> {
        Ok(if v { "true".to_owned() } else { String::new() })
    }

    fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_f64<E: serde::de::Error>(self, v: f64) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_unit<E: serde::de::Error>(self) -> Result<String, E> {
        Ok(String::new())
    }

    fn visit_none<E: serde::de::Error>(self) -> Result<String, E> {
        Ok(String::new())
    }

    fn visit_some<D>(self, deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }
}

/// A constrainable field of the search form.
///
/// This is the descriptor table's key: the engine maps every variant to a
/// book accessor and a match rule, and the URL codec maps it to a query key.
/// Variants are listed in canonical query-string order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FilterField {
    /// Case-insensitive substring on the title.
    Title = 0,
    /// Case-insensitive substring on the author list.
    Author = 1,
    /// Raw substring on the publication year.
    Year = 2,
    /// Exact category.
    Kind = 3,
    /// Every selected theme must be present.
    Themes = 4,
    /// Exact language.
    Language = 5,
    /// Exact original language.
    Original = 6,
    /// Case-insensitive substring on the saga.
    Saga = 7,
    /// Exact edited flag.
    Edited = 8,
    /// Some joined author has this sex.
    AuthorSex = 9,
    /// Some joined author was born in this country.
    AuthorCountry = 10,
}

impl FilterField {
    /// All fields in canonical order.
    pub const ALL: [FilterField; 11] = [
        FilterField::Title,
        FilterField::Author,
        FilterField::Year,
        FilterField::Kind,
        FilterField::Themes,
        FilterField::Language,
        FilterField::Original,
        FilterField::Saga,
        FilterField::Edited,
        FilterField::AuthorSex,
        FilterField::AuthorCountry,
    ];

    /// Query-string key. Keys are case-sensitive.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            FilterField::Title => "título",
            FilterField::Author => "autor",
            FilterField::Year => "publicación",
            FilterField::Kind => "tipo",
            FilterField::Themes => "temas",
            FilterField::Language => "idioma",
            FilterField::Original => "original",
            FilterField::Saga => "saga",
            FilterField::Edited => "editado",
            FilterField::AuthorSex => "sexo",
            FilterField::AuthorCountry => "país",
        }
    }

    /// Looks a field up by its query-string key.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.key() == key)
    }

    /// Returns `true` for the multi-valued theme field.
    #[inline(always)]
    #[must_use]
    pub const fn is_multi(self) -> bool {
        matches!(self, FilterField::Themes)
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Borrowed view of one filter constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterValue<'a> {
    /// Single-valued constraint. Empty means unconstrained.
    Text(&'a str),
    /// Multi-valued constraint. Empty means unconstrained.
    List(&'a [String]),
}

impl FilterValue<'_> {
    /// Returns `true` if this constraint restricts the result set.
    #[inline]
    pub fn is_active(&self) -> bool {
        match self {
            FilterValue::Text(s) => !s.is_empty(),
            FilterValue::List(l) => !l.is_empty(),
        }
    }
}

/// Complete set of search constraints.
///
/// Every field defaults to empty, which imposes no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    /// Title substring.
    pub title: String,
    /// Author substring.
    pub author: String,
    /// Year substring.
    pub year: String,
    /// Exact category.
    pub kind: String,
    /// Required themes (AND).
    pub themes: Vec<String>,
    /// Exact language.
    pub language: String,
    /// Exact original language.
    pub original: String,
    /// Saga substring.
    pub saga: String,
    /// Exact edited flag.
    pub edited: String,
    /// Author sex.
    pub sex: String,
    /// Author country.
    pub country: String,
}

impl FilterState {
    /// Creates an empty filter state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the constraint for `field`.
    pub fn get(&self, field: FilterField) -> FilterValue<'_> {
        match field {
            FilterField::Themes => FilterValue::List(&self.themes),
            _ => FilterValue::Text(self.text_slot(field)),
        }
    }

    /// Sets a single-valued constraint. Setting [`FilterField::Themes`]
    /// replaces the theme list with the comma-split, trimmed value.
    pub fn set(&mut self, field: FilterField, value: impl Into<String>) {
        let value = value.into();
        match field {
            FilterField::Themes => {
                self.themes = value
                    .split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(str::to_owned)
                    .collect();
            }
            _ => {
                if let Some(slot) = self.text_slot_mut(field) {
                    *slot = value;
                }
            }
        }
    }

    /// Selects `theme` if absent, deselects it otherwise.
    pub fn toggle_theme(&mut self, theme: &str) {
        if let Some(pos) = self.themes.iter().position(|t| t == theme) {
            self.themes.remove(pos);
        } else {
            self.themes.push(theme.to_owned());
        }
    }

    /// Returns `true` if no field restricts the result set.
    pub fn is_empty(&self) -> bool {
        FilterField::ALL.iter().all(|&f| !self.get(f).is_active())
    }

    /// Resets every field to empty.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Returns the fields that currently restrict the result set.
    pub fn active_fields(&self) -> impl Iterator<Item = FilterField> + '_ {
        FilterField::ALL
            .into_iter()
            .filter(move |&f| self.get(f).is_active())
    }

    fn text_slot(&self, field: FilterField) -> &str {
        match field {
            FilterField::Title => &self.title,
            FilterField::Author => &self.author,
            FilterField::Year => &self.year,
            FilterField::Kind => &self.kind,
            FilterField::Language => &self.language,
            FilterField::Original => &self.original,
            FilterField::Saga => &self.saga,
            FilterField::Edited => &self.edited,
            FilterField::AuthorSex => &self.sex,
            FilterField::AuthorCountry => &self.country,
            FilterField::Themes => "",
        }
    }

    fn text_slot_mut(&mut self, field: FilterField) -> Option<&mut String> {
        let slot = match field {
            FilterField::Title => &mut self.title,
            FilterField::Author => &mut self.author,
            FilterField::Year => &mut self.year,
            FilterField::Kind => &mut self.kind,
            FilterField::Language => &mut self.language,
            FilterField::Original => &mut self.original,
            FilterField::Saga => &mut self.saga,
            FilterField::Edited => &mut self.edited,
            FilterField::AuthorSex => &mut self.sex,
            FilterField::AuthorCountry => &mut self.country,
            FilterField::Themes => return None,
        };
        Some(slot)
    }
}

/// Sortable table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortColumn {
    /// Title column.
    Title,
    /// Author column.
    Author,
    /// Publication year column.
    Year,
    /// Category column.
    Kind,
}

impl SortColumn {
    /// Parses a column name as used by the CLI (`titulo`, `autor`, `año`, `tipo`).
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "titulo" | "título" | "title" => Some(SortColumn::Title),
            "autor" | "author" => Some(SortColumn::Author),
            "año" | "anio" | "publicación" | "year" => Some(SortColumn::Year),
            "tipo" | "type" => Some(SortColumn::Kind),
            _ => None,
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    /// Ascending.
    #[default]
    Asc,
    /// Descending.
    Desc,
}

impl SortDirection {
    /// Returns the opposite direction.
    #[inline(always)]
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// Active table sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SortState {
    /// Column being sorted.
    pub column: SortColumn,
    /// Direction.
    pub direction: SortDirection,
}

impl SortState {
    /// Ascending sort on `column`.
    pub const fn asc(column: SortColumn) -> Self {
        Self {
            column,
            direction: SortDirection::Asc,
        }
    }

    /// The state an explicit "clear filters" resets to.
    pub const fn reset() -> Self {
        Self::asc(SortColumn::Title)
    }

    /// Applies a header click: the same column flips direction, a different
    /// column starts ascending.
    #[must_use]
    pub fn toggle(self, column: SortColumn) -> Self {
        if self.column == column {
            Self {
                column,
                direction: self.direction.flipped(),
            }
        } else {
            Self::asc(column)
        }
    }

    /// Header click on a table that may not be sorted yet.
    #[must_use]
    pub fn click(prev: Option<Self>, column: SortColumn) -> Self {
        match prev {
            Some(state) => state.toggle(column),
            None => Self::asc(column),
        }
    }
}

/// Index page grouping mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ViewMode {
    /// Standalone works and saga aggregates.
    #[default]
    ByWork,
    /// One entry per co-author.
    ByAuthor,
}

impl ViewMode {
    /// Parses the view parameter. Anything but `autor` selects [`ViewMode::ByWork`].
    pub fn parse(value: &str) -> Self {
        match value {
            "autor" => ViewMode::ByAuthor,
            _ => ViewMode::ByWork,
        }
    }

    /// Query value for this mode.
    pub const fn as_param(self) -> &'static str {
        match self {
            ViewMode::ByWork => "obra",
            ViewMode::ByAuthor => "autor",
        }
    }
}

const BUCKET_SYMBOLS: [&str; 28] = [
    "A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "Ñ", "O", "P", "Q", "R",
    "S", "T", "U", "V", "W", "X", "Y", "Z", "#",
];

/// One of the 28 index sections: A–N, Ñ, O–Z, then "other".
///
/// The wrapped index is the display position, so the derived ordering is
/// the order sections appear on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Bucket(u8);

impl Bucket {
    /// The Ñ section, between N and O.
    pub const ENYE: Bucket = Bucket(14);
    /// The fallback section for titles with no Latin first letter.
    pub const OTHER: Bucket = Bucket(27);
    /// Number of sections.
    pub const COUNT: usize = 28;

    /// All sections in display order.
    pub const ALL: [Bucket; 28] = {
        let mut all = [Bucket(0); 28];
        let mut i = 0;
        while i < 28 {
            all[i] = Bucket(i as u8);
            i += 1;
        }
        all
    };

    /// Section for an ASCII letter (either case). Returns `None` otherwise.
    #[inline]
    pub const fn latin(c: char) -> Option<Bucket> {
        let upper = c.to_ascii_uppercase();
        if !upper.is_ascii_uppercase() {
            return None;
        }
        let offset = upper as u8 - b'A';
        // Ñ sits after N (offset 13)
        Some(if offset <= 13 {
            Bucket(offset)
        } else {
            Bucket(offset + 1)
        })
    }

    /// Display position, 0..28.
    #[inline(always)]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Heading symbol: the letter, `Ñ`, or `#`.
    #[inline]
    pub const fn symbol(self) -> &'static str {
        BUCKET_SYMBOLS[self.0 as usize]
    }

    /// Fragment anchor for the section (`#` is URL-encoded).
    pub const fn anchor(self) -> &'static str {
        if self.0 == Self::OTHER.0 {
            "%23"
        } else {
            self.symbol()
        }
    }

    /// Sidebar label ("Letra A", ..., "Otros").
    pub fn label(self) -> String {
        if self == Self::OTHER {
            "Otros".to_owned()
        } else {
            format!("Letra {}", self.symbol())
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogConfig {
    /// Quiet period before a filter change is written to the address bar.
    /// Default: 1000 ms.
    pub debounce_ms: u64,
    /// Number of themes in the top-themes chart. Default: 10.
    pub top_themes: usize,
    /// Minimum number of books for a year to appear in the publication
    /// chart. Default: 2.
    pub min_year_count: usize,
    /// Language that needs no "(en ...)" note in the index. Default: "Español".
    pub home_language: &'static str,
    /// Label for blank category values. Default: "Sin especificar".
    pub unspecified_label: &'static str,
    /// Reports a visitor may send per calendar day. Default: 1.
    pub daily_report_limit: u32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 1000,
            top_themes: 10,
            min_year_count: 2,
            home_language: "Español",
            unspecified_label: "Sin especificar",
            daily_report_limit: 1,
        }
    }
}

impl CatalogConfig {
    /// Configuration with no debounce window, for batch use.
    pub const fn immediate() -> Self {
        Self {
            debounce_ms: 0,
            top_themes: 10,
            min_year_count: 2,
            home_language: "Español",
            unspecified_label: "Sin especificar",
            daily_report_limit: 1,
        }
    }

    /// Configuration that keeps every year and theme in the charts.
    pub const fn exhaustive() -> Self {
        Self {
            debounce_ms: 1000,
            top_themes: usize::MAX,
            min_year_count: 1,
            home_language: "Español",
            unspecified_label: "Sin especificar",
            daily_report_limit: 1,
        }
    }
}
