//! Statistics dashboard.
//!
//! Pure aggregations over the immutable record lists. Nothing is cached;
//! a [`Dashboard`] is cheap to rebuild whenever the dataset changes.

pub mod counts;
pub mod uploads;

pub use counts::{count_by_category, count_by_year, hue_color, top_n, PieSlice, Tally};
pub use uploads::{
    parse_upload_date, upload_type_options, uploads_by_month, uploads_by_month_for_types,
    MonthKey, Series, UploadChart, ALL_UPLOADS_LABEL,
};

use shelf_types::{Author, Book, CatalogConfig};
use tracing::debug;

/// Every chart of the statistics page.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard<'a> {
    /// Books uploaded per month.
    pub uploads: Vec<(MonthKey, usize)>,
    /// Books per publication year, years below the configured minimum count
    /// dropped.
    pub publications: Vec<Tally<'a>>,
    /// Books per type.
    pub kinds: Vec<PieSlice<'a>>,
    /// Books per language.
    pub languages: Vec<PieSlice<'a>>,
    /// Books per original language.
    pub originals: Vec<PieSlice<'a>>,
    /// Authors per sex.
    pub author_sexes: Vec<PieSlice<'a>>,
    /// Authors per country of birth.
    pub author_countries: Vec<PieSlice<'a>>,
    /// Most frequent themes.
    pub top_themes: Vec<Tally<'a>>,
}

impl<'a> Dashboard<'a> {
    /// Computes every chart.
    pub fn build(books: &'a [Book], authors: &'a [Author], config: &CatalogConfig) -> Self {
        let unspecified = config.unspecified_label;
        let dashboard = Self {
            uploads: uploads_by_month(books),
            publications: publications_by_year(books, config.min_year_count),
            kinds: count_by_category(books.iter().map(|b| b.kind.as_str()), unspecified),
            languages: count_by_category(books.iter().map(|b| b.language.as_str()), unspecified),
            originals: count_by_category(books.iter().map(|b| b.original.as_str()), unspecified),
            author_sexes: count_by_category(authors.iter().map(|a| a.sex.as_str()), unspecified),
            author_countries: count_by_category(
                authors.iter().map(|a| a.country.as_str()),
                unspecified,
            ),
            top_themes: top_n(books.iter().map(|b| b.themes.as_str()), config.top_themes),
        };

        debug!(
            books = books.len(),
            authors = authors.len(),
            months = dashboard.uploads.len(),
            years = dashboard.publications.len(),
            themes = dashboard.top_themes.len(),
            "dashboard built"
        );
        dashboard
    }

    /// Total uploads with a decodable date.
    pub fn total_uploads(&self) -> usize {
        self.uploads.iter().map(|&(_, c)| c).sum()
    }
}

/// Publication years with at least `min_count` books, ascending.
pub fn publications_by_year(books: &[Book], min_count: usize) -> Vec<Tally<'_>> {
    let mut years = count_by_year(books.iter().map(|b| b.year.as_str()));
    years.retain(|t| t.count >= min_count);
    years
}

impl core::fmt::Display for Dashboard<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{} uploads over {} months, {} publication years, {} types, {} languages",
            self.total_uploads(),
            self.uploads.len(),
            self.publications.len(),
            self.kinds.len(),
            self.languages.len()
        )?;

        if let (Some(first), Some(last)) = (self.uploads.first(), self.uploads.last()) {
            write!(f, " ({} to {})", first.0.short_label(), last.0.short_label())?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(year: &str, kind: &str, themes: &str, uploaded: &str) -> Book {
        Book {
            year: year.into(),
            kind: kind.into(),
            themes: themes.into(),
            uploaded: uploaded.into(),
            language: "Español".into(),
            ..Default::default()
        }
    }

    fn books() -> Vec<Book> {
        vec![
            book("1963", "Novela", "Drama, Humor", "Date(2024,0,3)"),
            book("1963", "Novela", "Drama", "Date(2024,0,9)"),
            book("1944", "Cuento", "Fantasía", "Date(2024,2,1)"),
            book("s/f", "", "Humor, Drama", ""),
            book(" 1944", "Ensayo", "", "Date(2023,5,1)"),
            book("2001", "Novela", "", "Date(2023,5,1)"),
        ]
    }

    #[test]
    fn dashboard_builds_every_chart() {
        let books = books();
        let authors = vec![
            Author {
                name: "A".into(),
                sex: "Mujer".into(),
                country: "".into(),
            },
            Author {
                name: "B".into(),
                sex: "".into(),
                country: "Chile".into(),
            },
        ];
        let dashboard = Dashboard::build(&books, &authors, &CatalogConfig::default());

        assert_eq!(dashboard.total_uploads(), 5);
        assert_eq!(dashboard.uploads.len(), 3);

        let years: Vec<(&str, usize)> =
            dashboard.publications.iter().map(|t| (t.label, t.count)).collect();
        assert_eq!(years, vec![("1944", 2), ("1963", 2)]);

        let kinds: Vec<&str> = dashboard.kinds.iter().map(|s| s.label).collect();
        assert_eq!(kinds, vec!["Novela", "Cuento", "Sin especificar", "Ensayo"]);

        let sexes: Vec<&str> = dashboard.author_sexes.iter().map(|s| s.label).collect();
        assert_eq!(sexes, vec!["Mujer", "Sin especificar"]);

        let themes: Vec<(&str, usize)> =
            dashboard.top_themes.iter().map(|t| (t.label, t.count)).collect();
        assert_eq!(themes, vec![("Drama", 3), ("Humor", 2), ("Fantasía", 1)]);

        let summary = dashboard.to_string();
        assert!(summary.starts_with("5 uploads over 3 months"));
        assert!(summary.ends_with("(jun 2023 to mar 2024)"));
    }

    #[test]
    fn exhaustive_config_keeps_single_years() {
        let books = books();
        let dashboard = Dashboard::build(&books, &[], &CatalogConfig::exhaustive());
        assert_eq!(dashboard.publications.len(), 3);
        assert!(dashboard.author_countries.is_empty());
    }

    #[test]
    fn empty_catalog() {
        let dashboard = Dashboard::build(&[], &[], &CatalogConfig::default());
        assert_eq!(dashboard.total_uploads(), 0);
        assert_eq!(
            dashboard.to_string(),
            "0 uploads over 0 months, 0 publication years, 0 types, 0 languages"
        );
    }
}
