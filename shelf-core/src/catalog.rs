//! The loaded dataset.
//!
//! A [`Catalog`] owns the three immutable record lists and the engine
//! configuration. Every query borrows from it; nothing here mutates after
//! load.

use std::fs;
use std::path::Path;

use rustc_hash::FxHashSet;
use serde::de::DeserializeOwned;
use shelf_types::{Author, Book, CatalogConfig, FilterState, SortState, ViewMode};
use tracing::{info, warn};

use crate::error::{LoadError, LoadResult};
use crate::grouping::{build_index, IndexView};
use crate::query::{self, AuthorIndex};
use crate::reports::{ReportLimiter, ReportedIds};
use crate::stats::Dashboard;

/// Books, authors and reported IDs.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    books: Vec<Book>,
    authors: Vec<Author>,
    reported: ReportedIds,
    config: CatalogConfig,
}

impl Catalog {
    /// Loads the dataset from JSON files.
    ///
    /// `books` and `authors` are arrays of records; `reported` is an array
    /// of ID strings. Optional files that are not given load as empty. Any
    /// unreadable or malformed file fails the whole load.
    pub fn load(
        books: impl AsRef<Path>,
        authors: Option<&Path>,
        reported: Option<&Path>,
        config: CatalogConfig,
    ) -> LoadResult<Self> {
        let books: Vec<Book> = load_json(books.as_ref())?;
        let authors: Vec<Author> = match authors {
            Some(path) => load_json(path)?,
            None => Vec::new(),
        };
        let reported = match reported {
            Some(path) => ReportedIds::new(load_json::<Vec<String>>(path)?),
            None => ReportedIds::default(),
        };

        let catalog = Self::from_parts(books, authors, reported, config);
        info!(
            books = catalog.books.len(),
            authors = catalog.authors.len(),
            reported = catalog.reported.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    /// Builds a catalog from already-parsed records.
    pub fn from_parts(
        books: Vec<Book>,
        authors: Vec<Author>,
        reported: ReportedIds,
        config: CatalogConfig,
    ) -> Self {
        let duplicates = duplicate_ids(&books);
        if duplicates > 0 {
            warn!(duplicates, "books share an ID");
        }

        Self {
            books,
            authors,
            reported,
            config,
        }
    }

    /// All books, in dataset order.
    pub fn books(&self) -> &[Book] {
        &self.books
    }

    /// All authors, in dataset order.
    pub fn authors(&self) -> &[Author] {
        &self.authors
    }

    /// Reported IDs.
    pub fn reported(&self) -> &ReportedIds {
        &self.reported
    }

    /// Engine configuration.
    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Name index for the author join.
    pub fn author_index(&self) -> AuthorIndex<'_> {
        AuthorIndex::new(&self.authors)
    }

    /// Filters and optionally sorts the table rows.
    pub fn search(&self, state: &FilterState, sort: Option<SortState>) -> Vec<&Book> {
        query::run(&self.books, state, &self.author_index(), sort)
    }

    /// Builds the index page.
    pub fn index(&self, mode: ViewMode) -> IndexView<'_> {
        build_index(&self.books, mode)
    }

    /// Builds the statistics dashboard.
    pub fn dashboard(&self) -> Dashboard<'_> {
        Dashboard::build(&self.books, &self.authors, &self.config)
    }

    /// Report limiter with the configured daily limit, restored from the
    /// host's saved state (`None` for a first visit).
    pub fn report_limiter(&self, saved: Option<&str>) -> ReportLimiter {
        match saved {
            Some(json) => ReportLimiter::from_json(json, self.config.daily_report_limit),
            None => ReportLimiter::from_config(&self.config),
        }
    }

    /// Returns `true` if `book` may be reported.
    pub fn can_report(&self, book: &Book) -> bool {
        self.reported.can_report(book)
    }
}

fn load_json<T: DeserializeOwned>(path: &Path) -> LoadResult<T> {
    let bytes = fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Number of books whose non-empty ID was already seen.
fn duplicate_ids(books: &[Book]) -> usize {
    let mut seen: FxHashSet<&str> = FxHashSet::default();
    books
        .iter()
        .filter(|b| !b.id.is_empty() && !seen.insert(b.id.as_str()))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use serde_json::json;
    use shelf_types::{FilterField, SortColumn};
    use tempfile::NamedTempFile;

    fn write_json(value: &serde_json::Value) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(value.to_string().as_bytes()).expect("write");
        file
    }

    fn fixtures() -> (NamedTempFile, NamedTempFile, NamedTempFile) {
        let books = write_json(&json!([
            {"Título": "Rayuela", "Autor": "Julio Cortázar", "Publicación": 1963, "Tipo": "Novela", "ID": "1"},
            {"Título": "Ficciones", "Autor": "Jorge Luis Borges", "Publicación": "1944", "Tipo": "Cuento", "ID": "2"},
            {"Título": "Ariel", "Autor": "José Enrique Rodó", "Publicación": null, "Tipo": "Ensayo", "Editado": true}
        ]));
        let authors = write_json(&json!([
            {"Nombre": "Julio Cortázar", "Sexo": "Hombre", "País": "Argentina"},
            {"Nombre": "Jorge Luis Borges", "Sexo": "Hombre", "País": "Argentina"}
        ]));
        let reported = write_json(&json!(["2"]));
        (books, authors, reported)
    }

    #[test]
    fn loads_lenient_records() {
        let (books, authors, reported) = fixtures();
        let catalog = Catalog::load(
            books.path(),
            Some(authors.path()),
            Some(reported.path()),
            CatalogConfig::default(),
        )
        .expect("load");

        assert_eq!(catalog.books().len(), 3);
        assert_eq!(catalog.authors().len(), 2);
        assert_eq!(catalog.books()[0].year, "1963");
        assert_eq!(catalog.books()[2].year, "");
        assert!(catalog.books()[2].is_edited());

        assert!(catalog.can_report(&catalog.books()[0]));
        assert!(!catalog.can_report(&catalog.books()[1]));
        assert!(!catalog.can_report(&catalog.books()[2]));
    }

    #[test]
    fn search_and_views() {
        let (books, authors, _) = fixtures();
        let catalog =
            Catalog::load(books.path(), Some(authors.path()), None, CatalogConfig::default()).expect("load");

        let mut state = FilterState::new();
        state.set(FilterField::AuthorCountry, "Argentina");
        let rows = catalog.search(&state, Some(SortState::asc(SortColumn::Title)));
        let titles: Vec<&str> = rows.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["Ficciones", "Rayuela"]);

        assert_eq!(catalog.search(&FilterState::new(), None).len(), 3);
        assert_eq!(catalog.index(ViewMode::ByWork).section_sizes().iter().sum::<usize>(), 3);
        assert_eq!(catalog.dashboard().kinds.len(), 3);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let (_, authors, _) = fixtures();
        let err = Catalog::load(
            "/nonexistent/libros.json",
            Some(authors.path()),
            None,
            CatalogConfig::default(),
        )
        .expect_err("missing file");

        assert!(matches!(err, LoadError::Io { .. }));
        assert_eq!(err.path(), Path::new("/nonexistent/libros.json"));
        assert!(err.to_string().starts_with("failed to load"));
    }

    #[test]
    fn malformed_json_is_a_json_error() {
        let (books, _, _) = fixtures();
        let mut authors = NamedTempFile::new().expect("temp file");
        authors.write_all(b"[{\"Nombre\": ").expect("write");

        let err = Catalog::load(books.path(), Some(authors.path()), None, CatalogConfig::default())
            .expect_err("malformed");
        assert!(matches!(err, LoadError::Json { .. }));
        assert_eq!(err.path(), authors.path());
    }

    #[test]
    fn object_instead_of_array_is_rejected() {
        let books = write_json(&json!({"Título": "Rayuela"}));
        let (_, authors, _) = fixtures();
        let err = Catalog::load(books.path(), Some(authors.path()), None, CatalogConfig::default())
            .expect_err("not an array");
        assert!(matches!(err, LoadError::Json { .. }));
    }

    #[test]
    fn report_limiter_uses_the_configured_limit() {
        let config = CatalogConfig {
            daily_report_limit: 2,
            ..CatalogConfig::default()
        };
        let catalog = Catalog::from_parts(vec![], vec![], ReportedIds::default(), config);
        let day = chrono::NaiveDate::from_ymd_opt(2024, 5, 1).expect("valid date");

        let fresh = catalog.report_limiter(None);
        assert_eq!(fresh.limit(), 2);

        let restored = catalog.report_limiter(Some(r#"{"2024-05-01":1}"#));
        assert_eq!(restored.limit(), 2);
        assert!(restored.can_send(day));

        let exhausted = catalog.report_limiter(Some(r#"{"2024-05-01":2}"#));
        assert!(!exhausted.can_send(day));
    }

    #[test]
    fn duplicate_ids_are_counted() {
        let book = |id: &str| Book {
            id: id.into(),
            ..Default::default()
        };
        let books = vec![book("1"), book("2"), book("1"), book(""), book(""), book("1")];
        assert_eq!(duplicate_ids(&books), 2);

        let catalog = Catalog::from_parts(books, vec![], ReportedIds::default(), CatalogConfig::default());
        assert_eq!(catalog.books().len(), 6);
    }
}
