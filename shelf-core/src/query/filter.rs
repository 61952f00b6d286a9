//! Predicate engine.
//!
//! A [`FilterState`] is compiled once per query into a list of active
//! predicates: case-insensitive needles are lower-cased up front, empty
//! fields are dropped. Matching a book then walks the book-local predicates
//! first and only joins authors when a sex or country constraint survives.

use shelf_types::{Book, FilterState, FilterValue};
use smallvec::SmallVec;
use tracing::debug;

use super::authors::{AuthorIndex, JoinedAuthors};
use super::fields::{descriptor, Accessor, AuthorAttr, MatchRule};
use crate::analyzer::{list_contains, TextNormalizer};

#[derive(Debug)]
enum Predicate<'f> {
    Contains { accessor: Accessor, needle: String },
    RawContains { accessor: Accessor, needle: &'f str },
    Exact { accessor: Accessor, value: &'f str },
    AllOf { accessor: Accessor, items: &'f [String] },
    AnyAuthor { attr: AuthorAttr, value: &'f str },
}

impl Predicate<'_> {
    fn matches_book(&self, book: &Book, folder: &TextNormalizer, buf: &mut String) -> bool {
        match self {
            Predicate::Contains { accessor, needle } => {
                folder.normalize_into(accessor(book), buf);
                buf.contains(needle.as_str())
            }
            Predicate::RawContains { accessor, needle } => accessor(book).contains(needle),
            Predicate::Exact { accessor, value } => accessor(book) == *value,
            Predicate::AllOf { accessor, items } => {
                let cell = accessor(book);
                items.iter().all(|item| list_contains(cell, item))
            }
            Predicate::AnyAuthor { .. } => true,
        }
    }

    fn matches_authors(&self, joined: &JoinedAuthors<'_>) -> bool {
        match self {
            Predicate::AnyAuthor { attr, value } => {
                joined.iter().any(|author| attr.read(author) == *value)
            }
            _ => true,
        }
    }
}

/// A filter state ready to be evaluated against many books.
///
/// # Examples
///
/// ```
/// use shelf_core::query::{AuthorIndex, CompiledFilter};
/// use shelf_types::{Book, FilterField, FilterState};
///
/// let books = vec![
///     Book { title: "Cien años de soledad".into(), year: "1967".into(), ..Default::default() },
///     Book { title: "Rayuela".into(), year: "1963".into(), ..Default::default() },
/// ];
/// let authors = AuthorIndex::new(&[]);
///
/// let mut state = FilterState::new();
/// state.set(FilterField::Title, "AÑOS");
/// let filter = CompiledFilter::new(&state);
///
/// let hits = filter.filter(&books, &authors);
/// assert_eq!(hits.len(), 1);
/// assert_eq!(hits[0].year, "1967");
/// ```
#[derive(Debug)]
pub struct CompiledFilter<'f> {
    book_preds: SmallVec<[Predicate<'f>; 8]>,
    author_preds: SmallVec<[Predicate<'f>; 2]>,
    folder: TextNormalizer,
}

impl<'f> CompiledFilter<'f> {
    /// Compiles the active fields of `state`.
    pub fn new(state: &'f FilterState) -> Self {
        let folder = TextNormalizer::case_only();
        let mut book_preds = SmallVec::new();
        let mut author_preds = SmallVec::new();

        for field in state.active_fields() {
            let row = descriptor(field);
            let accessor = row.accessor;
            let pred = match (row.rule, state.get(field)) {
                (MatchRule::Contains, FilterValue::Text(needle)) => Predicate::Contains {
                    accessor,
                    needle: folder.normalize(needle),
                },
                (MatchRule::RawContains, FilterValue::Text(needle)) => {
                    Predicate::RawContains { accessor, needle }
                }
                (MatchRule::Exact, FilterValue::Text(value)) => Predicate::Exact { accessor, value },
                (MatchRule::AllOf, FilterValue::List(items)) => Predicate::AllOf { accessor, items },
                (MatchRule::AnyAuthor(attr), FilterValue::Text(value)) => {
                    author_preds.push(Predicate::AnyAuthor { attr, value });
                    continue;
                }
                // A list value on a text rule (or the reverse) cannot come out of
                // FilterState; treat it as unconstrained.
                _ => continue,
            };
            book_preds.push(pred);
        }

        Self {
            book_preds,
            author_preds,
            folder,
        }
    }

    /// Returns `true` if no predicate is active.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.book_preds.is_empty() && self.author_preds.is_empty()
    }

    /// Returns `true` if evaluating the filter needs the author join.
    #[inline]
    pub fn needs_join(&self) -> bool {
        !self.author_preds.is_empty()
    }

    /// Tests a single book.
    pub fn matches(&self, book: &Book, authors: &AuthorIndex<'_>) -> bool {
        let mut buf = String::new();
        self.matches_with(book, authors, &mut buf)
    }

    fn matches_with(&self, book: &Book, authors: &AuthorIndex<'_>, buf: &mut String) -> bool {
        if !self
            .book_preds
            .iter()
            .all(|p| p.matches_book(book, &self.folder, buf))
        {
            return false;
        }
        if self.author_preds.is_empty() {
            return true;
        }

        let joined = authors.join(book);
        self.author_preds.iter().all(|p| p.matches_authors(&joined))
    }

    /// Returns the matching books, in input order.
    pub fn filter<'b, I>(&self, books: I, authors: &AuthorIndex<'_>) -> Vec<&'b Book>
    where
        I: IntoIterator<Item = &'b Book>,
    {
        let mut buf = String::new();
        let hits: Vec<&Book> = books
            .into_iter()
            .filter(|book| self.matches_with(book, authors, &mut buf))
            .collect();

        debug!(
            predicates = self.book_preds.len() + self.author_preds.len(),
            joined = self.needs_join(),
            hits = hits.len(),
            "filter applied"
        );
        hits
    }
}

/// Filters `books` by `state`. Pure; the input is not modified.
pub fn filter<'b, I>(books: I, state: &FilterState, authors: &AuthorIndex<'_>) -> Vec<&'b Book>
where
    I: IntoIterator<Item = &'b Book>,
{
    CompiledFilter::new(state).filter(books, authors)
}

