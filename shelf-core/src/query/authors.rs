//! Book-to-author join.

use rustc_hash::FxHashMap;
use shelf_types::{Author, Book};
use smallvec::SmallVec;

use crate::analyzer::{list_items, TextNormalizer};

/// Authors matched for one book. Most books have one or two.
pub type JoinedAuthors<'a> = SmallVec<[&'a Author; 4]>;

/// Lookup of author records by lower-cased name.
///
/// Names match case-insensitively but otherwise exactly: accents and
/// inner spacing must agree. When two records share a lower-cased name the
/// first one wins.
#[derive(Debug)]
pub struct AuthorIndex<'a> {
    by_name: FxHashMap<String, &'a Author>,
    folder: TextNormalizer,
}

impl<'a> AuthorIndex<'a> {
    /// Indexes `authors`.
    pub fn new(authors: &'a [Author]) -> Self {
        let folder = TextNormalizer::case_only();
        let mut by_name =
            FxHashMap::with_capacity_and_hasher(authors.len(), Default::default());
        for author in authors {
            by_name
                .entry(folder.normalize(&author.name))
                .or_insert(author);
        }
        Self { by_name, folder }
    }

    /// Number of distinct names.
    #[inline]
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Returns `true` if no authors are indexed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Looks up a single trimmed name.
    pub fn lookup(&self, name: &str) -> Option<&'a Author> {
        let mut key = String::with_capacity(name.len());
        self.folder.normalize_into(name, &mut key);
        self.by_name.get(&key).copied()
    }

    /// Joins every listed author of `book`. Unknown names are dropped.
    pub fn join(&self, book: &Book) -> JoinedAuthors<'a> {
        let mut key = String::new();
        list_items(&book.author)
            .filter_map(|name| {
                self.folder.normalize_into(name, &mut key);
                self.by_name.get(&key).copied()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn author(name: &str, sex: &str, country: &str) -> Author {
        Author {
            name: name.into(),
            sex: sex.into(),
            country: country.into(),
        }
    }

    fn book(authors: &str) -> Book {
        Book {
            author: authors.into(),
            ..Default::default()
        }
    }

    #[test]
    fn case_insensitive_exact_match() {
        let authors = vec![author("Jorge Luis Borges", "Hombre", "Argentina")];
        let index = AuthorIndex::new(&authors);

        assert!(index.lookup("jorge luis borges").is_some());
        assert!(index.lookup("JORGE LUIS BORGES").is_some());
        assert!(index.lookup("Borges").is_none());
        assert!(index.lookup("Jorge Luis Borgés").is_none());
    }

    #[test]
    fn multi_author_books_join_each_name() {
        let authors = vec![
            author("Jorge Luis Borges", "Hombre", "Argentina"),
            author("Adolfo Bioy Casares", "Hombre", "Argentina"),
            author("Silvina Ocampo", "Mujer", "Argentina"),
        ];
        let index = AuthorIndex::new(&authors);

        let joined = index.join(&book("Jorge Luis Borges, Silvina Ocampo ,Desconocido"));
        let names: Vec<&str> = joined.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Jorge Luis Borges", "Silvina Ocampo"]);
    }

    #[test]
    fn unmatched_names_yield_nothing() {
        let authors = vec![author("Silvina Ocampo", "Mujer", "Argentina")];
        let index = AuthorIndex::new(&authors);
        assert!(index.join(&book("Anónimo")).is_empty());
        assert!(index.join(&book("")).is_empty());
    }

    #[test]
    fn first_record_wins_on_duplicate_names() {
        let authors = vec![
            author("Homero", "Hombre", "Grecia"),
            author("HOMERO", "Desconocido", ""),
        ];
        let index = AuthorIndex::new(&authors);
        assert_eq!(index.len(), 1);
        assert_eq!(index.lookup("homero").map(|a| a.country.as_str()), Some("Grecia"));
    }
}
