//! By-author index view.

use shelf_types::Book;

use super::{into_sections, AuthorEntry, Section};
use crate::analyzer::{list_items, TextNormalizer};
use crate::arena::GroupArena;

/// Groups `books` by co-author, filed by letter.
///
/// A book with three listed authors appears under all three. Authors are
/// merged when their names normalize equal (case and accents folded); the
/// first spelling seen is displayed. Each author's books stay in dataset
/// order. A book with no listed author is filed under an unnamed entry in
/// the "other" section.
pub fn group_by_author(books: &[Book]) -> Vec<Section<AuthorEntry<'_>>> {
    let normalizer = TextNormalizer::default();
    let mut authors: GroupArena<AuthorEntry<'_>> = GroupArena::new();
    let mut key = String::new();

    for book in books {
        let mut listed = false;
        for name in list_items(&book.author) {
            listed = true;
            normalizer.normalize_into(name, &mut key);
            file_under(&mut authors, &key, name, book);
        }
        if !listed {
            file_under(&mut authors, "", "", book);
        }
    }

    into_sections(authors.into_groups(), |entry| entry.name)
}

fn file_under<'b>(
    authors: &mut GroupArena<AuthorEntry<'b>>,
    key: &str,
    name: &'b str,
    book: &'b Book,
) {
    let entry = authors.get_or_insert_with(key, || AuthorEntry {
        name,
        books: Vec::new(),
    });
    // A book naming the same author twice is listed once.
    if !entry.books.last().is_some_and(|last| std::ptr::eq(*last, book)) {
        entry.books.push(book);
    }
}
