//! By-work index view.

use shelf_types::Book;

use super::{into_sections, saga_ordinal, SagaGroup, Section, WorkNode};
use crate::analyzer::{locale_cmp, TextNormalizer};
use crate::arena::GroupArena;

/// Groups `books` into standalone works and sagas, filed by letter.
///
/// 1. Books without a saga are standalone; sagas collect their volumes
///    keyed by the exact saga name.
/// 2. Standalone books are ordered by title sort key, saga volumes by
///    their `(#N)` ordinal.
/// 3. Standalone books then sagas (first-seen order) are filed under the
///    letter of their title or saga name and ordered by sort key within
///    each section.
///
/// Every sort is stable. Saga names are compared exactly, so "Dune" and
/// "dune" stay separate sagas.
pub fn group_by_work(books: &[Book]) -> Vec<Section<WorkNode<'_>>> {
    let mut sagas: GroupArena<SagaGroup<'_>> = GroupArena::new();
    let mut standalone: Vec<&Book> = Vec::new();

    for book in books {
        if book.in_saga() {
            sagas
                .get_or_insert_with(&book.saga, || SagaGroup::new(&book.saga))
                .push(book);
        } else {
            standalone.push(book);
        }
    }

    sort_by_title_key(&mut standalone);

    let sagas = sagas.into_groups().into_iter().map(|mut saga| {
        saga.books.sort_by_key(|b| saga_ordinal(&b.title));
        WorkNode::Saga(saga)
    });

    let merged = standalone.into_iter().map(WorkNode::Book).chain(sagas);
    into_sections(merged, WorkNode::heading)
}

fn sort_by_title_key(books: &mut Vec<&Book>) {
    let normalizer = TextNormalizer::default();
    let mut keyed: Vec<(String, &Book)> = books
        .iter()
        .map(|b| (normalizer.sort_key(&b.title), *b))
        .collect();
    keyed.sort_by(|a, b| locale_cmp(&a.0, &b.0));

    books.clear();
    books.extend(keyed.into_iter().map(|(_, b)| b));
}
