//! Index page grouping.
//!
//! The index lists the catalog under 28 letter sections. Two views exist:
//!
//! - **By work** ([`by_work`]): standalone books and saga aggregates, each
//!   filed under the first letter of its title (sagas under the saga name).
//! - **By author** ([`by_author`]): one entry per co-author, filed under
//!   the author's name, listing that author's books in dataset order.
//!
//! Views are rebuilt from the immutable book list on every call; nothing
//! here is mutated after construction.

pub mod by_author;
pub mod by_work;
pub mod saga;

pub use by_author::group_by_author;
pub use by_work::group_by_work;
pub use saga::saga_ordinal;

use shelf_types::{Book, Bucket, ViewMode};
use smallvec::SmallVec;
use tracing::debug;

use crate::analyzer::{classify, locale_cmp, TextNormalizer};

/// Label shown for sagas written by more than one author string.
pub const VARIOUS_AUTHORS: &str = "AA. VV.";

/// A saga aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SagaGroup<'b> {
    /// Saga name, as written on the first volume seen.
    pub name: &'b str,
    /// Distinct author strings across the volumes, first-seen order.
    pub authors: SmallVec<[&'b str; 2]>,
    /// Volumes ordered by their `(#N)` marker.
    pub books: Vec<&'b Book>,
}

impl<'b> SagaGroup<'b> {
    pub(crate) fn new(name: &'b str) -> Self {
        Self {
            name,
            authors: SmallVec::new(),
            books: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, book: &'b Book) {
        if !self.authors.contains(&book.author.as_str()) {
            self.authors.push(&book.author);
        }
        self.books.push(book);
    }

    /// The saga's author line: its only author, or "AA. VV.".
    pub fn author_label(&self) -> &'b str {
        match self.authors.as_slice() {
            [only] => *only,
            _ => VARIOUS_AUTHORS,
        }
    }

    /// Returns `true` if member lines should name their own author.
    #[inline]
    pub fn shows_member_authors(&self) -> bool {
        self.authors.len() > 1
    }
}

/// One line of the by-work view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkNode<'b> {
    /// A book outside any saga.
    Book(&'b Book),
    /// A saga and its volumes.
    Saga(SagaGroup<'b>),
}

impl<'b> WorkNode<'b> {
    /// Text the node is filed and ordered by.
    pub fn heading(&self) -> &'b str {
        match self {
            WorkNode::Book(book) => &book.title,
            WorkNode::Saga(saga) => saga.name,
        }
    }
}

/// One author of the by-author view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorEntry<'b> {
    /// Author name, first spelling seen.
    pub name: &'b str,
    /// Books listing this author, in dataset order.
    pub books: Vec<&'b Book>,
}

/// A letter section of the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section<T> {
    /// Section letter.
    pub bucket: Bucket,
    /// Entries, ordered by sort key.
    pub items: Vec<T>,
}

impl<T> Section<T> {
    /// Returns `true` if nothing is filed under this letter.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// A built index view. Always holds all 28 sections in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexView<'b> {
    /// Works and sagas.
    ByWork(Vec<Section<WorkNode<'b>>>),
    /// Authors.
    ByAuthor(Vec<Section<AuthorEntry<'b>>>),
}

impl IndexView<'_> {
    /// The mode this view was built for.
    pub fn mode(&self) -> ViewMode {
        match self {
            IndexView::ByWork(_) => ViewMode::ByWork,
            IndexView::ByAuthor(_) => ViewMode::ByAuthor,
        }
    }

    /// Number of entries per section, in display order.
    pub fn section_sizes(&self) -> [usize; Bucket::COUNT] {
        let mut sizes = [0; Bucket::COUNT];
        match self {
            IndexView::ByWork(sections) => {
                for s in sections {
                    sizes[s.bucket.index()] = s.items.len();
                }
            }
            IndexView::ByAuthor(sections) => {
                for s in sections {
                    sizes[s.bucket.index()] = s.items.len();
                }
            }
        }
        sizes
    }
}

/// Builds the index view for `mode`.
pub fn build_index(books: &[Book], mode: ViewMode) -> IndexView<'_> {
    let view = match mode {
        ViewMode::ByWork => IndexView::ByWork(group_by_work(books)),
        ViewMode::ByAuthor => IndexView::ByAuthor(group_by_author(books)),
    };
    debug!(
        mode = mode.as_param(),
        books = books.len(),
        entries = view.section_sizes().iter().sum::<usize>(),
        "index built"
    );
    view
}

/// Files `items` under their letter and orders each section by sort key.
///
/// Items whose keys tie keep their input order.
pub(crate) fn into_sections<'b, T>(
    items: impl IntoIterator<Item = T>,
    heading: impl Fn(&T) -> &'b str,
) -> Vec<Section<T>> {
    let normalizer = TextNormalizer::default();
    let mut keyed: Vec<Vec<(String, T)>> = (0..Bucket::COUNT).map(|_| Vec::new()).collect();

    for item in items {
        let text = heading(&item);
        keyed[classify(text).index()].push((normalizer.sort_key(text), item));
    }

    Bucket::ALL
        .into_iter()
        .zip(keyed)
        .map(|(bucket, mut entries)| {
            entries.sort_by(|a, b| locale_cmp(&a.0, &b.0));
            Section {
                bucket,
                items: entries.into_iter().map(|(_, item)| item).collect(),
            }
        })
        .collect()
}
