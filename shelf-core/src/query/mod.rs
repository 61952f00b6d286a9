//! Search page query engine.
//!
//! A query runs in two steps over the immutable book list:
//!
//! 1. **Filter**: the [`FilterState`](shelf_types::FilterState) is compiled
//!    against the [field descriptor table](fields::DESCRIPTORS) and every
//!    book is tested; sex and country constraints join the author table.
//! 2. **Sort**: the surviving rows are optionally sorted by one column.
//!
//! Sorting never changes which rows are included.

pub mod authors;
pub mod facets;
pub mod fields;
pub mod filter;
pub mod sort;

pub use authors::{AuthorIndex, JoinedAuthors};
pub use facets::{country_options, field_options, sex_options, theme_options};
pub use fields::{descriptor, AuthorAttr, FieldDescriptor, MatchRule};
pub use filter::{filter, CompiledFilter};
pub use sort::{compare, sort_rows};

use shelf_types::{Book, FilterState, SortState};

/// Filters, then sorts. `sort` of `None` keeps dataset order.
pub fn run<'b>(
    books: &'b [Book],
    state: &FilterState,
    authors: &AuthorIndex<'_>,
    sort: Option<SortState>,
) -> Vec<&'b Book> {
    let mut rows = filter(books, state, authors);
    sort::apply(&mut rows, sort);
    rows
}
