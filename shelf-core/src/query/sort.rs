//! Table sort.

use core::cmp::Ordering;

use shelf_types::{Book, SortDirection, SortState};

use super::fields::column_accessor;
use crate::analyzer::locale_cmp;

/// Comparator for a table sort: locale-aware comparison of the raw column
/// values, reversed for [`SortDirection::Desc`].
#[inline]
pub fn compare(a: &Book, b: &Book, sort: SortState) -> Ordering {
    let read = column_accessor(sort.column);
    let ord = locale_cmp(read(a), read(b));
    match sort.direction {
        SortDirection::Asc => ord,
        SortDirection::Desc => ord.reverse(),
    }
}

/// Sorts filtered rows in place. The sort is stable: rows whose column
/// values compare equal keep their relative order, in both directions.
pub fn sort_rows(rows: &mut [&Book], sort: SortState) {
    rows.sort_by(|a, b| compare(a, b, sort));
}

/// Applies an optional table sort. `None` leaves dataset order untouched.
pub fn apply(rows: &mut [&Book], sort: Option<SortState>) {
    if let Some(sort) = sort {
        sort_rows(rows, sort);
    }
}
