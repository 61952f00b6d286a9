//! Comma-List Tokenizer
//!
//! Several catalog columns pack multiple values into one cell: the author
//! column holds every co-author, the theme column every theme. This module
//! splits such cells into trimmed items without allocating.
//!
//! ```ignore
//! "Drama, Historia ,Humor"  ->  "Drama", "Historia", "Humor"
//! "Borges, , Bioy Casares"  ->  "Borges", "Bioy Casares"
//! ```
//!
//! ## Key Features
//!
//! - **Zero Allocation**: items are slices of the input cell
//! - **Fast**: `memchr` scan for the ASCII comma
//! - **Lazy**: [`ListItems`] is an iterator, so `any`/`all` short-circuit
//!
//! Empty items (blank cells, doubled commas, trailing commas) are skipped.

use memchr::memchr;

/// Iterator over the trimmed, non-empty items of a comma-joined cell.
///
/// # Example
///
/// ```
/// use shelf_core::analyzer::tokenizer::list_items;
///
/// let themes: Vec<&str> = list_items(" Drama,Historia , ").collect();
/// assert_eq!(themes, ["Drama", "Historia"]);
/// ```
#[derive(Debug, Clone)]
pub struct ListItems<'a> {
    rest: Option<&'a str>,
}

/// Splits `cell` on commas.
#[inline]
pub fn list_items(cell: &str) -> ListItems<'_> {
    ListItems { rest: Some(cell) }
}

impl<'a> Iterator for ListItems<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        loop {
            let rest = self.rest?;
            let item = match memchr(b',', rest.as_bytes()) {
                Some(i) => {
                    // A comma is ASCII, so both halves stay on char boundaries.
                    self.rest = Some(&rest[i + 1..]);
                    &rest[..i]
                }
                None => {
                    self.rest = None;
                    rest
                }
            };

            let item = item.trim();
            if !item.is_empty() {
                return Some(item);
            }
        }
    }
}

/// Returns `true` if `cell` lists `item` exactly (after trimming).
#[inline]
pub fn list_contains(cell: &str, item: &str) -> bool {
    list_items(cell).any(|i| i == item)
}
