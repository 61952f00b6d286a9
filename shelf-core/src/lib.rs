//! Query and grouping engine for a static book catalog.
//!
//! The catalog is loaded once from JSON and never mutated. On top of it the
//! engine provides:
//!
//! - **Search** ([`query`]): field predicates with an author join, a
//!   stable table sort and facet option lists
//! - **Index** ([`grouping`]): 28 letter sections, by work (with saga
//!   aggregates) or by author
//! - **Statistics** ([`stats`]): frequency series for the dashboard
//! - **Shareable state** ([`codec`], [`sync`]): the filter form as a query
//!   string, written back to the address bar after a quiet period
//!
//! Text handling (accent folding, Spanish collation, letter sections and
//! comma lists) lives in [`analyzer`].
//!
//! # Example
//!
//! ```
//! use shelf_core::{codec, Catalog};
//! use shelf_core::reports::ReportedIds;
//! use shelf_types::{Book, CatalogConfig};
//!
//! let books = vec![
//!     Book { title: "Rayuela".into(), year: "1963".into(), ..Default::default() },
//!     Book { title: "Ficciones".into(), year: "1944".into(), ..Default::default() },
//! ];
//! let catalog = Catalog::from_parts(books, vec![], ReportedIds::default(), CatalogConfig::default());
//!
//! let state = codec::decode("publicaci%C3%B3n=196");
//! let rows = catalog.search(&state, None);
//! assert_eq!(rows.len(), 1);
//! assert_eq!(rows[0].title, "Rayuela");
//! ```

pub mod analyzer;
pub mod arena;
pub mod catalog;
pub mod codec;
pub mod display;
pub mod error;
pub mod grouping;
pub mod query;
pub mod reports;
pub mod stats;
pub mod sync;

pub use catalog::Catalog;
pub use error::{LoadError, LoadResult};
pub use grouping::{build_index, IndexView};
pub use stats::Dashboard;
pub use sync::{AddressBar, UrlSync};
