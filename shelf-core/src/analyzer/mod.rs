//! Text analysis pipeline.
//!
//! This module provides the text processing components:
//! - **Normalizer**: Case and diacritic folding, sort keys
//! - **Collate**: Locale-aware comparison for table sorting
//! - **Classifier**: Maps titles and names to index sections
//! - **Tokenizer**: Splits comma-joined cells into items

pub mod classifier;
pub mod collate;
pub mod normalizer;
pub mod tokenizer;

pub use classifier::classify;
pub use collate::locale_cmp;
pub use normalizer::{normalize, sort_key, NormalizerConfig, TextNormalizer};
pub use tokenizer::{list_contains, list_items, ListItems};
