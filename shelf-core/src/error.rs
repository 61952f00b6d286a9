//! Load errors.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for dataset loading.
pub type LoadResult<T> = Result<T, LoadError>;

/// Failure to load one of the dataset files.
///
/// Distinct from a query matching nothing: a catalog that failed to load
/// has no rows to filter at all.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("failed to load {}: {source}", path.display())]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The file is not the expected JSON array.
    #[error("failed to load {}: malformed JSON: {source}", path.display())]
    Json {
        /// File that failed.
        path: PathBuf,
        /// Parser error.
        #[source]
        source: serde_json::Error,
    },
}

impl LoadError {
    /// Path of the file that failed.
    pub fn path(&self) -> &std::path::Path {
        match self {
            LoadError::Io { path, .. } | LoadError::Json { path, .. } => path,
        }
    }
}
