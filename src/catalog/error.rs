use std::path::PathBuf;
use thiserror::Error;

/// Reasons a reference table could not be loaded.
///
/// The loader recovers from every one of these by serving the built-in
/// sample table; the error only ends up in logs and in
/// [`TableOrigin::Fallback`](super::TableOrigin::Fallback).
#[derive(Debug, Error)]
pub enum TableError {
    #[error("table file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("failed to read table file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("table is not valid UTF-8 (byte {offset})")]
    InvalidEncoding { offset: usize },

    #[error("malformed table near line {line}: {message}")]
    Malformed { line: u64, message: String },

    #[error("table contains no usable rows")]
    Empty,
}
