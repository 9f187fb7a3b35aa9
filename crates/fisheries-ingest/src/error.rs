//! Ingestion error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while locating, reading, or writing CSV files.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("no csv matching `{primary}` (or fallback `{fallback}`) in {dir}")]
    NoMatchingFile {
        dir: PathBuf,
        primary: String,
        fallback: String,
    },

    #[error("read csv {path}: {source}")]
    Read { path: PathBuf, source: csv::Error },

    #[error("write csv {path}: {source}")]
    Write { path: PathBuf, source: csv::Error },

    #[error("create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, IngestError>;
