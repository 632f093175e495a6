//! Error types surfaced by the record store and record operations.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// The persisted document could not be read, parsed, validated or written.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("read todos {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("parse todos {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid todos document {}: {}", path.display(), messages.join("; "))]
    Invalid { path: PathBuf, messages: Vec<String> },
    #[error("serialize todos: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("write todos {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Failure of a record operation.
#[derive(Debug, Error)]
pub enum TodoError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// Input rejected before anything was persisted.
    #[error("{0}")]
    Validation(String),
    #[error("todo {0} not found")]
    NotFound(u64),
}

impl TodoError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, TodoError::NotFound(_))
    }
}

pub type Result<T, E = TodoError> = std::result::Result<T, E>;
