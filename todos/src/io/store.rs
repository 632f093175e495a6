//! Record store: load/save of the whole to-do collection.
//!
//! The [`RecordStore`] trait decouples record operations from where the
//! document lives. [`FileStore`] persists to a JSON file on disk;
//! [`MemoryStore`] keeps the serialized document in memory for tests.
//! Both go through the same parse + schema + invariant checks. The only
//! collection invariant is id uniqueness; title rules belong to record
//! operations, so legacy documents with blank titles still load.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use jsonschema::validator_for;
use serde_json::Value;
use tracing::debug;

use crate::core::invariants::validate_invariants;
use crate::error::StorageError;
use crate::record::{Collection, Todo};

/// JSON Schema (draft 2020-12) for the persisted document.
pub const TODOS_SCHEMA: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../schemas/todos/v1.schema.json"
));

/// Durable storage for the to-do collection.
pub trait RecordStore {
    /// Read the full collection. A missing document is an empty collection.
    fn load(&self) -> Result<Collection, StorageError>;

    /// Replace the persisted document with `todos`. Readers must never
    /// observe a partially written document.
    fn save(&self, todos: &[Todo]) -> Result<(), StorageError>;
}

/// Store backed by a single JSON file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Sibling temp file used for write-then-rename.
    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_else(|| "todos.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl RecordStore for FileStore {
    fn load(&self) -> Result<Collection, StorageError> {
        debug!(path = %self.path.display(), "loading todos");
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "todos file missing, starting empty");
                return Ok(Collection::new());
            }
            Err(source) => {
                return Err(StorageError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        let todos = parse_document(&self.path, &contents)?;
        debug!(count = todos.len(), "todos loaded");
        Ok(todos)
    }

    fn save(&self, todos: &[Todo]) -> Result<(), StorageError> {
        debug!(path = %self.path.display(), count = todos.len(), "writing todos");
        let buf = render_document(&self.path, todos)?;
        write_atomic(&self.path, &self.tmp_path(), &buf)
    }
}

/// Store holding the serialized document in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    document: Mutex<Option<String>>,
}

const MEMORY_PATH: &str = "<memory>";

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an already persisted collection.
    pub fn with_todos(todos: &[Todo]) -> Result<Self, StorageError> {
        let store = Self::new();
        store.save(todos)?;
        Ok(store)
    }

    /// Start from a raw document, valid or not.
    pub fn with_document(document: impl Into<String>) -> Self {
        Self {
            document: Mutex::new(Some(document.into())),
        }
    }

    /// Current raw document, if one has been written.
    pub fn document(&self) -> Option<String> {
        self.document
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl RecordStore for MemoryStore {
    fn load(&self) -> Result<Collection, StorageError> {
        match self.document() {
            Some(contents) => parse_document(Path::new(MEMORY_PATH), &contents),
            None => Ok(Collection::new()),
        }
    }

    fn save(&self, todos: &[Todo]) -> Result<(), StorageError> {
        let buf = render_document(Path::new(MEMORY_PATH), todos)?;
        *self.document.lock().unwrap_or_else(PoisonError::into_inner) = Some(buf);
        Ok(())
    }
}

/// Parse and validate a document: JSON, schema conformance, then invariants.
fn parse_document(path: &Path, contents: &str) -> Result<Collection, StorageError> {
    let value: Value = serde_json::from_str(contents).map_err(|source| StorageError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    validate_schema(path, &value)?;
    let todos: Collection = serde_json::from_value(value).map_err(|source| StorageError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    validate_collection(path, &todos)?;
    Ok(todos)
}

/// Serialize `todos` to pretty-printed JSON with trailing newline.
fn render_document(path: &Path, todos: &[Todo]) -> Result<String, StorageError> {
    validate_collection(path, todos)?;
    let mut buf = serde_json::to_string_pretty(todos).map_err(StorageError::Serialize)?;
    buf.push('\n');
    Ok(buf)
}

fn validate_schema(path: &Path, document: &Value) -> Result<(), StorageError> {
    let invalid = |messages: Vec<String>| StorageError::Invalid {
        path: path.to_path_buf(),
        messages,
    };
    let schema: Value = serde_json::from_str(TODOS_SCHEMA)
        .map_err(|err| invalid(vec![format!("parse schema: {}", err)]))?;
    let compiled =
        validator_for(&schema).map_err(|err| invalid(vec![format!("invalid schema: {}", err)]))?;
    let messages: Vec<String> = compiled
        .iter_errors(document)
        .map(|err| err.to_string())
        .collect();
    if messages.is_empty() {
        Ok(())
    } else {
        Err(invalid(messages))
    }
}

fn validate_collection(path: &Path, todos: &[Todo]) -> Result<(), StorageError> {
    let messages = validate_invariants(todos);
    if messages.is_empty() {
        return Ok(());
    }
    Err(StorageError::Invalid {
        path: path.to_path_buf(),
        messages,
    })
}

fn write_atomic(path: &Path, tmp_path: &Path, contents: &str) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(write_error(parent))?;
    }
    fs::write(tmp_path, contents).map_err(write_error(tmp_path))?;
    fs::rename(tmp_path, path).map_err(write_error(path))?;
    Ok(())
}

fn write_error(path: &Path) -> impl FnOnce(std::io::Error) -> StorageError {
    let path = path.to_path_buf();
    move |source| StorageError::Write { path, source }
}
