//! Single-user to-do list persisted to one JSON file.
//!
//! The crate keeps a strict separation:
//!
//! - **[`core`]**: Pure logic over the collection (id assignment, invariants).
//!   No I/O.
//! - **[`io`]**: The [`io::store::RecordStore`] seam and configuration loading.
//!
//! [`service::TodoService`] ties them together: every operation loads the
//! whole collection, changes it in memory and writes it back.

pub mod core;
pub mod error;
pub mod io;
pub mod logging;
pub mod record;
pub mod service;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use error::{StorageError, TodoError};
pub use io::store::{FileStore, MemoryStore, RecordStore};
pub use record::{Collection, NewTodo, Priority, Todo, TodoPatch};
pub use service::TodoService;
