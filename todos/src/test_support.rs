//! Test-only helpers for constructing to-do records and stores.

use chrono::{NaiveDate, NaiveDateTime};

use crate::io::store::MemoryStore;
use crate::record::{Collection, Priority, Todo};
use crate::service::TodoService;

/// Fixed creation timestamp used by every builder here.
pub fn fixed_created_at() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 1)
        .and_then(|date| date.and_hms_opt(9, 30, 0))
        .expect("valid fixed timestamp")
}

/// Create a deterministic open record with default optional fields.
pub fn todo(id: u64, title: &str) -> Todo {
    Todo {
        id,
        title: title.to_string(),
        description: None,
        priority: Priority::Medium,
        due_date: None,
        completed: false,
        created_at: fixed_created_at(),
    }
}

/// Create a record with an explicit `completed` flag.
pub fn completed_todo(id: u64, title: &str) -> Todo {
    let mut record = todo(id, title);
    record.completed = true;
    record
}

/// Build a collection with the given ids, titled `todo <id>`.
pub fn collection_with_ids(ids: &[u64]) -> Collection {
    ids.iter()
        .map(|id| todo(*id, &format!("todo {}", id)))
        .collect()
}

/// A service over an in-memory store pre-seeded with `todos`.
pub fn memory_service(todos: &[Todo]) -> TodoService<MemoryStore> {
    let store = MemoryStore::with_todos(todos).expect("seed memory store");
    TodoService::new(store)
}
