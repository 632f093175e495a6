//! Record operations: load the collection, change it in memory, save it back.
//!
//! Every call is a full read-modify-write against the store. Nothing is
//! cached between calls.

use chrono::Local;
use tracing::{debug, info};

use crate::core::ids::{next_id, position_of};
use crate::error::{Result, TodoError};
use crate::io::store::RecordStore;
use crate::record::{Collection, NewTodo, Todo, TodoPatch};

pub struct TodoService<S> {
    store: S,
}

impl<S: RecordStore> TodoService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// All records in creation order.
    pub fn list(&self) -> Result<Collection> {
        Ok(self.store.load()?)
    }

    pub fn find(&self, id: u64) -> Result<Option<Todo>> {
        let todos = self.store.load()?;
        Ok(todos.into_iter().find(|todo| todo.id == id))
    }

    /// Create a record with the next free id, `completed=false` and the
    /// current local time as `created_at`.
    ///
    /// Fails with [`TodoError::Validation`] without writing once the largest
    /// stored id is `u64::MAX`.
    pub fn create(&self, input: NewTodo) -> Result<Todo> {
        let title = required_title(&input.title)?;
        let mut todos = self.store.load()?;
        let id = next_id(&todos)
            .ok_or_else(|| TodoError::Validation("id space exhausted".to_string()))?;
        let todo = Todo {
            id,
            title,
            description: input.description,
            priority: input.priority,
            due_date: input.due_date,
            completed: false,
            created_at: Local::now().naive_local(),
        };
        todos.push(todo.clone());
        self.store.save(&todos)?;
        info!(id = todo.id, title = %todo.title, "todo created");
        Ok(todo)
    }

    /// Overwrite the supplied fields of record `id`.
    ///
    /// Fails with [`TodoError::NotFound`] when `id` is absent; nothing is
    /// written in that case.
    pub fn update(&self, id: u64, mut patch: TodoPatch) -> Result<Todo> {
        if let Some(title) = patch.title.as_deref() {
            patch.title = Some(required_title(title)?);
        }
        let mut todos = self.store.load()?;
        let index = position_of(&todos, id).ok_or(TodoError::NotFound(id))?;
        todos[index].apply(patch);
        self.store.save(&todos)?;
        info!(id, "todo updated");
        Ok(todos.swap_remove(index))
    }

    /// Flip `completed` on record `id`. Returns `None` without writing when
    /// the id is absent.
    pub fn toggle_completed(&self, id: u64) -> Result<Option<Todo>> {
        let mut todos = self.store.load()?;
        let Some(index) = position_of(&todos, id) else {
            debug!(id, "toggle of missing todo ignored");
            return Ok(None);
        };
        todos[index].completed = !todos[index].completed;
        self.store.save(&todos)?;
        info!(id, completed = todos[index].completed, "todo toggled");
        Ok(Some(todos.swap_remove(index)))
    }

    /// Remove record `id` if present. Returns whether a record was removed.
    ///
    /// The collection is written back either way.
    pub fn delete(&self, id: u64) -> Result<bool> {
        let mut todos = self.store.load()?;
        let before = todos.len();
        todos.retain(|todo| todo.id != id);
        let removed = todos.len() != before;
        self.store.save(&todos)?;
        if removed {
            info!(id, "todo deleted");
        } else {
            debug!(id, "delete of missing todo ignored");
        }
        Ok(removed)
    }
}

fn required_title(title: &str) -> Result<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(TodoError::Validation("title is required".to_string()));
    }
    Ok(trimmed.to_string())
}
