//! Id assignment and lookup.

use crate::record::Todo;

/// Next id for a new record: one past the largest id present, or `1` when
/// the collection is empty. `None` once the largest id is `u64::MAX`.
///
/// Gaps left by deleted records are never reused below the current maximum.
/// Two callers working from the same snapshot compute the same id; writes are
/// assumed to come from a single writer.
pub fn next_id(todos: &[Todo]) -> Option<u64> {
    match todos.iter().map(|todo| todo.id).max() {
        Some(max) => max.checked_add(1),
        None => Some(1),
    }
}

/// Position of the record with `id`, if present.
pub fn position_of(todos: &[Todo], id: u64) -> Option<usize> {
    todos.iter().position(|todo| todo.id == id)
}
