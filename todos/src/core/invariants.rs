//! Collection invariants not expressible via JSON Schema.

use std::collections::HashSet;

use crate::record::Todo;

/// Check semantic invariants of a collection: no duplicate ids.
///
/// Blank titles are refused at input time only. Documents written before that
/// rule may still hold them and must keep loading.
pub fn validate_invariants(todos: &[Todo]) -> Vec<String> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();
    for (index, todo) in todos.iter().enumerate() {
        if !seen.insert(todo.id) {
            errors.push(format!("duplicate id {} at index {}", todo.id, index));
        }
    }
    errors
}
