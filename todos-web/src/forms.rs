//! Form-field extraction for the add and edit pages.

use serde::Deserialize;
use todos::TodoError;
use todos::record::{NewTodo, Priority, TodoPatch};

use crate::pages::FormValues;

/// Urlencoded body posted by the add and edit forms. Every field is
/// optional on the wire; a field that is absent is left untouched on edit.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TodoForm {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub due_date: Option<String>,
}

impl TodoForm {
    /// Input for `create`. A missing priority means `medium`.
    pub fn to_new_todo(&self) -> Result<NewTodo, TodoError> {
        Ok(NewTodo {
            title: self.title.clone().unwrap_or_default(),
            description: self.description.as_deref().and_then(non_blank),
            priority: parse_priority(self.priority.as_deref())?.unwrap_or_default(),
            due_date: self.due_date.as_deref().and_then(non_blank),
        })
    }

    /// Input for `update`. Submitted-but-empty optional fields clear the value.
    pub fn to_patch(&self) -> Result<TodoPatch, TodoError> {
        Ok(TodoPatch {
            title: self.title.clone(),
            description: self.description.as_deref().map(non_blank),
            priority: parse_priority(self.priority.as_deref())?,
            due_date: self.due_date.as_deref().map(non_blank),
        })
    }

    /// Values to echo back into a re-displayed form.
    pub fn values(&self) -> FormValues {
        let defaults = FormValues::default();
        FormValues {
            title: self.title.clone().unwrap_or_default(),
            description: self.description.clone().unwrap_or_default(),
            priority: self
                .priority
                .clone()
                .filter(|p| !p.trim().is_empty())
                .unwrap_or(defaults.priority),
            due_date: self.due_date.clone().unwrap_or_default(),
        }
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn parse_priority(value: Option<&str>) -> Result<Option<Priority>, TodoError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw
            .parse::<Priority>()
            .map(Some)
            .map_err(|err| TodoError::Validation(err.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(title: &str, description: &str, priority: &str, due_date: &str) -> TodoForm {
        TodoForm {
            title: Some(title.to_string()),
            description: Some(description.to_string()),
            priority: Some(priority.to_string()),
            due_date: Some(due_date.to_string()),
        }
    }

    #[test]
    fn new_todo_drops_blank_optionals_and_defaults_priority() {
        let input = form("Buy milk", "  ", "", "").to_new_todo().expect("valid");
        assert_eq!(input, NewTodo::titled("Buy milk"));
    }

    #[test]
    fn new_todo_keeps_supplied_fields() {
        let input = form("Buy milk", "oat", "High", "2024-06-01")
            .to_new_todo()
            .expect("valid");
        assert_eq!(input.description.as_deref(), Some("oat"));
        assert_eq!(input.priority, Priority::High);
        assert_eq!(input.due_date.as_deref(), Some("2024-06-01"));
    }

    #[test]
    fn unknown_priority_is_a_validation_error() {
        let err = form("x", "", "urgent", "").to_new_todo().expect_err("bad");
        assert!(matches!(err, TodoError::Validation(message) if message.contains("urgent")));
    }

    #[test]
    fn patch_distinguishes_absent_from_cleared() {
        let patch = TodoForm {
            description: Some(String::new()),
            ..TodoForm::default()
        }
        .to_patch()
        .expect("valid");

        assert_eq!(patch.title, None);
        assert_eq!(patch.description, Some(None));
        assert_eq!(patch.priority, None);
        assert_eq!(patch.due_date, None);
    }

    #[test]
    fn values_fall_back_to_default_priority() {
        let values = TodoForm::default().values();
        assert_eq!(values, FormValues::default());
        assert_eq!(values.priority, "medium");
    }
}
