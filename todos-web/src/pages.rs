//! HTML page rendering with minijinja.

use anyhow::Result;
use minijinja::{Environment, context};
use serde::Serialize;
use todos::record::{Priority, Todo};

const BASE_TEMPLATE: &str = include_str!("templates/base.html");
const INDEX_TEMPLATE: &str = include_str!("templates/index.html");
const FORM_TEMPLATE: &str = include_str!("templates/form.html");
const VIEW_TEMPLATE: &str = include_str!("templates/view.html");

/// Raw form field values, echoed back when a form is re-displayed.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FormValues {
    pub title: String,
    pub description: String,
    pub priority: String,
    pub due_date: String,
}

impl Default for FormValues {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            priority: Priority::default().to_string(),
            due_date: String::new(),
        }
    }
}

impl From<&Todo> for FormValues {
    fn from(todo: &Todo) -> Self {
        Self {
            title: todo.title.clone(),
            description: todo.description.clone().unwrap_or_default(),
            priority: todo.priority.to_string(),
            due_date: todo.due_date.clone().unwrap_or_default(),
        }
    }
}

/// Which form is being rendered.
#[derive(Debug, Clone, Copy)]
pub enum FormKind {
    Add,
    Edit(u64),
}

/// Template engine wrapper around minijinja. Templates are compiled once at
/// startup; `.html` names get HTML auto-escaping.
pub struct Pages {
    env: Environment<'static>,
}

impl Pages {
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        env.add_template("base.html", BASE_TEMPLATE)?;
        env.add_template("index.html", INDEX_TEMPLATE)?;
        env.add_template("form.html", FORM_TEMPLATE)?;
        env.add_template("view.html", VIEW_TEMPLATE)?;
        Ok(Self { env })
    }

    pub fn index(&self, todos: &[Todo]) -> Result<String> {
        let completed = todos.iter().filter(|todo| todo.completed).count();
        let template = self.env.get_template("index.html")?;
        let rendered = template.render(context! {
            todos => todos,
            open => todos.len() - completed,
            completed => completed,
        })?;
        Ok(rendered)
    }

    pub fn form(&self, kind: FormKind, values: &FormValues, error: Option<&str>) -> Result<String> {
        let (heading, edit_id, submit) = match kind {
            FormKind::Add => ("Add todo", None, "Add"),
            FormKind::Edit(id) => ("Edit todo", Some(id), "Save"),
        };
        let priorities: Vec<&str> = Priority::ALL.iter().map(|p| p.as_str()).collect();
        let template = self.env.get_template("form.html")?;
        let rendered = template.render(context! {
            heading => heading,
            edit_id => edit_id,
            submit => submit,
            values => values,
            priorities => priorities,
            error => error,
        })?;
        Ok(rendered)
    }

    pub fn view(&self, todo: &Todo) -> Result<String> {
        let template = self.env.get_template("view.html")?;
        Ok(template.render(context! { todo => todo })?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use todos::test_support::{completed_todo, todo};

    #[test]
    fn index_lists_todos_with_counts() {
        let pages = Pages::new().expect("pages");
        let html = pages
            .index(&[todo(1, "Buy milk"), completed_todo(2, "Call mom")])
            .expect("render");
        assert!(html.contains("1 open, 1 completed"));
        assert!(html.contains("href=\"/view/1\">Buy milk</a>"));
        assert!(html.contains("href=\"/toggle/2\""));
    }

    #[test]
    fn empty_index_offers_add_link() {
        let pages = Pages::new().expect("pages");
        let html = pages.index(&[]).expect("render");
        assert!(html.contains("Nothing to do."));
    }

    #[test]
    fn titles_are_html_escaped() {
        let pages = Pages::new().expect("pages");
        let html = pages.view(&todo(1, "<script>x</script>")).expect("render");
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>x"));
    }

    #[test]
    fn edit_form_echoes_values_and_selects_priority() {
        let pages = Pages::new().expect("pages");
        let mut record = todo(7, "Buy milk");
        record.priority = Priority::High;
        let html = pages
            .form(FormKind::Edit(7), &FormValues::from(&record), Some("title is required"))
            .expect("render");
        assert!(html.contains("action=\"/edit/7\""));
        assert!(html.contains("value=\"Buy milk\""));
        assert!(html.contains("<option value=\"high\" selected>"));
        assert!(html.contains("title is required"));
    }
}
