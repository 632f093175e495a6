//! Shared application state for the web server.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use todos::{FileStore, TodoService};

use crate::pages::Pages;

/// Shared state accessible from all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Record operations over the configured data file.
    pub todos: Arc<TodoService<FileStore>>,
    /// Compiled HTML templates.
    pub pages: Arc<Pages>,
}

impl AppState {
    pub fn new(data_file: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            todos: Arc::new(TodoService::new(FileStore::new(data_file))),
            pages: Arc::new(Pages::new()?),
        })
    }
}
