//! Application configuration stored in `todos.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = "todos.toml";

/// Application configuration (TOML).
///
/// Meant to be edited by hand. Missing fields fall back to the defaults
/// below, so an absent file is equivalent to an empty one.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TodosConfig {
    /// JSON document holding the to-do collection.
    pub data_file: PathBuf,

    /// Directory of static assets served under `/static`.
    pub static_dir: PathBuf,

    pub server: ServerConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind the HTTP server to.
    pub bind: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

impl Default for TodosConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("todos.json"),
            static_dir: PathBuf::from("static"),
            server: ServerConfig::default(),
        }
    }
}

impl TodosConfig {
    pub fn validate(&self) -> Result<()> {
        if self.data_file.as_os_str().is_empty() {
            return Err(anyhow!("data_file must not be empty"));
        }
        if self.server.bind.trim().is_empty() {
            return Err(anyhow!("server.bind must not be empty"));
        }
        if self.server.port == 0 {
            return Err(anyhow!("server.port must be > 0"));
        }
        Ok(())
    }

    /// `bind:port` string for the listener.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.bind, self.server.port)
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `TodosConfig::default()`.
pub fn load_config(path: &Path) -> Result<TodosConfig> {
    if !path.exists() {
        let cfg = TodosConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: TodosConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("validate {}", path.display()))?;
    Ok(cfg)
}
