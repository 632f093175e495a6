//! Todos web server - HTML pages and a read-only JSON API over one data file.

mod forms;
mod pages;
mod routes;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use todos::io::config::{DEFAULT_CONFIG_PATH, TodosConfig, load_config};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::state::AppState;

#[derive(Parser)]
#[command(name = "todos-web")]
#[command(about = "Web UI for a single-user to-do list stored in a JSON file")]
struct Args {
    /// Path to the TOML config file (missing file means defaults)
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Address to bind the server to (overrides config)
    #[arg(long)]
    bind: Option<String>,

    /// Port to listen on (overrides config)
    #[arg(long)]
    port: Option<u16>,

    /// JSON file holding the todos (overrides config)
    #[arg(long)]
    data_file: Option<PathBuf>,

    /// Directory of static assets served under /static (overrides config)
    #[arg(long)]
    static_dir: Option<PathBuf>,
}

impl Args {
    /// Load the config file and apply command-line overrides on top.
    fn resolve_config(&self) -> anyhow::Result<TodosConfig> {
        let mut cfg = load_config(&self.config)?;
        if let Some(bind) = &self.bind {
            cfg.server.bind = bind.clone();
        }
        if let Some(port) = self.port {
            cfg.server.port = port;
        }
        if let Some(data_file) = &self.data_file {
            cfg.data_file = data_file.clone();
        }
        if let Some(static_dir) = &self.static_dir {
            cfg.static_dir = static_dir.clone();
        }
        cfg.validate().context("invalid command-line overrides")?;
        Ok(cfg)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    todos::logging::init("todos=info,todos_web=info,tower_http=info");

    let args = Args::parse();
    let cfg = args.resolve_config()?;
    info!(data_file = %cfg.data_file.display(), "starting todos-web");

    let state = AppState::new(cfg.data_file.clone())?;
    let mut app = routes::app(state);

    if cfg.static_dir.is_dir() {
        info!(static_dir = %cfg.static_dir.display(), "serving static files");
        app = app.nest_service("/static", ServeDir::new(&cfg.static_dir));
    } else {
        info!(static_dir = %cfg.static_dir.display(), "static directory not found, serving unstyled pages");
    }
    let app = app.layer(TraceLayer::new_for_http());

    let addr: SocketAddr = cfg
        .listen_addr()
        .parse()
        .with_context(|| format!("parse listen address {}", cfg.listen_addr()))?;
    info!(addr = %addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
