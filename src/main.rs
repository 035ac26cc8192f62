use std::fs::OpenOptions;
use std::sync::Arc;

use anyhow::Context;
use crossterm::{execute, terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen}};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::EnvFilter;

use todo_dashboard::{
    application::{dashboard::Dashboard, dispatcher::Dispatcher, session::Session},
    config::Config,
    infrastructure::{file_store::FileStore, http_api::HttpTodoApi},
    ui::{self, App},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let config = Config::from_env();

    // The terminal belongs to the UI, so logs go to a file
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)
        .with_context(|| format!("failed to open log file {}", config.log_file.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_ansi(false)
        .with_writer(Arc::new(log_file))
        .init();

    let api = HttpTodoApi::new(&config.api_base_url)?;
    tracing::info!(base_url = %api.base_url(), storage = %config.storage_path.display(), "starting");
    let store = FileStore::open(&config.storage_path)?;
    let app = App::new(Dashboard::new(Session::restore(store)));

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let res = ui::run(&mut terminal, app, Dispatcher::new(api)).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}
