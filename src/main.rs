use anyhow::Result;

mod api;
mod app;
mod chat;
mod config;
mod handler;
mod history;
mod transcript;
mod tui;
mod ui;
mod upload;

use api::ApiClient;
use app::App;
use config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load().unwrap_or_default();

    // Diagnostics go to a file; stderr belongs to the alternate screen.
    if let Err(err) = init_logging() {
        eprintln!("warning: could not initialize log file: {err}");
    }

    let api = ApiClient::new(&config.api_base_url());
    let mut app = App::new(api);
    app.load_history();

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = tui::EventHandler::new();

    let result = run(&mut terminal, &mut app, &mut events).await;

    tui::restore()?;
    result
}

async fn run(terminal: &mut tui::Tui, app: &mut App, events: &mut tui::EventHandler) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(app, event).await?,
            None => break,
        }
    }
    Ok(())
}

fn init_logging() -> Result<()> {
    let log_dir = Config::log_dir()?;
    std::fs::create_dir_all(&log_dir)?;
    let log_file = std::fs::File::create(log_dir.join("support-chat.log"))?;

    tracing_subscriber::fmt()
        .with_writer(std::sync::Mutex::new(log_file))
        .with_ansi(false)
        .init();
    Ok(())
}
