use anyhow::Result;

mod app;
mod client;
mod config;
mod conversation;
mod handler;
mod prompt;
mod tui;
mod ui;

use app::App;
use config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load().unwrap_or_default();

    tui::install_panic_hook();
    let mut terminal = tui::init()?;

    let result = run(&mut terminal, &config).await;

    tui::restore()?;
    result
}

async fn run(terminal: &mut tui::Tui, config: &Config) -> Result<()> {
    let mut app = App::new(config);
    let mut events = tui::EventHandler::new();

    // Kick off the first exchange as soon as the screen is up
    app.conversation.start(&config.opening_line());

    while !app.should_quit {
        terminal.draw(|frame| ui::render(&mut app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(&mut app, event).await?,
            None => break,
        }
    }

    Ok(())
}
