//! Quote Wizard
//!
//! Terminal front of a freight brokerage: a home page and a three-step
//! quote request form that submits to the hosted quote store. The `quotes`
//! subcommands list requests and update their status.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use tracing::{info, warn};

use quote_wizard::application::{App, AppMode, QuoteSubmitter, SubmissionDispatcher};
use quote_wizard::infrastructure::{
    AppConfig, RestQuoteStore, UnconfiguredStore, init_file_logging, init_stderr_logging,
};
use quote_wizard::presentation::{
    Cli, Commands, InputHandler, QuoteTerminal, install_panic_hook, render_ui, restore_terminal,
    run_quotes, setup_terminal,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Tui) {
        Commands::Tui => {
            let _guard = init_file_logging(&AppConfig::data_dir(), cli.verbose)?;
            let config = AppConfig::load();
            run_tui(&config).await?;
        }
        Commands::Quotes(args) => {
            init_stderr_logging(cli.verbose);
            let config = AppConfig::load();
            run_quotes(args, &config).await?;
        }
    }

    Ok(())
}

fn build_submitter(config: &AppConfig) -> Arc<dyn QuoteSubmitter> {
    match RestQuoteStore::new(&config.store) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            warn!("quote store unavailable: {e}");
            Arc::new(UnconfiguredStore::new(&e))
        }
    }
}

async fn run_tui(config: &AppConfig) -> io::Result<()> {
    let mut dispatcher = SubmissionDispatcher::new(build_submitter(config));
    let tick = Duration::from_millis(config.tui.tick_rate_ms);

    install_panic_hook();
    let mut terminal = setup_terminal()?;
    info!("terminal session started");

    let mut app = App::default();
    let result = run_app(&mut terminal, &mut app, &mut dispatcher, tick);

    restore_terminal(&mut terminal)?;
    info!("terminal session ended");

    // A closed form does not cancel its request; let it reach the store.
    if dispatcher.in_flight() > 0 {
        eprintln!("Waiting for the quote request to reach the store...");
    }
    let grace = Duration::from_secs(config.store.timeout_secs);
    dispatcher.shutdown(grace).await;
    result
}

/// Draws, handles at most one key per tick, then hands queued submissions
/// to the dispatcher and applies any finished ones.
fn run_app(
    terminal: &mut QuoteTerminal,
    app: &mut App,
    dispatcher: &mut SubmissionDispatcher,
    tick: Duration,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| render_ui(f, app))?;

        if event::poll(tick)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            match key.code {
                KeyCode::Char('q')
                    if matches!(app.mode, AppMode::Home) && !app.quote_modal.is_visible() =>
                {
                    return Ok(());
                }
                _ => InputHandler::handle_key_event(app, key.code, key.modifiers),
            }
        }

        if let Some(pending) = app.take_outbox() {
            dispatcher.dispatch(pending);
        }
        while let Some(outcome) = dispatcher.try_recv() {
            app.apply_outcome(outcome);
        }
    }
}
