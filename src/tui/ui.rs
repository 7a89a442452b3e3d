use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;
use tracing::error;

use crate::constants::UI_POLL_INTERVAL_MS;
use crate::tui::render::render_ui;
use crate::tui::App;
use crate::utils::ClientError;

const HELP_TEXT: &str =
    ":sources recarga fuentes | :quit sale | Tab/Shift+Tab cambia la fuente | PageUp/PageDown desplaza";

/// Run the terminal UI
pub async fn run_ui(mut app: App) -> Result<()> {
    if !crossterm::tty::IsTty::is_tty(&io::stdout()) {
        eprintln!("❌ sourcechat requires an interactive terminal.");
        eprintln!("   For scripted use try: sourcechat --prompt \"...\"");
        return Err(ClientError::UIError("No interactive terminal available".to_string()).into());
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Page load: the greeting shows up after its delay, the catalog whenever
    // it arrives
    let greeter = app.orchestrator.clone();
    tokio::spawn(async move { greeter.seed_greeting().await });
    app.reload_sources();

    let res = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!("UI loop failed: {:?}", err);
    }

    res
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    while app.running {
        let state = app.orchestrator.snapshot();
        terminal.draw(|f| render_ui(f, app, &state))?;

        // Poll without blocking the runtime so exchanges keep progressing
        let ready = tokio::task::block_in_place(|| {
            event::poll(Duration::from_millis(UI_POLL_INTERVAL_MS))
        })?;
        if !ready {
            continue;
        }

        if let Event::Key(key) = event::read()? {
            handle_key(app, key);
        }
    }

    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') => app.quit(),
            KeyCode::Char('r') => app.reload_sources(),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Enter => match parse_command(&app.input()) {
            Some(command) => {
                handle_command(app, command);
                app.clear_input();
            }
            None => app.submit_input(),
        },
        KeyCode::Esc => app.clear_input(),
        KeyCode::Char(c) => app.push_char(c),
        KeyCode::Backspace => app.pop_char(),
        KeyCode::Tab => {
            app.orchestrator.select_next_source();
        }
        KeyCode::BackTab => {
            app.orchestrator.select_previous_source();
        }
        KeyCode::Up => app.scroll_up(false),
        KeyCode::Down => app.scroll_down(false),
        KeyCode::PageUp => app.scroll_up(true),
        KeyCode::PageDown => app.scroll_down(true),
        _ => {}
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UiCommand {
    Quit,
    ReloadSources,
    Help,
}

/// Known `:` commands. Anything else, colon or not, is a question.
fn parse_command(input: &str) -> Option<UiCommand> {
    match input.trim().strip_prefix(':')?.trim() {
        "quit" | "q" => Some(UiCommand::Quit),
        "sources" | "s" => Some(UiCommand::ReloadSources),
        "help" | "h" => Some(UiCommand::Help),
        _ => None,
    }
}

fn handle_command(app: &mut App, command: UiCommand) {
    match command {
        UiCommand::Quit => app.quit(),
        UiCommand::ReloadSources => app.reload_sources(),
        UiCommand::Help => app.set_status(HELP_TEXT),
    }
}
