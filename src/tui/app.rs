use std::cell::Cell;

use crate::app::Config;
use crate::constants::{UI_PAGE_LINES, UI_SCROLL_LINES};
use crate::runtime::Orchestrator;

/// Application shell around the orchestrator: display metadata and the
/// handful of flags that only matter to the terminal.
pub struct App {
    /// Drives every change to the conversation state
    pub orchestrator: Orchestrator,
    /// Is the app running?
    pub running: bool,
    /// Show the source selector panel
    pub show_sources: bool,
    /// Server URL for display
    pub server_url: String,
    /// Model name for display
    pub model_name: String,
    /// Session id for display
    pub session_id: String,
    /// Wrapped chat rows above the viewport, measured on the last draw
    max_scroll: Cell<u16>,
}

impl App {
    /// Create a new app instance
    pub fn new(orchestrator: Orchestrator, config: &Config) -> Self {
        let session_id = orchestrator.session_id().to_string();
        Self {
            model_name: orchestrator.model().to_string(),
            orchestrator,
            running: true,
            show_sources: config.ui.show_sources,
            server_url: config.server.base_url.clone(),
            session_id,
            max_scroll: Cell::new(0),
        }
    }

    /// Send whatever is in the input box
    pub fn submit_input(&mut self) {
        let input = {
            let state = self.orchestrator.state();
            let mut state = state.lock();
            state.clear_status();
            state.input.clone()
        };
        // Blank input yields no task; there is nothing to report either way
        let _ = self.orchestrator.spawn_submit(&input);
    }

    pub fn push_char(&mut self, c: char) {
        self.orchestrator.state().lock().input.push(c);
    }

    pub fn pop_char(&mut self) {
        self.orchestrator.state().lock().input.pop();
    }

    pub fn clear_input(&mut self) {
        self.orchestrator.state().lock().input.clear();
    }

    pub fn input(&self) -> String {
        self.orchestrator.state().lock().input.clone()
    }

    /// Set status message
    pub fn set_status(&self, message: impl Into<String>) {
        self.orchestrator.state().lock().set_status(message);
    }

    /// Reload the catalog in the background
    pub fn reload_sources(&self) {
        self.set_status("Cargando fuentes...");
        let orchestrator = self.orchestrator.clone();
        tokio::spawn(async move {
            orchestrator.load_sources().await;
            let state = orchestrator.state();
            let mut state = state.lock();
            if state.selector.notice().is_none() {
                state.clear_status();
            }
        });
    }

    /// Scroll chat view up
    pub fn scroll_up(&mut self, page: bool) {
        let amount = if page { UI_PAGE_LINES } else { UI_SCROLL_LINES };
        let max_offset = self.max_scroll.get();
        self.orchestrator
            .state()
            .lock()
            .timeline
            .scroll_up(amount, max_offset);
    }

    /// Record how far the chat view can scroll at its current size
    pub fn set_max_scroll(&self, rows: u16) {
        self.max_scroll.set(rows);
    }

    /// Scroll chat view down
    pub fn scroll_down(&mut self, page: bool) {
        let amount = if page { UI_PAGE_LINES } else { UI_SCROLL_LINES };
        self.orchestrator.state().lock().timeline.scroll_down(amount);
    }

    /// Quit the application
    pub fn quit(&mut self) {
        self.running = false;
    }
}
