//! Main TUI application loop.
//!
//! Handles:
//! - Input events (keys and drag-and-drop pastes)
//! - Routing selections from the upload surface into the controller
//! - Applying worker completions
//! - Drawing the screen from controller state

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{
        self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyCode, KeyEvent,
        KeyEventKind, KeyModifiers,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};

use crate::adapters::HttpPredictionClient;
use crate::application::{Report, ScreeningController, ScreeningService, UploadRejection, UploadSurface};
use crate::config::Config;
use crate::domain::{SelectedFile, ServerSummary};
use crate::ports::PredictionClient;

use super::ui::{
    render_alert, render_error_banner, render_footer, render_header,
    report::render_report,
    upload::{render_preview_section, render_upload_zone},
};
use super::worker::{WorkerEvent, Workers};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Main application state
pub struct App<P>
where
    P: PredictionClient + 'static,
{
    /// Server address shown in the header
    api_url: String,

    /// Session state owner
    controller: ScreeningController,

    /// Path entry and selection validation
    upload: UploadSurface,

    workers: Workers<P>,

    /// Last probe result
    server: ServerSummary,

    /// Blocking alert for rejected selections
    alert: Option<String>,

    /// Report derived from the current result
    report: Option<Report>,

    /// Animation counter for the in-flight spinner
    tick: usize,

    should_quit: bool,
}

impl App<HttpPredictionClient> {
    /// Create a new application talking to the configured server.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built.
    pub fn new(config: &Config) -> Result<Self> {
        let client = HttpPredictionClient::new(config)?;
        Ok(Self::with_client(config, client))
    }
}

impl<P> App<P>
where
    P: PredictionClient + 'static,
{
    /// Create application with an injected prediction client.
    pub fn with_client(config: &Config, client: P) -> Self {
        let service = Arc::new(ScreeningService::new(Arc::new(client)));

        Self {
            api_url: config.api_url.clone(),
            controller: ScreeningController::new(),
            upload: UploadSurface::new(),
            workers: Workers::new(service),
            server: ServerSummary::default(),
            alert: None,
            report: None,
            tick: 0,
            should_quit: false,
        }
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        self.workers.spawn_probe();

        let result = self.main_loop(&mut terminal);

        // Restore terminal
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableBracketedPaste
        )?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            self.poll_workers();
            self.tick = self.tick.wrapping_add(1);

            terminal.draw(|f| self.draw(f))?;

            if event::poll(POLL_INTERVAL)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
                    Event::Paste(text) => self.handle_paste(&text),
                    _ => {}
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Apply every completion the workers have reported so far.
    fn poll_workers(&mut self) {
        while let Some(event) = self.workers.try_recv() {
            self.apply_event(event);
        }
    }

    fn apply_event(&mut self, event: WorkerEvent) {
        match event {
            WorkerEvent::PreviewReady { generation, preview } => {
                self.controller.apply_preview(generation, preview);
            }
            WorkerEvent::PredictionFinished {
                generation,
                outcome,
            } => {
                if self.controller.apply_prediction(generation, outcome) {
                    self.report = self.controller.state().result.as_ref().map(Report::today);
                }
            }
            WorkerEvent::ServerProbed(summary) => {
                self.server = summary;
            }
        }
    }

    fn draw(&self, f: &mut Frame) {
        let state = self.controller.state();
        let banner_height = if state.error.is_some() { 3 } else { 0 };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),             // Header
                Constraint::Length(banner_height), // Error banner
                Constraint::Min(0),                // Content
                Constraint::Length(2),             // Footer
            ])
            .split(f.area());

        render_header(f, chunks[0], &self.server, &self.api_url);

        if let Some(message) = &state.error {
            render_error_banner(f, chunks[1], message);
        }

        if state.selected.is_none() {
            render_upload_zone(f, chunks[2], self.upload.input());
        } else {
            let content = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(9), Constraint::Min(0)])
                .split(chunks[2]);

            render_preview_section(f, content[0], state, self.tick);
            if let Some(report) = &self.report {
                render_report(f, content[1], report);
            }
        }

        render_footer(f, chunks[3], self.key_hints());

        if let Some(message) = &self.alert {
            render_alert(f, message);
        }
    }

    fn key_hints(&self) -> &'static [(&'static str, &'static str)] {
        if self.alert.is_some() {
            &[("Enter", "Dismiss")]
        } else if self.controller.state().selected.is_none() {
            &[("Enter", "Select"), ("Esc", "Clear"), ("Ctrl+Q", "Quit")]
        } else {
            &[("Enter/a", "Analyze"), ("r", "Upload New Image"), ("q", "Quit")]
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        // Global quit handling
        if matches!(key.code, KeyCode::Char('q') | KeyCode::Char('c'))
            && key.modifiers.contains(KeyModifiers::CONTROL)
        {
            self.should_quit = true;
            return;
        }

        if self.alert.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.alert = None;
            }
            return;
        }

        if self.controller.state().selected.is_none() {
            self.handle_upload_key(key.code);
        } else {
            self.handle_session_key(key.code);
        }
    }

    fn handle_upload_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char(c) => self.upload.input_char(c),
            KeyCode::Backspace => self.upload.delete_char(),
            KeyCode::Esc => self.upload.clear_input(),
            KeyCode::Enter => {
                if self.upload.input().trim().is_empty() {
                    // Nothing chosen yet: let the controller report it.
                    self.predict();
                } else {
                    let outcome = self.upload.submit();
                    self.on_selection(outcome);
                }
            }
            _ => {}
        }
    }

    fn handle_session_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Enter | KeyCode::Char('a') | KeyCode::Char('A') => self.predict(),
            KeyCode::Char('r') | KeyCode::Char('R') | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.controller.on_reset();
                self.upload.clear_input();
                self.report = None;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            _ => {}
        }
    }

    /// A file dropped onto the terminal arrives as a bracketed paste.
    fn handle_paste(&mut self, text: &str) {
        if self.alert.is_some() {
            return;
        }
        let outcome = self.upload.drop_file(text);
        self.on_selection(outcome);
    }

    fn on_selection(&mut self, outcome: Result<Option<SelectedFile>, UploadRejection>) {
        match outcome {
            Ok(Some(file)) => {
                self.report = None;
                let ticket = self.controller.on_image_select(file);
                self.workers.spawn_preview(ticket);
            }
            Ok(None) => {}
            Err(rejection) => self.alert = Some(rejection.to_string()),
        }
    }

    fn predict(&mut self) {
        if let Some(ticket) = self.controller.on_predict() {
            self.workers.spawn_prediction(ticket);
        }
    }
}
