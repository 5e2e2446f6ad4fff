//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into core `Action` values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Redraw Strategy
//!
//! The event loop uses conditional redraw to avoid unnecessary work:
//!
//! - **Animating** (loading spinner, result bars filling): draws every ~80ms.
//! - **Idle**: sleeps up to 500ms, only redraws on events, background
//!   actions, or terminal resize.

mod component;
mod components;
mod event;
pub mod markdown;
mod ui;

use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use log::{debug, info, warn};
use tui_scrollview::ScrollViewState;

use crate::analysis::{AnalysisBoundary, HttpAnalysisClient};
use crate::core::action::{Action, Effect};
use crate::core::config::ResolvedConfig;
use crate::core::input::Sample;
use crate::core::orchestrator::Orchestrator;
use crate::core::state::{App, DiseasePanel, UiState};
use crate::render::report;
use crate::store;
use crate::tui::components::input_box::edit_for;
use crate::tui::components::results;
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// Far enough past every reveal that bars draw full.
const SETTLED: Duration = Duration::from_secs(60);

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub results_scroll: ScrollViewState,
    /// When the current results screen first appeared; drives the bar reveal.
    pub results_shown_at: Option<Instant>,
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            results_scroll: ScrollViewState::default(),
            results_shown_at: None,
        }
    }

    pub fn mark_results_shown(&mut self) {
        self.results_scroll = ScrollViewState::default();
        self.results_shown_at = Some(Instant::now());
    }

    pub fn results_elapsed(&self) -> Duration {
        self.results_shown_at
            .map(|t| t.elapsed())
            .unwrap_or(SETTLED)
    }

    fn scroll_to_top(&mut self) {
        self.results_scroll = ScrollViewState::default();
        self.results_shown_at = None;
    }
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Kitty keyboard protocol is harmlessly ignored by terminals without it
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide
        );
    }
}

/// Translate a terminal event into an action for the current screen.
///
/// Returns `None` for events the screen ignores or that are handled
/// entirely inside the TUI (scrolling, export).
fn action_for(app: &App, event: &TuiEvent) -> Option<Action> {
    if matches!(event, TuiEvent::ForceQuit) {
        return Some(Action::Quit);
    }
    match &app.ui {
        UiState::Idle => {
            let overlay_open = !matches!(app.diseases, DiseasePanel::Hidden);
            match event {
                TuiEvent::ToggleDiseases => Some(Action::ToggleDiseases),
                TuiEvent::Escape if overlay_open => Some(Action::ToggleDiseases),
                TuiEvent::Submit => Some(Action::Submit),
                TuiEvent::Sample(i) => Sample::from_index(*i).map(Action::SelectSample),
                other => edit_for(other).map(Action::Edit),
            }
        }
        // Input is disabled while a request is in flight
        UiState::Loading { .. } => None,
        UiState::Results(_) | UiState::Error(_) => match event {
            TuiEvent::Submit | TuiEvent::InputChar('r') | TuiEvent::InputChar('R') => {
                Some(Action::Reset)
            }
            _ => None,
        },
    }
}

fn handle_scroll(tui: &mut TuiState, event: &TuiEvent) {
    match event {
        TuiEvent::ScrollUp => tui.results_scroll.scroll_up(),
        TuiEvent::ScrollDown => tui.results_scroll.scroll_down(),
        TuiEvent::ScrollPageUp => tui.results_scroll.scroll_page_up(),
        TuiEvent::ScrollPageDown => tui.results_scroll.scroll_page_down(),
        TuiEvent::ScrollToTop => tui.results_scroll.scroll_to_top(),
        _ => {}
    }
}

fn export_report(app: &mut App) {
    let UiState::Results(rendered) = &app.ui else {
        return;
    };
    app.status_message = match report::export(&rendered.view, &rendered.request.prompt, &rendered.id) {
        Ok(path) => format!("Report saved to {}", path.display()),
        Err(e) => {
            warn!("Report export failed: {}", e);
            format!("Export failed: {}", e)
        }
    };
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let boundary: Arc<dyn AnalysisBoundary> = Arc::new(
        HttpAnalysisClient::new(config.api_base.clone(), Some(config.request_timeout))
            .map_err(|e| std::io::Error::other(e.to_string()))?,
    );
    let session_store = store::from_config(&config);

    let mut app = App::new(config.api_base.clone());
    let mut tui = TuiState::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();
    let mut orchestrator = Orchestrator::new(boundary, session_store, tx);
    orchestrator.check_health();

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    let start_time = Instant::now();
    let mut needs_redraw = true; // Force first frame

    loop {
        let animating = app.ui.is_loading()
            || (matches!(app.ui, UiState::Results(_))
                && results::is_animating(tui.results_elapsed()));
        if animating {
            needs_redraw = true;
        }

        if needs_redraw {
            let spinner_frame = (start_time.elapsed().as_secs_f32() * 12.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, spinner_frame))?;
            needs_redraw = false;
        }

        // Dynamic poll timeout: short when animating (~12fps), long when idle
        let timeout = if animating {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain ALL pending events before next draw
        let mut should_quit = false;
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            if matches!(app.ui, UiState::Results(_)) {
                handle_scroll(&mut tui, &event);
                if event == TuiEvent::ExportReport {
                    export_report(&mut app);
                    continue;
                }
            }

            let Some(action) = action_for(&app, &event) else {
                continue;
            };
            match orchestrator.dispatch(&mut app, action) {
                Effect::Quit => should_quit = true,
                Effect::ScrollToTop => tui.scroll_to_top(),
                _ => {}
            }
        }

        if should_quit {
            break;
        }

        // Handle background task actions
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            let effect = orchestrator.dispatch(&mut app, action);
            if matches!(effect, Effect::RecordHistory { .. }) {
                // A new result just landed
                tui.mark_results_shown();
            }
        }
    }

    info!("Triage shutting down");
    ratatui::restore();
    Ok(())
}
