//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Event Flow
//!
//! ```text
//! crossterm ─▶ TuiEvent ─▶ route_event() ─▶ Action ─▶ update() ─▶ [Effect]
//!                                                                   │
//!        mpsc ◀── Action ◀── Worker::run() on a tokio task ◀────────┘
//! ```
//!
//! ## Redraw Strategy
//!
//! The event loop uses conditional redraw to avoid unnecessary work:
//!
//! - **Animating** (chat or details request in flight): draws every ~80ms
//!   so the spinner moves.
//! - **Idle**: sleeps up to 500ms, only redraws on events, worker results
//!   or terminal resize.
//!
//! A `SteadyBlock` cursor style is used instead of a blinking cursor because
//! ratatui's `set_cursor_position` resets the terminal's blink timer on every
//! `draw()` call, making blinking cursors appear erratic during continuous redraws.

mod component;
mod components;
mod event;
mod ui;

use futures::StreamExt;
use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;

use crate::api::HttpBackend;
use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::session;
use crate::core::state::App;
use crate::tui::component::EventHandler;
use crate::tui::components::{InputBox, InputEvent, MessageListState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};
use crate::worker::Worker;

/// Modal input mode: determines how keyboard events are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Browse messages (↑/↓) and movie cards (←/→). Typing switches to Input.
    Cursor,
    /// Text editing in the input box. Esc switches to Cursor.
    Input,
}

/// Top-level pages reachable from the header navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    Chat,
}

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub page: Page,
    pub message_list: MessageListState,
    pub input_box: InputBox,
    pub input_mode: InputMode,
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            page: Page::Chat,
            message_list: MessageListState::new(),
            input_box: InputBox::new(),
            input_mode: InputMode::Input, // User expects to type immediately
        }
    }

    /// Forget scroll position, layout cache and selection.
    fn reset_conversation_view(&mut self) {
        self.message_list = MessageListState::new();
        self.input_mode = InputMode::Input;
        self.input_box.dimmed = false;
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // The Kitty keyboard protocol is harmlessly ignored by terminals that
        // don't support it; it gives us unambiguous Ctrl+arrow reporting.
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, steady block cursor, keyboard enhancement)");
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

/// Translate one terminal event into at most one core action, updating
/// presentation state along the way.
fn route_event(app: &App, tui: &mut TuiState, event: TuiEvent) -> Option<Action> {
    // Global shortcuts work on every page and in every mode.
    match event {
        TuiEvent::ForceQuit => return Some(Action::Quit),
        TuiEvent::NewChat => {
            tui.reset_conversation_view();
            tui.page = Page::Chat;
            return Some(Action::NewChat);
        }
        TuiEvent::ClearChat => {
            tui.reset_conversation_view();
            return Some(Action::ClearChat);
        }
        TuiEvent::PrevHighlight => return Some(Action::PrevHighlight),
        TuiEvent::NextHighlight => return Some(Action::NextHighlight),
        TuiEvent::ToggleHighlight => return Some(Action::ToggleHighlight),
        TuiEvent::SwitchPage => {
            tui.page = match tui.page {
                Page::Home => Page::Chat,
                Page::Chat => Page::Home,
            };
            return None;
        }
        TuiEvent::Resize => return None,
        TuiEvent::ScrollUp
        | TuiEvent::ScrollDown
        | TuiEvent::ScrollPageUp
        | TuiEvent::ScrollPageDown => {
            tui.message_list.handle_event(&event);
            return None;
        }
        _ => {}
    }

    if tui.page == Page::Home {
        // Typing on the Home page jumps straight into the chat.
        if !matches!(event, TuiEvent::InputChar(_) | TuiEvent::Paste(_)) {
            return None;
        }
        tui.page = Page::Chat;
    }

    match tui.input_mode {
        InputMode::Input => {
            if matches!(event, TuiEvent::Escape) {
                tui.input_mode = InputMode::Cursor;
                tui.input_box.dimmed = true;
                tui.message_list.select_prev(&app.messages);
                return None;
            }
            tui.input_box.disabled = app.is_loading;
            match tui.input_box.handle_event(&event)? {
                InputEvent::Submit(text) => Some(Action::Submit(text)),
                InputEvent::ContentChanged => None,
            }
        }
        InputMode::Cursor => match event {
            TuiEvent::Escape => {
                leave_cursor_mode(tui);
                None
            }
            TuiEvent::CursorUp => {
                tui.message_list.select_prev(&app.messages);
                None
            }
            TuiEvent::CursorDown => {
                tui.message_list.select_next(&app.messages);
                None
            }
            TuiEvent::CursorLeft => {
                tui.message_list.step_card(-1, &app.messages);
                None
            }
            TuiEvent::CursorRight => {
                tui.message_list.step_card(1, &app.messages);
                None
            }
            TuiEvent::Submit => {
                let selection = tui
                    .message_list
                    .selected_index
                    .zip(tui.message_list.selected_card)
                    .and_then(|(msg, card)| {
                        let message = app.messages.get(msg)?;
                        let movie = message.movies.get(card)?;
                        Some(Action::SelectMovie {
                            movie: movie.clone(),
                            index: card,
                            list: message.movies.clone(),
                        })
                    });
                if selection.is_none() {
                    leave_cursor_mode(tui);
                }
                selection
            }
            TuiEvent::InputChar(_) | TuiEvent::Paste(_) => {
                leave_cursor_mode(tui);
                tui.input_box.handle_event(&event);
                None
            }
            _ => None,
        },
    }
}

fn leave_cursor_mode(tui: &mut TuiState) {
    tui.input_mode = InputMode::Input;
    tui.input_box.dimmed = false;
    tui.message_list.clear_selection();
}

/// Run an action through the reducer and hand its effects to the worker.
/// Returns `true` when the app should quit.
fn dispatch(app: &mut App, action: Action, worker: &Worker, tx: &mpsc::Sender<Action>) -> bool {
    let mut quit = false;
    for effect in update(app, action) {
        if effect == Effect::Quit {
            quit = true;
            continue;
        }
        spawn_effect(effect, worker.clone(), tx.clone());
    }
    quit
}

fn spawn_effect(effect: Effect, worker: Worker, tx: mpsc::Sender<Action>) {
    debug!("Spawning effect: {:?}", effect);
    tokio::spawn(async move {
        let mut results = worker.run(effect);
        while let Some(action) = results.next().await {
            if tx.send(action).is_err() {
                warn!("Failed to deliver worker result: receiver dropped");
                break;
            }
        }
    });
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let session_path = session::session_path();
    let session_id = session::startup_session_id(session_path.as_deref());
    info!("Using session {}", session_id);

    let backend = Arc::new(HttpBackend::new(&config.base_url));
    let worker = Worker::new(backend, config.timeouts, session_path);
    let mut app = App::from_config(session_id, &config);
    let mut tui = TuiState::new();

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();

    let start_time = std::time::Instant::now();
    let mut needs_redraw = true; // Force first frame

    'main: loop {
        tui.input_box.disabled = app.is_loading;
        let animating = app.is_loading || app.highlight.loading;
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
            std::time::Duration::from_millis(80)
        } else {
            std::time::Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain ALL pending events before next draw
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            if let Some(action) = route_event(&app, &mut tui, event)
                && dispatch(&mut app, action, &worker, &tx)
            {
                break 'main;
            }
        }

        // Handle background task results
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            if dispatch(&mut app, action, &worker, &tx) {
                break 'main;
            }
        }
    }

    ratatui::restore();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ChatResponse, Movie, Year};
    use crate::core::message::Message;
    use crate::test_support::test_app;

    fn app_with_recommendations() -> App {
        let mut app = test_app();
        app.messages.push(Message::user("I feel sad"));
        app.messages.push(Message::from_response(ChatResponse {
            reply: Some("Here's something comforting".into()),
            movies: Some(vec![
                Movie::new("Up", Some(Year::from(2009))),
                Movie::new("Paddington", Some(Year::from(2014))),
            ]),
            ..Default::default()
        }));
        app
    }

    fn type_text(app: &App, tui: &mut TuiState, text: &str) {
        for c in text.chars() {
            route_event(app, tui, TuiEvent::InputChar(c));
        }
    }

    #[test]
    fn enter_submits_typed_text() {
        let app = test_app();
        let mut tui = TuiState::new();
        type_text(&app, &mut tui, "I feel sad");

        assert_eq!(
            route_event(&app, &mut tui, TuiEvent::Submit),
            Some(Action::Submit("I feel sad".into()))
        );
    }

    #[test]
    fn enter_while_loading_keeps_the_draft() {
        let mut app = test_app();
        app.is_loading = true;
        let mut tui = TuiState::new();
        type_text(&app, &mut tui, "again");

        assert_eq!(route_event(&app, &mut tui, TuiEvent::Submit), None);
        assert_eq!(tui.input_box.buffer, "again");
    }

    #[test]
    fn global_shortcuts_map_to_actions() {
        let app = test_app();
        let mut tui = TuiState::new();
        assert_eq!(route_event(&app, &mut tui, TuiEvent::ForceQuit), Some(Action::Quit));
        assert_eq!(route_event(&app, &mut tui, TuiEvent::NewChat), Some(Action::NewChat));
        assert_eq!(route_event(&app, &mut tui, TuiEvent::ClearChat), Some(Action::ClearChat));
        assert_eq!(
            route_event(&app, &mut tui, TuiEvent::NextHighlight),
            Some(Action::NextHighlight)
        );
        assert_eq!(
            route_event(&app, &mut tui, TuiEvent::PrevHighlight),
            Some(Action::PrevHighlight)
        );
        assert_eq!(
            route_event(&app, &mut tui, TuiEvent::ToggleHighlight),
            Some(Action::ToggleHighlight)
        );
    }

    #[test]
    fn cursor_mode_selects_a_movie_card() {
        let app = app_with_recommendations();
        let mut tui = TuiState::new();

        route_event(&app, &mut tui, TuiEvent::Escape);
        assert_eq!(tui.input_mode, InputMode::Cursor);
        assert_eq!(tui.message_list.selected_index, Some(app.messages.len() - 1));

        route_event(&app, &mut tui, TuiEvent::CursorRight);
        let action = route_event(&app, &mut tui, TuiEvent::Submit);
        match action {
            Some(Action::SelectMovie { movie, index, list }) => {
                assert_eq!(movie.title, "Paddington");
                assert_eq!(index, 1);
                assert_eq!(list.len(), 2);
            }
            other => panic!("Expected SelectMovie, got {other:?}"),
        }
    }

    #[test]
    fn enter_on_a_message_without_cards_returns_to_input() {
        let app = app_with_recommendations();
        let mut tui = TuiState::new();

        route_event(&app, &mut tui, TuiEvent::Escape);
        route_event(&app, &mut tui, TuiEvent::CursorUp); // the user message
        assert_eq!(route_event(&app, &mut tui, TuiEvent::Submit), None);
        assert_eq!(tui.input_mode, InputMode::Input);
        assert_eq!(tui.message_list.selected_index, None);
    }

    #[test]
    fn typing_in_cursor_mode_goes_to_the_input() {
        let app = app_with_recommendations();
        let mut tui = TuiState::new();

        route_event(&app, &mut tui, TuiEvent::Escape);
        route_event(&app, &mut tui, TuiEvent::InputChar('h'));
        assert_eq!(tui.input_mode, InputMode::Input);
        assert_eq!(tui.input_box.buffer, "h");
    }

    #[test]
    fn tab_switches_pages_and_typing_returns_to_chat() {
        let app = test_app();
        let mut tui = TuiState::new();
        assert_eq!(tui.page, Page::Chat);

        route_event(&app, &mut tui, TuiEvent::SwitchPage);
        assert_eq!(tui.page, Page::Home);
        assert_eq!(route_event(&app, &mut tui, TuiEvent::Submit), None);

        route_event(&app, &mut tui, TuiEvent::InputChar('x'));
        assert_eq!(tui.page, Page::Chat);
        assert_eq!(tui.input_box.buffer, "x");
    }

    #[test]
    fn new_chat_resets_the_view() {
        let app = app_with_recommendations();
        let mut tui = TuiState::new();
        route_event(&app, &mut tui, TuiEvent::Escape);
        tui.page = Page::Home;

        route_event(&app, &mut tui, TuiEvent::NewChat);
        assert_eq!(tui.page, Page::Chat);
        assert_eq!(tui.input_mode, InputMode::Input);
        assert_eq!(tui.message_list.selected_index, None);
    }
}
