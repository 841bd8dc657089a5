use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Paragraph, Wrap};

use crate::core::cache::PosterStatus;
use crate::core::state::App;
use crate::tui::component::Component;
use crate::tui::components::footer::{CHAT_HINTS, HOME_HINTS};
use crate::tui::components::{
    AboutPage, Footer, Header, HighlightPanel, InfoPanel, MessageList,
};
use crate::tui::{Page, TuiState};

/// Below this width the side panels are dropped and only the chat shows.
const PANEL_MIN_WIDTH: u16 = 90;
const ERROR_BANNER_HEIGHT: u16 = 2;

/// How the chat page arranges the info and highlight panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelMode {
    /// Nothing highlighted yet (or terminal too narrow): chat only
    ChatOnly,
    /// Side column with info stacked over highlight, then chat
    Stacked,
    /// `[info | highlight | chat]` once the poster is downloaded
    ThreeColumn,
}

pub fn panel_mode(app: &App, width: u16) -> PanelMode {
    if !app.show_panels() || width < PANEL_MIN_WIDTH {
        PanelMode::ChatOnly
    } else if app.poster_ready() {
        PanelMode::ThreeColumn
    } else {
        PanelMode::Stacked
    }
}

fn poster_status(app: &App) -> Option<PosterStatus<'_>> {
    let url = app.highlight.details.as_ref()?.poster()?;
    Some(app.posters.status(url))
}

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, spinner_frame: usize) {
    use Constraint::{Length, Min};
    let [header_area, main_area, footer_area] =
        Layout::vertical([Length(1), Min(0), Length(1)]).areas(frame.area());

    Header::new(tui.page, &app.session_id, &app.status_message).render(frame, header_area);

    let hints = match tui.page {
        Page::Home => HOME_HINTS,
        Page::Chat => CHAT_HINTS,
    };
    Footer { hints }.render(frame, footer_area);

    match tui.page {
        Page::Home => AboutPage.render(frame, main_area),
        Page::Chat => draw_chat_page(frame, main_area, app, tui, spinner_frame),
    }
}

fn draw_chat_page(frame: &mut Frame, area: Rect, app: &App, tui: &mut TuiState, spinner_frame: usize) {
    use Constraint::{Min, Percentage};

    let chat_area = match panel_mode(app, area.width) {
        PanelMode::ChatOnly => area,
        PanelMode::Stacked => {
            let [side, chat] = Layout::horizontal([Percentage(35), Min(0)]).areas(area);
            let [info, highlight] = Layout::vertical([Percentage(40), Min(0)]).areas(side);
            draw_panels(frame, app, info, highlight);
            chat
        }
        PanelMode::ThreeColumn => {
            let [info, highlight, chat] =
                Layout::horizontal([Percentage(25), Percentage(30), Min(0)]).areas(area);
            draw_panels(frame, app, info, highlight);
            chat
        }
    };

    draw_chat_column(frame, chat_area, app, tui, spinner_frame);
}

fn draw_panels(frame: &mut Frame, app: &App, info_area: Rect, highlight_area: Rect) {
    let highlight = &app.highlight;
    InfoPanel::new(highlight.details.as_ref(), highlight.current()).render(frame, info_area);
    HighlightPanel {
        movie: highlight.current(),
        details: highlight.details.as_ref(),
        poster: poster_status(app),
        loading: highlight.loading,
        visible: highlight.visible,
        position: (highlight.index, highlight.movies.len()),
    }
    .render(frame, highlight_area);
}

fn draw_chat_column(frame: &mut Frame, area: Rect, app: &App, tui: &mut TuiState, spinner_frame: usize) {
    use Constraint::{Length, Min};

    let input_height = tui.input_box.calculate_height(area.width);
    let banner_height = if app.error.is_some() { ERROR_BANNER_HEIGHT } else { 0 };
    let [list_area, banner_area, input_area] =
        Layout::vertical([Min(0), Length(banner_height), Length(input_height)]).areas(area);

    MessageList::new(&mut tui.message_list, &app.messages, app.is_loading, spinner_frame)
        .render(frame, list_area);

    if let Some(error) = &app.error {
        let banner = Paragraph::new(format!("⚠ {error}"))
            .style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
            .wrap(Wrap { trim: true });
        frame.render_widget(banner, banner_area);
    }

    tui.input_box.render(frame, input_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Movie, MovieDetails, PosterImage, Year};
    use crate::core::message::WELCOME_GREETING;
    use crate::test_support::test_app;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn draw(app: &App, tui: &mut TuiState, width: u16) -> String {
        let backend = TestBackend::new(width, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw_ui(f, app, tui, 0)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    fn highlighted_app() -> App {
        let mut app = test_app();
        app.highlight.reset_to(&[Movie::new("Up", Some(Year::from(2009)))]);
        app.highlight.details = Some(MovieDetails {
            title: "Up".into(),
            poster_url: Some("https://img.example/up.jpg".into()),
            ..Default::default()
        });
        app
    }

    #[test]
    fn fresh_app_shows_chat_only() {
        let app = test_app();
        assert_eq!(panel_mode(&app, 120), PanelMode::ChatOnly);

        let mut tui = TuiState::new();
        let text = draw(&app, &mut tui, 120);
        // Greeting wraps, so check its opening words
        assert!(text.contains(&WELCOME_GREETING[..20]));
        assert!(!text.contains("Highlighted Film"));
    }

    #[test]
    fn highlight_without_poster_is_stacked() {
        let app = highlighted_app();
        assert_eq!(panel_mode(&app, 120), PanelMode::Stacked);

        let mut tui = TuiState::new();
        let text = draw(&app, &mut tui, 120);
        assert!(text.contains("Highlighted Film"));
        assert!(text.contains(" Info "));
    }

    #[test]
    fn ready_poster_switches_to_three_columns() {
        let mut app = highlighted_app();
        app.posters.insert(PosterImage {
            url: "https://img.example/up.jpg".into(),
            content_type: Some("image/jpeg".into()),
            bytes: vec![0xFF, 0xD8, 0xFF, 0xE0],
        });
        assert_eq!(panel_mode(&app, 120), PanelMode::ThreeColumn);
    }

    #[test]
    fn failed_poster_download_is_reported() {
        let mut app = highlighted_app();
        app.posters.begin_load("https://img.example/up.jpg");
        app.posters.mark_failed("https://img.example/up.jpg");
        assert_eq!(panel_mode(&app, 120), PanelMode::Stacked);

        let mut tui = TuiState::new();
        let text = draw(&app, &mut tui, 120);
        assert!(text.contains("Poster unavailable"));
        assert!(!text.contains("Poster loading"));
    }

    #[test]
    fn narrow_terminal_drops_panels() {
        let app = highlighted_app();
        assert_eq!(panel_mode(&app, 60), PanelMode::ChatOnly);
    }

    #[test]
    fn error_banner_is_drawn() {
        let mut app = test_app();
        app.error = Some("Server error (503). Please try again.".into());
        let mut tui = TuiState::new();
        let text = draw(&app, &mut tui, 100);
        assert!(text.contains("Server error (503)"));
    }

    #[test]
    fn home_page_shows_about() {
        let app = test_app();
        let mut tui = TuiState::new();
        tui.page = Page::Home;
        let text = draw(&app, &mut tui, 100);
        assert!(text.contains("About"));
        assert!(text.contains("Tab chat"));
    }
}
