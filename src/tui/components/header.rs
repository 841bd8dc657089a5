//! # Header Component
//!
//! Single-line bar across the top of the screen:
//!
//! ```text
//! Neuro‑Symbolic‑Emotion‑Aware Movie Recommender  Home  [Chat]   session 3f9c2a1b · Ctrl+N New Chat · status
//! ```
//!
//! Stateless: all fields are props filled in by `draw_ui` each frame.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::core::session::short_id;
use crate::tui::Page;
use crate::tui::component::Component;

pub const BRAND: &str = "Neuro‑Symbolic‑Emotion‑Aware Movie Recommender";

pub struct Header<'a> {
    pub page: Page,
    pub session_id: &'a str,
    /// Transient status (e.g. "Highlight panel hidden")
    pub status_message: &'a str,
}

impl<'a> Header<'a> {
    pub fn new(page: Page, session_id: &'a str, status_message: &'a str) -> Self {
        Self {
            page,
            session_id,
            status_message,
        }
    }

    fn nav_span(&self, page: Page) -> Span<'static> {
        let label = match page {
            Page::Home => " Home ",
            Page::Chat => " Chat ",
        };
        if page == self.page {
            Span::styled(
                label,
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled(label, Style::default().fg(Color::Gray))
        }
    }
}

impl<'a> Component for Header<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let left = Line::from(vec![
            Span::styled(BRAND, Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            self.nav_span(Page::Home),
            Span::raw(" "),
            self.nav_span(Page::Chat),
        ]);

        let dim = Style::default().fg(Color::DarkGray);
        let mut right = vec![
            Span::styled(format!("session {}", short_id(self.session_id)), dim),
            Span::styled(" · ", dim),
            Span::styled("Ctrl+N New Chat", Style::default().fg(Color::Gray)),
        ];
        if !self.status_message.is_empty() {
            right.push(Span::styled(" · ", dim));
            right.push(Span::styled(
                self.status_message.to_string(),
                Style::default().fg(Color::Yellow),
            ));
        }
        let right = Line::from(right);

        let [left_area, right_area] = Layout::horizontal([
            Constraint::Min(0),
            Constraint::Length(right.width() as u16),
        ])
        .areas(area);

        frame.render_widget(Paragraph::new(left), left_area);
        frame.render_widget(Paragraph::new(right).right_aligned(), right_area);
    }
}
