//! # MovieCard Component
//!
//! One recommended movie as a single terminal row:
//!
//! ```text
//! ▸ Up (2009)                     [Animation]
//! ```
//!
//! Cards are laid out by `Message`, which needs their rows up front to
//! compute heights, so the card exposes [`MovieCard::line`] in addition to
//! the `Component` impl.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::api::Movie;
use crate::tui::component::Component;

const MARKER: &str = "▸ ";
const SELECTED_MARKER: &str = "● ";

pub struct MovieCard<'a> {
    pub movie: &'a Movie,
    /// Chosen in cursor mode (Enter highlights it)
    pub is_selected: bool,
}

impl<'a> MovieCard<'a> {
    pub fn new(movie: &'a Movie, is_selected: bool) -> Self {
        Self { movie, is_selected }
    }

    /// Render the card as one `Line` no wider than `width` columns.
    pub fn line(&self, width: u16) -> Line<'static> {
        let width = width as usize;
        let marker = if self.is_selected { SELECTED_MARKER } else { MARKER };

        let year = self.movie.display_year();
        let title = if year.is_empty() {
            self.movie.display_title().to_string()
        } else {
            format!("{} ({})", self.movie.display_title(), year)
        };
        let badge = format!("[{}]", self.movie.display_genre());

        // Title gets whatever the marker and badge leave over; the badge is
        // dropped entirely on very narrow widths.
        let fixed = marker.width() + 1 + badge.width();
        let (title, badge) = if fixed < width {
            (truncate_to_width(&title, width - fixed), Some(badge))
        } else {
            (
                truncate_to_width(&title, width.saturating_sub(marker.width())),
                None,
            )
        };

        let title_style = if self.is_selected {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };

        let mut spans = vec![
            Span::styled(marker, Style::default().fg(Color::DarkGray)),
            Span::styled(title.clone(), title_style),
        ];
        if let Some(badge) = badge {
            let pad = width - marker.width() - title.width() - badge.width();
            spans.push(Span::raw(" ".repeat(pad)));
            spans.push(Span::styled(badge, Style::default().fg(Color::Magenta)));
        }
        Line::from(spans)
    }
}

impl<'a> Component for MovieCard<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(Paragraph::new(self.line(area.width)), area);
    }
}

/// Cut `text` to at most `max` display columns, ending in `…` when cut.
pub fn truncate_to_width(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}
