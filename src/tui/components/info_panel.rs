//! # InfoPanel Component
//!
//! Summary card for the highlighted film: title with year, rating out of
//! ten, up to six genre pills and the overview. Fields missing from the
//! details record fall back to the highlighted movie, then to placeholders.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Paragraph, Wrap};

use crate::api::{Movie, MovieDetails};
use crate::tui::component::Component;

const MAX_GENRES: usize = 6;
pub const TITLE_PLACEHOLDER: &str = "TITLE";
pub const OVERVIEW_PLACEHOLDER: &str = "Long paragraph of details will appear here when available. It includes a short synopsis and helpful context so you can decide quickly.";

pub struct InfoPanel<'a> {
    pub details: Option<&'a MovieDetails>,
    pub movie: Option<&'a Movie>,
}

impl<'a> InfoPanel<'a> {
    pub fn new(details: Option<&'a MovieDetails>, movie: Option<&'a Movie>) -> Self {
        Self { details, movie }
    }

    fn heading(&self) -> String {
        let title = self
            .details
            .map(|d| d.title.as_str())
            .filter(|t| !t.trim().is_empty())
            .or(self.movie.map(|m| m.title.as_str()).filter(|t| !t.trim().is_empty()))
            .unwrap_or(TITLE_PLACEHOLDER);
        let year = self
            .details
            .and_then(|d| d.year.as_ref())
            .or(self.movie.and_then(|m| m.year.as_ref()))
            .map(|y| y.to_string())
            .unwrap_or_default();
        if year.is_empty() {
            title.to_string()
        } else {
            format!("{title} ({year})")
        }
    }

    fn lines(&self) -> Vec<Line<'static>> {
        let mut lines = vec![
            Line::styled(
                self.heading(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Line::styled("DETAILS", Style::default().fg(Color::DarkGray)),
        ];

        // Zero is treated as "no rating".
        if let Some(rating) = self.details.and_then(|d| d.rating).filter(|r| *r != 0.0) {
            lines.push(Line::raw(format!("Rating: {rating}/10")));
        }

        if let Some(details) = self.details
            && !details.genres.is_empty()
        {
            let pills: Vec<Span> = details
                .genres
                .iter()
                .take(MAX_GENRES)
                .flat_map(|g| {
                    [
                        Span::styled(
                            format!(" {g} "),
                            Style::default().fg(Color::Black).bg(Color::Gray),
                        ),
                        Span::raw(" "),
                    ]
                })
                .collect();
            lines.push(Line::from(pills));
        }

        let overview = self
            .details
            .and_then(|d| d.overview.as_deref())
            .filter(|o| !o.trim().is_empty())
            .unwrap_or(OVERVIEW_PLACEHOLDER);
        lines.push(Line::default());
        lines.push(Line::raw(overview.to_string()));
        lines
    }
}

impl<'a> Component for InfoPanel<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Info ");
        let paragraph = Paragraph::new(self.lines())
            .block(block)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }
}
