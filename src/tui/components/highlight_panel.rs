//! # HighlightPanel Component
//!
//! Shows the currently highlighted film. The panel has five states, checked
//! in this order:
//!
//! 1. **Hidden**: collapsed note (F2 toggles)
//! 2. **Loading**: details fetch in flight
//! 3. **Details**: poster status, title, rating, genres, cast, overview, TMDb link
//! 4. **Movie only**: title/year with a "no details" note
//! 5. **Empty**: nothing recommended yet
//!
//! Terminals can't show the poster itself, so the panel reports whether the
//! image has been downloaded and decoded.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Paragraph, Wrap};

use crate::api::{Movie, MovieDetails};
use crate::core::cache::PosterStatus;
use crate::tui::component::Component;

pub const LOADING_TEXT: &str = "Fetching film details…";
pub const NO_DETAILS_TEXT: &str = "No external details available.";
pub const EMPTY_TEXT: &str = "Ask for recommendations to see a highlight here.";
pub const HIDDEN_TEXT: &str = "Panel hidden. Press F2 to show.";

pub struct HighlightPanel<'a> {
    pub movie: Option<&'a Movie>,
    pub details: Option<&'a MovieDetails>,
    /// Download state of the poster for `details`, if it has one
    pub poster: Option<PosterStatus<'a>>,
    pub loading: bool,
    pub visible: bool,
    /// (index, len) of the highlight within its list
    pub position: (usize, usize),
}

impl<'a> HighlightPanel<'a> {
    fn details_lines(details: &MovieDetails, poster: Option<PosterStatus>) -> Vec<Line<'static>> {
        let dim = Style::default().fg(Color::DarkGray);
        let mut lines = Vec::new();

        match poster {
            Some(PosterStatus::Ready(image)) => lines.push(Line::styled(
                format!(
                    "▣ Poster ready ({} KiB{})",
                    image.size_kib(),
                    image
                        .content_type
                        .as_deref()
                        .map(|t| format!(", {t}"))
                        .unwrap_or_default()
                ),
                Style::default().fg(Color::Green),
            )),
            Some(PosterStatus::Loading) => lines.push(Line::styled("▢ Poster loading…", dim)),
            Some(PosterStatus::Unavailable) => lines.push(Line::styled("▢ Poster unavailable", dim)),
            None => {}
        }

        let mut title = vec![Span::styled(
            details.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )];
        if let Some(year) = &details.year {
            title.push(Span::styled(format!("  {year}"), dim));
        }
        lines.push(Line::from(title));

        if let Some(rating) = details.rating {
            lines.push(Line::styled(
                format!("Rating: {rating:.1}"),
                Style::default().fg(Color::Yellow),
            ));
        }

        if !details.genres.is_empty() {
            let pills: Vec<Span> = details
                .genres
                .iter()
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

        if !details.cast.is_empty() {
            lines.push(Line::default());
            lines.push(Line::styled("Cast", dim.add_modifier(Modifier::BOLD)));
            lines.push(Line::raw(details.cast.join(", ")));
        }

        if let Some(overview) = details.overview.as_deref().filter(|o| !o.trim().is_empty()) {
            lines.push(Line::default());
            lines.push(Line::raw(overview.to_string()));
        }

        if let Some(url) = details.tmdb_url() {
            lines.push(Line::default());
            lines.push(Line::styled(
                format!("View on TMDb ↗ {url}"),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::UNDERLINED),
            ));
        }

        lines
    }

    fn lines(&self) -> Vec<Line<'static>> {
        let dim = Style::default().fg(Color::DarkGray);
        if !self.visible {
            return vec![Line::styled(HIDDEN_TEXT, dim)];
        }
        if self.loading {
            return vec![Line::styled(LOADING_TEXT, dim.add_modifier(Modifier::ITALIC))];
        }
        if let Some(details) = self.details {
            return Self::details_lines(details, self.poster);
        }
        if let Some(movie) = self.movie {
            let mut lines = vec![Line::styled(
                movie.display_title().to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            )];
            let year = movie.display_year();
            if !year.is_empty() {
                lines.push(Line::styled(year, dim));
            }
            lines.push(Line::styled(NO_DETAILS_TEXT, dim.add_modifier(Modifier::ITALIC)));
            return lines;
        }
        vec![Line::styled(EMPTY_TEXT, dim)]
    }
}

impl<'a> Component for HighlightPanel<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let (index, len) = self.position;
        let mut block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Magenta).add_modifier(Modifier::DIM))
            .title(" Highlighted Film ");
        if len > 0 {
            block = block.title(Line::from(format!(" ◀ {}/{} ▶ ", index + 1, len)).right_aligned());
        }

        let paragraph = Paragraph::new(self.lines())
            .block(block)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{PosterImage, Year};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn panel<'a>() -> HighlightPanel<'a> {
        HighlightPanel {
            movie: None,
            details: None,
            poster: None,
            loading: false,
            visible: true,
            position: (0, 0),
        }
    }

    fn render(panel: &mut HighlightPanel) -> String {
        let backend = TestBackend::new(70, 20);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| panel.render(f, f.area())).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    fn up_details() -> MovieDetails {
        MovieDetails {
            title: "Up".into(),
            year: Some(Year::from(2009)),
            poster_url: Some("https://img.example/up.jpg".into()),
            rating: Some(8.27),
            genres: vec!["Animation".into(), "Comedy".into()],
            cast: vec!["Ed Asner".into(), "Jordan Nagai".into()],
            overview: Some("Carl flies his house to South America.".into()),
            tmdb_id: Some(14160),
        }
    }

    #[test]
    fn empty_state() {
        assert!(render(&mut panel()).contains(EMPTY_TEXT));
    }

    #[test]
    fn hidden_wins_over_everything() {
        let details = up_details();
        let mut p = HighlightPanel {
            details: Some(&details),
            loading: true,
            visible: false,
            ..panel()
        };
        let text = render(&mut p);
        assert!(text.contains(HIDDEN_TEXT));
        assert!(!text.contains("Carl"));
    }

    #[test]
    fn loading_state() {
        let mut p = HighlightPanel {
            loading: true,
            ..panel()
        };
        assert!(render(&mut p).contains(LOADING_TEXT));
    }

    #[test]
    fn details_state_shows_every_field() {
        let details = up_details();
        let mut p = HighlightPanel {
            details: Some(&details),
            poster: Some(PosterStatus::Loading),
            position: (1, 5),
            ..panel()
        };
        let text = render(&mut p);

        assert!(text.contains("2/5"));
        assert!(text.contains("Rating: 8.3"));
        assert!(text.contains("Animation"));
        assert!(text.contains("Ed Asner, Jordan Nagai"));
        assert!(text.contains("South America"));
        assert!(text.contains("https://www.themoviedb.org/movie/14160"));
        assert!(text.contains("Poster loading"));
    }

    #[test]
    fn ready_poster_is_reported() {
        let details = up_details();
        let image = PosterImage {
            url: "https://img.example/up.jpg".into(),
            content_type: Some("image/jpeg".into()),
            bytes: vec![0xFF, 0xD8, 0xFF, 0xE0],
        };
        let mut p = HighlightPanel {
            details: Some(&details),
            poster: Some(PosterStatus::Ready(&image)),
            ..panel()
        };
        assert!(render(&mut p).contains("Poster ready"));
    }

    #[test]
    fn failed_poster_is_not_left_loading() {
        let details = up_details();
        let mut p = HighlightPanel {
            details: Some(&details),
            poster: Some(PosterStatus::Unavailable),
            ..panel()
        };
        let text = render(&mut p);
        assert!(text.contains("Poster unavailable"));
        assert!(!text.contains("Poster loading"));
    }

    #[test]
    fn movie_without_details_shows_note() {
        let movie = Movie::new("Coco", Some(Year::from(2017)));
        let mut p = HighlightPanel {
            movie: Some(&movie),
            position: (0, 1),
            ..panel()
        };
        let text = render(&mut p);
        assert!(text.contains("Coco"));
        assert!(text.contains("2017"));
        assert!(text.contains(NO_DETAILS_TEXT));
    }
}
