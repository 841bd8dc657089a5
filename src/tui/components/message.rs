use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget};

use crate::core::message::{Message, Sender};
use crate::tui::component::Component;
use crate::tui::components::movie_card::{MovieCard, truncate_to_width};

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
const VERTICAL_OVERHEAD: u16 = 2;

/// Movie cards shown per message.
pub const MAX_CARDS: usize = 5;
/// Genre tags shown next to the recommendations header.
const MAX_HEADER_TAGS: usize = 3;
/// Emotions listed in the mood line.
const MOOD_EMOTIONS: usize = 3;

const NO_MOVIES_NOTE: &str =
    "I couldn't find specific movies, but I detected these genre preferences:";

/// A stateless component that renders one chat bubble: text, the movie grid,
/// genre tags, the detected mood and the timestamp.
///
/// # Height Calculation
///
/// Text is wrapped with `textwrap` before it reaches ratatui, and the
/// `Paragraph` is rendered without wrapping. The line count produced by
/// [`content_lines`] is therefore exactly the rendered height, which lets
/// `MessageList` lay out the scroll canvas without rendering anything.
#[derive(Clone, Copy)]
pub struct MessageView<'a> {
    pub message: &'a Message,
    /// Whether this message is selected in Cursor mode
    pub is_selected: bool,
    /// Card under the cursor, if this message is selected
    pub selected_card: Option<usize>,
}

impl<'a> MessageView<'a> {
    pub fn new(message: &'a Message, is_selected: bool, selected_card: Option<usize>) -> Self {
        Self {
            message,
            is_selected,
            selected_card,
        }
    }

    pub fn calculate_height(message: &Message, width: u16) -> u16 {
        let content_width = width.saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            // Terminal too narrow for borders + padding.
            return 1;
        }
        (content_lines(message, content_width, None).len() as u16).max(1) + VERTICAL_OVERHEAD
    }

    /// Number of selectable cards in `message`.
    pub fn card_count(message: &Message) -> usize {
        if message.is_bot() {
            message.movies.len().min(MAX_CARDS)
        } else {
            0
        }
    }
}

fn wrap(text: &str, width: u16) -> Vec<String> {
    let options = textwrap::Options::new(width as usize)
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace);
    textwrap::wrap(text, options)
        .into_iter()
        .map(|l| l.into_owned())
        .collect()
}

fn sender_style(message: &Message) -> Style {
    if message.is_error {
        return Style::default().fg(Color::Red);
    }
    match message.sender {
        Sender::User => Style::default().fg(Color::Green),
        Sender::Bot => Style::default().fg(Color::Blue),
    }
}

/// Every row inside the bubble, pre-wrapped to `width` columns.
pub fn content_lines(message: &Message, width: u16, selected_card: Option<usize>) -> Vec<Line<'static>> {
    let text_style = sender_style(message);
    let tag_style = Style::default().fg(Color::Magenta);
    let dim = Style::default().fg(Color::DarkGray);

    let mut lines: Vec<Line> = wrap(message.text.trim(), width)
        .into_iter()
        .map(|l| Line::styled(l, text_style))
        .collect();

    if message.is_bot() && !message.movies.is_empty() {
        lines.push(Line::default());
        lines.push(Line::styled(
            "🎬 Recommended Movies",
            Style::default().add_modifier(Modifier::BOLD),
        ));
        if !message.genre_scores.is_empty() {
            let tags = message
                .genre_scores
                .iter()
                .take(MAX_HEADER_TAGS)
                .map(|g| format!("#{}", g.label()))
                .collect::<Vec<_>>()
                .join("  ");
            lines.push(Line::styled(
                truncate_to_width(&tags, width as usize),
                tag_style,
            ));
        }
        for (i, movie) in message.movies.iter().take(MAX_CARDS).enumerate() {
            lines.push(MovieCard::new(movie, selected_card == Some(i)).line(width));
        }
    }

    if message.has_genres_without_movies() {
        lines.push(Line::default());
        lines.extend(wrap(NO_MOVIES_NOTE, width).into_iter().map(|l| Line::styled(l, dim)));
        let tags = message
            .genre_scores
            .iter()
            .map(|g| format!("#{}", g.label()))
            .collect::<Vec<_>>()
            .join("  ");
        lines.extend(wrap(&tags, width).into_iter().map(|l| Line::styled(l, tag_style)));
    }

    if message.is_bot() && !message.is_error {
        let mood = message.dominant_emotions(MOOD_EMOTIONS);
        if !mood.is_empty() {
            let mood = mood
                .iter()
                .map(|(emotion, score)| format!("{emotion} {score:.2}"))
                .collect::<Vec<_>>()
                .join(" · ");
            lines.push(Line::from(vec![Span::styled(
                truncate_to_width(&format!("Mood: {mood}"), width as usize),
                dim.add_modifier(Modifier::ITALIC),
            )]));
        }
    }

    lines
}

impl<'a> Widget for MessageView<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let role = match self.message.sender {
            Sender::User => "you",
            Sender::Bot => "moodreel",
        };
        let style = sender_style(self.message);

        // Selection overrides the dim default border.
        let border_style = if self.is_selected {
            Style::default().fg(Color::Cyan)
        } else {
            style.add_modifier(Modifier::DIM)
        };

        let block = Block::bordered()
            .title(format!(" {role} "))
            .title_bottom(Line::from(format!(" {} ", self.message.time_label())).right_aligned())
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title_style(border_style)
            .padding(Padding::horizontal(CONTENT_PAD_H));

        let inner_area = block.inner(area);
        block.render(area, buf);

        let lines = content_lines(self.message, inner_area.width, self.selected_card);
        Paragraph::new(lines).render(inner_area, buf);
    }
}

impl<'a> Component for MessageView<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(*self, area);
    }
}
