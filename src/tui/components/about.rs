//! # About Page
//!
//! The Home page: what the recommender does and how to use the client.

use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Paragraph, Wrap};

use crate::tui::component::Component;

const BLURB: &str = "This emotion-aware movie recommender blends a lightweight ML signal with a semantic knowledge graph to suggest films that match your mood and preferences.";

const FEATURES: [&str; 4] = [
    "Minimal black, grey and white terminal theme",
    "Context-aware recommendations using per-session signals",
    "Comfort-focused filtering to avoid harsh genres when requested",
    "Novelty prioritization to reduce repeats",
];

const USAGE: &str = "Press Ctrl+N to start a fresh session, or switch to Chat with Tab and keep chatting to refine recommendations.";

const MAX_WIDTH: u16 = 80;

pub struct AboutPage;

impl Component for AboutPage {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let text = Style::default().fg(Color::Gray);
        let mut lines = vec![
            Line::styled("About", Style::default().add_modifier(Modifier::BOLD)),
            Line::default(),
            Line::styled(BLURB, text),
            Line::default(),
        ];
        lines.extend(FEATURES.iter().map(|f| Line::styled(format!("  • {f}"), text)));
        lines.push(Line::default());
        lines.push(Line::styled(USAGE, text));

        let [column] = Layout::horizontal([Constraint::Max(MAX_WIDTH)])
            .flex(Flex::Center)
            .areas(area);
        let [column] = Layout::vertical([Constraint::Percentage(100)])
            .margin(1)
            .areas(column);

        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), column);
    }
}
