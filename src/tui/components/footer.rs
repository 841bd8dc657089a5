use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::component::Component;
use crate::tui::components::header::BRAND;

/// Static attribution line plus the key hints for the current page.
pub struct Footer {
    pub hints: &'static str,
}

pub const CHAT_HINTS: &str =
    "Enter send · Esc browse · Ctrl+←/→ highlight · F2 panel · Ctrl+L clear · Tab home · Ctrl+C quit";
pub const HOME_HINTS: &str = "Tab chat · Ctrl+N new chat · Ctrl+C quit";

impl Component for Footer {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let dim = Style::default().fg(Color::DarkGray);
        let line = Line::from(vec![
            Span::styled(format!("© {BRAND}"), dim),
            Span::styled("   ", dim),
            Span::styled(self.hints, Style::default().fg(Color::Gray)),
        ]);
        frame.render_widget(Paragraph::new(line).centered(), area);
    }
}
