//! # InputBox Component
//!
//! The message composer at the bottom of the chat column.
//!
//! The buffer is a single logical line (pasted newlines become spaces) that
//! is hard-wrapped by display width, so the cursor row and column fall out
//! of simple division. Up to `MAX_VISIBLE_LINES` rows are shown; longer
//! input scrolls to keep the cursor visible.
//!
//! `disabled` is a prop: while a send is in flight the box is dimmed and
//! Enter is swallowed, though typing the next message is still allowed.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Paragraph};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

const PLACEHOLDER: &str = "Tell me how you're feeling or what you'd like to watch...";
/// Border (2) + padding (2) consumed horizontally
const HORIZONTAL_OVERHEAD: u16 = 4;
const VERTICAL_OVERHEAD: u16 = 2;
const MAX_VISIBLE_LINES: u16 = 3;

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Submit(String),
    ContentChanged,
}

pub struct InputBox {
    pub buffer: String,
    /// Byte offset of the cursor in `buffer`
    cursor: usize,
    /// Send in flight (prop)
    pub disabled: bool,
    /// Cursor mode is active elsewhere (prop)
    pub dimmed: bool,
}

impl Default for InputBox {
    fn default() -> Self {
        Self::new()
    }
}

impl InputBox {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            cursor: 0,
            disabled: false,
            dimmed: false,
        }
    }

    pub fn calculate_height(&self, width: u16) -> u16 {
        let rows = wrap_rows(&self.buffer, inner_width(width)).len() as u16;
        // A cursor sitting at the end of a full row opens the next one.
        let rows = rows.max(self.cursor_cell(width).0 + 1);
        rows.clamp(1, MAX_VISIBLE_LINES) + VERTICAL_OVERHEAD
    }

    /// (row, column) of the cursor in the wrapped buffer.
    fn cursor_cell(&self, width: u16) -> (u16, u16) {
        let width = inner_width(width).max(1) as usize;
        let before = self.buffer[..self.cursor].width();
        ((before / width) as u16, (before % width) as u16)
    }

    fn insert(&mut self, text: &str) {
        let clean: String = text
            .chars()
            .map(|c| if c == '\n' || c == '\r' || c == '\t' { ' ' } else { c })
            .collect();
        self.buffer.insert_str(self.cursor, &clean);
        self.cursor += clean.len();
    }

    fn prev_boundary(&self) -> usize {
        self.buffer[..self.cursor]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    fn next_boundary(&self) -> usize {
        self.buffer[self.cursor..]
            .chars()
            .next()
            .map(|c| self.cursor + c.len_utf8())
            .unwrap_or(self.buffer.len())
    }
}

fn inner_width(width: u16) -> u16 {
    width.saturating_sub(HORIZONTAL_OVERHEAD)
}

/// Split `text` into rows of at most `width` display columns.
fn wrap_rows(text: &str, width: u16) -> Vec<String> {
    let width = width.max(1) as usize;
    let mut rows = vec![String::new()];
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width {
            rows.push(String::new());
            used = 0;
        }
        if let Some(row) = rows.last_mut() {
            row.push(c);
        }
        used += w;
    }
    rows
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let visible_rows = area.height.saturating_sub(VERTICAL_OVERHEAD).max(1);
        let (cursor_row, cursor_col) = self.cursor_cell(area.width);
        let scroll = cursor_row.saturating_sub(visible_rows - 1);

        let title = if self.disabled {
            " Waiting for recommendations… "
        } else {
            " Message (Enter to send) "
        };
        let mut border_style = Style::default().fg(Color::Green);
        if self.disabled || self.dimmed {
            border_style = border_style.add_modifier(Modifier::DIM);
        }

        let lines: Vec<Line> = if self.buffer.is_empty() {
            vec![Line::styled(PLACEHOLDER, Style::default().fg(Color::DarkGray))]
        } else {
            wrap_rows(&self.buffer, inner_width(area.width))
                .into_iter()
                .skip(scroll as usize)
                .map(Line::raw)
                .collect()
        };

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(title)
            .padding(ratatui::widgets::Padding::horizontal(1));
        frame.render_widget(Paragraph::new(lines).block(block), area);

        if !self.dimmed {
            frame.set_cursor_position((
                area.x + 2 + cursor_col,
                area.y + 1 + cursor_row - scroll,
            ));
        }
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => {
                self.insert(c.encode_utf8(&mut [0; 4]));
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Paste(text) => {
                self.insert(text);
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Backspace if self.cursor > 0 => {
                let prev = self.prev_boundary();
                self.buffer.drain(prev..self.cursor);
                self.cursor = prev;
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Delete if self.cursor < self.buffer.len() => {
                let next = self.next_boundary();
                self.buffer.drain(self.cursor..next);
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::CursorLeft if self.cursor > 0 => {
                self.cursor = self.prev_boundary();
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::CursorRight if self.cursor < self.buffer.len() => {
                self.cursor = self.next_boundary();
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::CursorHome => {
                self.cursor = 0;
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::CursorEnd => {
                self.cursor = self.buffer.len();
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Submit => {
                // Blank input and in-flight sends keep the buffer as is.
                if self.disabled || self.buffer.trim().is_empty() {
                    return None;
                }
                let text = std::mem::take(&mut self.buffer);
                self.cursor = 0;
                Some(InputEvent::Submit(text))
            }
            _ => None,
        }
    }
}
