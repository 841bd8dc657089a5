//! # MessageList Component
//!
//! Scrollable view of the conversation.
//!
//! ## Responsibilities
//!
//! - Display the list of messages and the loading bubble
//! - Manage scrolling (stick-to-bottom, page up/down, clamping)
//! - Track the message and movie card under the cursor
//! - Cache message heights so only new messages are measured
//!
//! ## Architecture
//!
//! `MessageList` is a transient component (created each frame) that wraps
//! `&'a mut MessageListState` (persistent state) and the messages (props).
//!
//! Since `Component::render` takes `&mut self`, we can safely mutate the state
//! (including layout cache and scroll state) during the render pass, aligning
//! with Ratatui's `StatefulWidget` pattern.

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Paragraph};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::message::Message;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::message::MessageView;
use crate::tui::event::TuiEvent;

pub const LOADING_TEXT: &str = "Analyzing your emotions and finding movies...";
const LOADING_HEIGHT: u16 = 3;
const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Layout and scroll state for the message list.
/// Must be persisted in the parent TuiState.
pub struct MessageListState {
    /// Scroll offset and view state
    pub scroll_state: ScrollViewState,
    /// Cached layout measurements
    pub layout: LayoutCache,
    /// When true, auto-scroll to bottom on new content
    pub stick_to_bottom: bool,
    /// Message under the cursor (Cursor mode only)
    pub selected_index: Option<usize>,
    /// Movie card under the cursor within the selected message
    pub selected_card: Option<usize>,
    /// Last known viewport height (for scroll clamping between frames)
    pub viewport_height: u16,
}

impl Default for MessageListState {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageListState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            layout: LayoutCache::new(),
            stick_to_bottom: true, // Start attached to bottom
            selected_index: None,
            selected_card: None,
            viewport_height: 0,
        }
    }

    /// Select a message; the first of its cards (if any) comes with it.
    pub fn select(&mut self, index: usize, messages: &[Message]) {
        self.selected_index = Some(index);
        self.selected_card = messages
            .get(index)
            .filter(|m| MessageView::card_count(m) > 0)
            .map(|_| 0);
        self.scroll_to_selected();
    }

    pub fn clear_selection(&mut self) {
        self.selected_index = None;
        self.selected_card = None;
    }

    /// Move the cursor one message up (or onto the last message).
    pub fn select_prev(&mut self, messages: &[Message]) {
        if messages.is_empty() {
            return;
        }
        let idx = self
            .selected_index
            .map(|i| i.saturating_sub(1))
            .unwrap_or(messages.len() - 1);
        self.select(idx, messages);
    }

    pub fn select_next(&mut self, messages: &[Message]) {
        if let Some(idx) = self.selected_index
            && idx + 1 < messages.len()
        {
            self.select(idx + 1, messages);
        }
    }

    /// Step the card cursor by `delta`, staying inside the selected message.
    pub fn step_card(&mut self, delta: isize, messages: &[Message]) {
        let Some(message) = self.selected_index.and_then(|i| messages.get(i)) else {
            return;
        };
        let count = MessageView::card_count(message);
        if count == 0 {
            return;
        }
        let current = self.selected_card.unwrap_or(0) as isize;
        self.selected_card = Some((current + delta).clamp(0, count as isize - 1) as usize);
    }

    /// Largest scroll offset that still fills the viewport.
    fn max_offset(&self) -> u16 {
        self.layout
            .total_height()
            .saturating_sub(self.viewport_height)
    }

    pub fn clamp_scroll(&mut self) {
        let max_y = self.max_offset();
        let offset = self.scroll_state.offset();
        if offset.y > max_y {
            self.scroll_state.set_offset(Position { x: offset.x, y: max_y });
        }
    }

    /// Bring the selected message into view, top-aligned when it is taller
    /// than the viewport.
    pub fn scroll_to_selected(&mut self) {
        let Some((top, bottom)) = self
            .selected_index
            .and_then(|idx| self.layout.span_of(idx))
        else {
            return;
        };
        let y = self.scroll_state.offset().y;

        if top < y {
            self.scroll_state.set_offset(Position { x: 0, y: top });
            self.stick_to_bottom = false;
        } else if bottom > y + self.viewport_height {
            let target = bottom.saturating_sub(self.viewport_height);
            self.scroll_state.set_offset(Position { x: 0, y: target });
            self.stick_to_bottom = target >= self.max_offset();
        }
    }

    /// Snap to the bottom and resume following new messages once the user
    /// has scrolled all the way down.
    pub fn repin_if_at_bottom(&mut self) {
        let max_y = self.max_offset();
        let offset = self.scroll_state.offset();
        if offset.y >= max_y {
            self.stick_to_bottom = true;
            self.scroll_state.set_offset(Position { x: offset.x, y: max_y });
        }
    }
}

/// Scrollable conversation view component.
/// Created fresh each frame with references to state and data.
pub struct MessageList<'a> {
    pub state: &'a mut MessageListState,
    pub messages: &'a [Message],
    pub is_loading: bool,
    pub spinner_frame: usize,
}

impl<'a> MessageList<'a> {
    pub fn new(
        state: &'a mut MessageListState,
        messages: &'a [Message],
        is_loading: bool,
        spinner_frame: usize,
    ) -> Self {
        Self {
            state,
            messages,
            is_loading,
            spinner_frame,
        }
    }
}

fn loading_bubble(spinner_frame: usize) -> Paragraph<'static> {
    let spinner = SPINNER[spinner_frame % SPINNER.len()];
    let style = Style::default()
        .fg(Color::DarkGray)
        .add_modifier(Modifier::ITALIC);
    Paragraph::new(Line::styled(format!("{spinner} {LOADING_TEXT}"), style)).block(
        Block::bordered()
            .title(" moodreel ")
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Blue).add_modifier(Modifier::DIM)),
    )
}

impl<'a> Component for MessageList<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let content_width = area.width.saturating_sub(1); // -1 for scrollbar safe area
        let num_items = self.messages.len();

        // 1. Update Layout Cache
        let layout = &mut self.state.layout;
        let reusable = layout.reusable_count(num_items, content_width);
        layout.heights.truncate(reusable.min(layout.heights.len()));
        for message in self.messages.iter().skip(layout.heights.len()) {
            layout
                .heights
                .push(MessageView::calculate_height(message, content_width));
        }
        layout.rebuild_prefix_heights();
        layout.update_metadata(num_items, content_width);

        let messages_height = self.state.layout.total_height();
        let loading_height = if self.is_loading { LOADING_HEIGHT } else { 0 };
        let canvas_height = messages_height.saturating_add(loading_height);

        // 2. Clamp scroll offset to prevent overscrolling past content.
        self.state.viewport_height = area.height;
        if !self.state.stick_to_bottom {
            self.state.clamp_scroll();
        }

        let scroll_offset = self.state.scroll_state.offset().y;
        let visible_range = self.state.layout.visible_range(scroll_offset, area.height);

        // 3. Render visible messages into a ScrollView
        let mut scroll_view = ScrollView::new(Size::new(content_width, canvas_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Always)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        let mut y_offset: u16 = if visible_range.start > 0 {
            self.state.layout.prefix_heights[visible_range.start - 1]
        } else {
            0
        };

        for i in visible_range {
            let height = self.state.layout.heights[i];
            let is_selected = self.state.selected_index == Some(i);
            let selected_card = if is_selected {
                self.state.selected_card
            } else {
                None
            };
            let view = MessageView::new(&self.messages[i], is_selected, selected_card);
            scroll_view.render_widget(view, Rect::new(0, y_offset, content_width, height));
            y_offset += height;
        }

        if self.is_loading {
            scroll_view.render_widget(
                loading_bubble(self.spinner_frame),
                Rect::new(0, messages_height, content_width, LOADING_HEIGHT),
            );
        }

        // Auto-scroll logic (Mutation)
        if self.state.stick_to_bottom {
            self.state.scroll_state.scroll_to_bottom();
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);
    }
}

/// EventHandler is implemented on `MessageListState` rather than `MessageList`
/// because scrolling mutates persistent state while `MessageList` is rebuilt
/// every frame.
impl EventHandler for MessageListState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => {
                self.scroll_state.scroll_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollDown => {
                self.scroll_state.scroll_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_state.scroll_page_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.repin_if_at_bottom();
            }
            _ => {}
        }
        None
    }
}

/// Cached layout measurements
pub struct LayoutCache {
    pub heights: Vec<u16>,
    pub prefix_heights: Vec<u16>,
    message_count: usize,
    content_width: u16,
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutCache {
    pub fn new() -> Self {
        Self {
            heights: Vec::new(),
            prefix_heights: Vec::new(),
            message_count: 0,
            content_width: 0,
        }
    }

    /// How many cached heights are still valid. Messages never change once
    /// appended, so only a width change or a cleared conversation invalidates.
    pub fn reusable_count(&self, message_count: usize, content_width: u16) -> usize {
        if self.content_width != content_width || self.heights.is_empty() {
            return 0;
        }
        // Fewer messages than cached: the conversation was cleared.
        if message_count < self.message_count {
            return 0;
        }
        message_count
    }

    pub fn update_metadata(&mut self, message_count: usize, content_width: u16) {
        self.message_count = message_count;
        self.content_width = content_width;
    }

    pub fn rebuild_prefix_heights(&mut self) {
        self.prefix_heights = self
            .heights
            .iter()
            .scan(0u16, |acc, &h| {
                *acc = acc.saturating_add(h);
                Some(*acc)
            })
            .collect();
    }

    pub fn total_height(&self) -> u16 {
        self.prefix_heights.last().copied().unwrap_or(0)
    }

    /// Top and bottom row of message `idx` in content coordinates.
    pub fn span_of(&self, idx: usize) -> Option<(u16, u16)> {
        let bottom = *self.prefix_heights.get(idx)?;
        let top = idx
            .checked_sub(1)
            .map_or(0, |prev| self.prefix_heights[prev]);
        Some((top, bottom))
    }

    pub fn visible_range(&self, scroll_offset: u16, viewport_height: u16) -> std::ops::Range<usize> {
        let buffer = viewport_height / 2;
        let buffered_start = scroll_offset.saturating_sub(buffer);
        let buffered_end = scroll_offset
            .saturating_add(viewport_height)
            .saturating_add(buffer);

        let start = self
            .prefix_heights
            .partition_point(|&end| end <= buffered_start);
        let end = self
            .prefix_heights
            .partition_point(|&end| end < buffered_end)
            .saturating_add(1)
            .min(self.prefix_heights.len());

        start..end
    }
}
