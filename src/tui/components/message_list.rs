//! # MessageList Component
//!
//! Scrollable view of the board: top-level messages newest first, each
//! followed by its replies, depth first.
//!
//! ## Responsibilities
//!
//! - Flatten the entry tree into cards with their nesting depth
//! - Track the selected message (by id, so it survives list refreshes)
//! - Keep the selection in view
//! - Place the cursor inside an open edit or reply input
//!
//! ## Architecture
//!
//! `MessageList` is a transient component (created each frame) that wraps
//! `&'a mut MessageListState` (persistent state) and `&'a BoardView` (props).
//! Since `Component::render` takes `&mut self`, the scroll offset is updated
//! during the render pass, like ratatui's `StatefulWidget`.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::Paragraph;

use crate::core::session::viewer_owns;
use crate::core::view::{BoardView, Entry, Focus};
use crate::tui::component::Component;
use crate::tui::components::message::MessageCard;

/// Selection and scroll state for the message list.
/// Must be persisted in the parent TuiState.
#[derive(Debug, Default)]
pub struct MessageListState {
    /// Selected message id (top-level or reply)
    pub selected: Option<i64>,
    /// First visible row
    pub offset: u16,
    /// Last known viewport height
    pub viewport_height: u16,
}

impl MessageListState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the selection one message down in display order.
    pub fn select_next(&mut self, ids: &[i64]) {
        self.selected = match self.position(ids) {
            Some(pos) if pos + 1 < ids.len() => Some(ids[pos + 1]),
            Some(_) => self.selected,
            None => ids.first().copied(),
        };
    }

    /// Moves the selection one message up. Returns false when already at the top.
    pub fn select_prev(&mut self, ids: &[i64]) -> bool {
        match self.position(ids) {
            Some(pos) if pos > 0 => {
                self.selected = Some(ids[pos - 1]);
                true
            }
            _ => false,
        }
    }

    /// Drops a selection whose message has left the list.
    pub fn retain_valid(&mut self, ids: &[i64]) {
        if self.position(ids).is_none() {
            self.selected = None;
        }
    }

    fn position(&self, ids: &[i64]) -> Option<usize> {
        let selected = self.selected?;
        ids.iter().position(|&id| id == selected)
    }

    /// Scrolls so rows `top..bottom` are visible, preferring the top edge.
    fn scroll_to(&mut self, top: u16, bottom: u16) {
        if top < self.offset {
            self.offset = top;
        } else if bottom > self.offset.saturating_add(self.viewport_height) {
            self.offset = bottom.saturating_sub(self.viewport_height).min(top);
        }
    }
}

/// Scrollable board view component.
/// Created fresh each frame with references to state and data.
pub struct MessageList<'a> {
    pub state: &'a mut MessageListState,
    pub view: &'a BoardView,
}

impl<'a> MessageList<'a> {
    pub fn new(state: &'a mut MessageListState, view: &'a BoardView) -> Self {
        Self { state, view }
    }
}

/// Row index of the next line; pinned at the last addressable row.
fn row_count(lines: &[Line]) -> u16 {
    u16::try_from(lines.len()).unwrap_or(u16::MAX)
}

fn walk<'e>(entries: &'e [Entry], depth: usize, out: &mut Vec<(&'e Entry, usize)>) {
    for entry in entries {
        out.push((entry, depth));
        walk(entry.replies(), depth + 1, out);
    }
}

impl Component for MessageList<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.state.viewport_height = area.height;

        if self.view.entries.is_empty() {
            let placeholder = Paragraph::new("No messages yet. Type below and press Enter to post.")
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::DarkGray));
            frame.render_widget(placeholder, area);
            return;
        }

        let input_target = match self.view.focus {
            Focus::Edit(id) | Focus::Reply(id) => Some(id),
            Focus::Composer | Focus::List => None,
        };

        let mut cards = Vec::new();
        walk(&self.view.entries, 0, &mut cards);

        let mut lines: Vec<Line<'static>> = Vec::new();
        let mut selected_rows = None;
        let mut cursor = None;
        for (entry, depth) in cards {
            let id = entry.id();
            let is_own = viewer_owns(self.view.session.as_ref(), &entry.message);
            let card = MessageCard::new(entry, depth, self.state.selected == Some(id), is_own)
                .with_input_focus(input_target == Some(id))
                .lines(area.width);

            let top = row_count(&lines);
            if let Some((row, col)) = card.cursor {
                cursor = Some((top.saturating_add(row), col));
            }
            lines.extend(card.lines);
            if self.state.selected == Some(id) {
                selected_rows = Some((top, row_count(&lines)));
            }
            lines.push(Line::default());
        }

        let total = row_count(&lines);
        if let Some((row, _)) = cursor {
            self.state.scroll_to(row, row.saturating_add(1));
        } else if let Some((top, bottom)) = selected_rows {
            self.state.scroll_to(top, bottom);
        }
        self.state.offset = self.state.offset.min(total.saturating_sub(area.height));

        frame.render_widget(Paragraph::new(lines).scroll((self.state.offset, 0)), area);

        if let Some((row, col)) = cursor
            && row >= self.state.offset
            && row < self.state.offset.saturating_add(area.height)
        {
            let x = area.x.saturating_add(col).min(area.right().saturating_sub(1));
            frame.set_cursor_position((x, area.y + (row - self.state.offset)));
        }
    }
}
