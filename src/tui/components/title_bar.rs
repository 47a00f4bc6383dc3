//! # TitleBar Component
//!
//! Top status bar: the app name, who is logged in, and the current status
//! line from `BoardView::status`.
//!
//! Stateless: every field is a prop handed in by `ui::draw_ui`.
//!
//! 1. **Logged in**: `"Pinboard | bob | Logged in as bob"`
//! 2. **Logged out**: `"Pinboard"`

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

pub struct TitleBar<'a> {
    /// Logged-in username, if any
    pub username: Option<&'a str>,
    /// Status line (e.g. "Logged in as bob")
    pub status: &'a str,
}

impl<'a> TitleBar<'a> {
    pub fn new(username: Option<&'a str>, status: &'a str) -> Self {
        Self { username, status }
    }
}

impl Component for TitleBar<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![Span::styled(
            "Pinboard",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )];
        if let Some(username) = self.username {
            spans.push(Span::raw(" | "));
            spans.push(Span::styled(username, Style::default().fg(Color::Green)));
        }
        if !self.status.is_empty() {
            spans.push(Span::raw(" | "));
            spans.push(Span::styled(self.status, Style::default().fg(Color::DarkGray)));
        }

        frame.render_widget(Line::from(spans), area);
    }
}
