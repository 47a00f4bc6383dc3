//! # InputField Component
//!
//! Single-line bordered text field. The buffer itself lives wherever the
//! owner keeps it (the composer and per-message forms live in `BoardView`,
//! auth fields in `AuthFormState`); this component only draws it and
//! places the cursor.
//!
//! Editing is append-only at the end of the buffer, which is all a one-line
//! chat input needs. [`edit_text`] applies an event to any buffer.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::tui::component::Component;
use crate::tui::event::TuiEvent;

/// Height of a field: one text row plus borders.
pub const FIELD_HEIGHT: u16 = 3;

/// Applies an editing event to `buffer`. Returns true if the event was an edit.
///
/// Pasted newlines are flattened to spaces since the field is one line.
pub fn edit_text(buffer: &mut String, event: &TuiEvent) -> bool {
    match event {
        TuiEvent::InputChar(c) => {
            buffer.push(*c);
            true
        }
        TuiEvent::Paste(text) => {
            buffer.extend(text.chars().map(|c| if c == '\n' || c == '\r' { ' ' } else { c }));
            true
        }
        TuiEvent::Backspace => {
            buffer.pop();
            true
        }
        _ => false,
    }
}

pub struct InputField<'a> {
    pub title: &'a str,
    pub text: &'a str,
    pub focused: bool,
    /// Render as bullets (passwords).
    pub masked: bool,
}

impl<'a> InputField<'a> {
    pub fn new(title: &'a str, text: &'a str, focused: bool) -> Self {
        Self {
            title,
            text,
            focused,
            masked: false,
        }
    }

    pub fn masked(mut self) -> Self {
        self.masked = true;
        self
    }

    /// The text as displayed, scrolled so its tail fits in `width` columns.
    fn visible_text(&self, width: usize) -> String {
        let shown = if self.masked {
            "•".repeat(self.text.chars().count())
        } else {
            self.text.to_string()
        };
        if shown.width() < width {
            return shown;
        }
        // Keep the tail: drop leading chars until the rest fits, leaving a cursor column
        let mut start = 0;
        for (idx, _) in shown.char_indices() {
            if shown[idx..].width() < width {
                start = idx;
                break;
            }
        }
        shown[start..].to_string()
    }
}

impl Component for InputField<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let inner_width = area.width.saturating_sub(2) as usize;
        let text = self.visible_text(inner_width);

        let border_style = if self.focused {
            Style::default().fg(Color::Green)
        } else {
            Style::default().add_modifier(Modifier::DIM)
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(self.title);

        let cursor_x = area.x + 1 + text.width() as u16;
        frame.render_widget(Paragraph::new(text).block(block), area);

        if self.focused && area.height > 1 {
            frame.set_cursor_position((cursor_x.min(area.right().saturating_sub(2)), area.y + 1));
        }
    }
}
