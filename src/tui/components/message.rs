use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

use crate::core::view::{Entry, Opacity};

/// Columns each nesting level is indented by.
const INDENT_PER_DEPTH: usize = 2;

/// A stateless renderer for one board entry (not its replies).
///
/// # Design
///
/// `MessageCard` is a **transient component**: `MessageList` creates one per
/// visible entry each frame and asks it for lines. Producing lines rather
/// than drawing into a `Rect` lets the list know each card's height before
/// deciding what to scroll into view.
///
/// # Layout
///
/// ```text
/// ▌ alice  2024/01/01 12:00:00  (you)
/// ▌ wrapped message text, or the edit input while editing
/// ▌ ↳ reply input, while the reply form is open
/// ```
///
/// Replies are indented by depth with a `│` rule. Entries that are fading
/// (`Opacity::Transparent`) render dimmed.
pub struct MessageCard<'a> {
    pub entry: &'a Entry,
    pub depth: usize,
    pub is_selected: bool,
    /// Whether the logged-in user wrote this message.
    pub is_own: bool,
    /// Whether Enter currently goes to this card's edit or reply input.
    pub has_input_focus: bool,
}

/// Lines for one card, plus the cursor cell if an input inside it has focus.
pub struct CardLines {
    pub lines: Vec<Line<'static>>,
    /// (row within the card, column)
    pub cursor: Option<(u16, u16)>,
}

impl<'a> MessageCard<'a> {
    pub fn new(entry: &'a Entry, depth: usize, is_selected: bool, is_own: bool) -> Self {
        Self {
            entry,
            depth,
            is_selected,
            is_own,
            has_input_focus: false,
        }
    }

    pub fn with_input_focus(mut self, focused: bool) -> Self {
        self.has_input_focus = focused;
        self
    }

    fn prefix(&self) -> String {
        let gutter = if self.is_selected { "▌ " } else { "  " };
        if self.depth == 0 {
            gutter.to_string()
        } else {
            let indent = " ".repeat(INDENT_PER_DEPTH * (self.depth - 1));
            format!("{gutter}{indent}│ ")
        }
    }

    pub fn lines(&self, width: u16) -> CardLines {
        let prefix = self.prefix();
        let content_width = (width as usize).saturating_sub(prefix.width()).max(1);

        let mut base = Style::default();
        if self.entry.opacity == Opacity::Transparent {
            base = base.add_modifier(Modifier::DIM);
        }
        let gutter_style = if self.is_selected {
            base.fg(Color::Cyan)
        } else {
            base.fg(Color::DarkGray)
        };

        let mut lines = Vec::new();
        let mut cursor = None;
        let row = |spans: Vec<Span<'static>>| {
            let mut all = vec![Span::styled(prefix.clone(), gutter_style)];
            all.extend(spans);
            Line::from(all)
        };

        // Header
        let message = &self.entry.message;
        let mut header = vec![
            Span::styled(
                message.username.clone(),
                base.fg(Color::Green).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("  {}", message.display_time()), base.fg(Color::DarkGray)),
        ];
        if self.is_own {
            header.push(Span::styled("  (you)", base.fg(Color::DarkGray)));
        }
        lines.push(row(header));

        // Body: the text, or the edit form in its place
        if self.entry.text_shown {
            let mut text_style = base;
            if self.entry.text_opacity == Opacity::Transparent {
                text_style = text_style.add_modifier(Modifier::DIM);
            }
            let options = textwrap::Options::new(content_width)
                .break_words(true)
                .word_separator(textwrap::WordSeparator::AsciiSpace);
            let wrapped = textwrap::wrap(&message.text, options);
            if wrapped.is_empty() {
                lines.push(row(vec![]));
            }
            for piece in wrapped {
                lines.push(row(vec![Span::styled(piece.into_owned(), text_style)]));
            }
        }
        if self.entry.edit.shown {
            let edit = &self.entry.edit;
            let (line, col) = self.input_line("✎ ", &edit.input, edit.active, content_width, base);
            if self.has_input_focus {
                cursor = Some((lines.len() as u16, (prefix.width() + col) as u16));
            }
            lines.push(row(line));
        }
        if self.entry.reply.shown {
            let reply = &self.entry.reply;
            let (line, col) = self.input_line("↳ ", &reply.input, reply.active, content_width, base);
            if self.has_input_focus && !self.entry.edit.shown {
                cursor = Some((lines.len() as u16, (prefix.width() + col) as u16));
            }
            lines.push(row(line));
        }

        CardLines { lines, cursor }
    }

    /// One-line input: label plus the tail of the buffer that fits.
    fn input_line(
        &self,
        label: &'static str,
        input: &str,
        active: bool,
        width: usize,
        base: Style,
    ) -> (Vec<Span<'static>>, usize) {
        let room = width.saturating_sub(label.width() + 1);
        let mut start = 0;
        for (idx, _) in input.char_indices() {
            if input[idx..].width() <= room {
                start = idx;
                break;
            }
            start = input.len();
        }
        let shown = &input[start..];

        let style = if active {
            base.fg(Color::Yellow)
        } else {
            base.add_modifier(Modifier::DIM)
        };
        let col = label.width() + shown.width();
        (
            vec![
                Span::styled(label, style),
                Span::styled(shown.to_string(), style),
            ],
            col,
        )
    }
}
