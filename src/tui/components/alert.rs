//! # Alert Overlay
//!
//! Modal box for a queued alert. Drawn over everything else; any key
//! dismisses it (handled by the run loop).

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Clear, Paragraph, Wrap};

use crate::tui::component::Component;

pub struct AlertBox<'a> {
    pub message: &'a str,
    /// Alerts still queued behind this one
    pub pending: usize,
}

impl<'a> AlertBox<'a> {
    pub fn new(message: &'a str, pending: usize) -> Self {
        Self { message, pending }
    }
}

impl Component for AlertBox<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let overlay = centered_rect(60, 30, area);
        frame.render_widget(Clear, overlay);

        let help = if self.pending > 0 {
            format!(" any key: dismiss ({} more) ", self.pending)
        } else {
            " any key: dismiss ".to_string()
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" Notice ")
            .title_bottom(Line::from(help).centered());

        frame.render_widget(
            Paragraph::new(self.message)
                .block(block)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true }),
            overlay,
        );
    }
}

/// Compute a centered rect using percentage of the outer rect.
fn centered_rect(percent_x: u16, percent_y: u16, outer: Rect) -> Rect {
    let [_, center_v, _] = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .areas(outer);
    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .areas(center_v);
    center
}
