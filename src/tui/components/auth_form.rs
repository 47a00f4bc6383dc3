//! # Auth Form Component
//!
//! Login and registration share one form: username, password, and a title
//! naming which endpoint Enter will hit. Ctrl+T flips between them.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `AuthFormState` lives in `TuiState` (field buffers, focused field)
//! - `AuthFormView` is created each frame with borrowed state and props

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::core::view::AuthForm;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::input_field::{FIELD_HEIGHT, InputField, edit_text};
use crate::tui::event::TuiEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Field {
    #[default]
    Username,
    Password,
}

/// Events emitted by the auth form.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthEvent {
    Submit { username: String, password: String },
    SwitchForm,
}

#[derive(Debug, Default)]
pub struct AuthFormState {
    pub username: String,
    pub password: String,
    pub field: Field,
}

impl AuthFormState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops the password and returns focus to the username.
    pub fn reset_password(&mut self) {
        self.password.clear();
        self.field = Field::Username;
    }
}

impl EventHandler for AuthFormState {
    type Event = AuthEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<AuthEvent> {
        match event {
            TuiEvent::Tab | TuiEvent::CursorDown | TuiEvent::CursorUp => {
                self.field = match self.field {
                    Field::Username => Field::Password,
                    Field::Password => Field::Username,
                };
                None
            }
            TuiEvent::SwitchForm => Some(AuthEvent::SwitchForm),
            TuiEvent::Submit => {
                // Enter on the username moves on to the password first
                if self.field == Field::Username && self.password.is_empty() {
                    self.field = Field::Password;
                    return None;
                }
                Some(AuthEvent::Submit {
                    username: self.username.clone(),
                    password: self.password.clone(),
                })
            }
            _ => {
                let buffer = match self.field {
                    Field::Username => &mut self.username,
                    Field::Password => &mut self.password,
                };
                edit_text(buffer, event);
                None
            }
        }
    }
}

pub struct AuthFormView<'a> {
    pub state: &'a AuthFormState,
    pub form: AuthForm,
    /// Notice shown under the form (e.g. "Session expired").
    pub status: &'a str,
}

impl Component for AuthFormView<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let (title, hint) = match self.form {
            AuthForm::Login => ("Login", "Enter: log in · Ctrl+T: register instead"),
            AuthForm::Register => ("Register", "Enter: create account · Ctrl+T: log in instead"),
        };

        let [form_area] = Layout::horizontal([Constraint::Length(50)])
            .flex(Flex::Center)
            .areas(area);
        let [title_area, user_area, pass_area, hint_area, status_area] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Length(FIELD_HEIGHT),
            Constraint::Length(FIELD_HEIGHT),
            Constraint::Length(1),
            Constraint::Length(2),
        ])
        .flex(Flex::Center)
        .areas(form_area);

        let heading = Line::from(Span::styled(
            title,
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ));
        frame.render_widget(Paragraph::new(heading).alignment(Alignment::Center), title_area);

        InputField::new("Username", &self.state.username, self.state.field == Field::Username)
            .render(frame, user_area);
        InputField::new("Password", &self.state.password, self.state.field == Field::Password)
            .masked()
            .render(frame, pass_area);

        frame.render_widget(
            Paragraph::new(hint)
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::DarkGray)),
            hint_area,
        );
        if !self.status.is_empty() {
            frame.render_widget(
                Paragraph::new(self.status)
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(Color::Red)),
                status_area,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn type_str(state: &mut AuthFormState, s: &str) {
        for c in s.chars() {
            state.handle_event(&TuiEvent::InputChar(c));
        }
    }

    #[test]
    fn test_typing_goes_to_focused_field() {
        let mut state = AuthFormState::new();
        type_str(&mut state, "bob");
        state.handle_event(&TuiEvent::Tab);
        type_str(&mut state, "pw");
        assert_eq!(state.username, "bob");
        assert_eq!(state.password, "pw");
    }

    #[test]
    fn test_enter_on_username_moves_to_password() {
        let mut state = AuthFormState::new();
        type_str(&mut state, "bob");
        assert_eq!(state.handle_event(&TuiEvent::Submit), None);
        assert_eq!(state.field, Field::Password);

        type_str(&mut state, "pw");
        assert_eq!(
            state.handle_event(&TuiEvent::Submit),
            Some(AuthEvent::Submit { username: "bob".into(), password: "pw".into() })
        );
    }

    #[test]
    fn test_switch_form_event() {
        let mut state = AuthFormState::new();
        assert_eq!(state.handle_event(&TuiEvent::SwitchForm), Some(AuthEvent::SwitchForm));
    }

    #[test]
    fn test_reset_password() {
        let mut state = AuthFormState::new();
        state.password = "pw".into();
        state.field = Field::Password;
        state.reset_password();
        assert!(state.password.is_empty());
        assert_eq!(state.field, Field::Username);
    }

    #[test]
    fn test_render_shows_form_title_and_status() {
        let backend = TestBackend::new(60, 20);
        let mut terminal = Terminal::new(backend).unwrap();
        let state = AuthFormState::new();
        terminal
            .draw(|f| {
                AuthFormView { state: &state, form: AuthForm::Register, status: "Session expired." }
                    .render(f, f.area())
            })
            .unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("Register"));
        assert!(text.contains("Session expired."));
    }
}
