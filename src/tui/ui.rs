use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Color, Style};
use ratatui::widgets::Paragraph;

use crate::core::view::{BoardView, Focus, Screen};
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::input_field::FIELD_HEIGHT;
use crate::tui::components::{AlertBox, AuthFormView, InputField, MessageList, TitleBar};

/// Key hint for the footer, by screen and focus.
fn footer_hint(view: &BoardView) -> &'static str {
    match (view.screen, view.focus) {
        (Screen::Auth, _) => "Tab: switch field · Enter: submit · Ctrl+T: login/register · Ctrl+C: quit",
        (Screen::Content, Focus::Composer) => {
            "Enter: post · Esc/↑: browse messages · Ctrl+L: logout · Ctrl+C: quit"
        }
        (Screen::Content, Focus::List) => {
            "↑/↓: select · r: reply · e: edit · d: delete · Esc: compose · Ctrl+L: logout"
        }
        (Screen::Content, Focus::Edit(_)) => "Enter: save · Esc: cancel edit",
        (Screen::Content, Focus::Reply(_)) => "Enter: send reply · Esc: cancel reply",
    }
}

/// Draws one frame. `alert` is the front alert and how many wait behind it.
pub fn draw_ui(
    frame: &mut Frame,
    view: &BoardView,
    alert: Option<(&str, usize)>,
    tui: &mut TuiState,
) {
    use Constraint::{Length, Min};

    let username = view.session.as_ref().map(|s| s.username.as_str());
    let hint = Paragraph::new(footer_hint(view)).style(Style::default().fg(Color::DarkGray));

    match view.screen {
        Screen::Auth => {
            let [title_area, main_area, footer_area] =
                Layout::vertical([Length(1), Min(0), Length(1)]).areas(frame.area());

            TitleBar::new(username, "").render(frame, title_area);
            AuthFormView {
                state: &tui.auth_form,
                form: view.auth_form,
                status: &view.status,
            }
            .render(frame, main_area);
            frame.render_widget(hint, footer_area);
        }
        Screen::Content => {
            let [title_area, list_area, composer_area, footer_area] =
                Layout::vertical([Length(1), Min(0), Length(FIELD_HEIGHT), Length(1)])
                    .areas(frame.area());

            TitleBar::new(username, &view.status).render(frame, title_area);
            MessageList::new(&mut tui.message_list, view).render(frame, list_area);
            InputField::new("New message", &view.composer, view.focus == Focus::Composer)
                .render(frame, composer_area);
            frame.render_widget(hint, footer_area);
        }
    }

    if let Some((message, pending)) = alert {
        AlertBox::new(message, pending).render(frame, frame.area());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::session::Session;
    use crate::test_support::message;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn draw(view: &BoardView, alert: Option<(&str, usize)>) -> String {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut tui = TuiState::new();
        terminal.draw(|f| draw_ui(f, view, alert, &mut tui)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_logged_out_shows_login_form() {
        let view = BoardView::new();
        let text = draw(&view, None);
        assert!(text.contains("Login"));
        assert!(text.contains("Username"));
        assert!(!text.contains("New message"));
    }

    #[test]
    fn test_logged_in_shows_board_and_composer() {
        let mut view = BoardView::new();
        view.show_session(Session {
            user_id: 1,
            username: "bob".to_string(),
        });
        view.replace_messages(vec![message(1, 2, "hello board")]);

        let text = draw(&view, None);
        assert!(text.contains("Logged in as bob"));
        assert!(text.contains("hello board"));
        assert!(text.contains("New message"));
    }

    #[test]
    fn test_alert_overlay_is_drawn() {
        let view = BoardView::new();
        let text = draw(&view, Some(("Login failed: bad password", 0)));
        assert!(text.contains("Login failed: bad password"));
    }

    #[test]
    fn test_footer_follows_focus() {
        let mut view = BoardView::new();
        view.show_session(Session {
            user_id: 1,
            username: "bob".to_string(),
        });
        view.focus = Focus::List;
        assert!(footer_hint(&view).contains("r: reply"));
        view.focus = Focus::Edit(1);
        assert!(footer_hint(&view).contains("cancel edit"));
    }
}
