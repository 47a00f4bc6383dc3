//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the
//! [`BoardView`](crate::core::view::BoardView), and routes keys to the
//! [`Controller`].
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Requests
//!
//! Key handling never waits on the server. Operations that need it hand a
//! [`Request`] to [`Requests::spawn`], which runs it on a tokio task; the
//! task sends its [`Outcome`] back over a channel and the loop applies it
//! with [`Controller::apply`] on a later pass.
//!
//! ## Redraw Strategy
//!
//! The loop sleeps until the earliest of: the next key, the next poll tick,
//! the next pending view transition, or a short idle cap (shorter while
//! requests are in flight). It only redraws after something changed.
//!
//! ## Dialogs
//!
//! Alerts queue up in [`TuiPrompt`] and show as a modal box; any key
//! dismisses the front one. Confirmation has to answer synchronously. Keys
//! already read ahead answer it first; otherwise it takes over the bottom
//! row, reads one key, and flags a full repaint.

mod component;
mod components;
mod event;
mod ui;

use std::collections::VecDeque;
use std::io::{self, stdout};
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::cursor::{MoveTo, SetCursorStyle, Show};
use crossterm::event::{
    self as ct_event, DisableBracketedPaste, EnableBracketedPaste, Event, KeyCode, KeyEventKind,
};
use crossterm::execute;
use crossterm::style::Print;
use crossterm::terminal::{Clear, ClearType};
use log::{debug, info, warn};

use crate::api::{BoardApi, HttpBoard};
use crate::core::config::ResolvedConfig;
use crate::core::controller::Controller;
use crate::core::poll::Poller;
use crate::core::prompt::Prompt;
use crate::core::request::{Outcome, Request};
use crate::core::session::viewer_owns;
use crate::core::view::{AuthForm, BoardView, Focus, Screen};
use crate::tui::component::EventHandler;
use crate::tui::components::input_field::edit_text;
use crate::tui::components::{AuthEvent, AuthFormState, MessageListState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// Longest the loop sleeps without checking timers.
const MAX_IDLE_WAIT: Duration = Duration::from_millis(250);

/// Sleep cap while a request is out, so its outcome shows promptly.
const IN_FLIGHT_WAIT: Duration = Duration::from_millis(16);

/// TUI-specific presentation state (not part of the board view)
pub struct TuiState {
    pub message_list: MessageListState,
    pub auth_form: AuthFormState,
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            message_list: MessageListState::new(),
            auth_form: AuthFormState::new(),
        }
    }
}

/// Terminal implementation of [`Prompt`].
#[derive(Debug, Default)]
pub struct TuiPrompt {
    alerts: VecDeque<String>,
    /// Events read from the terminal but not handled yet.
    read_ahead: VecDeque<TuiEvent>,
    needs_repaint: bool,
}

impl TuiPrompt {
    pub fn new() -> Self {
        Self::default()
    }

    /// The alert to show now, and how many are queued behind it.
    pub fn current_alert(&self) -> Option<(&str, usize)> {
        self.alerts
            .front()
            .map(|a| (a.as_str(), self.alerts.len() - 1))
    }

    pub fn dismiss_alert(&mut self) {
        self.alerts.pop_front();
    }

    /// True once after a confirmation drew outside ratatui.
    pub fn take_repaint(&mut self) -> bool {
        std::mem::take(&mut self.needs_repaint)
    }

    fn queue_events(&mut self, events: impl IntoIterator<Item = TuiEvent>) {
        self.read_ahead.extend(events);
    }

    fn next_event(&mut self) -> Option<TuiEvent> {
        self.read_ahead.pop_front()
    }

    /// A key typed right after the one that asked the question.
    fn queued_answer(&mut self) -> Option<bool> {
        while let Some(event) = self.read_ahead.pop_front() {
            match event {
                TuiEvent::Resize => continue,
                TuiEvent::InputChar(c) => return Some(matches!(c, 'y' | 'Y')),
                _ => return Some(false),
            }
        }
        None
    }
}

impl Prompt for TuiPrompt {
    fn alert(&mut self, message: &str) {
        info!("Alert: {}", message);
        self.alerts.push_back(message.to_string());
    }

    fn confirm(&mut self, question: &str) -> bool {
        if let Some(answer) = self.queued_answer() {
            info!("Confirm '{}': {} (typed ahead)", question, answer);
            return answer;
        }

        self.needs_repaint = true;
        let row = crossterm::terminal::size()
            .map(|(_, rows)| rows.saturating_sub(1))
            .unwrap_or(0);
        if let Err(e) = execute!(
            stdout(),
            MoveTo(0, row),
            Clear(ClearType::CurrentLine),
            Print(format!("{question} [y/N] "))
        ) {
            warn!("Failed to draw confirmation: {}", e);
            return false;
        }

        loop {
            match ct_event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    let answer = matches!(key.code, KeyCode::Char('y' | 'Y'));
                    info!("Confirm '{}': {}", question, answer);
                    return answer;
                }
                Ok(_) => {}
                Err(e) => {
                    warn!("Failed to read confirmation: {}", e);
                    return false;
                }
            }
        }
    }
}

/// Background requests and the channel their outcomes come back on.
pub struct Requests {
    tx: mpsc::Sender<Outcome>,
    rx: mpsc::Receiver<Outcome>,
    in_flight: usize,
    loading: bool,
}

impl Default for Requests {
    fn default() -> Self {
        Self::new()
    }
}

impl Requests {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            tx,
            rx,
            in_flight: 0,
            loading: false,
        }
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Runs `request` on a tokio task. At most one list load is out at a time.
    pub fn spawn(&mut self, api: Arc<dyn BoardApi>, request: Request) {
        if request == Request::LoadMessages {
            if self.loading {
                debug!("List load already in flight, skipping");
                return;
            }
            self.loading = true;
        }
        info!("Spawning {} request", request.kind());
        self.in_flight += 1;

        let tx = self.tx.clone();
        tokio::spawn(async move {
            let outcome = request.run(api.as_ref()).await;
            if tx.send(outcome).is_err() {
                warn!("Failed to send request outcome: receiver dropped");
            }
        });
    }

    pub fn try_recv(&mut self) -> Option<Outcome> {
        let outcome = self.rx.try_recv().ok()?;
        self.in_flight = self.in_flight.saturating_sub(1);
        if matches!(outcome, Outcome::Messages(_)) {
            self.loading = false;
        }
        Some(outcome)
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> io::Result<Self> {
        execute!(
            stdout(),
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock // Non-blinking: draw() resets the blink timer
        )?;
        info!("Terminal modes enabled (bracketed paste, steady block cursor)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableBracketedPaste, SetCursorStyle::DefaultUserShape);
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub async fn run(config: ResolvedConfig) -> io::Result<()> {
    let api = HttpBoard::new(&config.base_url, config.timeout).map_err(io::Error::other)?;
    info!("Using board at {}", api.base_url());
    let mut controller = Controller::new(Arc::new(api), TuiPrompt::new());
    let mut tui = TuiState::new();
    let mut requests = Requests::new();
    let mut poller = Poller::new(
        config.poll_interval,
        config.pause_while_editing,
        Instant::now(),
    );

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();
    let mut needs_redraw = true;

    loop {
        let now = Instant::now();
        if drain_outcomes(&mut controller, &mut tui, &mut requests, &mut poller, now) {
            needs_redraw = true;
        }
        if controller.tick(now) {
            needs_redraw = true;
        }
        refresh_if_due(&controller, &mut requests, &mut poller, now);
        tui.message_list
            .retain_valid(&controller.view().flattened_ids());

        if controller.prompt_mut().take_repaint() {
            terminal.clear()?;
            needs_redraw = true;
        }
        if needs_redraw {
            terminal.draw(|f| {
                ui::draw_ui(f, controller.view(), controller.prompt().current_alert(), &mut tui)
            })?;
            needs_redraw = false;
        }

        let mut wait = next_wake(now, &poller, controller.view());
        if requests.in_flight() > 0 {
            wait = wait.min(IN_FLIGHT_WAIT);
        }
        let first_event = poll_event_timeout(wait);
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Drain everything pending before the next draw
        controller.prompt_mut().queue_events(
            first_event
                .into_iter()
                .chain(std::iter::from_fn(poll_event_immediate)),
        );
        if handle_queued(&mut controller, &mut tui, &mut requests) == Flow::Quit {
            break;
        }
    }

    info!("Shutting down");
    ratatui::restore();
    Ok(())
}

/// Sleep until the next poll tick or view transition, capped.
fn next_wake(now: Instant, poller: &Poller, view: &BoardView) -> Duration {
    let wake = match view.next_deadline() {
        Some(deadline) => deadline.min(poller.next_tick()),
        None => poller.next_tick(),
    };
    wake.saturating_duration_since(now).min(MAX_IDLE_WAIT)
}

fn refresh_if_due(
    controller: &Controller<TuiPrompt>,
    requests: &mut Requests,
    poller: &mut Poller,
    now: Instant,
) {
    if poller.should_refresh(now, controller.view()) {
        requests.spawn(controller.api(), Request::LoadMessages);
    }
}

/// Applies every outcome that has arrived. Returns true if any did.
fn drain_outcomes(
    controller: &mut Controller<TuiPrompt>,
    tui: &mut TuiState,
    requests: &mut Requests,
    poller: &mut Poller,
    now: Instant,
) -> bool {
    let mut changed = false;
    while let Some(outcome) = requests.try_recv() {
        changed = true;
        debug!("Event loop received: {:?}", outcome);
        let logged_in = matches!(outcome, Outcome::LoggedIn(Ok(_)));
        let registered = matches!(outcome, Outcome::Registered(Ok(_)));

        if let Some(next) = controller.apply(outcome) {
            requests.spawn(controller.api(), next);
        }

        if logged_in {
            // The login's own list load replaces the next tick.
            poller.rearm(now);
            tui.message_list = MessageListState::new();
        }
        if logged_in || registered {
            tui.auth_form.reset_password();
        }
    }
    changed
}

/// Handles read-ahead events one at a time, so a confirmation raised by one
/// of them can take its answer from the next.
fn handle_queued(
    controller: &mut Controller<TuiPrompt>,
    tui: &mut TuiState,
    requests: &mut Requests,
) -> Flow {
    while let Some(event) = controller.prompt_mut().next_event() {
        if handle_event(controller, tui, requests, event) == Flow::Quit {
            return Flow::Quit;
        }
    }
    Flow::Continue
}

fn handle_event(
    controller: &mut Controller<TuiPrompt>,
    tui: &mut TuiState,
    requests: &mut Requests,
    event: TuiEvent,
) -> Flow {
    match event {
        TuiEvent::ForceQuit => return Flow::Quit,
        TuiEvent::Resize => return Flow::Continue,
        _ => {}
    }

    // An open alert swallows the key that dismisses it
    if controller.prompt().current_alert().is_some() {
        controller.prompt_mut().dismiss_alert();
        return Flow::Continue;
    }

    let request = match controller.view().screen {
        Screen::Auth => handle_auth_event(controller, tui, &event),
        Screen::Content => handle_content_event(controller, tui, event),
    };
    if let Some(request) = request {
        requests.spawn(controller.api(), request);
    }
    Flow::Continue
}

fn handle_auth_event(
    controller: &mut Controller<TuiPrompt>,
    tui: &mut TuiState,
    event: &TuiEvent,
) -> Option<Request> {
    match tui.auth_form.handle_event(event)? {
        AuthEvent::SwitchForm => {
            match controller.view().auth_form {
                AuthForm::Login => controller.show_register_form(),
                AuthForm::Register => controller.show_login_form(),
            }
            None
        }
        AuthEvent::Submit { username, password } => {
            let username = username.trim();
            if username.is_empty() || password.is_empty() {
                return None;
            }
            let username = username.to_string();
            Some(match controller.view().auth_form {
                AuthForm::Login => Request::Login { username, password },
                AuthForm::Register => Request::Register { username, password },
            })
        }
    }
}

fn handle_content_event(
    controller: &mut Controller<TuiPrompt>,
    tui: &mut TuiState,
    event: TuiEvent,
) -> Option<Request> {
    if event == TuiEvent::Logout {
        return Some(Request::Logout);
    }

    match controller.view().focus {
        Focus::Composer => match event {
            TuiEvent::Submit => return controller.prepare_submit(),
            TuiEvent::Escape | TuiEvent::CursorUp => browse(controller, tui),
            other => {
                edit_text(&mut controller.view_mut().composer, &other);
            }
        },
        Focus::List => {
            let ids = controller.view().flattened_ids();
            let selected = tui.message_list.selected;
            match event {
                TuiEvent::CursorDown => tui.message_list.select_next(&ids),
                TuiEvent::CursorUp => {
                    tui.message_list.select_prev(&ids);
                }
                TuiEvent::InputChar('r') => {
                    if let Some(id) = selected {
                        controller.start_reply(id);
                    }
                }
                TuiEvent::InputChar('e') => {
                    if let Some(id) = selected
                        && is_own(controller.view(), id)
                    {
                        controller.start_edit(id);
                    }
                }
                TuiEvent::InputChar('d') => {
                    if let Some(id) = selected
                        && is_own(controller.view(), id)
                    {
                        return controller.prepare_delete(id);
                    }
                }
                TuiEvent::Escape | TuiEvent::Tab => {
                    controller.view_mut().focus = Focus::Composer;
                }
                // Typing anything else goes back to the composer
                other @ (TuiEvent::InputChar(_) | TuiEvent::Paste(_)) => {
                    let view = controller.view_mut();
                    view.focus = Focus::Composer;
                    edit_text(&mut view.composer, &other);
                }
                _ => {}
            }
        }
        Focus::Edit(id) => match event {
            TuiEvent::Submit => return controller.prepare_submit(),
            TuiEvent::Escape => controller.cancel_edit(id),
            other => {
                if let Some(entry) = controller.view_mut().find_mut(id) {
                    edit_text(&mut entry.edit.input, &other);
                }
            }
        },
        Focus::Reply(id) => match event {
            TuiEvent::Submit => return controller.prepare_submit(),
            TuiEvent::Escape => controller.cancel_reply(id),
            other => {
                if let Some(entry) = controller.view_mut().find_mut(id) {
                    edit_text(&mut entry.reply.input, &other);
                }
            }
        },
    }
    None
}

/// Leaves the composer for the list, selecting the newest message.
fn browse(controller: &mut Controller<TuiPrompt>, tui: &mut TuiState) {
    controller.view_mut().focus = Focus::List;
    if tui.message_list.selected.is_none() {
        tui.message_list.select_next(&controller.view().flattened_ids());
    }
}

fn is_own(view: &BoardView, id: i64) -> bool {
    view.find(id)
        .is_some_and(|entry| viewer_owns(view.session.as_ref(), &entry.message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::session::Session;
    use crate::core::transition::FADE;
    use crate::test_support::{FakeBoard, message};
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct Harness {
        controller: Controller<TuiPrompt>,
        tui: TuiState,
        requests: Requests,
        poller: Poller,
    }

    impl Harness {
        fn new(api: Arc<dyn BoardApi>) -> Self {
            Self {
                controller: Controller::new(api, TuiPrompt::new()),
                tui: TuiState::new(),
                requests: Requests::new(),
                poller: Poller::new(Duration::from_secs(5), true, Instant::now()),
            }
        }

        fn logged_in(board: FakeBoard) -> Self {
            let mut h = Self::new(Arc::new(board));
            let view = h.controller.view_mut();
            view.show_session(Session {
                user_id: 1,
                username: "bob".to_string(),
            });
            view.replace_messages(vec![message(2, 2, "theirs"), message(1, 1, "mine")]);
            h
        }

        fn key(&mut self, event: TuiEvent) -> Flow {
            handle_event(&mut self.controller, &mut self.tui, &mut self.requests, event)
        }

        fn typed(&mut self, events: Vec<TuiEvent>) -> Flow {
            self.controller.prompt_mut().queue_events(events);
            handle_queued(&mut self.controller, &mut self.tui, &mut self.requests)
        }

        fn drain(&mut self) -> bool {
            drain_outcomes(
                &mut self.controller,
                &mut self.tui,
                &mut self.requests,
                &mut self.poller,
                Instant::now(),
            )
        }

        /// Applies outcomes until nothing is in flight.
        async fn settle(&mut self) {
            let wait = async {
                while self.requests.in_flight() > 0 {
                    self.drain();
                    tokio::time::sleep(Duration::from_millis(5)).await;
                }
            };
            tokio::time::timeout(Duration::from_secs(5), wait)
                .await
                .expect("requests did not finish");
        }
    }

    #[test]
    fn test_prompt_alert_queue() {
        let mut prompt = TuiPrompt::new();
        assert!(prompt.current_alert().is_none());
        prompt.alert("first");
        prompt.alert("second");
        assert_eq!(prompt.current_alert(), Some(("first", 1)));
        prompt.dismiss_alert();
        assert_eq!(prompt.current_alert(), Some(("second", 0)));
        prompt.dismiss_alert();
        assert!(prompt.current_alert().is_none());
    }

    #[test]
    fn test_confirm_takes_typed_ahead_answer() {
        let mut prompt = TuiPrompt::new();
        prompt.queue_events([TuiEvent::Resize, TuiEvent::InputChar('y'), TuiEvent::InputChar('x')]);
        assert!(prompt.confirm("Delete?"));
        assert_eq!(prompt.next_event(), Some(TuiEvent::InputChar('x')));
        assert!(!prompt.take_repaint());

        prompt.queue_events([TuiEvent::Submit]);
        assert!(!prompt.confirm("Delete?"));
    }

    #[test]
    fn test_next_wake_is_capped_and_follows_deadlines() {
        let now = Instant::now();
        let poller = Poller::new(Duration::from_secs(5), true, now);
        let mut view = BoardView::new();
        assert_eq!(next_wake(now, &poller, &view), MAX_IDLE_WAIT);

        view.show_session(Session {
            user_id: 1,
            username: "bob".to_string(),
        });
        view.replace_messages(vec![message(1, 1, "a")]);
        view.fade_out_and_remove(1, now);
        assert_eq!(next_wake(now, &poller, &view), MAX_IDLE_WAIT.min(FADE));
    }

    #[tokio::test]
    async fn test_force_quit() {
        let mut h = Harness::logged_in(FakeBoard::new());
        assert_eq!(h.key(TuiEvent::ForceQuit), Flow::Quit);
    }

    #[tokio::test]
    async fn test_typing_then_enter_posts() {
        let mut h = Harness::logged_in(FakeBoard::new());
        for c in "hey".chars() {
            h.key(TuiEvent::InputChar(c));
        }
        assert_eq!(h.controller.view().composer, "hey");

        h.key(TuiEvent::Submit);
        assert_eq!(h.requests.in_flight(), 1);

        h.settle().await;
        assert!(h.controller.view().composer.is_empty());
        assert_eq!(h.controller.view().entries[0].id(), 100);
    }

    #[tokio::test]
    async fn test_alert_swallows_next_key() {
        let mut h = Harness::logged_in(FakeBoard::new());
        h.controller.prompt_mut().alert("oops");
        h.key(TuiEvent::InputChar('x'));
        assert!(h.controller.prompt().current_alert().is_none());
        assert!(h.controller.view().composer.is_empty());
    }

    #[tokio::test]
    async fn test_browse_and_reply_keys() {
        let mut h = Harness::logged_in(FakeBoard::new());
        h.key(TuiEvent::Escape);
        assert_eq!(h.controller.view().focus, Focus::List);
        assert_eq!(h.tui.message_list.selected, Some(2));

        h.key(TuiEvent::InputChar('r'));
        assert_eq!(h.controller.view().focus, Focus::Reply(2));
        h.key(TuiEvent::InputChar('k'));
        assert_eq!(h.controller.view().find(2).unwrap().reply.input, "k");

        h.key(TuiEvent::Escape);
        assert_eq!(h.controller.view().focus, Focus::List);
    }

    #[tokio::test]
    async fn test_edit_key_ignored_for_other_users_message() {
        let mut h = Harness::logged_in(FakeBoard::new());
        h.key(TuiEvent::Escape);
        assert_eq!(h.tui.message_list.selected, Some(2));

        h.key(TuiEvent::InputChar('e'));
        assert!(!h.controller.view().is_busy());

        h.key(TuiEvent::CursorDown);
        h.key(TuiEvent::InputChar('e'));
        assert!(h.controller.view().is_busy());
    }

    #[tokio::test]
    async fn test_typing_in_list_returns_to_composer() {
        let mut h = Harness::logged_in(FakeBoard::new());
        h.key(TuiEvent::Escape);
        h.key(TuiEvent::InputChar('h'));
        assert_eq!(h.controller.view().focus, Focus::Composer);
        assert_eq!(h.controller.view().composer, "h");
    }

    #[tokio::test]
    async fn test_fast_delete_confirmation_is_not_typed_into_composer() {
        let mut h = Harness::logged_in(FakeBoard::new());

        h.typed(vec![
            TuiEvent::Escape,
            TuiEvent::CursorDown,
            TuiEvent::InputChar('d'),
            TuiEvent::InputChar('y'),
        ]);

        assert_eq!(h.requests.in_flight(), 1);
        assert_eq!(h.controller.view().focus, Focus::List);
        assert!(h.controller.view().composer.is_empty());

        h.settle().await;
        h.controller.tick(Instant::now() + FADE);
        assert!(h.controller.view().find(1).is_none());
    }

    #[tokio::test]
    async fn test_login_from_auth_screen() {
        let board = FakeBoard::new();
        board.set_list(Ok(vec![message(7, 1, "welcome")]));
        let mut h = Harness::new(Arc::new(board));

        for c in "bob".chars() {
            h.key(TuiEvent::InputChar(c));
        }
        h.key(TuiEvent::Tab);
        h.key(TuiEvent::InputChar('p'));
        h.key(TuiEvent::Submit);
        assert!(!h.controller.view().is_logged_in());

        h.settle().await;
        assert!(h.controller.view().is_logged_in());
        assert_eq!(h.controller.view().flattened_ids(), vec![7]);
        assert!(h.tui.auth_form.password.is_empty());
        assert!(h.poller.next_tick() > Instant::now());
    }

    #[tokio::test]
    async fn test_only_one_list_load_in_flight() {
        let mut h = Harness::logged_in(FakeBoard::new());
        let api = h.controller.api();
        h.requests.spawn(api.clone(), Request::LoadMessages);
        h.requests.spawn(api, Request::LoadMessages);
        assert_eq!(h.requests.in_flight(), 1);
        h.settle().await;
    }

    #[tokio::test]
    async fn test_keys_handled_while_list_load_is_slow() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/messages"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([{
                        "id": 3,
                        "text": "from server",
                        "username": "bob",
                        "user_id": 1,
                        "timestamp": "2024-01-01T00:00:00Z",
                        "replies": []
                    }]))
                    .set_delay(Duration::from_millis(800)),
            )
            .mount(&server)
            .await;
        let board = HttpBoard::new(&server.uri(), Duration::from_secs(5)).unwrap();
        let mut h = Harness::new(Arc::new(board));
        h.controller.view_mut().show_session(Session {
            user_id: 1,
            username: "bob".to_string(),
        });

        let started = Instant::now();
        refresh_if_due(
            &h.controller,
            &mut h.requests,
            &mut h.poller,
            started + Duration::from_secs(5),
        );
        assert_eq!(h.requests.in_flight(), 1);

        for c in "hi".chars() {
            h.key(TuiEvent::InputChar(c));
        }
        assert!(!h.drain());
        assert_eq!(h.controller.view().composer, "hi");
        assert!(started.elapsed() < Duration::from_millis(800));

        h.settle().await;
        assert_eq!(h.controller.view().flattened_ids(), vec![3]);
        assert_eq!(h.controller.view().composer, "hi");
    }
}
