//! # Board Controller
//!
//! Binds user intents to API calls and applies the results to the
//! [`BoardView`]. Each operation is split in two:
//!
//! - `prepare_*` validates input against the view (and asks for
//!   confirmation where needed) and returns the [`Request`] to run.
//! - [`Controller::apply`] takes the [`Outcome`] once the server answers.
//!
//! The TUI runs requests on spawned tasks, so the loop never waits on the
//! network. The async wrappers (`login`, `send_message`, ...) run both halves
//! inline for the snapshot command and for tests.
//!
//! Failure policy, the same for every message operation:
//!
//! - **401**: the session is gone; drop to the logged-out view, no alert.
//! - **Other HTTP errors**: alert with the server's body text.
//! - **Network / parse errors**: logged, plus a generic alert.
//!
//! Listing is the exception: transport errors there are only logged (the
//! poller would otherwise alert every few seconds), and a body that is not
//! valid JSON counts as an expired session.
//!
//! Nothing is retried. Every failure ends that one action.

use std::sync::Arc;
use std::time::Instant;

use log::{debug, info, warn};

use crate::api::{ApiError, BoardApi, Message};
use crate::core::prompt::Prompt;
use crate::core::request::{Outcome, Request};
use crate::core::session::Session;
use crate::core::view::{AuthForm, BoardView, Entry, Focus};

pub const REGISTERED_NOTICE: &str = "Registration complete. Please log in.";
pub const SESSION_EXPIRED_NOTICE: &str = "Session expired. Please log in again.";
pub const DELETE_QUESTION: &str = "Delete this message?";

pub struct Controller<P: Prompt> {
    api: Arc<dyn BoardApi>,
    prompt: P,
    view: BoardView,
}

impl<P: Prompt> Controller<P> {
    pub fn new(api: Arc<dyn BoardApi>, prompt: P) -> Self {
        Self {
            api,
            prompt,
            view: BoardView::new(),
        }
    }

    /// Shared handle for running requests off the controller.
    pub fn api(&self) -> Arc<dyn BoardApi> {
        Arc::clone(&self.api)
    }

    pub fn view(&self) -> &BoardView {
        &self.view
    }

    /// Mutable access for front ends that edit input buffers directly.
    pub fn view_mut(&mut self) -> &mut BoardView {
        &mut self.view
    }

    pub fn prompt(&self) -> &P {
        &self.prompt
    }

    pub fn prompt_mut(&mut self) -> &mut P {
        &mut self.prompt
    }

    // ========================================================================
    // Preparing requests
    // ========================================================================

    pub fn prepare_send_message(&self) -> Option<Request> {
        let text = self.view.composer.trim();
        (!text.is_empty()).then(|| Request::SendMessage {
            text: text.to_string(),
        })
    }

    pub fn prepare_send_reply(&self, parent_id: i64) -> Option<Request> {
        let Some(parent) = self.view.find(parent_id) else {
            warn!("Reply target {} is not on screen", parent_id);
            return None;
        };
        let text = parent.reply.input.trim();
        (!text.is_empty()).then(|| Request::SendReply {
            parent_id,
            text: text.to_string(),
        })
    }

    pub fn prepare_save_edit(&self, id: i64) -> Option<Request> {
        let text = self.view.find(id)?.edit.input.trim();
        (!text.is_empty()).then(|| Request::SaveEdit {
            id,
            text: text.to_string(),
        })
    }

    /// Asks the prompt first; a "no" produces no request.
    pub fn prepare_delete(&mut self, id: i64) -> Option<Request> {
        if !self.prompt.confirm(DELETE_QUESTION) {
            debug!("Delete of {} cancelled", id);
            return None;
        }
        Some(Request::Delete { id })
    }

    /// The Enter key, wherever it was pressed.
    pub fn prepare_submit(&self) -> Option<Request> {
        match self.view.focus {
            Focus::Composer => self.prepare_send_message(),
            Focus::Reply(id) => self.prepare_send_reply(id),
            Focus::Edit(id) => self.prepare_save_edit(id),
            Focus::List => None,
        }
    }

    // ========================================================================
    // Applying outcomes
    // ========================================================================

    /// Folds a server answer into the view. A successful login returns the
    /// follow-up list load.
    pub fn apply(&mut self, outcome: Outcome) -> Option<Request> {
        let now = Instant::now();
        match outcome {
            Outcome::Registered(Ok(user)) => {
                info!("Registered user '{}' (id={})", user.username, user.id);
                self.prompt.alert(REGISTERED_NOTICE);
                self.show_login_form();
            }
            Outcome::Registered(Err(e)) => {
                self.report_auth_failure(e, "Registration failed", "registration")
            }

            Outcome::LoggedIn(Ok(user)) => {
                info!("Logged in as '{}' (id={})", user.username, user.id);
                self.view.show_session(Session::from(user));
                return Some(Request::LoadMessages);
            }
            Outcome::LoggedIn(Err(e)) => self.report_auth_failure(e, "Login failed", "login"),

            Outcome::LoggedOut(Ok(())) => {
                info!("Logged out");
                self.view.show_logged_out();
            }
            Outcome::LoggedOut(Err(ApiError::Network(e))) => {
                warn!("Logout failed: {}", e);
                self.prompt.alert("An error occurred during logout");
            }
            Outcome::LoggedOut(Err(e)) => warn!("Logout rejected: {}", e),

            Outcome::Messages(result) => self.apply_messages(result),

            Outcome::MessageSent(Ok(message)) => {
                info!("Posted message {}", message.id);
                self.view.composer.clear();
                self.view.prepend(message, now);
            }
            Outcome::MessageSent(Err(e)) => {
                self.report_failure(e, "Failed to send message", "sending the message")
            }

            Outcome::ReplySent { parent_id, result: Ok(message) } => {
                info!("Posted reply {} to {}", message.id, parent_id);
                if !self.view.append_reply(parent_id, message, now) {
                    warn!("Reply target {} vanished before the reply landed", parent_id);
                    return None;
                }
                if let Some(parent) = self.view.find_mut(parent_id) {
                    parent.reply.input.clear();
                }
                self.view.close_reply(parent_id, now);
            }
            Outcome::ReplySent { result: Err(e), .. } => {
                self.report_failure(e, "Failed to send reply", "sending the reply")
            }

            Outcome::EditSaved { id, text, result: Ok(()) } => {
                info!("Updated message {}", id);
                self.view.commit_edit(id, text, now);
            }
            Outcome::EditSaved { result: Err(e), .. } => {
                self.report_failure(e, "Failed to update message", "updating the message")
            }

            Outcome::Deleted { id, result: Ok(()) } => {
                info!("Deleted message {}", id);
                self.view.fade_out_and_remove(id, now);
            }
            Outcome::Deleted { result: Err(e), .. } => {
                self.report_failure(e, "Failed to delete message", "deleting the message")
            }
        }
        None
    }

    fn apply_messages(&mut self, result: Result<Vec<Message>, ApiError>) {
        match result {
            Ok(_) if !self.view.is_logged_in() => {
                debug!("Dropping message list that arrived after logout");
            }
            Ok(messages) => {
                debug!("Rebuilding list with {} messages", messages.len());
                self.view.replace_messages(messages);
            }
            Err(e) if e.is_unauthorized() => self.expire_session(),
            Err(ApiError::Parse(e)) => {
                warn!("Message list was not JSON ({}), treating as expired session", e);
                self.expire_session();
            }
            Err(e) => warn!("Failed to load messages: {}", e),
        }
    }

    /// Runs `request` on this task, then any follow-up it produces.
    pub async fn perform(&mut self, request: Request) {
        let mut next = Some(request);
        while let Some(request) = next {
            let outcome = request.run(self.api.as_ref()).await;
            next = self.apply(outcome);
        }
    }

    // ========================================================================
    // Authentication
    // ========================================================================

    pub async fn register(&mut self, username: &str, password: &str) {
        self.perform(Request::Register {
            username: username.to_string(),
            password: password.to_string(),
        })
        .await;
    }

    /// On success the session comes from the server's acknowledgment and the
    /// list is loaded once.
    pub async fn login(&mut self, username: &str, password: &str) {
        self.perform(Request::Login {
            username: username.to_string(),
            password: password.to_string(),
        })
        .await;
    }

    pub async fn logout(&mut self) {
        self.perform(Request::Logout).await;
    }

    pub fn show_login_form(&mut self) {
        self.view.show_auth_form(AuthForm::Login);
    }

    pub fn show_register_form(&mut self) {
        self.view.show_auth_form(AuthForm::Register);
    }

    // ========================================================================
    // Messages
    // ========================================================================

    pub async fn load_messages(&mut self) {
        self.perform(Request::LoadMessages).await;
    }

    /// Posts the composer text as a new top-level message.
    pub async fn send_message(&mut self) {
        if let Some(request) = self.prepare_send_message() {
            self.perform(request).await;
        }
    }

    /// Posts the reply input under `parent_id` as a reply to it.
    pub async fn send_reply(&mut self, parent_id: i64) {
        if let Some(request) = self.prepare_send_reply(parent_id) {
            self.perform(request).await;
        }
    }

    pub async fn save_edit(&mut self, id: i64) {
        if let Some(request) = self.prepare_save_edit(id) {
            self.perform(request).await;
        }
    }

    pub async fn delete_message(&mut self, id: i64) {
        if let Some(request) = self.prepare_delete(id) {
            self.perform(request).await;
        }
    }

    pub async fn submit_focused(&mut self) {
        if let Some(request) = self.prepare_submit() {
            self.perform(request).await;
        }
    }

    // ========================================================================
    // Edit and reply forms
    // ========================================================================

    pub fn start_edit(&mut self, id: i64) {
        if self.view.find(id).is_some_and(|e| !self.owns(e)) {
            warn!("Refusing to edit message {} owned by someone else", id);
            return;
        }
        self.view.begin_edit(id, Instant::now());
    }

    pub fn cancel_edit(&mut self, id: i64) {
        self.view.cancel_edit(id, Instant::now());
    }

    pub fn start_reply(&mut self, id: i64) {
        self.view.open_reply(id);
    }

    pub fn cancel_reply(&mut self, id: i64) {
        self.view.close_reply(id, Instant::now());
    }

    // ========================================================================
    // Time
    // ========================================================================

    /// Applies due transitions. Returns true if the view changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.view.advance(now)
    }

    // ========================================================================
    // Failure handling
    // ========================================================================

    fn owns(&self, entry: &Entry) -> bool {
        self.view
            .session
            .as_ref()
            .is_some_and(|s| s.owns(&entry.message))
    }

    fn expire_session(&mut self) {
        info!("Session expired, showing logged-out view");
        self.view.show_logged_out();
        self.view.status = SESSION_EXPIRED_NOTICE.to_string();
    }

    fn report_failure(&mut self, err: ApiError, failed: &str, activity: &str) {
        if err.is_unauthorized() {
            self.expire_session();
            return;
        }
        self.alert_failure(&err, failed, &format!("An error occurred while {activity}"));
    }

    /// A 401 here means bad credentials, not an expired session.
    fn report_auth_failure(&mut self, err: ApiError, failed: &str, activity: &str) {
        self.alert_failure(&err, failed, &format!("An error occurred during {activity}"));
    }

    fn alert_failure(&mut self, err: &ApiError, failed: &str, generic: &str) {
        match err.server_text() {
            Some(text) => self.prompt.alert(&format!("{failed}: {text}")),
            None => {
                warn!("{}: {}", failed, err);
                self.prompt.alert(generic);
            }
        }
    }
}
