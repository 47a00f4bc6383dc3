//! # Requests and Outcomes
//!
//! The controller never awaits the network itself. A user operation that
//! needs the server produces a [`Request`]; whoever owns the runtime runs it
//! (the TUI spawns it, the snapshot CLI awaits it) and hands the resulting
//! [`Outcome`] back to [`Controller::apply`](crate::core::controller::Controller::apply).
//!
//! ```text
//! key ──▶ Controller::prepare_* ──▶ Request ──▶ tokio::spawn(run) ──▶ Outcome ──▶ Controller::apply
//! ```
//!
//! Outcomes carry whatever the apply step needs (the id, the saved text),
//! so results can arrive in any order relative to later key presses.

use log::debug;

use crate::api::{ApiError, BoardApi, Message, User};

/// A single call to the board server, with owned arguments so it can move
/// into a spawned task.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Register { username: String, password: String },
    Login { username: String, password: String },
    Logout,
    LoadMessages,
    SendMessage { text: String },
    SendReply { parent_id: i64, text: String },
    SaveEdit { id: i64, text: String },
    Delete { id: i64 },
}

/// The server's answer to a [`Request`].
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Registered(Result<User, ApiError>),
    LoggedIn(Result<User, ApiError>),
    LoggedOut(Result<(), ApiError>),
    Messages(Result<Vec<Message>, ApiError>),
    MessageSent(Result<Message, ApiError>),
    ReplySent {
        parent_id: i64,
        result: Result<Message, ApiError>,
    },
    EditSaved {
        id: i64,
        text: String,
        result: Result<(), ApiError>,
    },
    Deleted {
        id: i64,
        result: Result<(), ApiError>,
    },
}

impl Request {
    pub async fn run(self, api: &dyn BoardApi) -> Outcome {
        debug!("Running {} request", self.kind());
        match self {
            Request::Register { username, password } => {
                Outcome::Registered(api.register(&username, &password).await)
            }
            Request::Login { username, password } => {
                Outcome::LoggedIn(api.login(&username, &password).await)
            }
            Request::Logout => Outcome::LoggedOut(api.logout().await),
            Request::LoadMessages => Outcome::Messages(api.messages().await),
            Request::SendMessage { text } => Outcome::MessageSent(api.save(&text, None).await),
            Request::SendReply { parent_id, text } => Outcome::ReplySent {
                parent_id,
                result: api.save(&text, Some(parent_id)).await,
            },
            Request::SaveEdit { id, text } => {
                let result = api.update(id, &text).await;
                Outcome::EditSaved { id, text, result }
            }
            Request::Delete { id } => Outcome::Deleted {
                id,
                result: api.delete(id).await,
            },
        }
    }

    /// Name for logs; never includes the password.
    pub fn kind(&self) -> &'static str {
        match self {
            Request::Register { .. } => "register",
            Request::Login { .. } => "login",
            Request::Logout => "logout",
            Request::LoadMessages => "load messages",
            Request::SendMessage { .. } => "send message",
            Request::SendReply { .. } => "send reply",
            Request::SaveEdit { .. } => "save edit",
            Request::Delete { .. } => "delete",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeBoard, message};

    #[tokio::test]
    async fn test_reply_outcome_keeps_parent() {
        let fake = FakeBoard::new();
        fake.set_saved(Ok(message(9, 1, "re")));

        let outcome = Request::SendReply { parent_id: 4, text: "re".into() }
            .run(&fake)
            .await;

        assert_eq!(fake.calls(), vec!["save re Some(4)"]);
        assert_eq!(
            outcome,
            Outcome::ReplySent { parent_id: 4, result: Ok(message(9, 1, "re")) }
        );
    }

    #[tokio::test]
    async fn test_edit_outcome_carries_text() {
        let fake = FakeBoard::new();
        let outcome = Request::SaveEdit { id: 2, text: "new".into() }.run(&fake).await;
        assert_eq!(
            outcome,
            Outcome::EditSaved { id: 2, text: "new".into(), result: Ok(()) }
        );
    }

    #[test]
    fn test_kind_hides_credentials() {
        let request = Request::Login { username: "bob".into(), password: "hunter2".into() };
        assert_eq!(request.kind(), "login");
    }
}
