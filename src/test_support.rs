//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use crate::api::{ApiError, BoardApi, Message, User};
use crate::core::prompt::Prompt;

/// A message posted by `user_id` at a fixed time.
pub fn message(id: i64, user_id: i64, text: &str) -> Message {
    Message {
        id,
        text: text.to_string(),
        username: format!("user{user_id}"),
        user_id,
        timestamp: Utc
            .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
            .single()
            .expect("valid fixed timestamp"),
        replies: Vec::new(),
    }
}

pub fn with_replies(mut parent: Message, replies: Vec<Message>) -> Message {
    parent.replies = replies;
    parent
}

/// Records alerts and questions; answers confirmations from a queue (yes when empty).
#[derive(Default)]
pub struct ScriptedPrompt {
    pub alerts: Vec<String>,
    pub questions: Vec<String>,
    pub answers: VecDeque<bool>,
}

impl Prompt for ScriptedPrompt {
    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }

    fn confirm(&mut self, question: &str) -> bool {
        self.questions.push(question.to_string());
        self.answers.pop_front().unwrap_or(true)
    }
}

/// In-memory board with canned results and a call log.
///
/// Every endpoint succeeds by default: login/register return user 1 "bob",
/// the list is empty, acknowledgments are `Ok(())`.
pub struct FakeBoard {
    calls: Mutex<Vec<String>>,
    user: Mutex<Result<User, ApiError>>,
    list: Mutex<Result<Vec<Message>, ApiError>>,
    saved: Mutex<Result<Message, ApiError>>,
    ack: Mutex<Result<(), ApiError>>,
}

impl FakeBoard {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            user: Mutex::new(Ok(User { id: 1, username: "bob".to_string() })),
            list: Mutex::new(Ok(Vec::new())),
            saved: Mutex::new(Ok(message(100, 1, "saved"))),
            ack: Mutex::new(Ok(())),
        }
    }

    pub fn set_user(&self, result: Result<User, ApiError>) {
        *self.user.lock().unwrap() = result;
    }

    pub fn set_list(&self, result: Result<Vec<Message>, ApiError>) {
        *self.list.lock().unwrap() = result;
    }

    pub fn set_saved(&self, result: Result<Message, ApiError>) {
        *self.saved.lock().unwrap() = result;
    }

    pub fn set_ack(&self, result: Result<(), ApiError>) {
        *self.ack.lock().unwrap() = result;
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl BoardApi for FakeBoard {
    async fn register(&self, username: &str, _password: &str) -> Result<User, ApiError> {
        self.record(format!("register {username}"));
        self.user.lock().unwrap().clone()
    }

    async fn login(&self, username: &str, _password: &str) -> Result<User, ApiError> {
        self.record(format!("login {username}"));
        self.user.lock().unwrap().clone()
    }

    async fn logout(&self) -> Result<(), ApiError> {
        self.record("logout".to_string());
        self.ack.lock().unwrap().clone()
    }

    async fn messages(&self) -> Result<Vec<Message>, ApiError> {
        self.record("messages".to_string());
        self.list.lock().unwrap().clone()
    }

    async fn save(&self, text: &str, reply_to: Option<i64>) -> Result<Message, ApiError> {
        self.record(format!("save {text} {reply_to:?}"));
        self.saved.lock().unwrap().clone()
    }

    async fn update(&self, id: i64, text: &str) -> Result<(), ApiError> {
        self.record(format!("update {id} {text}"));
        self.ack.lock().unwrap().clone()
    }

    async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.record(format!("delete {id}"));
        self.ack.lock().unwrap().clone()
    }
}
