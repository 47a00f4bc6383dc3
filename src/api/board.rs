use std::fmt;

use async_trait::async_trait;

use super::types::{Message, User};

/// Errors that can occur while talking to the board server.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Transport failure (timeout, DNS, connection refused).
    Network(String),
    /// HTTP 401. Carries the server's body text.
    Unauthorized(String),
    /// Any other non-2xx status. `message` is the raw response body.
    Api { status: u16, message: String },
    /// The body was not the JSON we expected.
    Parse(String),
}

impl ApiError {
    /// True when the session is gone and the client must fall back to the
    /// logged-out view.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_))
    }

    /// The server-provided text for HTTP-level failures.
    pub fn server_text(&self) -> Option<&str> {
        match self {
            ApiError::Unauthorized(message) | ApiError::Api { message, .. } => Some(message),
            ApiError::Network(_) | ApiError::Parse(_) => None,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(msg) => write!(f, "network error: {msg}"),
            ApiError::Unauthorized(msg) => write!(f, "not authenticated: {msg}"),
            ApiError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            ApiError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

/// The remote message board. One method per endpoint.
#[async_trait]
pub trait BoardApi: Send + Sync {
    /// `POST /register`
    async fn register(&self, username: &str, password: &str) -> Result<User, ApiError>;

    /// `POST /login`
    async fn login(&self, username: &str, password: &str) -> Result<User, ApiError>;

    /// `POST /logout`
    async fn logout(&self) -> Result<(), ApiError>;

    /// `GET /messages`
    async fn messages(&self) -> Result<Vec<Message>, ApiError>;

    /// `POST /messages/save`, with `reply_to` set for replies.
    async fn save(&self, text: &str, reply_to: Option<i64>) -> Result<Message, ApiError>;

    /// `PUT /messages/update?id=`
    async fn update(&self, id: i64, text: &str) -> Result<(), ApiError>;

    /// `DELETE /messages/delete?id=`
    async fn delete(&self, id: i64) -> Result<(), ApiError>;
}
