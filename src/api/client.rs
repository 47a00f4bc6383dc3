//! reqwest implementation of [`BoardApi`].
//!
//! The server tracks the session with a cookie, so the client keeps a cookie
//! store and never handles tokens itself.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;

use super::board::{ApiError, BoardApi};
use super::types::{Credentials, Message, SaveMessage, UpdateMessage, User};

pub struct HttpBoard {
    base_url: String,
    client: reqwest::Client,
}

impl HttpBoard {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn auth(&self, path: &str, username: &str, password: &str) -> Result<User, ApiError> {
        info!("POST {} for user '{}'", path, username);
        let response = self
            .client
            .post(self.url(path))
            .json(&Credentials { username, password })
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let response = check_status(path, response).await?;
        read_json(response).await
    }
}

/// Turns non-2xx responses into `ApiError`, reading the body as text.
async fn check_status(path: &str, response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    debug!("{} -> {}", path, status);
    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .text()
        .await
        .unwrap_or_else(|_| "unknown error".to_string())
        .trim_end()
        .to_string();
    warn!("{} failed: {} - {}", path, status.as_u16(), message);

    if status == StatusCode::UNAUTHORIZED {
        Err(ApiError::Unauthorized(message))
    } else {
        Err(ApiError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let body = response
        .text()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;
    serde_json::from_str(&body).map_err(|e| ApiError::Parse(e.to_string()))
}

#[async_trait]
impl BoardApi for HttpBoard {
    async fn register(&self, username: &str, password: &str) -> Result<User, ApiError> {
        self.auth("/register", username, password).await
    }

    async fn login(&self, username: &str, password: &str) -> Result<User, ApiError> {
        self.auth("/login", username, password).await
    }

    async fn logout(&self) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.url("/logout"))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        check_status("/logout", response).await.map(|_| ())
    }

    /// Only 401 is checked up front; any other status falls through to the
    /// JSON parse, so an error page surfaces as `ApiError::Parse`.
    async fn messages(&self) -> Result<Vec<Message>, ApiError> {
        let response = self
            .client
            .get(self.url("/messages"))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if response.status() == StatusCode::UNAUTHORIZED {
            let message = response.text().await.unwrap_or_default();
            return Err(ApiError::Unauthorized(message.trim_end().to_string()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        // `null` is what the server sends for an empty board
        let messages = serde_json::from_str::<Option<Vec<Message>>>(&body)
            .map(Option::unwrap_or_default)
            .map_err(|e| ApiError::Parse(e.to_string()))?;
        debug!("Loaded {} top-level messages", messages.len());
        Ok(messages)
    }

    async fn save(&self, text: &str, reply_to: Option<i64>) -> Result<Message, ApiError> {
        let response = self
            .client
            .post(self.url("/messages/save"))
            .json(&SaveMessage { text, reply_to })
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let response = check_status("/messages/save", response).await?;
        read_json(response).await
    }

    async fn update(&self, id: i64, text: &str) -> Result<(), ApiError> {
        let response = self
            .client
            .put(self.url("/messages/update"))
            .query(&[("id", id)])
            .json(&UpdateMessage { text })
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        check_status("/messages/update", response).await.map(|_| ())
    }

    async fn delete(&self, id: i64) -> Result<(), ApiError> {
        let response = self
            .client
            .delete(self.url("/messages/delete"))
            .query(&[("id", id)])
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        check_status("/messages/delete", response).await.map(|_| ())
    }
}
