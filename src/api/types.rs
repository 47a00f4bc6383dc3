use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// The authenticated user as acknowledged by `/login` and `/register`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub username: String,
}

/// Body of `/login` and `/register`.
#[derive(Serialize, Debug, Clone)]
pub struct Credentials<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// A posted entry on the board. Replies nest to any depth on the wire.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Message {
    pub id: i64,
    pub text: String,
    pub username: String,
    pub user_id: i64,
    pub timestamp: DateTime<Utc>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub replies: Vec<Message>,
}

impl Message {
    /// Local-time display form used by both the HTML and terminal renderers.
    pub fn display_time(&self) -> String {
        self.timestamp
            .with_timezone(&chrono::Local)
            .format("%Y/%m/%d %H:%M:%S")
            .to_string()
    }
}

/// Body of `POST /messages/save`.
#[derive(Serialize, Debug)]
pub struct SaveMessage<'a> {
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<i64>,
}

/// Body of `PUT /messages/update`.
#[derive(Serialize, Debug)]
pub struct UpdateMessage<'a> {
    pub text: &'a str,
}

/// The server encodes an empty list as `null`; treat it as empty.
pub fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
