//! # Session
//!
//! The client-visible record of who is logged in. Set from the server's
//! login acknowledgment, dropped on logout or on any 401.
//!
//! Ownership checks go through [`Session::owns`] so the rule lives in one place.

use crate::api::{Message, User};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: i64,
    pub username: String,
}

impl Session {
    /// Edit and delete affordances are only offered on the session user's own messages.
    pub fn owns(&self, message: &Message) -> bool {
        self.user_id == message.user_id
    }
}

impl From<User> for Session {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id,
            username: user.username,
        }
    }
}

/// Ownership as seen by a possibly logged-out viewer.
pub fn viewer_owns(session: Option<&Session>, message: &Message) -> bool {
    session.is_some_and(|s| s.owns(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::message;

    #[test]
    fn test_session_from_user() {
        let session = Session::from(User { id: 4, username: "amy".to_string() });
        assert_eq!(session.user_id, 4);
        assert_eq!(session.username, "amy");
    }

    #[test]
    fn test_owns() {
        let session = Session { user_id: 1, username: "bob".to_string() };
        assert!(session.owns(&message(10, 1, "mine")));
        assert!(!session.owns(&message(11, 2, "theirs")));
    }

    #[test]
    fn test_logged_out_viewer_owns_nothing() {
        assert!(!viewer_owns(None, &message(10, 1, "x")));
    }
}
