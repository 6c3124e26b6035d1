//! Remembered user profile.

use serde::{Deserialize, Serialize};

/// Display identity for the current session. No credential verification
/// happens anywhere; any submitted name/email pair is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSession {
    pub name: String,
    pub email: String,
}

impl UserSession {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}
