use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Telegram chat id (numeric). Replies are addressed to it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChatId(pub i64);

/// Messaging-platform identity a user record gets linked to.
///
/// Always compared as a string, whatever the platform's native id type is.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExternalIdentity(pub String);

impl ExternalIdentity {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<ChatId> for ExternalIdentity {
    fn from(chat_id: ChatId) -> Self {
        Self(chat_id.0.to_string())
    }
}

impl fmt::Display for ExternalIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Backend user record id (opaque).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Single-use code that proves ownership of a backend account.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BindCode {
    pub code: String,
    pub user_id: UserId,
    pub expires_at: DateTime<Utc>,
}

impl BindCode {
    /// Codes are compared case-insensitively; the stored form is uppercase.
    pub fn canonicalize(raw: &str) -> String {
        raw.trim().to_uppercase()
    }

    /// Valid only while `expires_at` is strictly after `now`.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

/// Backend user record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserAccount {
    pub id: UserId,
    pub name: String,
    pub external_chat_id: Option<ExternalIdentity>,
}

/// Projection returned when looking a user up by linked identity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkedUser {
    /// `None` when the user row has no display name.
    pub name: Option<String>,
    pub external_chat_id: ExternalIdentity,
}
