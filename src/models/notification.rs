// src/models/notification.rs

use serde::{Deserialize, Serialize};

/// Kind of a notification entry.
///
/// `Info`/`Success`/`Error` are toast kinds raised by local actions;
/// `Answer`/`Comment`/`Like` are activity kinds tied to a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Answer,
    Comment,
    Like,
    Info,
    Success,
    Error,
}

/// An entry of the in-memory notification ledger.
///
/// Never persisted: the ledger lives for the process lifetime and a reload
/// loses it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,

    /// Recipient. Entries are only visible to this user.
    pub user_id: String,

    #[serde(rename = "type")]
    pub kind: NotificationKind,

    pub message: String,

    /// Millisecond epoch.
    pub timestamp: i64,

    pub is_read: bool,

    /// Question this entry links to, for activity kinds.
    pub question_id: Option<String>,
}
