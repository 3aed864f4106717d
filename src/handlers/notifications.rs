// src/handlers/notifications.rs

use crate::{
    config::TOAST_TTL_MS,
    error::AppError,
    models::notification::{Notification, NotificationKind},
    state::AppContext,
    utils::time::now_ms,
};

/// The in-memory notification ledger.
///
/// Append-only for the process lifetime, newest first, never persisted —
/// a reload loses it. The most recent entry doubles as the transient
/// toast, which self-expires `TOAST_TTL_MS` after its timestamp; expiry is
/// computed against the entry timestamp so no timer task is needed and the
/// behavior is deterministic under test.
#[derive(Debug, Default)]
pub struct NotificationLedger {
    entries: Vec<Notification>,
    active: Option<String>,
}

impl NotificationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry for a recipient and pins it as the active toast.
    pub fn push(
        &mut self,
        user_id: &str,
        kind: NotificationKind,
        message: &str,
        question_id: Option<String>,
        now: i64,
    ) -> Notification {
        let entry = Notification {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            kind,
            message: message.to_string(),
            timestamp: now,
            is_read: false,
            question_id,
        };
        self.entries.insert(0, entry.clone());
        self.active = Some(entry.id.clone());
        entry
    }

    /// The pinned toast, while it is still within its display window.
    pub fn active_toast(&self, now: i64) -> Option<&Notification> {
        let id = self.active.as_ref()?;
        let entry = self.entries.iter().find(|e| &e.id == id)?;
        (now - entry.timestamp < TOAST_TTL_MS).then_some(entry)
    }

    /// Entries visible to a user, newest first.
    pub fn entries_for(&self, user_id: &str) -> Vec<Notification> {
        self.entries
            .iter()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect()
    }

    pub fn unread_count(&self, user_id: &str) -> usize {
        self.entries
            .iter()
            .filter(|e| e.user_id == user_id && !e.is_read)
            .count()
    }

    /// Flips `is_read` on the matching entry owned by the user.
    pub fn mark_read(&mut self, user_id: &str, id: &str) -> Result<(), AppError> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.id == id && e.user_id == user_id)
            .ok_or_else(|| AppError::NotFound(format!("notification {} not found", id)))?;
        entry.is_read = true;
        Ok(())
    }

    /// Removes every entry owned by the user.
    pub fn clear_all(&mut self, user_id: &str) {
        self.entries.retain(|e| e.user_id != user_id);
    }
}

/// Raises a toast-style notification for the current user ("guest" when
/// nobody is signed in).
pub fn notify(ctx: &AppContext, message: &str, kind: NotificationKind) -> Notification {
    let user_id = ctx
        .current_user()
        .map(|u| u.id)
        .unwrap_or_else(|| "guest".to_string());
    notify_user(ctx, &user_id, kind, message, None)
}

/// Files a notification for a specific recipient, e.g. the author of an
/// answered question.
pub fn notify_user(
    ctx: &AppContext,
    user_id: &str,
    kind: NotificationKind,
    message: &str,
    question_id: Option<String>,
) -> Notification {
    ctx.notifications
        .lock()
        .expect("notification ledger poisoned")
        .push(user_id, kind, message, question_id, now_ms())
}

/// Notifications visible to the current user, newest first.
pub fn visible(ctx: &AppContext) -> Vec<Notification> {
    match ctx.current_user() {
        Some(user) => ctx
            .notifications
            .lock()
            .expect("notification ledger poisoned")
            .entries_for(&user.id),
        None => Vec::new(),
    }
}

/// Unread badge count for the current user.
pub fn unread_count(ctx: &AppContext) -> usize {
    match ctx.current_user() {
        Some(user) => ctx
            .notifications
            .lock()
            .expect("notification ledger poisoned")
            .unread_count(&user.id),
        None => 0,
    }
}

/// The toast currently on screen, if any.
pub fn active_toast(ctx: &AppContext) -> Option<Notification> {
    ctx.notifications
        .lock()
        .expect("notification ledger poisoned")
        .active_toast(now_ms())
        .cloned()
}

/// Marks one of the current user's entries as read.
pub fn mark_read(ctx: &AppContext, id: &str) -> Result<(), AppError> {
    let user = ctx.require_user()?;
    ctx.notifications
        .lock()
        .expect("notification ledger poisoned")
        .mark_read(&user.id, id)
}

/// Clears the current user's entries.
pub fn clear_all(ctx: &AppContext) -> Result<(), AppError> {
    let user = ctx.require_user()?;
    ctx.notifications
        .lock()
        .expect("notification ledger poisoned")
        .clear_all(&user.id);
    Ok(())
}
