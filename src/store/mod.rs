// src/store/mod.rs

pub mod local;
pub mod memory;
pub mod remote;
pub mod subscription;

use async_trait::async_trait;

use crate::{
    error::AppError,
    models::{comment::Comment, post::Post, user::RemoteProfile},
};

/// Boundary over the remote `posts` collection.
///
/// Every write is an explicit result so callers see success or failure
/// instead of a fire-and-forget; retry policy stays with the caller.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Full collection, ordered by timestamp descending.
    async fn list_posts(&self) -> Result<Vec<Post>, AppError>;

    /// Appends a document and returns its id.
    async fn create_post(&self, post: &Post) -> Result<String, AppError>;

    /// Sets the reply fields on a question document.
    async fn set_answer(
        &self,
        post_id: &str,
        answer: &str,
        replied_by: &str,
        replied_at: i64,
    ) -> Result<(), AppError>;

    /// Array-union of a user id into the like set.
    async fn add_like(&self, post_id: &str, user_id: &str) -> Result<(), AppError>;

    /// Array-remove of a user id from the like set.
    async fn remove_like(&self, post_id: &str, user_id: &str) -> Result<(), AppError>;

    /// Array-union of a comment object into the comment list.
    async fn add_comment(&self, post_id: &str, comment: &Comment) -> Result<(), AppError>;
}

/// Boundary over the remote `users` collection.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn create_profile(&self, profile: &RemoteProfile) -> Result<(), AppError>;

    /// Atomic increment of the point total plus overwrite of the derived
    /// level. The store serializes concurrent increments; the local mirror
    /// may transiently lag the authoritative value.
    async fn add_points(&self, user_id: &str, delta: i64, level: i64) -> Result<(), AppError>;

    /// Top profiles by points descending.
    async fn top_profiles(&self, limit: usize) -> Result<Vec<RemoteProfile>, AppError>;
}
