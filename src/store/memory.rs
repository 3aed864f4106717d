// src/store/memory.rs

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::{
    error::AppError,
    models::{comment::Comment, post::Post, user::RemoteProfile},
    store::{PostStore, ProfileStore},
};

/// In-memory document store backing the test-suite and offline development.
///
/// Implements the same update primitives as the hosted service, including
/// the set semantics of array-union (a value already present is not added
/// twice) and the serialized point increment.
#[derive(Default)]
pub struct MemoryStore {
    posts: Mutex<Vec<Post>>,
    profiles: Mutex<HashMap<String, RemoteProfile>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_post<T>(
        &self,
        post_id: &str,
        f: impl FnOnce(&mut Post) -> T,
    ) -> Result<T, AppError> {
        let mut posts = self.posts.lock().expect("post store poisoned");
        let post = posts
            .iter_mut()
            .find(|p| p.id == post_id)
            .ok_or_else(|| AppError::NotFound(format!("post {} not found", post_id)))?;
        Ok(f(post))
    }
}

#[async_trait]
impl PostStore for MemoryStore {
    async fn list_posts(&self) -> Result<Vec<Post>, AppError> {
        let mut posts = self.posts.lock().expect("post store poisoned").clone();
        // Stable sort: equal timestamps keep insertion order.
        posts.sort_by_key(|p| std::cmp::Reverse(p.timestamp));
        Ok(posts)
    }

    async fn create_post(&self, post: &Post) -> Result<String, AppError> {
        let mut posts = self.posts.lock().expect("post store poisoned");
        posts.push(post.clone());
        Ok(post.id.clone())
    }

    async fn set_answer(
        &self,
        post_id: &str,
        answer: &str,
        replied_by: &str,
        replied_at: i64,
    ) -> Result<(), AppError> {
        self.with_post(post_id, |post| {
            post.answer = Some(answer.to_string());
            post.replied_by = Some(replied_by.to_string());
            post.replied_at = Some(replied_at);
        })
    }

    async fn add_like(&self, post_id: &str, user_id: &str) -> Result<(), AppError> {
        self.with_post(post_id, |post| {
            if !post.likes.iter().any(|id| id == user_id) {
                post.likes.push(user_id.to_string());
            }
        })
    }

    async fn remove_like(&self, post_id: &str, user_id: &str) -> Result<(), AppError> {
        self.with_post(post_id, |post| {
            post.likes.retain(|id| id != user_id);
        })
    }

    async fn add_comment(&self, post_id: &str, comment: &Comment) -> Result<(), AppError> {
        self.with_post(post_id, |post| {
            if !post.comments.iter().any(|c| c.id == comment.id) {
                post.comments.push(comment.clone());
            }
        })
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn create_profile(&self, profile: &RemoteProfile) -> Result<(), AppError> {
        let mut profiles = self.profiles.lock().expect("profile store poisoned");
        profiles.insert(profile.id.clone(), profile.clone());
        Ok(())
    }

    async fn add_points(&self, user_id: &str, delta: i64, level: i64) -> Result<(), AppError> {
        let mut profiles = self.profiles.lock().expect("profile store poisoned");
        let profile = profiles
            .get_mut(user_id)
            .ok_or_else(|| AppError::NotFound(format!("profile {} not found", user_id)))?;
        profile.points += delta;
        profile.level = level;
        Ok(())
    }

    async fn top_profiles(&self, limit: usize) -> Result<Vec<RemoteProfile>, AppError> {
        let mut profiles: Vec<RemoteProfile> = self
            .profiles
            .lock()
            .expect("profile store poisoned")
            .values()
            .cloned()
            .collect();
        profiles.sort_by_key(|p| std::cmp::Reverse(p.points));
        profiles.truncate(limit);
        Ok(profiles)
    }
}
