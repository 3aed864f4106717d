// src/store/remote.rs

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::{
    config::Config,
    error::AppError,
    models::{comment::Comment, post::Post, user::RemoteProfile},
    store::{PostStore, ProfileStore},
};

/// REST client for the hosted document store.
///
/// Collections are exposed under `{base}/v1/{collection}`; documents are
/// appended with POST, mutated with PATCH carrying exactly one of the
/// store's update primitives: `set` (field overwrite), `arrayUnion`,
/// `arrayRemove`, or `increment` (the store-side atomic counter).
#[derive(Clone)]
pub struct RemoteStore {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

/// Response body of a document append.
#[derive(Deserialize)]
struct CreatedDoc {
    id: String,
}

impl RemoteStore {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            base_url: config.store_url.trim_end_matches('/').to_string(),
            api_key: config.store_api_key.clone(),
        }
    }

    fn collection_url(&self, collection: &str) -> String {
        format!("{}/v1/{}", self.base_url, collection)
    }

    fn document_url(&self, collection: &str, id: &str) -> String {
        format!("{}/v1/{}/{}", self.base_url, collection, id)
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => req.bearer_auth(key),
            None => req,
        }
    }

    /// Sends a PATCH carrying one update primitive against a document.
    async fn patch(
        &self,
        collection: &str,
        id: &str,
        body: serde_json::Value,
    ) -> Result<(), AppError> {
        let response = self
            .authorize(self.client.patch(self.document_url(collection, id)))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::Remote(format!(
                "update of {}/{} failed with status {}",
                collection,
                id,
                response.status()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl PostStore for RemoteStore {
    async fn list_posts(&self) -> Result<Vec<Post>, AppError> {
        let response = self
            .authorize(self.client.get(self.collection_url("posts")))
            .query(&[("orderBy", "timestamp"), ("direction", "desc")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::Remote(format!(
                "listing posts failed with status {}",
                response.status()
            )));
        }

        // Deserializing into the typed record is the validation point for
        // everything arriving from the remote boundary.
        let posts = response.json::<Vec<Post>>().await?;
        Ok(posts)
    }

    async fn create_post(&self, post: &Post) -> Result<String, AppError> {
        let response = self
            .authorize(self.client.post(self.collection_url("posts")))
            .json(post)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::Remote(format!(
                "post creation failed with status {}",
                response.status()
            )));
        }

        let created = response.json::<CreatedDoc>().await?;
        Ok(created.id)
    }

    async fn set_answer(
        &self,
        post_id: &str,
        answer: &str,
        replied_by: &str,
        replied_at: i64,
    ) -> Result<(), AppError> {
        self.patch(
            "posts",
            post_id,
            json!({
                "set": {
                    "answer": answer,
                    "repliedBy": replied_by,
                    "repliedAt": replied_at,
                }
            }),
        )
        .await
    }

    async fn add_like(&self, post_id: &str, user_id: &str) -> Result<(), AppError> {
        self.patch("posts", post_id, json!({ "arrayUnion": { "likes": [user_id] } }))
            .await
    }

    async fn remove_like(&self, post_id: &str, user_id: &str) -> Result<(), AppError> {
        self.patch("posts", post_id, json!({ "arrayRemove": { "likes": [user_id] } }))
            .await
    }

    async fn add_comment(&self, post_id: &str, comment: &Comment) -> Result<(), AppError> {
        self.patch("posts", post_id, json!({ "arrayUnion": { "comments": [comment] } }))
            .await
    }
}

#[async_trait]
impl ProfileStore for RemoteStore {
    async fn create_profile(&self, profile: &RemoteProfile) -> Result<(), AppError> {
        let response = self
            .authorize(self.client.post(self.collection_url("users")))
            .json(profile)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::Remote(format!(
                "profile creation failed with status {}",
                response.status()
            )));
        }
        Ok(())
    }

    async fn add_points(&self, user_id: &str, delta: i64, level: i64) -> Result<(), AppError> {
        self.patch(
            "users",
            user_id,
            json!({
                "increment": { "points": delta },
                "set": { "level": level },
            }),
        )
        .await
    }

    async fn top_profiles(&self, limit: usize) -> Result<Vec<RemoteProfile>, AppError> {
        let response = self
            .authorize(self.client.get(self.collection_url("users")))
            .query(&[
                ("orderBy", "points"),
                ("direction", "desc"),
                ("limit", &limit.to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::Remote(format!(
                "listing profiles failed with status {}",
                response.status()
            )));
        }

        let profiles = response.json::<Vec<RemoteProfile>>().await?;
        Ok(profiles)
    }
}
