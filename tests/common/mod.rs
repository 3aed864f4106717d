// tests/common/mod.rs

use std::sync::Arc;

use async_trait::async_trait;

use mkway::{
    ai::{Tutor, parse_quiz},
    config::Config,
    error::AppError,
    handlers::auth,
    models::{
        post::{Post, Target},
        quiz::Quiz,
        user::{RegisterRequest, User},
    },
    state::AppContext,
    store::{PostStore, ProfileStore, memory::MemoryStore},
};

/// Scripted tutor double standing in for the hosted model.
///
/// `answer`/`quiz_json` of `None` simulate an unreachable service; quiz
/// payloads go through the real parse/validate path.
pub struct ScriptedTutor {
    pub answer: Option<String>,
    pub quiz_json: Option<String>,
}

impl Default for ScriptedTutor {
    fn default() -> Self {
        Self {
            answer: Some("A thorough explanation.".to_string()),
            quiz_json: Some(sample_quiz_json()),
        }
    }
}

#[async_trait]
impl Tutor for ScriptedTutor {
    async fn ask(&self, _prompt: &str, _image: Option<&str>) -> Result<String, AppError> {
        self.answer
            .clone()
            .ok_or_else(|| AppError::Ai("scripted outage".to_string()))
    }

    async fn generate_quiz(&self, _subject: &str) -> Result<Quiz, AppError> {
        let raw = self
            .quiz_json
            .clone()
            .ok_or_else(|| AppError::Ai("scripted outage".to_string()))?;
        parse_quiz(&raw)
    }
}

/// A 5-question quiz payload where option 0 is always correct.
pub fn sample_quiz_json() -> String {
    serde_json::json!({
        "title": "Sample Quiz",
        "questions": (0..5).map(|i| serde_json::json!({
            "question": format!("Question {}", i),
            "options": ["Right", "Wrong", "Also wrong", "Still wrong"],
            "correctAnswer": 0
        })).collect::<Vec<_>>()
    })
    .to_string()
}

pub fn test_config() -> Config {
    Config {
        store_url: "http://127.0.0.1:1".to_string(),
        store_api_key: None,
        ai_url: "http://127.0.0.1:1".to_string(),
        ai_api_key: "test-key".to_string(),
        ai_model: "test-model".to_string(),
        data_dir: std::env::temp_dir().join(format!("mkway_test_{}", uuid::Uuid::new_v4())),
        admin_access_key: Some("staff-room".to_string()),
        sync_interval_ms: 25,
        rust_log: "error".to_string(),
    }
}

pub struct TestApp {
    pub ctx: AppContext,
    pub config: Config,
}

/// Builds an app over the in-memory store and the default scripted tutor.
pub fn spawn_app() -> TestApp {
    spawn_app_with_tutor(ScriptedTutor::default())
}

pub fn spawn_app_with_tutor(tutor: ScriptedTutor) -> TestApp {
    let config = test_config();
    spawn_app_inner(config, Arc::new(MemoryStore::new()), tutor)
}

/// Reopens an app on the same data directory, like a process restart:
/// device-storage snapshots survive, the in-memory store does not.
pub fn reopen(app: &TestApp) -> TestApp {
    spawn_app_inner(
        app.config.clone(),
        Arc::new(MemoryStore::new()),
        ScriptedTutor::default(),
    )
}

fn spawn_app_inner(config: Config, store: Arc<MemoryStore>, tutor: ScriptedTutor) -> TestApp {
    let posts: Arc<dyn PostStore> = store.clone();
    let profiles: Arc<dyn ProfileStore> = store;

    let ctx = AppContext::with_services(config.clone(), posts, profiles, Arc::new(tutor))
        .expect("failed to build app context");

    TestApp { ctx, config }
}

pub async fn register_user(ctx: &AppContext, name: &str) -> User {
    auth::register(
        ctx,
        RegisterRequest {
            name: name.to_string(),
            password: "password123".to_string(),
        },
    )
    .await
    .expect("registration failed")
}

/// Pulls the current store contents into the context cache, standing in
/// for one delivery of the live subscription.
pub async fn sync_cache(ctx: &AppContext) {
    let posts = ctx.posts.list_posts().await.expect("listing posts failed");
    ctx.apply_posts_snapshot(posts);
}

/// Builds a post record directly, for exercising the pure view filters.
pub fn sample_post(
    id: &str,
    student_id: &str,
    student_name: &str,
    text: &str,
    target: Target,
    is_private: bool,
    timestamp: i64,
    answer: Option<&str>,
) -> Post {
    Post {
        id: id.to_string(),
        student_id: student_id.to_string(),
        student_name: student_name.to_string(),
        text: text.to_string(),
        image: None,
        target,
        timestamp,
        answer: answer.map(|a| a.to_string()),
        points: 0,
        tags: vec!["General".to_string()],
        likes: Vec::new(),
        comments: Vec::new(),
        is_private,
        replied_by: None,
        replied_at: None,
    }
}
